//! # fb-paint — the paint session
//!
//! - **[`line`]** — `Point` and the Bresenham `Line` iterator
//! - **[`cursor`]** — the canvas `Placement` rectangle and the clamped `Cursor`
//! - **[`brush`]** — the circular `Brush` stamp
//! - **[`session`]** — `Session`: indicator, strokes, commands, open and close
//! - **[`run`]** — the event loop and the `EventSource` seam
//! - **[`options`]** — `PaintOptions` with the stock defaults
//!
//! The session only ever touches pixels through [`fb_device::Surface`], so
//! everything here runs against a `Vec<u8>` in tests.

pub mod brush;
pub mod cursor;
pub mod line;
pub mod options;
pub mod run;
pub mod session;

pub use brush::Brush;
pub use cursor::{Cursor, Placement};
pub use line::{Line, Point};
pub use options::PaintOptions;
pub use run::{EventSource, run};
pub use session::{Exit, Session, State, TerminalGuard};
