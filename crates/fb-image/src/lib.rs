//! # fb-image — raster data for fbtools
//!
//! Pure data transforms with no device dependency:
//!
//! - **[`image`]** — `RasterImage`, a tightly packed 3-byte-per-pixel buffer
//! - **[`color`]** — `Rgb` triples and hex color parsing
//! - **[`codec`]** — the FBIMG file format (decode / encode / load / save)
//! - **[`scale`]** — bilinear resampling and fit-to-bounds sizing
//! - **[`convert`]** — PNG ↔ `RasterImage` through the `png` crate
//! - **[`error`]** — the crate's error type

pub mod codec;
pub mod color;
pub mod convert;
pub mod error;
pub mod image;
pub mod scale;

pub use color::Rgb;
pub use error::{Error, Result};
pub use image::{ChannelOrder, RasterImage};
