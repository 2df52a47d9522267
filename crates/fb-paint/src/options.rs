//! Paint session options.
//!
//! | Option           | Default           |
//! |------------------|-------------------|
//! | `brush_color`    | white             |
//! | `brush_radius`   | 30                |
//! | `tick`           | 10 ms             |
//! | `framebuffer`    | `/dev/fb0`        |
//! | `pointer`        | `/dev/input/mice` |
//! | `default_output` | `paint.fbimg`     |
//!
//! The binary fills these in from its command line; the library only reads
//! them.

use std::path::PathBuf;
use std::time::Duration;

use fb_image::Rgb;

pub const DEFAULT_RADIUS: u32 = 30;
pub const DEFAULT_TICK: Duration = Duration::from_millis(10);
pub const DEFAULT_FRAMEBUFFER: &str = "/dev/fb0";
pub const DEFAULT_POINTER: &str = "/dev/input/mice";
pub const DEFAULT_OUTPUT: &str = "paint.fbimg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintOptions {
    pub brush_color: Rgb,
    pub brush_radius: u32,
    /// Longest wait for input before the interrupt flag is sampled again.
    pub tick: Duration,
    pub framebuffer: PathBuf,
    pub pointer: PathBuf,
    /// Where a blank canvas is saved when no file was given.
    pub default_output: PathBuf,
}

impl Default for PaintOptions {
    fn default() -> Self {
        Self {
            brush_color: Rgb::WHITE,
            brush_radius: DEFAULT_RADIUS,
            tick: DEFAULT_TICK,
            framebuffer: PathBuf::from(DEFAULT_FRAMEBUFFER),
            pointer: PathBuf::from(DEFAULT_POINTER),
            default_output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
