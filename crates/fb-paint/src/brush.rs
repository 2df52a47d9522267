//! The circular brush.
//!
//! A stamp fills every cell `(cx + dx, cy + dy)` with `dx² + dy² ≤ r²`,
//! where `r` is half the configured radius (integer division). Cells outside
//! the canvas placement are skipped, so paint never spills onto the border
//! around a centered image. Radius 1 therefore paints a single cell.

use fb_device::Surface;
use fb_image::Rgb;

use crate::cursor::Placement;
use crate::line::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    pub color: Rgb,
    /// Always positive.
    pub radius: u32,
}

impl Brush {
    #[must_use]
    pub const fn new(color: Rgb, radius: u32) -> Self {
        Self { color, radius }
    }

    /// Half the radius: the reach of a stamp from its center.
    #[inline]
    #[must_use]
    pub const fn reach(&self) -> u32 {
        self.radius / 2
    }

    /// Whether a stamp centered at `center` covers `cell`, before clipping.
    #[must_use]
    pub fn covers(&self, center: Point, cell: Point) -> bool {
        let r = i64::from(self.reach());
        let dx = i64::from(cell.x) - i64::from(center.x);
        let dy = i64::from(cell.y) - i64::from(center.y);
        dx * dx + dy * dy <= r * r
    }

    /// Paint one disc at `center`, clipped to `canvas`.
    ///
    /// Only cells inside both the disc's bounding box and the canvas are
    /// visited, so a huge radius costs no more than filling the canvas.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn stamp<M>(&self, surface: &mut Surface<M>, center: Point, canvas: &Placement)
    where
        M: AsRef<[u8]> + AsMut<[u8]>,
    {
        if canvas.width == 0 || canvas.height == 0 {
            return;
        }
        let r = i64::from(self.reach());
        let (cx, cy) = (i64::from(center.x), i64::from(center.y));
        let left = i64::from(canvas.x);
        let top = i64::from(canvas.y);
        let right = left + i64::from(canvas.width) - 1;
        let bottom = top + i64::from(canvas.height) - 1;

        // Both ranges lie inside the canvas, hence inside u32.
        for y in (cy - r).max(top)..=(cy + r).min(bottom) {
            let dy = y - cy;
            for x in (cx - r).max(left)..=(cx + r).min(right) {
                let dx = x - cx;
                if dx * dx + dy * dy <= r * r {
                    surface.write_pixel(y as u32, x as u32, self.color);
                }
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
