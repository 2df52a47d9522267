//! Canvas placement and the pointer cursor.
//!
//! The canvas is the rectangle of the surface occupied by the image: the
//! whole surface for a blank canvas, a centered sub-rectangle when a smaller
//! image was loaded. The cursor is clamped into it after every motion
//! packet, so strokes start and end on canvas cells.

use crate::line::Point;

/// Where the canvas sits on the surface. Fixed for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

// Surface dimensions fit comfortably in i32.
#[allow(clippy::cast_possible_wrap)]
impl Placement {
    /// The whole surface.
    #[must_use]
    pub const fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// An `image_width × image_height` canvas centered on the surface.
    ///
    /// Offsets use integer division. The image must already fit.
    #[must_use]
    pub const fn centered(
        surface_width: u32,
        surface_height: u32,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        Self {
            x: surface_width.saturating_sub(image_width) / 2,
            y: surface_height.saturating_sub(image_height) / 2,
            width: image_width,
            height: image_height,
        }
    }

    /// Top-left cell.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }

    #[must_use]
    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.x as i32
            && p.y >= self.y as i32
            && p.x < (self.x + self.width) as i32
            && p.y < (self.y + self.height) as i32
    }

    /// Nearest cell inside the canvas.
    #[must_use]
    pub fn clamp(&self, p: Point) -> Point {
        let (x0, y0) = (self.x as i32, self.y as i32);
        let x1 = x0 + self.width.saturating_sub(1) as i32;
        let y1 = y0 + self.height.saturating_sub(1) as i32;
        Point::new(p.x.clamp(x0, x1), p.y.clamp(y0, y1))
    }
}

/// Current and previous pointer position, in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    current: Point,
    previous: Point,
}

impl Cursor {
    /// A cursor resting on the canvas origin.
    #[must_use]
    pub const fn new(placement: &Placement) -> Self {
        let at = placement.origin();
        Self {
            current: at,
            previous: at,
        }
    }

    #[inline]
    #[must_use]
    pub const fn current(&self) -> Point {
        self.current
    }

    #[inline]
    #[must_use]
    pub const fn previous(&self) -> Point {
        self.previous
    }

    /// Apply a relative motion. Zero motion still shifts `current` into
    /// `previous`.
    pub fn apply(&mut self, dx: i32, dy: i32, placement: &Placement) {
        self.previous = self.current;
        let moved = Point::new(
            self.current.x.saturating_add(dx),
            self.current.y.saturating_add(dy),
        );
        self.current = placement.clamp(moved);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Placement ───────────────────────────────────────────────────

    #[test]
    fn centered_offsets_use_integer_division() {
        let p = Placement::centered(11, 8, 4, 3);
        assert_eq!((p.x, p.y), (3, 2));
        assert_eq!(Placement::centered(4, 4, 4, 4), Placement::full(4, 4));
    }

    #[test]
    fn contains_is_half_open() {
        let p = Placement::centered(10, 10, 4, 4);
        assert!(p.contains(Point::new(3, 3)));
        assert!(p.contains(Point::new(6, 6)));
        assert!(!p.contains(Point::new(7, 6)));
        assert!(!p.contains(Point::new(2, 3)));
    }

    // ── Cursor ──────────────────────────────────────────────────────

    #[test]
    fn starts_at_canvas_origin() {
        let c = Cursor::new(&Placement::centered(10, 10, 4, 4));
        assert_eq!(c.current(), Point::new(3, 3));
        assert_eq!(c.previous(), Point::new(3, 3));
    }

    #[test]
    fn motion_shifts_previous() {
        let p = Placement::full(100, 100);
        let mut c = Cursor::new(&p);
        c.apply(5, 7, &p);
        c.apply(1, 0, &p);
        assert_eq!(c.previous(), Point::new(5, 7));
        assert_eq!(c.current(), Point::new(6, 7));
        c.apply(0, 0, &p);
        assert_eq!(c.previous(), c.current());
    }

    #[test]
    fn clamped_to_canvas() {
        let p = Placement::centered(20, 10, 10, 4);
        let mut c = Cursor::new(&p);
        c.apply(-100, -100, &p);
        assert_eq!(c.current(), Point::new(5, 3));
        c.apply(1000, 1000, &p);
        assert_eq!(c.current(), Point::new(14, 6));
        assert!(p.contains(c.current()));
    }

    #[test]
    fn clamp_stays_within_bounds_for_any_walk() {
        let p = Placement::centered(64, 48, 30, 20);
        let mut c = Cursor::new(&p);
        for (dx, dy) in [(127, -128), (-128, 127), (3, 3), (-1, 200), (90, -7)] {
            c.apply(dx, dy, &p);
            let at = c.current();
            assert!(at.x >= 17 && at.x < 64 - 17, "{at:?}");
            assert!(at.y >= 14 && at.y < 48 - 14, "{at:?}");
        }
    }
}
