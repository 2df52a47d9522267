//! Bresenham line rasterizer.
//!
//! Mouse packets arrive sparsely: a fast flick moves the cursor tens of
//! pixels per packet. Stamping the brush only at packet positions leaves a
//! dotted trail, so each stroke segment is walked cell by cell.
//!
//! [`Line`] yields every cell of the 8-connected path from `from` to `to`,
//! both endpoints included, no duplicates, no gaps. A line of
//! `max(|dx|, |dy|)` steps yields exactly that many plus one points.

/// An integer position on the surface grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev (king-move) distance.
    #[must_use]
    pub const fn chebyshev(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }
}

/// Iterator over the cells of a line segment.
///
/// Cloning snapshots the walk: the clone continues from where the original
/// currently is.
#[derive(Debug, Clone)]
pub struct Line {
    at: Point,
    to: Point,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

impl Line {
    #[must_use]
    pub const fn new(from: Point, to: Point) -> Self {
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        Self {
            at: from,
            to,
            dx,
            dy,
            sx: if from.x < to.x { 1 } else { -1 },
            sy: if from.y < to.y { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }
}

impl Iterator for Line {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }
        let current = self.at;
        if current == self.to {
            self.done = true;
            return Some(current);
        }

        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.at.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.at.y += self.sy;
        }
        Some(current)
    }
}

impl std::iter::FusedIterator for Line {}

// ─── Tests ───────────────────────────────────────────────────────────────────
