//! The paint session state machine.
//!
//! A [`Session`] owns the surface for its whole life. It starts `Running`
//! with the canvas placed, reacts to decoded input one event at a time, and
//! ends in one of two terminal states:
//!
//! | Trigger                  | State                  | Exit             |
//! |--------------------------|------------------------|------------------|
//! | `sq` or interrupt flag   | `SavingAndExiting`     | [`Exit::Save`]   |
//! | `dq`                     | `DiscardingAndExiting` | [`Exit::Discard`]|
//!
//! [`Session::close`] consumes the session and performs the exit: read the
//! canvas back, write the file, clear the display, restore the terminal and
//! release the surface. The surface is dropped exactly once, there.
//!
//! # Indicator
//!
//! The cursor is shown as a single inverted pixel. Before drawing it the
//! session remembers what was underneath; before anything else touches the
//! surface (a stroke, a move, a save) it puts that pixel back. The canvas
//! written to disk therefore never contains the indicator.

use std::io;
use std::path::{Path, PathBuf};

use fb_device::Surface;
use fb_image::{RasterImage, Rgb, codec, scale};
use fb_term::{Command, InputEvent, PointerPacket};
use tracing::{debug, info, warn};

use crate::brush::Brush;
use crate::cursor::{Cursor, Placement};
use crate::line::{Line, Point};
use crate::options::PaintOptions;

// ─── State ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    SavingAndExiting,
    DiscardingAndExiting,
}

/// How a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Write the canvas, then quit.
    Save,
    /// Quit without writing.
    Discard,
}

impl Exit {
    const fn state(self) -> State {
        match self {
            Self::Save => State::SavingAndExiting,
            Self::Discard => State::DiscardingAndExiting,
        }
    }
}

/// Whatever must be put back when the session ends.
pub trait TerminalGuard {
    /// Restore the console. Called exactly once per session.
    ///
    /// # Errors
    ///
    /// Returns an error if the console could not be restored.
    fn restore(&mut self) -> io::Result<()>;
}

impl TerminalGuard for fb_term::Terminal {
    fn restore(&mut self) -> io::Result<()> {
        self.leave()
    }
}

/// The pixel under the indicator.
#[derive(Debug, Clone, Copy)]
struct Indicator {
    at: Point,
    saved: Rgb,
}

// ─── Session ────────────────────────────────────────────────────────────────

pub struct Session<M> {
    surface: Surface<M>,
    placement: Placement,
    cursor: Cursor,
    brush: Brush,
    indicator: Option<Indicator>,
    output: PathBuf,
    state: State,
}

// Canvas cells are always inside the surface, so their coordinates are
// non-negative and fit u32.
#[allow(clippy::cast_sign_loss)]
impl<M: AsRef<[u8]> + AsMut<[u8]>> Session<M> {
    /// Prepare the surface and start a session.
    ///
    /// The surface is cleared. With a `path`, the image there is loaded,
    /// shrunk to fit the surface if needed and drawn centered; the canvas is
    /// saved back to the same path. If loading fails the session falls back
    /// to a blank full-surface canvas, still saving to `path`. Without a
    /// path the canvas is blank and saved to `options.default_output`.
    pub fn open(mut surface: Surface<M>, path: Option<&Path>, options: &PaintOptions) -> Self {
        surface.clear();
        let full = Placement::full(surface.width(), surface.height());

        let (placement, output) = match path {
            Some(path) => match codec::load(path) {
                Ok(image) => {
                    let fitted = scale::fit(&image, surface.width(), surface.height());
                    let placement = Placement::centered(
                        surface.width(),
                        surface.height(),
                        fitted.width(),
                        fitted.height(),
                    );
                    surface.blit(&fitted, placement.x, placement.y);
                    info!(
                        path = %path.display(),
                        width = image.width(),
                        height = image.height(),
                        shown_width = fitted.width(),
                        shown_height = fitted.height(),
                        "loaded canvas"
                    );
                    (placement, path.to_path_buf())
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not load image; starting blank");
                    (full, path.to_path_buf())
                }
            },
            None => (full, options.default_output.clone()),
        };

        Self::with_canvas(
            surface,
            placement,
            output,
            Brush::new(options.brush_color, options.brush_radius),
        )
    }

    /// Start a session over a surface whose canvas is already drawn.
    pub fn with_canvas(
        surface: Surface<M>,
        placement: Placement,
        output: PathBuf,
        brush: Brush,
    ) -> Self {
        debug!(?placement, output = %output.display(), "session running");
        let mut session = Self {
            surface,
            placement,
            cursor: Cursor::new(&placement),
            brush,
            indicator: None,
            output,
            state: State::Running,
        };
        session.show_indicator();
        session
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn brush(&self) -> &Brush {
        &self.brush
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn placement(&self) -> &Placement {
        &self.placement
    }

    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    #[inline]
    #[must_use]
    pub const fn surface(&self) -> &Surface<M> {
        &self.surface
    }

    // ── Events ──────────────────────────────────────────────────────

    /// Apply one input event. Returns the exit once a terminal command
    /// arrives; events after that are ignored.
    pub fn handle(&mut self, event: InputEvent) -> Option<Exit> {
        if self.state != State::Running {
            return None;
        }
        match event {
            InputEvent::Pointer(packet) => {
                self.on_pointer(packet);
                None
            }
            InputEvent::Command(command) => self.on_command(command),
        }
    }

    /// The interrupt flag was raised: save and exit.
    pub fn interrupt(&mut self) -> Exit {
        info!("interrupted; saving canvas");
        self.finish(Exit::Save)
    }

    fn finish(&mut self, exit: Exit) -> Exit {
        self.state = exit.state();
        exit
    }

    fn on_command(&mut self, command: Command) -> Option<Exit> {
        match command {
            Command::Discard => Some(self.finish(Exit::Discard)),
            Command::Save => Some(self.finish(Exit::Save)),
            Command::Radius(radius) => {
                debug!(radius, "brush radius");
                self.brush.radius = radius;
                None
            }
            Command::Color(color) => {
                debug!(%color, "brush color");
                self.brush.color = color;
                None
            }
        }
    }

    fn on_pointer(&mut self, packet: PointerPacket) {
        self.hide_indicator();
        self.cursor.apply(packet.dx, packet.dy, &self.placement);

        if packet.primary() {
            for point in Line::new(self.cursor.previous(), self.cursor.current()) {
                self.brush.stamp(&mut self.surface, point, &self.placement);
            }
        }

        self.show_indicator();
    }

    // ── Indicator ───────────────────────────────────────────────────

    fn show_indicator(&mut self) {
        let at = self.cursor.current();
        if !self.placement.contains(at) {
            return;
        }
        let (row, col) = (at.y as u32, at.x as u32);
        let saved = self.surface.read_pixel(row, col);
        self.surface.write_pixel(row, col, saved.inverted());
        self.indicator = Some(Indicator { at, saved });
    }

    fn hide_indicator(&mut self) {
        if let Some(Indicator { at, saved }) = self.indicator.take() {
            self.surface.write_pixel(at.y as u32, at.x as u32, saved);
        }
    }

    // ── Exit ────────────────────────────────────────────────────────

    /// Read the canvas back as an RGB image, without the indicator.
    pub fn canvas(&mut self) -> RasterImage {
        self.hide_indicator();
        let p = self.placement;
        self.surface.capture(p.x, p.y, p.width, p.height)
    }

    /// Perform `exit` and release everything.
    ///
    /// For [`Exit::Save`] the canvas is written to [`output`](Self::output).
    /// The display is then cleared, `terminal` restored and the surface
    /// dropped, whether or not the write succeeded.
    ///
    /// # Errors
    ///
    /// Returns the write error if saving failed, otherwise the terminal
    /// restore error if that failed.
    pub fn close(mut self, exit: Exit, terminal: &mut impl TerminalGuard) -> fb_image::Result<()> {
        self.state = exit.state();

        let written = match exit {
            Exit::Save => {
                let canvas = self.canvas();
                let result = codec::save(&self.output, &canvas);
                match &result {
                    Ok(()) => info!(path = %self.output.display(), "canvas saved"),
                    Err(e) => warn!(path = %self.output.display(), error = %e, "saving canvas failed"),
                }
                result
            }
            Exit::Discard => {
                info!("canvas discarded");
                Ok(())
            }
        };

        self.surface.clear();
        let restored = terminal.restore();
        drop(self.surface);

        written?;
        restored?;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use fb_device::{Geometry, PixelFormat};
    use fb_term::{Buttons, CommandDecoder};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Byte region that counts how often it is dropped.
    pub(crate) struct CountingMemory {
        bytes: Vec<u8>,
        drops: Rc<Cell<usize>>,
    }

    impl AsRef<[u8]> for CountingMemory {
        fn as_ref(&self) -> &[u8] {
            &self.bytes
        }
    }

    impl AsMut<[u8]> for CountingMemory {
        fn as_mut(&mut self) -> &mut [u8] {
            &mut self.bytes
        }
    }

    impl Drop for CountingMemory {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    /// Terminal that counts restores.
    #[derive(Default)]
    pub(crate) struct FakeTerminal {
        pub(crate) restores: usize,
    }

    impl TerminalGuard for FakeTerminal {
        fn restore(&mut self) -> io::Result<()> {
            self.restores += 1;
            Ok(())
        }
    }

    pub(crate) fn counting_surface(
        width: u32,
        height: u32,
    ) -> (Surface<CountingMemory>, Rc<Cell<usize>>) {
        let g = Geometry::packed(width, height, PixelFormat::argb8888(0));
        let drops = Rc::new(Cell::new(0));
        let memory = CountingMemory {
            bytes: vec![0; g.required_len().unwrap()],
            drops: Rc::clone(&drops),
        };
        (Surface::new(memory, g).unwrap(), drops)
    }

    fn surface(width: u32, height: u32) -> Surface<Vec<u8>> {
        let g = Geometry::packed(width, height, PixelFormat::xrgb8888(0));
        Surface::new(vec![0; g.required_len().unwrap()], g).unwrap()
    }

    fn options(radius: u32, output: &Path) -> PaintOptions {
        PaintOptions {
            brush_radius: radius,
            default_output: output.to_path_buf(),
            ..PaintOptions::default()
        }
    }

    fn motion(dx: i32, dy: i32, paint: bool) -> InputEvent {
        InputEvent::Pointer(PointerPacket {
            buttons: if paint { Buttons::LEFT } else { Buttons::empty() },
            dx,
            dy,
        })
    }

    // ── Open ────────────────────────────────────────────────────────

    #[test]
    fn blank_session_uses_default_output() {
        let s = Session::open(surface(8, 6), None, &options(30, Path::new("out.fbimg")));
        assert_eq!(s.state(), State::Running);
        assert_eq!(s.output(), Path::new("out.fbimg"));
        assert_eq!(*s.placement(), Placement::full(8, 6));
        assert_eq!(s.brush().color, Rgb::WHITE);
        assert_eq!(s.brush().radius, 30);
    }

    #[test]
    fn small_image_is_centered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.fbimg");
        codec::save(&path, &RasterImage::filled(4, 2, Rgb::new(255, 0, 0))).unwrap();

        let mut s = Session::open(surface(10, 6), Some(&path), &PaintOptions::default());
        assert_eq!(*s.placement(), Placement::centered(10, 6, 4, 2));
        assert_eq!(s.output(), path.as_path());
        assert_eq!(s.surface().read_pixel(0, 0), Rgb::BLACK);
        assert_eq!(s.canvas(), RasterImage::filled(4, 2, Rgb::new(255, 0, 0)));
    }

    #[test]
    fn image_matching_the_surface_fills_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.fbimg");
        let red = Rgb::new(255, 0, 0);
        codec::save(&path, &RasterImage::filled(4, 4, red)).unwrap();

        let mut s = Session::open(surface(4, 4), Some(&path), &PaintOptions::default());
        assert_eq!(*s.placement(), Placement::full(4, 4));
        assert_eq!(s.canvas(), RasterImage::filled(4, 4, red));
        // The indicator is hidden after the read-back; every cell is red.
        for row in 0..4 {
            for col in 0..4 {
                assert_eq!(s.surface().read_pixel(row, col), red, "({row}, {col})");
            }
        }
    }

    #[test]
    fn large_image_is_fitted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.fbimg");
        codec::save(&path, &RasterImage::filled(40, 10, Rgb::WHITE)).unwrap();

        let s = Session::open(surface(20, 20), Some(&path), &PaintOptions::default());
        assert_eq!(*s.placement(), Placement::centered(20, 20, 20, 5));
    }

    #[test]
    fn unreadable_image_falls_back_to_blank() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.fbimg");
        let mut s = Session::open(surface(5, 5), Some(&path), &PaintOptions::default());
        assert_eq!(*s.placement(), Placement::full(5, 5));
        assert_eq!(s.output(), path.as_path());
        assert_eq!(s.canvas(), RasterImage::blank(5, 5));
    }

    // ── Commands ────────────────────────────────────────────────────

    #[test]
    fn hex_line_sets_brush_color() {
        let mut s = Session::open(surface(4, 4), None, &PaintOptions::default());
        let mut keys = CommandDecoder::new();
        for cmd in keys.feed(b"ff0000\n") {
            assert_eq!(s.handle(InputEvent::Command(cmd)), None);
        }
        assert_eq!(s.brush().color, Rgb::new(255, 0, 0));
    }

    #[test]
    fn zero_or_negative_radius_is_ignored() {
        let mut s = Session::open(surface(4, 4), None, &PaintOptions::default());
        let mut keys = CommandDecoder::new();
        for cmd in keys.feed(b"0\n-4\n7\n0\n") {
            s.handle(InputEvent::Command(cmd));
        }
        assert_eq!(s.brush().radius, 7);
    }

    #[test]
    fn quit_commands_end_the_session() {
        let mut s = Session::open(surface(4, 4), None, &PaintOptions::default());
        assert_eq!(s.handle(InputEvent::Command(Command::Discard)), Some(Exit::Discard));
        assert_eq!(s.state(), State::DiscardingAndExiting);
        assert_eq!(s.handle(InputEvent::Command(Command::Save)), None);

        let mut s = Session::open(surface(4, 4), None, &PaintOptions::default());
        assert_eq!(s.handle(InputEvent::Command(Command::Save)), Some(Exit::Save));
        assert_eq!(s.state(), State::SavingAndExiting);
    }

    // ── Strokes ─────────────────────────────────────────────────────

    #[test]
    fn held_button_paints_every_cell_of_the_stroke() {
        let mut s = Session::open(surface(8, 3), None, &options(1, Path::new("x")));
        for dx in [0, 1, 1, 1] {
            s.handle(motion(dx, 0, true));
        }
        let canvas = s.canvas();
        for x in 0..8 {
            let expect = if x <= 3 { Rgb::WHITE } else { Rgb::BLACK };
            assert_eq!(canvas.pixel(x, 0), expect, "x = {x}");
            assert_eq!(canvas.pixel(x, 1), Rgb::BLACK);
        }
    }

    #[test]
    fn fast_motion_leaves_no_gaps() {
        let mut s = Session::open(surface(30, 30), None, &options(1, Path::new("x")));
        s.handle(motion(2, 2, false));
        s.handle(motion(20, 7, true));
        let canvas = s.canvas();
        for p in Line::new(Point::new(2, 2), Point::new(22, 9)) {
            assert_eq!(canvas.pixel(p.x as u32, p.y as u32), Rgb::WHITE, "{p:?}");
        }
    }

    #[test]
    fn released_button_moves_without_painting() {
        let mut s = Session::open(surface(6, 6), None, &options(4, Path::new("x")));
        s.handle(motion(3, 3, false));
        s.handle(motion(-2, 1, false));
        assert_eq!(s.canvas(), RasterImage::blank(6, 6));
    }

    #[test]
    fn paint_stays_inside_centered_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.fbimg");
        codec::save(&path, &RasterImage::blank(4, 4)).unwrap();

        let opts = PaintOptions {
            brush_radius: 20,
            ..PaintOptions::default()
        };
        let mut s = Session::open(surface(10, 10), Some(&path), &opts);
        s.handle(motion(1, 1, true));
        s.hide_indicator();

        for y in 0..10 {
            for x in 0..10 {
                let inside = (3..7).contains(&x) && (3..7).contains(&y);
                let expect = if inside { Rgb::WHITE } else { Rgb::BLACK };
                assert_eq!(s.surface().read_pixel(y, x), expect, "({x}, {y})");
            }
        }
    }

    // ── Indicator ───────────────────────────────────────────────────

    #[test]
    fn indicator_inverts_the_cell_under_the_cursor() {
        let mut s = Session::open(surface(5, 5), None, &PaintOptions::default());
        s.handle(motion(2, 1, false));
        assert_eq!(s.surface().read_pixel(1, 2), Rgb::WHITE);
        s.handle(motion(1, 0, false));
        assert_eq!(s.surface().read_pixel(1, 2), Rgb::BLACK);
        assert_eq!(s.surface().read_pixel(1, 3), Rgb::WHITE);
    }

    #[test]
    fn indicator_never_reaches_the_saved_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("art.fbimg");
        let mut art = RasterImage::blank(6, 4);
        for y in 0..4 {
            for x in 0..6 {
                art.set_pixel(x, y, Rgb::new((x * 40) as u8, (y * 60) as u8, 7));
            }
        }
        codec::save(&path, &art).unwrap();

        let mut s = Session::open(surface(6, 4), Some(&path), &PaintOptions::default());
        for (dx, dy) in [(1, 1), (2, 0), (0, 2), (-1, -1), (9, 9), (-9, 0)] {
            s.handle(motion(dx, dy, false));
        }
        let mut term = FakeTerminal::default();
        s.close(Exit::Save, &mut term).unwrap();

        assert_eq!(codec::load(&path).unwrap(), art);
    }

    #[test]
    fn stroke_under_indicator_is_kept() {
        let mut s = Session::open(surface(6, 6), None, &options(1, Path::new("x")));
        s.handle(motion(2, 2, true));
        s.handle(motion(0, 0, false));
        assert_eq!(s.canvas().pixel(2, 2), Rgb::WHITE);
    }

    // ── Close ───────────────────────────────────────────────────────

    #[test]
    fn save_writes_file_and_releases_everything() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("paint.fbimg");
        let (surf, drops) = counting_surface(4, 3);
        let mut s = Session::open(surf, None, &options(1, &out));
        s.handle(motion(1, 1, false));
        s.handle(motion(0, 0, true));

        let mut term = FakeTerminal::default();
        s.close(Exit::Save, &mut term).unwrap();

        assert_eq!(term.restores, 1);
        assert_eq!(drops.get(), 1);
        let saved = codec::load(&out).unwrap();
        assert_eq!((saved.width(), saved.height()), (4, 3));
        assert_eq!(saved.pixel(1, 1), Rgb::WHITE);
        assert_eq!(saved.pixel(0, 0), Rgb::BLACK);
    }

    #[test]
    fn discard_writes_nothing_but_still_releases() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("paint.fbimg");
        let (surf, drops) = counting_surface(4, 3);
        let s = Session::open(surf, None, &options(1, &out));

        let mut term = FakeTerminal::default();
        s.close(Exit::Discard, &mut term).unwrap();

        assert!(!out.exists());
        assert_eq!(term.restores, 1);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn failed_write_still_restores_and_releases() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("no/such/dir/paint.fbimg");
        let (surf, drops) = counting_surface(2, 2);
        let s = Session::open(surf, None, &options(1, &out));

        let mut term = FakeTerminal::default();
        let err = s.close(Exit::Save, &mut term).unwrap_err();

        assert!(matches!(err, fb_image::Error::Io(_)));
        assert_eq!(term.restores, 1);
        assert_eq!(drops.get(), 1);
    }
}
