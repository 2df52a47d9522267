//! fbpaint — paint on the Linux framebuffer with the mouse.
//!
//! Usage: `fbpaint [OPTIONS] [FILE]`
//!
//! With a FILE the FBIMG image there is shown (shrunk and centered if
//! needed) and saved back to it; without one a blank canvas covering the
//! screen is saved to `paint.fbimg`. Hold the left button to paint. Type a
//! line on the console to change things:
//!
//! | Line       | Effect                    |
//! |------------|---------------------------|
//! | `ff8800`   | brush color (hex)         |
//! | `12`       | brush radius              |
//! | `sq`       | save and quit             |
//! | `dq`       | quit without saving       |
//!
//! Ctrl-C or SIGTERM saves before exiting.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use fb_image::Rgb;
use fb_paint::options::{DEFAULT_FRAMEBUFFER, DEFAULT_OUTPUT, DEFAULT_POINTER, DEFAULT_RADIUS};
use fb_paint::{Exit, PaintOptions, Session};
use fb_term::{InputSources, Terminal, signal};
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    name = "fbpaint",
    version,
    about = "Paint on the Linux framebuffer with the mouse",
    long_about = "Paint on the Linux framebuffer with the mouse.\n\n\
                  Hold the left button to paint. Type a line on the console to\n\
                  change the brush: a hex color (ff8800), a radius (12), `sq` to\n\
                  save and quit, `dq` to quit without saving. Ctrl-C saves too."
)]
struct Args {
    /// FBIMG image to edit. Saved back to the same path.
    file: Option<PathBuf>,

    /// Framebuffer device.
    #[arg(long, env = "FBPAINT_FRAMEBUFFER", default_value = DEFAULT_FRAMEBUFFER)]
    framebuffer: PathBuf,

    /// Relative-motion pointer device.
    #[arg(long, env = "FBPAINT_POINTER", default_value = DEFAULT_POINTER)]
    pointer: PathBuf,

    /// Initial brush color as six hex digits.
    #[arg(long, env = "FBPAINT_BRUSH", default_value = "ffffff", value_parser = parse_color)]
    brush: Rgb,

    /// Initial brush radius in pixels.
    #[arg(
        long,
        env = "FBPAINT_RADIUS",
        default_value_t = DEFAULT_RADIUS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    radius: u32,

    /// Where a blank canvas is saved.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Longest wait for input, in milliseconds.
    #[arg(long, default_value_t = 10, value_name = "MS")]
    tick: u64,

    /// Log debug details (RUST_LOG is honored).
    #[arg(short, long)]
    verbose: bool,

    /// Append logs to FILE instead of stderr.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> PaintOptions {
        PaintOptions {
            brush_color: self.brush,
            brush_radius: self.radius,
            tick: Duration::from_millis(self.tick),
            framebuffer: self.framebuffer.clone(),
            pointer: self.pointer.clone(),
            default_output: self.output.clone(),
        }
    }
}

fn parse_color(s: &str) -> std::result::Result<Rgb, String> {
    Rgb::from_hex(s).ok_or_else(|| format!("`{s}` is not a six-digit hex color"))
}

fn paint(args: &Args) -> Result<()> {
    let _log = fbtools::logging::init(args.verbose, args.log_file.as_deref())
        .context("opening log file")?;
    let options = args.options();

    signal::install();

    let surface = fb_device::open_surface(&options.framebuffer)
        .with_context(|| format!("opening {}", options.framebuffer.display()))?;
    let mut input = InputSources::open(&options.pointer)
        .with_context(|| format!("opening {}", options.pointer.display()))?;

    let mut terminal = Terminal::new();
    terminal.enter().context("configuring the console")?;

    let mut session = Session::open(surface, args.file.as_deref(), &options);
    let output = session.output().to_path_buf();

    match fb_paint::run(&mut session, &mut input, signal::flag(), options.tick) {
        Ok(exit) => session
            .close(exit, &mut terminal)
            .with_context(|| format!("saving {}", output.display())),
        Err(e) => {
            // Input died under us; keep the picture before giving up.
            error!(error = %e, "input failed; saving canvas");
            session
                .close(Exit::Save, &mut terminal)
                .with_context(|| format!("saving {}", output.display()))?;
            Err(e).context("reading input")
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match paint(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fbpaint: {e:#}");
            ExitCode::FAILURE
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
