//! fbshot — save the framebuffer when PrintScreen or F5 is pressed.
//!
//! Listens on a Linux evdev keyboard device and writes each capture to
//! `DIR/screenshot_<unix-seconds>.fbimg`. Runs in the foreground; run it
//! under a service manager to keep it in the background.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use fb_image::codec;
use fb_term::input::{EVENT_LEN, KEY_F5, KEY_PRINT, KEY_SYSRQ, decode_key_events};
use tracing::{debug, info, warn};

/// Records read per `read` call.
const BATCH: usize = 64;

#[derive(Parser, Debug)]
#[command(
    name = "fbshot",
    version,
    about = "Save the framebuffer to an FBIMG file on PrintScreen or F5"
)]
struct Args {
    /// Keyboard event device, e.g. /dev/input/event0.
    keyboard: PathBuf,

    /// Directory screenshots are written to.
    #[arg(short, long, default_value = "/tmp")]
    dir: PathBuf,

    /// Framebuffer device.
    #[arg(long, env = "FBPAINT_FRAMEBUFFER", default_value = "/dev/fb0")]
    framebuffer: PathBuf,

    /// Log debug details.
    #[arg(short, long)]
    verbose: bool,

    /// Append logs to FILE instead of stderr.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

const fn is_trigger(code: u16) -> bool {
    matches!(code, KEY_SYSRQ | KEY_PRINT | KEY_F5)
}

fn screenshot_path(dir: &Path, secs: u64) -> PathBuf {
    dir.join(format!("screenshot_{secs}.fbimg"))
}

/// Capture the whole screen into `dir`.
fn capture(framebuffer: &Path, dir: &Path) -> Result<PathBuf> {
    let surface = fb_device::open_surface(framebuffer)
        .with_context(|| format!("opening {}", framebuffer.display()))?;
    let image = surface.capture_all();

    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    let path = screenshot_path(dir, secs);
    codec::save(&path, &image).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn listen(args: &Args) -> Result<()> {
    let _log = fbtools::logging::init(args.verbose, args.log_file.as_deref())
        .context("opening log file")?;

    let mut keyboard = File::open(&args.keyboard)
        .with_context(|| format!("opening {}", args.keyboard.display()))?;
    info!(keyboard = %args.keyboard.display(), dir = %args.dir.display(), "listening");

    let mut buf = vec![0u8; EVENT_LEN * BATCH];
    loop {
        let n = keyboard.read(&mut buf).context("reading key events")?;
        if n == 0 {
            info!("keyboard device closed");
            return Ok(());
        }
        for key in decode_key_events(&buf[..n]) {
            if !is_trigger(key.code) {
                continue;
            }
            debug!(code = key.code, "screenshot key");
            // A failed capture must not stop the listener.
            match capture(&args.framebuffer, &args.dir) {
                Ok(path) => info!(path = %path.display(), "screenshot saved"),
                Err(e) => warn!(error = ?e, "screenshot failed"),
            }
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match listen(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fbshot: {e:#}");
            ExitCode::FAILURE
        }
    }
}
