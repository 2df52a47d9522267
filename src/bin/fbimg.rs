//! fbimg — show an FBIMG image on the framebuffer.
//!
//! The image is drawn at the top-left corner by default. `--fit` shrinks an
//! image larger than the screen; `--center` centers it. Pixels that fall
//! off the screen are clipped.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use fb_image::{codec, scale};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fbimg", version, about = "Show an FBIMG image on the Linux framebuffer")]
struct Args {
    /// Image to show.
    file: PathBuf,

    /// Center the image on the screen.
    #[arg(short, long)]
    center: bool,

    /// Shrink the image to fit the screen.
    #[arg(short, long)]
    fit: bool,

    /// Framebuffer device.
    #[arg(long, env = "FBPAINT_FRAMEBUFFER", default_value = "/dev/fb0")]
    framebuffer: PathBuf,

    /// Log debug details.
    #[arg(short, long)]
    verbose: bool,
}

fn show(args: &Args) -> Result<()> {
    let _log = fbtools::logging::init(args.verbose, None).context("setting up logging")?;

    let image = codec::load(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let mut surface = fb_device::open_surface(&args.framebuffer)
        .with_context(|| format!("opening {}", args.framebuffer.display()))?;

    let (sw, sh) = (surface.width(), surface.height());
    let image = if args.fit { scale::fit(&image, sw, sh) } else { image };
    let (x, y) = if args.center {
        (
            sw.saturating_sub(image.width()) / 2,
            sh.saturating_sub(image.height()) / 2,
        )
    } else {
        (0, 0)
    };

    surface.blit(&image, x, y);
    info!(width = image.width(), height = image.height(), x, y, "image shown");
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match show(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fbimg: {e:#}");
            ExitCode::FAILURE
        }
    }
}
