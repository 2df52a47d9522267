//! fbimg2png — convert an FBIMG image to PNG.
//!
//! The PNG is RGBA8 with an opaque alpha channel. BGR payloads are reordered.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use fb_image::{codec, convert};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "fbimg2png", version, about = "Convert an FBIMG image to PNG")]
struct Args {
    /// FBIMG file to read.
    input: PathBuf,

    /// PNG file to write.
    output: PathBuf,

    /// Log debug details.
    #[arg(short, long)]
    verbose: bool,
}

fn convert_file(args: &Args) -> Result<()> {
    let _log = fbtools::logging::init(args.verbose, None).context("setting up logging")?;

    let image = codec::load(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    convert::save_png(&args.output, &image)
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        width = image.width(),
        height = image.height(),
        "converted"
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match convert_file(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fbimg2png: {e:#}");
            ExitCode::FAILURE
        }
    }
}
