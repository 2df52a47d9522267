//! png2fbimg — convert a PNG image to FBIMG.
//!
//! Any PNG is accepted: palette, grayscale and 16-bit images are normalized
//! to 8-bit RGB, and alpha is dropped.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use fb_image::{codec, convert};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "png2fbimg", version, about = "Convert a PNG image to FBIMG")]
struct Args {
    /// PNG file to read.
    input: PathBuf,

    /// FBIMG file to write.
    output: PathBuf,

    /// Log debug details.
    #[arg(short, long)]
    verbose: bool,
}

fn convert_file(args: &Args) -> Result<()> {
    let _log = fbtools::logging::init(args.verbose, None).context("setting up logging")?;

    let image = convert::load_png(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    codec::save(&args.output, &image)
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
            eprintln!("png2fbimg: {e:#}");
            ExitCode::FAILURE
        }
    }
}
