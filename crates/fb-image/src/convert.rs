//! PNG ↔ FBIMG conversion.
//!
//! The PNG side is handled entirely by the `png` crate. Incoming PNGs are
//! normalized to 8-bit color (palette expanded, 16-bit stripped) and any
//! alpha or gray layout is folded into RGB. Outgoing PNGs are RGBA8 with
//! a fully opaque alpha channel.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::image::{ChannelOrder, RasterImage, BYTES_PER_PIXEL};

/// Decode a PNG stream into an RGB image.
///
/// # Errors
///
/// Returns [`Error::Png`] for malformed data and [`Error::Io`] for read
/// failures.
pub fn decode_png(reader: impl Read) -> Result<RasterImage> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let data = &buf[..info.buffer_size()];

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => {
            return Err(Error::Png("palette was not expanded".into()));
        }
    };

    let count = info.width as usize * info.height as usize;
    let mut pixels = Vec::with_capacity(count * BYTES_PER_PIXEL);
    for row in data.chunks_exact(info.line_size).take(info.height as usize) {
        for px in row.chunks_exact(channels).take(info.width as usize) {
            match channels {
                1 | 2 => pixels.extend_from_slice(&[px[0], px[0], px[0]]),
                _ => pixels.extend_from_slice(&px[..3]),
            }
        }
    }

    debug!(width = info.width, height = info.height, color_type = ?info.color_type, "decoded png");
    RasterImage::new(info.width, info.height, ChannelOrder::Rgb, pixels)
}

/// Encode an image as an RGBA8 PNG (alpha always 255).
///
/// # Errors
///
/// Returns [`Error::Png`] or [`Error::Io`] if encoding or writing fails.
pub fn encode_png(writer: impl Write, image: &RasterImage) -> Result<()> {
    let rgb = image.to_rgb();
    let mut rgba = Vec::with_capacity(rgb.pixels().len() / BYTES_PER_PIXEL * 4);
    for px in rgb.pixels().chunks_exact(BYTES_PER_PIXEL) {
        rgba.extend_from_slice(&[px[0], px[1], px[2], 0xFF]);
    }

    let mut encoder = png::Encoder::new(writer, rgb.width(), rgb.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&rgba)?;
    writer.finish()?;
    Ok(())
}

/// Read a PNG file into an RGB image.
///
/// # Errors
///
/// See [`decode_png`]; opening the file may also fail with [`Error::Io`].
pub fn load_png(path: &Path) -> Result<RasterImage> {
    decode_png(BufReader::new(File::open(path)?))
}

/// Write an image to a PNG file.
///
/// # Errors
///
/// See [`encode_png`]; creating the file may also fail with [`Error::Io`].
pub fn save_png(path: &Path, image: &RasterImage) -> Result<()> {
    encode_png(BufWriter::new(File::create(path)?), image)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::color::Rgb;
    use pretty_assertions::assert_eq;

    fn sample() -> RasterImage {
        let mut img = RasterImage::blank(3, 2);
        img.set_pixel(0, 0, Rgb::new(255, 0, 0));
        img.set_pixel(1, 0, Rgb::new(0, 255, 0));
        img.set_pixel(2, 0, Rgb::new(0, 0, 255));
        img.set_pixel(0, 1, Rgb::new(10, 20, 30));
        img
    }

    fn png_bytes(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn png_round_trip_preserves_rgb() {
        let img = sample();
        let mut bytes = Vec::new();
        encode_png(&mut bytes, &img).unwrap();
        assert_eq!(decode_png(bytes.as_slice()).unwrap(), img);
    }

    #[test]
    fn bgr_image_is_reordered_for_png() {
        let bgr = RasterImage::new(1, 1, ChannelOrder::Bgr, vec![255, 0, 0]).unwrap();
        let mut bytes = Vec::new();
        encode_png(&mut bytes, &bgr).unwrap();
        let back = decode_png(bytes.as_slice()).unwrap();
        assert_eq!(back.pixel(0, 0), Rgb::new(0, 0, 255));
    }

    #[test]
    fn grayscale_png_expands_to_rgb() {
        let bytes = png_bytes(2, 1, png::ColorType::Grayscale, &[7, 200]);
        let img = decode_png(bytes.as_slice()).unwrap();
        assert_eq!(img.pixels(), &[7, 7, 7, 200, 200, 200]);
    }

    #[test]
    fn rgba_png_drops_alpha() {
        let bytes = png_bytes(1, 1, png::ColorType::Rgba, &[1, 2, 3, 0]);
        let img = decode_png(bytes.as_slice()).unwrap();
        assert_eq!(img.pixels(), &[1, 2, 3]);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode_png(&b"definitely not a png"[..]).is_err());
    }

    #[test]
    fn fbimg_to_png_to_fbimg_files() {
        let dir = tempfile::tempdir().unwrap();
        let fb = dir.path().join("in.fbimg");
        let png_path = dir.path().join("mid.png");
        let img = sample();

        codec::save(&fb, &img).unwrap();
        save_png(&png_path, &codec::load(&fb).unwrap()).unwrap();
        assert_eq!(load_png(&png_path).unwrap(), img);
    }
}
