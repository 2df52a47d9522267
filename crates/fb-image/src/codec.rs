//! The FBIMG file format.
//!
//! A fixed 16-byte header followed by the raw payload:
//!
//! | Offset | Size | Field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 5    | magic tag `FBIMG`                       |
//! | 5      | 4    | width, little-endian `u32`              |
//! | 9      | 4    | height, little-endian `u32`             |
//! | 13     | 3    | channel order tag, `RGB` or `BGR`       |
//! | 16     | w·h·3| pixel payload, row-major, 3 bytes/pixel |
//!
//! Encoding always writes `RGB`; BGR images are reordered on the way out.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::image::{ChannelOrder, RasterImage, payload_len};

/// The 5-byte tag every FBIMG file starts with.
pub const MAGIC: &[u8; 5] = b"FBIMG";

/// Total header length in bytes.
pub const HEADER_LEN: usize = 16;

/// Read as many bytes as the stream will give, up to `buf.len()`.
///
/// Unlike `read_exact`, a short stream is not an error: the count tells the
/// caller how far it got so truncation can be reported precisely.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Decode an FBIMG stream.
///
/// # Errors
///
/// - [`Error::Format`] for a wrong magic tag, unknown channel tag or zero /
///   overflowing dimensions.
/// - [`Error::Truncated`] if the header or payload is shorter than declared.
/// - [`Error::Io`] if the reader fails.
pub fn decode(mut reader: impl Read) -> Result<RasterImage> {
    let mut magic = [0u8; MAGIC.len()];
    let n = read_full(&mut reader, &mut magic)?;
    if n < MAGIC.len() {
        return Err(Error::Truncated {
            expected: MAGIC.len(),
            actual: n,
        });
    }
    if &magic != MAGIC {
        return Err(Error::Format("missing FBIMG magic tag".into()));
    }

    let mut rest = [0u8; HEADER_LEN - MAGIC.len()];
    let n = read_full(&mut reader, &mut rest)?;
    if n < rest.len() {
        return Err(Error::Truncated {
            expected: HEADER_LEN,
            actual: MAGIC.len() + n,
        });
    }

    let width = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
    let height = u32::from_le_bytes([rest[4], rest[5], rest[6], rest[7]]);
    let order = ChannelOrder::from_tag(&rest[8..11]).ok_or_else(|| {
        Error::Format(format!(
            "unknown channel order {:?}",
            String::from_utf8_lossy(&rest[8..11])
        ))
    })?;

    if width == 0 || height == 0 {
        return Err(Error::Format(format!("empty image {width}x{height}")));
    }
    let expected = payload_len(width, height)
        .ok_or_else(|| Error::Format(format!("image {width}x{height} is too large")))?;

    // Grow with the data rather than trusting the header for the allocation.
    let mut pixels = Vec::new();
    reader
        .by_ref()
        .take(expected as u64)
        .read_to_end(&mut pixels)?;
    if pixels.len() < expected {
        return Err(Error::Truncated {
            expected,
            actual: pixels.len(),
        });
    }

    debug!(width, height, %order, "decoded fbimg");
    RasterImage::new(width, height, order, pixels)
}

/// Encode an image as an RGB FBIMG byte stream.
#[must_use]
pub fn encode(image: &RasterImage) -> Vec<u8> {
    let rgb = image.to_rgb();
    let mut out = Vec::with_capacity(HEADER_LEN + rgb.pixels().len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&rgb.width().to_le_bytes());
    out.extend_from_slice(&rgb.height().to_le_bytes());
    out.extend_from_slice(ChannelOrder::Rgb.tag());
    out.extend_from_slice(rgb.pixels());
    out
}

/// Encode `image` into `writer`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the writer fails.
pub fn write(mut writer: impl Write, image: &RasterImage) -> Result<()> {
    writer.write_all(&encode(image))?;
    writer.flush()?;
    Ok(())
}

/// Read and decode an FBIMG file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened, otherwise whatever
/// [`decode`] reports.
pub fn load(path: &Path) -> Result<RasterImage> {
    let file = File::open(path)?;
    decode(BufReader::new(file))
}

/// Encode `image` and write it to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written.
pub fn save(path: &Path, image: &RasterImage) -> Result<()> {
    let file = File::create(path)?;
    write(BufWriter::new(file), image)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
