//! Errors produced while reading, writing or converting raster images.

use std::fmt;
use std::io;

/// Result alias used throughout `fb-image`.
pub type Result<T> = std::result::Result<T, Error>;

/// Why an image could not be decoded, encoded or converted.
#[derive(Debug)]
pub enum Error {
    /// The data is not a well-formed FBIMG stream: wrong magic tag, unknown
    /// channel order, zero or overflowing dimensions.
    Format(String),

    /// The stream ended before the declared number of bytes arrived.
    Truncated {
        /// Bytes the header promised.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// Opening, reading or writing the underlying file failed.
    Io(io::Error),

    /// The PNG encoder or decoder rejected the data.
    Png(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(msg) => write!(f, "not a valid FBIMG file: {msg}"),
            Self::Truncated { expected, actual } => {
                write!(f, "unexpected end of file: expected {expected} bytes, got {actual}")
            }
            Self::Io(e) => write!(f, "{e}"),
            Self::Png(msg) => write!(f, "png: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<png::DecodingError> for Error {
    fn from(e: png::DecodingError) -> Self {
        match e {
            png::DecodingError::IoError(io) => Self::Io(io),
            other => Self::Png(other.to_string()),
        }
    }
}

impl From<png::EncodingError> for Error {
    fn from(e: png::EncodingError) -> Self {
        match e {
            png::EncodingError::IoError(io) => Self::Io(io),
            other => Self::Png(other.to_string()),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
