// SPDX-License-Identifier: MIT
//
// Device errors: an unusable pixel layout, or a failed system call.

use std::fmt;
use std::io;

/// Result alias used throughout `fb-device`.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a framebuffer could not be opened or wrapped.
#[derive(Debug)]
pub enum Error {
    /// The pixel layout is not one we can address byte-wise: a color
    /// channel that is not exactly 8 bits, or a channel that is not byte
    /// aligned inside the pixel.
    UnsupportedFormat(String),

    /// Opening, querying or mapping the device failed.
    Device {
        /// The operation that failed, e.g. `"FBIOGET_VSCREENINFO"`.
        op: &'static str,
        source: io::Error,
    },
}

impl Error {
    pub(crate) const fn device(op: &'static str, source: io::Error) -> Self {
        Self::Device { op, source }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat(msg) => write!(f, "framebuffer not supported: {msg}"),
            Self::Device { op, source } => write!(f, "{op}: {source}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Device { source, .. } => Some(source),
            Self::UnsupportedFormat(_) => None,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
