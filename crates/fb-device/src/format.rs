// SPDX-License-Identifier: MIT
//
// Pixel layout of a display surface.
//
// The kernel describes each pixel as `bits_per_pixel` bits with the color
// components at arbitrary bit offsets (the fbdev `fb_bitfield`). We only
// support layouts where red, green and blue are whole bytes: 8 bits long and
// byte aligned. That covers XRGB8888, ARGB8888, BGRA8888, RGB888 and BGR888,
// which is every true-color console in practice. Validation happens once,
// up front, so per-pixel code can index bytes directly.

use crate::error::{Error, Result};

/// Bit position and width of one component inside a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Channel {
    /// Offset of the least significant bit, from the start of the pixel.
    pub offset: u32,
    /// Width in bits. Zero means the component is absent.
    pub length: u32,
}

impl Channel {
    #[inline]
    #[must_use]
    pub const fn new(offset: u32, length: u32) -> Self {
        Self { offset, length }
    }

    /// Whether the format carries this component at all.
    #[inline]
    #[must_use]
    pub const fn is_present(self) -> bool {
        self.length > 0
    }

    /// Byte index of this component inside a pixel.
    #[inline]
    #[must_use]
    pub const fn byte(self) -> usize {
        (self.offset / 8) as usize
    }
}

/// How pixels are laid out in video memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    pub bits_per_pixel: u32,
    /// Bytes from the start of one row to the start of the next.
    pub stride: usize,
    pub red: Channel,
    pub green: Channel,
    pub blue: Channel,
    /// Alpha. `length == 0` when the format has none.
    pub transp: Channel,
}

impl PixelFormat {
    /// 32-bit `0xAARRGGBB` little-endian, the common fbcon layout.
    #[must_use]
    pub const fn argb8888(stride: usize) -> Self {
        Self {
            bits_per_pixel: 32,
            stride,
            red: Channel::new(16, 8),
            green: Channel::new(8, 8),
            blue: Channel::new(0, 8),
            transp: Channel::new(24, 8),
        }
    }

    /// 32-bit `0x00RRGGBB`: same bytes as ARGB8888 without alpha.
    #[must_use]
    pub const fn xrgb8888(stride: usize) -> Self {
        Self {
            transp: Channel::new(0, 0),
            ..Self::argb8888(stride)
        }
    }

    /// Packed 24-bit with red in the first byte.
    #[must_use]
    pub const fn rgb888(stride: usize) -> Self {
        Self {
            bits_per_pixel: 24,
            stride,
            red: Channel::new(0, 8),
            green: Channel::new(8, 8),
            blue: Channel::new(16, 8),
            transp: Channel::new(0, 0),
        }
    }

    /// Bytes occupied by one pixel.
    #[inline]
    #[must_use]
    pub const fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel / 8) as usize
    }

    /// Check that every component can be addressed as a whole byte.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if red, green or blue is not
    /// exactly 8 bits, if any present channel is not byte aligned or does
    /// not fit inside the pixel, or if the pixel size is not whole bytes.
    pub fn validate(&self) -> Result<()> {
        if self.bits_per_pixel == 0 || self.bits_per_pixel % 8 != 0 {
            return Err(Error::UnsupportedFormat(format!(
                "{} bits per pixel is not a whole number of bytes",
                self.bits_per_pixel
            )));
        }

        for (name, ch) in [("red", self.red), ("green", self.green), ("blue", self.blue)] {
            if ch.length != 8 {
                return Err(Error::UnsupportedFormat(format!(
                    "color depth per channel is not 8 bits ({name} is {})",
                    ch.length
                )));
            }
        }

        for (name, ch) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("transp", self.transp),
        ] {
            if !ch.is_present() {
                continue;
            }
            if ch.offset % 8 != 0 {
                return Err(Error::UnsupportedFormat(format!(
                    "{name} channel at bit {} is not byte aligned",
                    ch.offset
                )));
            }
            if ch.offset + 8 > self.bits_per_pixel {
                return Err(Error::UnsupportedFormat(format!(
                    "{name} channel at bit {} lies outside a {}-bit pixel",
                    ch.offset, self.bits_per_pixel
                )));
            }
        }

        if self.stride == 0 {
            return Err(Error::UnsupportedFormat("row stride is zero".into()));
        }

        Ok(())
    }
}

/// Visible resolution plus pixel layout: everything needed to address a
/// surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl Geometry {
    /// A tightly packed geometry (stride = width × bytes per pixel).
    #[must_use]
    pub const fn packed(width: u32, height: u32, mut format: PixelFormat) -> Self {
        format.stride = width as usize * format.bytes_per_pixel();
        Self {
            width,
            height,
            format,
        }
    }

    /// Smallest region length that holds every visible pixel.
    ///
    /// The last row only needs `width` pixels, not a full stride. Returns
    /// `None` if the computation overflows.
    #[must_use]
    pub fn required_len(&self) -> Option<usize> {
        if self.width == 0 || self.height == 0 {
            return Some(0);
        }
        let rows = (self.height as usize - 1).checked_mul(self.format.stride)?;
        let last = (self.width as usize).checked_mul(self.format.bytes_per_pixel())?;
        rows.checked_add(last)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
