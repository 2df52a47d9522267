//! In-memory raster image.
//!
//! A `RasterImage` is the decoded form of an FBIMG file: a width, a height,
//! the channel order of the payload and exactly `width × height × 3` bytes
//! of row-major pixel data. There is no alpha channel and no stride; rows
//! are tightly packed.

use std::fmt;

use crate::color::Rgb;
use crate::error::{Error, Result};

/// Bytes per stored pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// Order of the three channel bytes inside each stored pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelOrder {
    /// Red, green, blue.
    #[default]
    Rgb,
    /// Blue, green, red.
    Bgr,
}

impl ChannelOrder {
    /// The 3-byte tag used in the FBIMG header.
    #[inline]
    #[must_use]
    pub const fn tag(self) -> &'static [u8; 3] {
        match self {
            Self::Rgb => b"RGB",
            Self::Bgr => b"BGR",
        }
    }

    /// Parse a header tag.
    #[must_use]
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"RGB" => Some(Self::Rgb),
            b"BGR" => Some(Self::Bgr),
            _ => None,
        }
    }

    /// Assemble a color from three stored bytes.
    #[inline]
    #[must_use]
    pub const fn unpack(self, px: [u8; 3]) -> Rgb {
        match self {
            Self::Rgb => Rgb::new(px[0], px[1], px[2]),
            Self::Bgr => Rgb::new(px[2], px[1], px[0]),
        }
    }

    /// Lay out a color as three stored bytes.
    #[inline]
    #[must_use]
    pub const fn pack(self, c: Rgb) -> [u8; 3] {
        match self {
            Self::Rgb => [c.r, c.g, c.b],
            Self::Bgr => [c.b, c.g, c.r],
        }
    }
}

impl fmt::Display for ChannelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb => f.write_str("RGB"),
            Self::Bgr => f.write_str("BGR"),
        }
    }
}

/// Byte length of a `width × height` payload, or `None` on overflow.
#[must_use]
pub fn payload_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL)
}

/// A decoded raster image.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    order: ChannelOrder,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap a pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if either dimension is zero or the buffer
    /// length differs from `width × height × 3`.
    pub fn new(width: u32, height: u32, order: ChannelOrder, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Format(format!("empty image {width}x{height}")));
        }
        let expected = payload_len(width, height)
            .ok_or_else(|| Error::Format(format!("image {width}x{height} is too large")))?;
        if pixels.len() != expected {
            return Err(Error::Format(format!(
                "pixel buffer is {} bytes, {width}x{height} needs {expected}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            order,
            pixels,
        })
    }

    /// An all-black RGB image.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn blank(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "blank image must not be empty");
        Self::filled(width, height, Rgb::BLACK)
    }

    /// An RGB image where every pixel is `color`.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        assert!(width > 0 && height > 0, "filled image must not be empty");
        let count = width as usize * height as usize;
        let pixels = [color.r, color.g, color.b].repeat(count);
        Self {
            width,
            height,
            order: ChannelOrder::Rgb,
            pixels,
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn order(&self) -> ChannelOrder {
        self.order
    }

    /// The raw payload in [`order`](Self::order).
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[must_use]
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Color of the pixel at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let i = self.index(x, y);
        self.order
            .unpack([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Overwrite the pixel at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb) {
        let i = self.index(x, y);
        self.pixels[i..i + BYTES_PER_PIXEL].copy_from_slice(&self.order.pack(color));
    }

    /// Reorder the payload to RGB. A no-op for images that already are.
    #[must_use]
    pub fn to_rgb(&self) -> Self {
        match self.order {
            ChannelOrder::Rgb => self.clone(),
            ChannelOrder::Bgr => {
                let mut pixels = self.pixels.clone();
                for px in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
                    px.swap(0, 2);
                }
                Self {
                    width: self.width,
                    height: self.height,
                    order: ChannelOrder::Rgb,
                    pixels,
                }
            }
        }
    }
}

impl fmt::Debug for RasterImage {
    // The payload can be megabytes; keep debug output to the header.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("order", &self.order)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Construction ────────────────────────────────────────────────

    #[test]
    fn new_accepts_exact_buffer() {
        let img = RasterImage::new(2, 3, ChannelOrder::Rgb, vec![0; 18]).unwrap();
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 3);
        assert_eq!(img.pixels().len(), 18);
    }

    #[test]
    fn new_rejects_wrong_length() {
        let err = RasterImage::new(2, 2, ChannelOrder::Rgb, vec![0; 11]).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn new_rejects_zero_dimension() {
        assert!(RasterImage::new(0, 4, ChannelOrder::Rgb, vec![]).is_err());
        assert!(RasterImage::new(4, 0, ChannelOrder::Rgb, vec![]).is_err());
    }

    #[test]
    fn payload_len_overflow_is_none() {
        assert_eq!(payload_len(4, 4), Some(48));
        if usize::BITS == 32 {
            assert_eq!(payload_len(u32::MAX, u32::MAX), None);
        }
    }

    #[test]
    fn blank_is_black_rgb() {
        let img = RasterImage::blank(3, 2);
        assert_eq!(img.order(), ChannelOrder::Rgb);
        assert!(img.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn filled_repeats_color() {
        let img = RasterImage::filled(2, 2, Rgb::new(1, 2, 3));
        assert_eq!(img.pixels(), &[1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2, 3]);
    }

    // ── Pixel access ────────────────────────────────────────────────

    #[test]
    fn pixel_is_order_aware() {
        let bgr = RasterImage::new(1, 1, ChannelOrder::Bgr, vec![3, 2, 1]).unwrap();
        assert_eq!(bgr.pixel(0, 0), Rgb::new(1, 2, 3));
    }

    #[test]
    fn set_pixel_row_major() {
        let mut img = RasterImage::blank(3, 2);
        img.set_pixel(2, 1, Rgb::new(9, 8, 7));
        assert_eq!(&img.pixels()[15..18], &[9, 8, 7]);
        assert_eq!(img.pixel(2, 1), Rgb::new(9, 8, 7));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn pixel_out_of_bounds_panics() {
        let img = RasterImage::blank(2, 2);
        let _ = img.pixel(2, 0);
    }

    // ── Channel order ───────────────────────────────────────────────

    #[test]
    fn to_rgb_swaps_bgr() {
        let bgr = RasterImage::new(2, 1, ChannelOrder::Bgr, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let rgb = bgr.to_rgb();
        assert_eq!(rgb.order(), ChannelOrder::Rgb);
        assert_eq!(rgb.pixels(), &[3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn to_rgb_keeps_rgb() {
        let img = RasterImage::filled(2, 2, Rgb::new(7, 8, 9));
        assert_eq!(img.to_rgb(), img);
    }

    #[test]
    fn tags_round_trip() {
        for order in [ChannelOrder::Rgb, ChannelOrder::Bgr] {
            assert_eq!(ChannelOrder::from_tag(order.tag()), Some(order));
        }
        assert_eq!(ChannelOrder::from_tag(b"RGBA"), None);
        assert_eq!(ChannelOrder::from_tag(b"XYZ"), None);
    }

    #[test]
    fn debug_omits_payload() {
        let s = format!("{:?}", RasterImage::blank(100, 100));
        assert!(s.contains("30000"));
        assert!(s.len() < 200);
    }
}
