// SPDX-License-Identifier: MIT
//
// Bounds-checked pixel view over a byte region.
//
// A `Surface` pairs a region of bytes (a live framebuffer mapping, or a
// `Vec<u8>` in tests) with the `Geometry` that describes it. Construction
// validates the pixel format and checks that the region is long enough for
// every visible pixel. After that, any (row, column) inside the visible
// area is addressable by construction; anything outside is a caller bug
// and panics instead of scribbling over unrelated memory.

use fb_image::{ChannelOrder, RasterImage, Rgb};
use tracing::debug;

use crate::error::{Error, Result};
use crate::format::{Geometry, PixelFormat};

/// Alpha written into formats that carry a transparency channel.
const OPAQUE: u8 = 0xFF;

/// A pixel-addressable view over `M`.
pub struct Surface<M> {
    memory: M,
    geometry: Geometry,
}

impl<M: AsRef<[u8]> + AsMut<[u8]>> Surface<M> {
    /// Wrap `memory` as a surface.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedFormat`] if the pixel format is not byte
    ///   addressable (see [`PixelFormat::validate`]).
    /// - [`Error::Device`] if the region is too small for the geometry.
    pub fn new(memory: M, geometry: Geometry) -> Result<Self> {
        geometry.format.validate()?;

        let len = memory.as_ref().len();
        let needed = geometry.required_len();
        if needed.is_none_or(|n| n > len) {
            return Err(Error::device(
                "surface",
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!(
                        "{}x{} at stride {} does not fit a {len}-byte region",
                        geometry.width, geometry.height, geometry.format.stride
                    ),
                ),
            ));
        }

        debug!(
            width = geometry.width,
            height = geometry.height,
            stride = geometry.format.stride,
            bpp = geometry.format.bits_per_pixel,
            len,
            "surface ready"
        );

        Ok(Self { memory, geometry })
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.geometry.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.geometry.height
    }

    #[inline]
    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    #[must_use]
    pub const fn format(&self) -> &PixelFormat {
        &self.geometry.format
    }

    /// Byte offset of the pixel at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if the pixel lies outside the visible area or its bytes lie
    /// outside the region.
    #[must_use]
    pub fn address(&self, row: u32, col: u32) -> usize {
        assert!(
            row < self.geometry.height && col < self.geometry.width,
            "pixel (row {row}, col {col}) outside {}x{} surface",
            self.geometry.width,
            self.geometry.height
        );
        let fmt = &self.geometry.format;
        let offset = row as usize * fmt.stride + col as usize * fmt.bytes_per_pixel();
        assert!(
            offset + fmt.bytes_per_pixel() <= self.memory.as_ref().len(),
            "pixel (row {row}, col {col}) at byte {offset} outside mapped region"
        );
        offset
    }

    /// Write a color at (`row`, `col`).
    ///
    /// Alpha, when the format has it, is set fully opaque. Channels the
    /// format omits are left untouched.
    ///
    /// # Panics
    ///
    /// Panics if the pixel is outside the surface (see [`address`](Self::address)).
    pub fn write_pixel(&mut self, row: u32, col: u32, color: Rgb) {
        let at = self.address(row, col);
        let fmt = self.geometry.format;
        let px = &mut self.memory.as_mut()[at..at + fmt.bytes_per_pixel()];
        if fmt.transp.is_present() {
            px[fmt.transp.byte()] = OPAQUE;
        }
        px[fmt.red.byte()] = color.r;
        px[fmt.green.byte()] = color.g;
        px[fmt.blue.byte()] = color.b;
    }

    /// Read the color at (`row`, `col`).
    ///
    /// # Panics
    ///
    /// Panics if the pixel is outside the surface (see [`address`](Self::address)).
    #[must_use]
    pub fn read_pixel(&self, row: u32, col: u32) -> Rgb {
        let at = self.address(row, col);
        let fmt = &self.geometry.format;
        let px = &self.memory.as_ref()[at..at + fmt.bytes_per_pixel()];
        Rgb::new(px[fmt.red.byte()], px[fmt.green.byte()], px[fmt.blue.byte()])
    }

    /// Zero the whole region, padding included.
    pub fn clear(&mut self) {
        self.memory.as_mut().fill(0);
    }

    /// Draw `image` with its top-left corner at (`x`, `y`).
    ///
    /// Parts that fall outside the surface are clipped.
    pub fn blit(&mut self, image: &RasterImage, x: u32, y: u32) {
        let cols = image.width().min(self.width().saturating_sub(x));
        let rows = image.height().min(self.height().saturating_sub(y));
        let order = image.order();
        let stride = image.width() as usize * 3;
        let data = image.pixels();

        for row in 0..rows {
            let line = &data[row as usize * stride..];
            for col in 0..cols {
                let i = col as usize * 3;
                let color = order.unpack([line[i], line[i + 1], line[i + 2]]);
                self.write_pixel(y + row, x + col, color);
            }
        }
    }

    /// Read the `width × height` rectangle at (`x`, `y`) into an RGB image.
    ///
    /// # Panics
    ///
    /// Panics if the rectangle is empty or reaches outside the surface.
    #[must_use]
    pub fn capture(&self, x: u32, y: u32, width: u32, height: u32) -> RasterImage {
        assert!(width > 0 && height > 0, "capture rectangle is empty");
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
        for row in y..y + height {
            for col in x..x + width {
                let c = self.read_pixel(row, col);
                pixels.extend_from_slice(&[c.r, c.g, c.b]);
            }
        }
        RasterImage::new(width, height, ChannelOrder::Rgb, pixels)
            .unwrap_or_else(|_| unreachable!("capture buffer is sized from the rectangle"))
    }

    /// Read the whole visible area.
    #[must_use]
    pub fn capture_all(&self) -> RasterImage {
        self.capture(0, 0, self.width(), self.height())
    }

    /// Give back the underlying region.
    #[must_use]
    pub fn into_inner(self) -> M {
        self.memory
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
