//! Bilinear image scaling.
//!
//! Used to shrink images that do not fit the display. For each output pixel
//! the matching source coordinate is computed, the four surrounding source
//! pixels are found, and each channel is interpolated horizontally on both
//! rows, then vertically between the two results.
//!
//! Input in BGR order is reordered to RGB *before* interpolation; the output
//! is always RGB.

use tracing::debug;

use crate::image::{ChannelOrder, RasterImage, BYTES_PER_PIXEL};

/// Linear interpolation between two channel values, clamped to a byte.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp(a: u8, b: u8, t: f32) -> u8 {
    let v = f32::from(a) + t * (f32::from(b) - f32::from(a));
    // Safe: clamped to 0.0..=255.0 before truncation.
    v.clamp(0.0, 255.0) as u8
}

/// Resample `image` to exactly `target_width × target_height`.
///
/// Scaling to the original size is the identity. The result never aliases
/// the input.
///
/// # Panics
///
/// Panics if either target dimension is zero.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn scale(image: &RasterImage, target_width: u32, target_height: u32) -> RasterImage {
    assert!(
        target_width > 0 && target_height > 0,
        "scale target must not be empty"
    );

    let src = image.to_rgb();
    let (sw, sh) = (src.width() as usize, src.height() as usize);
    let (tw, th) = (target_width as usize, target_height as usize);
    let data = src.pixels();

    let x_ratio = sw as f32 / tw as f32;
    let y_ratio = sh as f32 / th as f32;
    let at = |x: usize, y: usize| (y * sw + x) * BYTES_PER_PIXEL;

    let mut out = vec![0u8; tw * th * BYTES_PER_PIXEL];

    for h in 0..th {
        let orig_y = h as f32 * y_ratio;
        let fy = orig_y.floor();
        let ty = orig_y - fy;
        let y0 = (fy as usize).min(sh - 1);
        let y1 = (y0 + 1).min(sh - 1);

        for w in 0..tw {
            let orig_x = w as f32 * x_ratio;
            let fx = orig_x.floor();
            let tx = orig_x - fx;
            let x0 = (fx as usize).min(sw - 1);
            let x1 = (x0 + 1).min(sw - 1);

            let (p00, p10) = (at(x0, y0), at(x1, y0));
            let (p01, p11) = (at(x0, y1), at(x1, y1));
            let dst = (h * tw + w) * BYTES_PER_PIXEL;

            for c in 0..BYTES_PER_PIXEL {
                let top = lerp(data[p00 + c], data[p10 + c], tx);
                let bottom = lerp(data[p01 + c], data[p11 + c], tx);
                out[dst + c] = lerp(top, bottom, ty);
            }
        }
    }

    debug!(
        from_w = sw,
        from_h = sh,
        to_w = tw,
        to_h = th,
        "scaled image"
    );

    RasterImage::new(target_width, target_height, ChannelOrder::Rgb, out)
        .unwrap_or_else(|_| unreachable!("scale output is sized from the target"))
}

/// The size an image must be scaled to so it fits inside
/// `max_width × max_height`, or `None` if it already fits.
///
/// Both axes are derived in one step from the original dimensions with a
/// single ratio, so aspect is preserved and rounding does not compound.
/// Each result is at least 1 and never exceeds its bound.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> Option<(u32, u32)> {
    if width <= max_width && height <= max_height {
        return None;
    }

    let ratio = (f64::from(max_width) / f64::from(width))
        .min(f64::from(max_height) / f64::from(height));
    let fit = |dim: u32, bound: u32| ((f64::from(dim) * ratio).floor() as u32).clamp(1, bound.max(1));

    Some((fit(width, max_width), fit(height, max_height)))
}

/// Shrink `image` to fit inside `max_width × max_height`.
///
/// Returns the image unchanged (as RGB) when it already fits.
#[must_use]
pub fn fit(image: &RasterImage, max_width: u32, max_height: u32) -> RasterImage {
    match fit_within(image.width(), image.height(), max_width, max_height) {
        Some((w, h)) => scale(image, w, h),
        None => image.to_rgb(),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use pretty_assertions::assert_eq;

    fn checker(width: u32, height: u32) -> RasterImage {
        let mut img = RasterImage::blank(width, height);
        for y in 0..height {
            for x in 0..width {
                if (x + y) % 2 == 0 {
                    img.set_pixel(x, y, Rgb::WHITE);
                }
            }
        }
        img
    }

    // ── lerp ────────────────────────────────────────────────────────

    #[test]
    fn lerp_endpoints_and_midpoint() {
        assert_eq!(lerp(10, 200, 0.0), 10);
        assert_eq!(lerp(10, 200, 1.0), 200);
        assert_eq!(lerp(0, 100, 0.5), 50);
        assert_eq!(lerp(100, 0, 0.5), 50);
    }

    #[test]
    fn lerp_clamps() {
        assert_eq!(lerp(0, 255, 2.0), 255);
        assert_eq!(lerp(255, 0, 2.0), 0);
    }

    // ── scale ───────────────────────────────────────────────────────

    #[test]
    fn output_has_requested_dimensions() {
        let img = checker(9, 7);
        for (w, h) in [(1, 1), (3, 2), (9, 7), (18, 3), (4, 14)] {
            let out = scale(&img, w, h);
            assert_eq!((out.width(), out.height()), (w, h));
            assert_eq!(out.pixels().len(), (w * h * 3) as usize);
        }
    }

    #[test]
    fn same_size_is_identity() {
        let img = checker(6, 5);
        assert_eq!(scale(&img, 6, 5), img);
    }

    #[test]
    fn uniform_image_stays_uniform() {
        let img = RasterImage::filled(8, 8, Rgb::new(40, 80, 120));
        let out = scale(&img, 3, 5);
        for y in 0..5 {
            for x in 0..3 {
                assert_eq!(out.pixel(x, y), Rgb::new(40, 80, 120));
            }
        }
    }

    #[test]
    fn halving_samples_interpolated_values() {
        // Row of 4: 0, 100, 200, 255. Halving samples source x = 0 and 2.
        let mut img = RasterImage::blank(4, 1);
        for (x, v) in [0u8, 100, 200, 255].into_iter().enumerate() {
            img.set_pixel(x as u32, 0, Rgb::new(v, v, v));
        }
        let out = scale(&img, 2, 1);
        assert_eq!(out.pixel(0, 0), Rgb::new(0, 0, 0));
        assert_eq!(out.pixel(1, 0), Rgb::new(200, 200, 200));
    }

    #[test]
    fn upscale_interpolates_between_neighbours() {
        let mut img = RasterImage::blank(2, 1);
        img.set_pixel(1, 0, Rgb::new(200, 200, 200));
        let out = scale(&img, 4, 1);
        // Source x for outputs: 0.0, 0.5, 1.0, 1.5 (last clamps x1 to 1).
        assert_eq!(out.pixel(0, 0).r, 0);
        assert_eq!(out.pixel(1, 0).r, 100);
        assert_eq!(out.pixel(2, 0).r, 200);
        assert_eq!(out.pixel(3, 0).r, 200);
    }

    #[test]
    fn bgr_is_normalized_before_interpolation() {
        let bgr = RasterImage::new(2, 2, ChannelOrder::Bgr, [0u8, 0, 255].repeat(4)).unwrap();
        let out = scale(&bgr, 1, 1);
        assert_eq!(out.order(), ChannelOrder::Rgb);
        assert_eq!(out.pixel(0, 0), Rgb::new(255, 0, 0));
    }

    #[test]
    fn input_is_untouched() {
        let img = checker(4, 4);
        let copy = img.clone();
        let _ = scale(&img, 2, 2);
        assert_eq!(img, copy);
    }

    // ── fit_within ──────────────────────────────────────────────────

    #[test]
    fn fit_within_none_when_it_fits() {
        assert_eq!(fit_within(640, 480, 640, 480), None);
        assert_eq!(fit_within(10, 10, 640, 480), None);
    }

    #[test]
    fn fit_within_width_bound() {
        assert_eq!(fit_within(1280, 480, 640, 480), Some((640, 240)));
    }

    #[test]
    fn fit_within_height_bound() {
        assert_eq!(fit_within(320, 960, 640, 480), Some((160, 480)));
    }

    #[test]
    fn fit_within_both_axes_uses_tighter_ratio() {
        // Width ratio 0.5, height ratio 0.4: height wins.
        assert_eq!(fit_within(1280, 1200, 640, 480), Some((512, 480)));
    }

    #[test]
    fn fit_within_never_returns_zero() {
        assert_eq!(fit_within(10_000, 1, 100, 100), Some((100, 1)));
    }

    #[test]
    fn fit_returns_rgb_copy_when_small() {
        let bgr = RasterImage::new(1, 1, ChannelOrder::Bgr, vec![1, 2, 3]).unwrap();
        let out = fit(&bgr, 10, 10);
        assert_eq!(out.order(), ChannelOrder::Rgb);
        assert_eq!(out.pixels(), &[3, 2, 1]);
    }

    #[test]
    fn fit_shrinks_large_image() {
        let out = fit(&checker(40, 20), 10, 10);
        assert_eq!((out.width(), out.height()), (10, 5));
    }
}
