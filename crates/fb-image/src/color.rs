//! 8-bit RGB color triples.
//!
//! The whole tool suite works in plain sRGB bytes. There is no color-space
//! math here, only channel access, inversion for the cursor indicator, and
//! hex parsing for the brush command.

use std::fmt;

/// A color as three independent byte channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The bitwise complement of every channel.
    #[inline]
    #[must_use]
    pub const fn inverted(self) -> Self {
        Self::new(!self.r, !self.g, !self.b)
    }

    /// Parse a six-digit hex color.
    ///
    /// Accepts `#RRGGBB`, `0xRRGGBB` (or `0X`) and bare `RRGGBB`, case
    /// insensitive. Anything else returns `None`.
    ///
    /// ```
    /// use fb_image::Rgb;
    ///
    /// assert_eq!(Rgb::from_hex("#ff8000"), Some(Rgb::new(255, 128, 0)));
    /// assert_eq!(Rgb::from_hex("0x00FF00"), Some(Rgb::new(0, 255, 0)));
    /// assert_eq!(Rgb::from_hex("red"), None);
    /// ```
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("0x"))
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s)
            .as_bytes();

        if digits.len() != 6 {
            return None;
        }

        Some(Self::new(
            parse_hex_byte(&digits[0..2])?,
            parse_hex_byte(&digits[2..4])?,
            parse_hex_byte(&digits[4..6])?,
        ))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Hex parsing ─────────────────────────────────────────────────

    #[test]
    fn hex_with_hash() {
        assert_eq!(Rgb::from_hex("#123456"), Some(Rgb::new(0x12, 0x34, 0x56)));
    }

    #[test]
    fn hex_with_0x_prefix() {
        assert_eq!(Rgb::from_hex("0xabcdef"), Some(Rgb::new(0xab, 0xcd, 0xef)));
        assert_eq!(Rgb::from_hex("0XABCDEF"), Some(Rgb::new(0xab, 0xcd, 0xef)));
    }

    #[test]
    fn hex_bare() {
        assert_eq!(Rgb::from_hex("ff0000"), Some(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn hex_mixed_case() {
        assert_eq!(Rgb::from_hex("#FfAa01"), Some(Rgb::new(0xff, 0xaa, 0x01)));
    }

    #[test]
    fn hex_wrong_length_rejected() {
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("ff00000"), None);
        assert_eq!(Rgb::from_hex(""), None);
        assert_eq!(Rgb::from_hex("#"), None);
    }

    #[test]
    fn hex_non_digit_rejected() {
        assert_eq!(Rgb::from_hex("#gg0000"), None);
        assert_eq!(Rgb::from_hex("-12345"), None);
    }

    #[test]
    fn hex_multibyte_input_rejected() {
        // Six bytes, but not six ASCII digits.
        assert_eq!(Rgb::from_hex("ééé"), None);
    }

    // ── Inversion / display ─────────────────────────────────────────

    #[test]
    fn inverted_is_involution() {
        let c = Rgb::new(12, 200, 99);
        assert_eq!(c.inverted().inverted(), c);
        assert_eq!(Rgb::BLACK.inverted(), Rgb::WHITE);
    }

    #[test]
    fn display_is_lowercase_hex() {
        assert_eq!(Rgb::new(255, 128, 0).to_string(), "#ff8000");
    }
}
