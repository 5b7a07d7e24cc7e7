//! Colours stored as a signed 32-bit ARGB integer.
//!
//! Android writes `0xAARRGGBB` through a Java `int`, so most colours show up
//! negative in the files (`-256` is opaque yellow).

use crate::error::{AppError, Result};
use serde::Serialize;

/// Colour as `(alpha, red, green, blue)` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color(pub [u8; 4]);

impl Color {
    /// Default for notes built without a colour.
    pub const DEFAULT: Color = Color([0, 255, 255, 255]);

    /// Build from components.
    pub fn new(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Color([alpha, red, green, blue])
    }

    /// Reinterpret the big-endian two's-complement bit pattern as bytes.
    pub fn from_argb_int(value: i32) -> Self {
        Color(value.to_be_bytes())
    }

    /// Pack back into the signed integer the reader stores.
    pub fn to_argb_int(&self) -> i32 {
        i32::from_be_bytes(self.0)
    }

    /// Parse the decimal text form found in note files.
    pub fn parse(text: &str) -> Result<Self> {
        let value = text
            .trim()
            .parse::<i32>()
            .map_err(|e| AppError::MalformedNoteRecord(format!("bad color {:?}: {}", text, e)))?;
        Ok(Self::from_argb_int(value))
    }

    /// Alpha byte (unused by the reader).
    pub fn alpha(&self) -> u8 {
        self.0[0]
    }

    /// Red byte.
    pub fn red(&self) -> u8 {
        self.0[1]
    }

    /// Green byte.
    pub fn green(&self) -> u8 {
        self.0[2]
    }

    /// Blue byte.
    pub fn blue(&self) -> u8 {
        self.0[3]
    }

    /// `#RRGGBB`, alpha dropped.
    pub fn rgb_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red(), self.green(), self.blue())
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_argb_int())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_positive_value() {
        let color = Color::from_argb_int(255);
        assert_eq!(color, Color::new(0, 0, 0, 255));
        assert_eq!(color.to_argb_int(), 255);
    }

    #[test]
    fn test_negative_values_are_opaque_colors() {
        assert_eq!(Color::parse("-256").unwrap(), Color::new(255, 255, 255, 0));
        assert_eq!(
            Color::parse("-16711936").unwrap(),
            Color::new(255, 0, 255, 0)
        );
        assert_eq!(Color::parse("-11184811").unwrap().rgb_hex(), "#555555");
    }

    #[test]
    fn test_high_alpha_packs_negative() {
        assert_eq!(Color::new(255, 255, 255, 255).to_argb_int(), -1);
        assert_eq!(Color::new(128, 0, 0, 0).to_argb_int(), i32::MIN);
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(Color::parse("4294967295").is_err());
        assert!(Color::parse("").is_err());
    }
}
