//! Annotation colors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Annotation color, stored and serialized as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnnotationColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl AnnotationColor {
    pub const GOLD: Self = Self::rgb(0xD4, 0xAF, 0x37);
    pub const RED: Self = Self::rgb(0xE7, 0x4C, 0x3C);
    pub const BLUE: Self = Self::rgb(0x34, 0x98, 0xDB);
    pub const GREEN: Self = Self::rgb(0x2E, 0xCC, 0x71);
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    /// Background of measurement label plaques
    pub const NAVY: Self = Self::rgb(0x0A, 0x19, 0x29);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl Default for AnnotationColor {
    fn default() -> Self {
        Self::GOLD
    }
}

impl fmt::Display for AnnotationColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for AnnotationColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| format!("not a #RRGGBB color: {s:?}"))
    }
}

impl TryFrom<String> for AnnotationColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AnnotationColor> for String {
    fn from(c: AnnotationColor) -> Self {
        c.to_hex()
    }
}
