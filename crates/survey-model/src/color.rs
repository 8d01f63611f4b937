//! Chart colors keyed by response label.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::codebook::Codebook;
use crate::error::{ModelError, Result};

/// Fallback for labels with no palette entry.
pub const DEFAULT_FALLBACK_COLOR: Color = Color::rgb(0x33, 0x33, 0x33);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(value: &str) -> Result<Self> {
        let invalid = || ModelError::InvalidColor {
            value: value.to_string(),
        };
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Label → color palette with a single shared fallback.
///
/// Several labels may share a color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMap {
    colors: HashMap<String, Color>,
    fallback: Color,
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_COLOR)
    }
}

impl ColorMap {
    pub fn new(fallback: Color) -> Self {
        Self {
            colors: HashMap::new(),
            fallback,
        }
    }

    pub fn with_colors<I, S>(fallback: Color, colors: I) -> Self
    where
        I: IntoIterator<Item = (S, Color)>,
        S: Into<String>,
    {
        let mut map = Self::new(fallback);
        for (label, color) in colors {
            map.insert(label, color);
        }
        map
    }

    /// Set the color for `label`, replacing any previous entry.
    pub fn insert(&mut self, label: impl Into<String>, color: Color) {
        self.colors.insert(label.into(), color);
    }

    pub fn get(&self, label: &str) -> Option<Color> {
        self.colors.get(label).copied()
    }

    pub fn color_for(&self, label: &str) -> Color {
        self.get(label).unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> Color {
        self.fallback
    }

    pub fn set_fallback(&mut self, fallback: Color) {
        self.fallback = fallback;
    }

    /// Codebook labels that would be drawn with the fallback color.
    pub fn uncovered_labels(&self, codebook: &Codebook) -> Vec<String> {
        codebook
            .labels()
            .filter(|label| !self.colors.contains_key(*label))
            .map(str::to_string)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(Color::from_hex("#1f77b4").unwrap(), Color::rgb(0x1f, 0x77, 0xb4));
        assert_eq!(Color::from_hex("1E90FF").unwrap(), Color::rgb(0x1e, 0x90, 0xff));
        assert_eq!(Color::rgb(0xd6, 0x27, 0x28).to_hex(), "#d62728");
    }

    #[test]
    fn rejects_malformed_hex() {
        for value in ["", "#12345", "#1234567", "#gg0000", "#éé0000"] {
            assert!(Color::from_hex(value).is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn unknown_labels_use_fallback() {
        let red = Color::rgb(0xd6, 0x27, 0x28);
        let map = ColorMap::with_colors(DEFAULT_FALLBACK_COLOR, [("Unemployment", red)]);
        assert_eq!(map.color_for("Unemployment"), red);
        assert_eq!(map.color_for("Anything else"), DEFAULT_FALLBACK_COLOR);
        assert_eq!(map.fallback().to_hex(), "#333333");
    }

    #[test]
    fn reports_uncovered_codebook_labels() {
        let codebook =
            Codebook::from_entries("problem", [(3, "Unemployment"), (20, "Health")]).unwrap();
        let map = ColorMap::with_colors(
            DEFAULT_FALLBACK_COLOR,
            [("Unemployment", Color::rgb(0, 0, 0))],
        );
        assert_eq!(map.uncovered_labels(&codebook), vec!["Health".to_string()]);
    }
}
