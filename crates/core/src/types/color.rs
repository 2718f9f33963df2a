//! Validated hex color values for the color catalog.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest accepted value (`#RGB`).
const MIN_LEN: usize = 4;
/// Longest accepted value (`#RRGGBBAA`).
const MAX_LEN: usize = 9;

/// Errors that can occur when parsing a [`HexColor`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Value does not start with `#`.
    #[error("color value must start with '#'")]
    MissingHash,

    /// Value is shorter or longer than a hex color can be.
    #[error("color value must be between {MIN_LEN} and {MAX_LEN} characters")]
    InvalidLength,

    /// Value contains a non-hex digit.
    #[error("color value must be a valid hex code")]
    InvalidDigit,
}

/// A CSS hex color such as `#fff` or `#1a2b3c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse and validate a hex color.
    ///
    /// # Errors
    ///
    /// Returns a `ColorError` describing the first rule the value breaks.
    pub fn parse(value: &str) -> Result<Self, ColorError> {
        let value = value.trim();
        let digits = value.strip_prefix('#').ok_or(ColorError::MissingHash)?;

        if !(MIN_LEN..=MAX_LEN).contains(&value.len()) {
            return Err(ColorError::InvalidLength);
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit);
        }

        Ok(Self(value.to_string()))
    }

    /// Get the color as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_short_and_long_forms() {
        assert!(HexColor::parse("#fff").is_ok());
        assert!(HexColor::parse("#1A2b3C").is_ok());
        assert!(HexColor::parse("#1a2b3c4d").is_ok());
    }

    #[test]
    fn test_requires_hash() {
        assert_eq!(HexColor::parse("ffffff"), Err(ColorError::MissingHash));
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(HexColor::parse("#ff"), Err(ColorError::InvalidLength));
        assert_eq!(
            HexColor::parse("#1234567890"),
            Err(ColorError::InvalidLength)
        );
    }

    #[test]
    fn test_rejects_non_hex() {
        assert_eq!(HexColor::parse("#ggg"), Err(ColorError::InvalidDigit));
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(HexColor::parse("  #abc ").map(|c| c.to_string()), Ok("#abc".to_string()));
    }
}
