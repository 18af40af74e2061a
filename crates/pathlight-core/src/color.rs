//! Color handling for Pathlight highlight styles
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Highlight styles keep colors as the strings the user
//! wrote; [`Color`] is only used to validate them.

use std::str::FromStr;

use color::DynamicColor;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "orange", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathlight_core::color::Color;
    ///
    /// assert!(Color::new("orange").is_ok());
    /// assert!(Color::new("rgba(255, 0, 0, 0.5)").is_ok());
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

/// Strips every character that is not an ASCII letter or digit.
///
/// Used to turn a raw color value into a suffix for derived SVG ids, so that
/// `#FF8000` and `rgb(1, 2, 3)` become `FF8000` and `rgb123`.
///
/// # Examples
///
/// ```
/// use pathlight_core::color::id_fragment;
///
/// assert_eq!(id_fragment("orange"), "orange");
/// assert_eq!(id_fragment("#FF8000"), "FF8000");
/// assert_eq!(id_fragment("rgb(1, 2, 3)"), "rgb123");
/// ```
pub fn id_fragment(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}
