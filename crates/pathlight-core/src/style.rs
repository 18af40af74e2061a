//! Highlight style sets.
//!
//! A [`StyleSet`] is an ordered map from CSS-like property names (`fill`,
//! `stroke-width`, ...) to their values. Overlays are painted by serializing
//! a style set into an inline `style` attribute.
//!
//! # Property Mapping
//!
//! | Property | Default | Used for |
//! |----------|---------|----------|
//! | `fill` | `yellow` | outline rectangles |
//! | `fill-opacity` | `0.2` | outline rectangles |
//! | `stroke` | `orange` | rectangles, line clones, recolored markers |
//! | `stroke-width` | `3px` | rectangles; added to the width of line clones |
//! | `stroke-opacity` | `1` | rectangles; capped for line clones |
//!
//! # Example
//!
//! ```
//! use pathlight_core::style::StyleSet;
//!
//! let styles = StyleSet::new()
//!     .with("fill", "blue")
//!     .merged_with(&StyleSet::highlight_default());
//!
//! assert_eq!(styles.get("fill"), Some("blue"));
//! assert_eq!(styles.get("stroke"), Some("orange"));
//! assert_eq!(
//!     styles.to_style_string(&[]),
//!     "fill:blue;fill-opacity:0.2;stroke:orange;stroke-width:3px;stroke-opacity:1;"
//! );
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::{color::Color, transform::parse_length};

pub const FILL: &str = "fill";
pub const FILL_OPACITY: &str = "fill-opacity";
pub const STROKE: &str = "stroke";
pub const STROKE_WIDTH: &str = "stroke-width";
pub const STROKE_OPACITY: &str = "stroke-opacity";

/// An ordered set of style properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSet {
    properties: IndexMap<String, String>,
}

impl StyleSet {
    /// Creates an empty style set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in highlight styles: a translucent yellow fill with an
    /// orange 3px border.
    pub fn highlight_default() -> Self {
        Self::new()
            .with(FILL, "yellow")
            .with(FILL_OPACITY, "0.2")
            .with(STROKE, "orange")
            .with(STROKE_WIDTH, "3px")
            .with(STROKE_OPACITY, "1")
    }

    /// Sets a property (builder style).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a property, keeping its position if it already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Returns the value of a property.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Iterates over `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Fills in every property missing from `self` with the value from
    /// `defaults`.
    ///
    /// Properties already present keep their value and position; defaults
    /// are appended in their own order.
    pub fn merged_with(&self, defaults: &StyleSet) -> StyleSet {
        let mut merged = self.clone();
        for (name, value) in &defaults.properties {
            if !merged.properties.contains_key(name) {
                merged.properties.insert(name.clone(), value.clone());
            }
        }
        merged
    }

    /// The stroke color, if any.
    pub fn stroke(&self) -> Option<&str> {
        self.get(STROKE)
    }

    /// The numeric part of `stroke-width`, if any.
    pub fn stroke_width(&self) -> Option<f32> {
        self.get(STROKE_WIDTH).and_then(parse_length)
    }

    /// The numeric value of `stroke-opacity`, if any.
    pub fn stroke_opacity(&self) -> Option<f32> {
        self.get(STROKE_OPACITY).and_then(parse_length)
    }

    /// Serializes the set as `name:value;` pairs, skipping the properties
    /// listed in `except`.
    pub fn to_style_string(&self, except: &[&str]) -> String {
        self.iter()
            .filter(|(name, _)| !except.contains(name))
            .map(|(name, value)| format!("{name}:{value};"))
            .collect()
    }

    /// Checks that color properties hold CSS colors and opacity/width
    /// properties hold numbers.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending property.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in self.iter() {
            match name {
                FILL | STROKE if value != "none" => {
                    Color::new(value).map_err(|err| format!("style `{name}`: {err}"))?;
                }
                FILL_OPACITY | STROKE_OPACITY | STROKE_WIDTH => {
                    if parse_length(value).is_none() {
                        return Err(format!("style `{name}`: `{value}` is not a number"));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for StyleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_style_string(&[]))
    }
}

impl<K, V> FromIterator<(K, V)> for StyleSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut styles = StyleSet::new();
        for (name, value) in iter {
            styles.set(name, value);
        }
        styles
    }
}

/// A style value as written in a config file: `stroke = "red"` or
/// `fill-opacity = 0.2`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawStyleValue {
    Text(String),
    Number(f64),
}

impl From<RawStyleValue> for String {
    fn from(value: RawStyleValue) -> Self {
        match value {
            RawStyleValue::Text(text) => text,
            RawStyleValue::Number(number) => number.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for StyleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, RawStyleValue>::deserialize(deserializer)?;
        Ok(raw.into_iter().map(|(name, value)| (name, String::from(value))).collect())
    }
}
