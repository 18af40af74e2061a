//! Configuration types for the highlighter.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources; every section falls back to its defaults when absent.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`HighlightConfig`] - Default highlight styles and suggestion limit.
//!
//! # Example
//!
//! ```
//! # use pathlight::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.highlight().autocomplete_limit(), 10);
//! assert_eq!(config.highlight().styles().get("stroke"), Some("orange"));
//! assert!(config.validate().is_ok());
//! ```

use serde::Deserialize;

use pathlight_core::style::StyleSet;

/// Number of suggestions returned when nothing else is configured.
pub const DEFAULT_AUTOCOMPLETE_LIMIT: usize = 10;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Highlight configuration section.
    #[serde(default)]
    highlight: HighlightConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given highlight section.
    pub fn new(highlight: HighlightConfig) -> Self {
        Self { highlight }
    }

    /// Returns the highlight configuration.
    pub fn highlight(&self) -> &HighlightConfig {
        &self.highlight
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        self.highlight.validate()
    }
}

/// Highlight defaults.
///
/// `styles` only needs to name the properties it changes; the rest fall back
/// to [`StyleSet::highlight_default`].
#[derive(Debug, Clone, Deserialize)]
pub struct HighlightConfig {
    #[serde(default = "StyleSet::highlight_default")]
    styles: StyleSet,

    #[serde(default = "default_autocomplete_limit")]
    autocomplete_limit: usize,
}

fn default_autocomplete_limit() -> usize {
    DEFAULT_AUTOCOMPLETE_LIMIT
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            styles: StyleSet::highlight_default(),
            autocomplete_limit: DEFAULT_AUTOCOMPLETE_LIMIT,
        }
    }
}

impl HighlightConfig {
    /// Creates a new [`HighlightConfig`].
    ///
    /// # Arguments
    ///
    /// * `styles` - Default styles; missing properties use the built-in defaults.
    /// * `autocomplete_limit` - Maximum number of suggestions.
    pub fn new(styles: StyleSet, autocomplete_limit: usize) -> Self {
        Self {
            styles,
            autocomplete_limit,
        }
    }

    /// The default styles, completed with the built-in defaults.
    pub fn styles(&self) -> StyleSet {
        self.styles.merged_with(&StyleSet::highlight_default())
    }

    /// Maximum number of suggestions returned by a search.
    pub fn autocomplete_limit(&self) -> usize {
        self.autocomplete_limit
    }

    /// Checks the configured styles and limit.
    ///
    /// # Errors
    ///
    /// Returns a message naming the invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.autocomplete_limit == 0 {
            return Err("autocomplete_limit must be at least 1".to_string());
        }
        self.styles
            .validate()
            .map_err(|err| format!("Invalid highlight styles in config: {err}"))
    }
}
