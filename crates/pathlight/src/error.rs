//! Error types for Pathlight operations.
//!
//! Selector misses, malformed transforms, missing markers and incomplete
//! geometry are never errors; they only mean "nothing to highlight". The
//! variants here cover the host boundary: loading sources and configuration.

use std::io;

use thiserror::Error;

use pathlight_core::document::DocumentError;

/// The main error type for Pathlight operations.
///
/// # Diagnostic Variants
///
/// The `SourceData` variant keeps the JSON text that failed to deserialize,
/// so reporters can point at the offending line and column.
#[derive(Debug, Error)]
pub enum PathlightError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Renderer error: {0}")]
    Document(#[from] DocumentError),

    #[error("Invalid pathway data: {err}")]
    SourceData { err: serde_json::Error, src: String },

    #[error("{0}")]
    NoRenderableSource(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PathlightError {
    /// Create a new `SourceData` error with the associated JSON text.
    pub fn new_source_data_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::SourceData {
            err,
            src: src.into(),
        }
    }
}
