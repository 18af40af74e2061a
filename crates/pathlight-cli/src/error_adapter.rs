//! Error adapter for converting PathlightError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! Invalid pathway data is reported with a snippet of the JSON document,
//! labeled at the line and column where deserialization stopped.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use pathlight::PathlightError;

/// Adapter for a pathway-data (JSON) error.
pub struct SourceDataAdapter<'a> {
    /// The wrapped JSON error
    err: &'a serde_json::Error,
    /// The JSON text that failed to deserialize
    src: &'a str,
}

impl<'a> SourceDataAdapter<'a> {
    /// Create a new source data adapter.
    pub fn new(err: &'a serde_json::Error, src: &'a str) -> Self {
        Self { err, src }
    }

    /// Byte span of the error position within the source.
    fn span(&self) -> SourceSpan {
        let offset = line_column_offset(self.src, self.err.line(), self.err.column());
        let len = usize::from(offset < self.src.len());
        SourceSpan::new(offset.into(), len)
    }
}

/// Converts serde_json's one-based line and column into a byte offset,
/// clamped to the source length.
fn line_column_offset(src: &str, line: usize, column: usize) -> usize {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(src.len())
}

impl fmt::Debug for SourceDataAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDataAdapter")
            .field("err", &self.err)
            .finish()
    }
}

impl fmt::Display for SourceDataAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid pathway data")
    }
}

impl std::error::Error for SourceDataAdapter<'_> {}

impl MietteDiagnostic for SourceDataAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("pathlight::source_data"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(
            "the pvjson file must be a JSON object with an `elements` array",
        ))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_primary_with_span(Some(self.err.to_string()), self.span());
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for [`PathlightError`] variants without source locations.
pub struct ErrorAdapter<'a>(pub &'a PathlightError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PathlightError::Io(_) => "pathlight::io",
            PathlightError::Document(_) => "pathlight::renderer",
            PathlightError::SourceData { .. } => "pathlight::source_data",
            PathlightError::NoRenderableSource(_) => "pathlight::no_source",
            PathlightError::Config(_) => "pathlight::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            PathlightError::Document(_) => Some(Box::new("the input must be a well-formed SVG document")),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// Invalid pathway data, with a JSON snippet.
    SourceData(SourceDataAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::SourceData(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::SourceData(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::SourceData(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::SourceData(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::SourceData(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::SourceData(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`PathlightError`] into a list of reportable errors.
pub fn to_reportables(err: &PathlightError) -> Vec<Reportable<'_>> {
    match err {
        PathlightError::SourceData { err, src } => {
            vec![Reportable::SourceData(SourceDataAdapter::new(err, src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
