//! Semantic pathway data model.
//!
//! These types mirror the parts of a pvjson document (the JSON form of a GPML
//! pathway) that the highlighter needs: the flat list of elements with their
//! ids, kinds, display text, cross-references and explicit geometry.
//!
//! ```text
//! GPML ──(format converter)──► pvjson ──(this module)──► SemanticElement list
//!                                │
//!                                └──(renderer)──► rendered SVG surface
//! ```
//!
//! Unknown pvjson properties are ignored.

use std::fmt;

use serde::Deserialize;

use crate::geometry::{Bounds, Point, Size};

/// The GPML element kind of a semantic element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    DataNode,
    Label,
    Interaction,
    /// Any other GPML element, keeping its raw name
    Other(String),
}

impl ElementKind {
    /// Returns `true` for kinds that take part in text and xref search.
    pub fn is_searchable(&self) -> bool {
        matches!(self, Self::DataNode | Self::Label)
    }
}

impl Default for ElementKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ElementKind {
    fn from(name: String) -> Self {
        match name.strip_prefix("gpml:").unwrap_or(&name) {
            "DataNode" => Self::DataNode,
            "Label" => Self::Label,
            "Interaction" => Self::Interaction,
            _ => Self::Other(name),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataNode => write!(f, "gpml:DataNode"),
            Self::Label => write!(f, "gpml:Label"),
            Self::Interaction => write!(f, "gpml:Interaction"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

impl<'de> Deserialize<'de> for ElementKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// A cross-reference to an external database entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DatasourceReference {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    database: Option<String>,
}

impl DatasourceReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            database: None,
        }
    }

    /// The identifier within the external database.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The external database name, when known.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }
}

/// A parsed pathway entity (gene product, label, interaction line, ...)
/// independent of its rendering.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticElement {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "gpml:element", default)]
    kind: ElementKind,
    #[serde(default)]
    text_content: Option<String>,
    #[serde(default)]
    datasource_reference: Option<DatasourceReference>,
    #[serde(default)]
    shape: Option<String>,
    #[serde(default)]
    x: Option<f32>,
    #[serde(default)]
    y: Option<f32>,
    #[serde(default)]
    width: Option<f32>,
    #[serde(default)]
    height: Option<f32>,
}

impl SemanticElement {
    /// Creates an element of the given kind with nothing else set.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    pub fn with_xref(mut self, xref_id: impl Into<String>) -> Self {
        self.datasource_reference = Some(DatasourceReference::new(xref_id));
        self
    }

    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    /// Sets explicit geometry from a top-left corner and a size.
    pub fn with_geometry(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text_content.as_deref()
    }

    pub fn datasource_reference(&self) -> Option<&DatasourceReference> {
        self.datasource_reference.as_ref()
    }

    /// The cross-reference id, if the element has one.
    pub fn xref_id(&self) -> Option<&str> {
        self.datasource_reference
            .as_ref()
            .and_then(DatasourceReference::id)
    }

    pub fn shape(&self) -> Option<&str> {
        self.shape.as_deref()
    }

    /// Returns `true` when the element is rendered without a shape, so only
    /// its text is visible.
    pub fn is_shapeless(&self) -> bool {
        self.shape.as_deref() == Some("none")
    }

    /// Returns `true` when the element carries non-empty display text.
    pub fn has_text(&self) -> bool {
        self.text_content.as_deref().is_some_and(|text| !text.is_empty())
    }

    /// The explicit geometry, only when all of `x`, `y`, `width` and
    /// `height` are present.
    pub fn geometry(&self) -> Option<Bounds> {
        match (self.x, self.y, self.width, self.height) {
            (Some(x), Some(y), Some(width), Some(height)) => Some(Bounds::new_from_top_left(
                Point::new(x, y),
                Size::new(width, height),
            )),
            _ => None,
        }
    }
}

/// The pvjson document: at least its element list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Pvjson {
    #[serde(default)]
    elements: Vec<SemanticElement>,
}

impl Pvjson {
    pub fn new(elements: Vec<SemanticElement>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[SemanticElement] {
        &self.elements
    }
}

/// What a host exposes about the diagram it rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceData {
    pvjson: Pvjson,
    renderer_engine: String,
}

impl SourceData {
    pub fn new(pvjson: Pvjson, renderer_engine: impl Into<String>) -> Self {
        Self {
            pvjson,
            renderer_engine: renderer_engine.into(),
        }
    }

    pub fn pvjson(&self) -> &Pvjson {
        &self.pvjson
    }

    /// Shorthand for `pvjson().elements()`.
    pub fn elements(&self) -> &[SemanticElement] {
        self.pvjson.elements()
    }

    /// Name of the renderer that produced the visual tree, e.g. `svg`.
    pub fn renderer_engine(&self) -> &str {
        &self.renderer_engine
    }
}
