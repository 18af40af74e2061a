//! Pathlight - highlighting for rendered biological pathway diagrams.
//!
//! Given a rendered pathway (an SVG surface) and its semantic data (pvjson
//! elements), Pathlight resolves selectors by id, cross-reference or display
//! text, draws overlay shapes on the diagram, and tracks them in named
//! highlight groups that can be cleared independently.
//!
//! # Example
//!
//! ```
//! use pathlight::{Diagram, DiagramSource, config::AppConfig};
//!
//! let svg = r#"<svg><g id="viewport"><g id="eb5"><rect width="80" height="25"/></g></g></svg>"#;
//! let pvjson = r#"{"elements": [
//!     {"id": "eb5", "gpml:element": "gpml:DataNode", "textContent": "GCN-2"}
//! ]}"#;
//!
//! let mut diagram = Diagram::new(vec![DiagramSource::new(svg, pvjson)], AppConfig::default());
//! diagram.render().expect("Failed to render");
//!
//! assert!(diagram.highlight("gcn-2", None, None));
//! assert!(diagram.to_svg().unwrap().contains("highlighted-node"));
//!
//! diagram.attenuate(None, None);
//! assert!(!diagram.to_svg().unwrap().contains("highlighted-node"));
//! ```

pub mod config;
pub mod events;
pub mod groups;
pub mod highlighter;
pub mod host;
pub mod marker;
pub mod overlay;
pub mod search;
pub mod selector;

mod error;

pub use pathlight_core::{color, document, geometry, semantic, style, surface, transform};

pub use error::PathlightError;
pub use highlighter::{DEFAULT_GROUP, Highlighter};
pub use host::{Diagram, DiagramSource};
