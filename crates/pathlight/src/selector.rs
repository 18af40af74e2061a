//! Highlight selectors and their resolution to targets.
//!
//! Three selector forms are understood, checked in this order:
//!
//! | Form | Example | Resolves to |
//! |------|---------|-------------|
//! | `#<id>` | `#eb5` | the rendered node with that id, or else the semantic elements with that id |
//! | `xref:<id>` | `xref:ENSG0001` | rendered nodes of every entry with exactly that cross-reference |
//! | anything else | `gcn-2` | rendered nodes of every entry whose text matches, ignoring case |
//!
//! Text matches on shape-less elements target their `text-for-<id>` node,
//! since the element itself draws nothing.

use log::debug;

use pathlight_core::{semantic::SemanticElement, surface::Surface};

use crate::{groups::Target, search::SearchIndex};

const XREF_PREFIX: &str = "xref:";
const TEXT_NODE_PREFIX: &str = "text-for-";

/// A parsed highlight selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A surface selector starting with `#`, kept whole (`#a, #b` is allowed)
    Id(String),
    /// An exact cross-reference id
    Xref(String),
    /// Display text to match, ignoring case
    Text(String),
}

impl Selector {
    /// Parses a selector string. Empty selectors, and prefixes with nothing
    /// after them, give `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathlight::selector::Selector;
    ///
    /// assert_eq!(Selector::parse("#eb5"), Some(Selector::Id("#eb5".to_string())));
    /// assert_eq!(Selector::parse("xref:1234"), Some(Selector::Xref("1234".to_string())));
    /// assert_eq!(Selector::parse("GCN-2"), Some(Selector::Text("GCN-2".to_string())));
    /// assert_eq!(Selector::parse(""), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.starts_with('#') {
            (raw.len() > 1).then(|| Self::Id(raw.to_string()))
        } else if let Some(xref) = raw.strip_prefix(XREF_PREFIX) {
            (!xref.is_empty()).then(|| Self::Xref(xref.to_string()))
        } else {
            (!raw.is_empty()).then(|| Self::Text(raw.to_string()))
        }
    }

    /// Resolves the selector to highlight targets.
    ///
    /// Returns `None` when no surface query could be built (no entry
    /// matched) or when an id matches neither a rendered node nor a
    /// semantic element. `Some` may still hold an empty list when the
    /// query matched nothing on the surface.
    pub fn resolve<S: Surface + ?Sized>(
        &self,
        surface: &S,
        elements: &[SemanticElement],
        index: &SearchIndex,
    ) -> Option<Vec<Target>> {
        let query = match self {
            Self::Id(query) => {
                let nodes = surface.select(query);
                if !nodes.is_empty() {
                    return Some(nodes.into_iter().map(Target::Visual).collect());
                }
                return elements_by_id(elements, &query[1..]);
            }
            Self::Xref(xref) => compound_id_selector(
                index
                    .matching_xref(xref)
                    .filter_map(|entry| elements.get(entry.element())?.id().map(str::to_string)),
            ),
            Self::Text(text) => compound_id_selector(index.matching_text(text).filter_map(|entry| {
                let element = elements.get(entry.element())?;
                let id = element.id()?;
                Some(if element.is_shapeless() && element.has_text() {
                    format!("{TEXT_NODE_PREFIX}{id}")
                } else {
                    id.to_string()
                })
            })),
        };

        let query = query?;
        debug!(query; "Querying surface");
        Some(surface.select(&query).into_iter().map(Target::Visual).collect())
    }
}

/// Semantic elements whose id is `id`, as geometry targets.
fn elements_by_id(elements: &[SemanticElement], id: &str) -> Option<Vec<Target>> {
    let targets: Vec<Target> = elements
        .iter()
        .enumerate()
        .filter(|(_, element)| element.id() == Some(id))
        .map(|(index, _)| Target::Element(index))
        .collect();
    (!targets.is_empty()).then_some(targets)
}

/// `#a, #b, ...`, or `None` for no ids.
fn compound_id_selector(ids: impl Iterator<Item = String>) -> Option<String> {
    let selector = ids
        .map(|id| format!("#{id}"))
        .collect::<Vec<_>>()
        .join(", ");
    (!selector.is_empty()).then_some(selector)
}
