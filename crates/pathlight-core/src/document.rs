//! In-memory SVG surface.
//!
//! [`SvgDocument`] loads an already-rendered pathway SVG into an arena of
//! nodes, implements [`Surface`] over it so the highlighter can query and
//! mutate it, and writes the result back out as SVG text via [`Display`].
//!
//! Attribute values are stored exactly as they appear in the source, and
//! written back verbatim.
//!
//! # Example
//!
//! ```
//! use pathlight_core::{document::SvgDocument, surface::Surface};
//!
//! let mut doc = SvgDocument::parse(
//!     r#"<svg><g id="viewport"><rect id="eb5" x="10" y="10" width="40" height="20"/></g></svg>"#,
//! )
//! .unwrap();
//!
//! let node = doc.element_by_id("eb5").unwrap();
//! assert_eq!(doc.bounding_box(node).unwrap().width(), 40.0);
//!
//! doc.set_attribute(node, "fill", "red");
//! assert!(doc.to_string().contains(r#"fill="red""#));
//! ```
//!
//! [`Display`]: std::fmt::Display

mod bbox;
mod parse;
mod query;
mod write;

use std::io;

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use crate::{
    geometry::Bounds,
    surface::{NodeId, Surface},
};

/// Errors raised while loading an SVG document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("SVG parse error: {0}")]
    Parse(String),

    #[error("unexpected closing tag `</{found}>`")]
    UnexpectedClose { found: String },

    #[error("element `<{0}>` is never closed")]
    Unclosed(String),

    #[error("document has no root element")]
    NoRoot,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        name: String,
        attributes: IndexMap<String, String>,
    },
    Text(String),
    /// The body of a `<![CDATA[...]]>` section
    Cdata(String),
    /// A comment, declaration or processing instruction, markers included
    Markup(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Arena storage for one node. Freed slots keep their generation so that
/// handles to the previous occupant stay stale.
#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// An SVG tree held in memory.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
    /// Declarations, instructions and comments ahead of the root element
    prolog: Vec<String>,
}

impl SvgDocument {
    /// Creates a document holding a single empty root element.
    pub fn new(root_name: &str) -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId::new(0),
            prolog: Vec::new(),
        };
        doc.root = doc.push_node(NodeKind::Element {
            name: root_name.to_string(),
            attributes: IndexMap::new(),
        });
        doc
    }

    /// The root element (normally `<svg>`).
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of attached elements, the root included.
    pub fn element_count(&self) -> usize {
        self.elements_in_order().len()
    }

    /// Number of live nodes of any kind, attached or not.
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let node = Some(Node::new(kind));
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = node;
                NodeId::with_generation(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node,
                });
                NodeId::new(self.slots.len() - 1)
            }
        }
    }

    /// Releases a node and its subtree. The node must already be detached.
    fn release(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index())
                .filter(|slot| slot.generation == current.generation())
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index());
                pending.extend(node.children);
            }
        }
    }

    fn child_ids(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    fn element_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    fn is_element(&self, id: NodeId) -> bool {
        self.element_name(id).is_some()
    }

    /// Text content of a node and all its descendants, concatenated.
    /// CDATA sections count as text.
    pub fn text_content(&self, id: NodeId) -> String {
        let Some(node) = self.node(id) else {
            return String::new();
        };
        match &node.kind {
            NodeKind::Text(text) | NodeKind::Cdata(text) => text.clone(),
            NodeKind::Markup(_) => String::new(),
            NodeKind::Element { .. } => node
                .children
                .iter()
                .map(|&child| self.text_content(child))
                .collect(),
        }
    }

    /// Attached elements in document (pre-)order, starting at the root.
    fn elements_in_order(&self) -> Vec<NodeId> {
        let mut ordered = Vec::new();
        let mut stack = vec![self.root];
        while let Some(current) = stack.pop() {
            if !self.is_element(current) {
                continue;
            }
            ordered.push(current);
            stack.extend(self.child_ids(current).iter().rev().copied());
        }
        ordered
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).and_then(|node| node.parent) else {
            return;
        };
        if let Some(parent) = self.node_mut(parent) {
            parent.children.retain(|&child| child != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Makes `child` the child of `parent` at `position` (the end when
    /// `None`), detaching it from wherever it was.
    fn adopt(&mut self, parent: NodeId, child: NodeId, position: Option<usize>) {
        if self.node(parent).is_none() || self.node(child).is_none() || parent == child {
            debug!(parent:%, child:%; "Ignoring move of a stale node");
            return;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            let index = position.map_or(node.children.len(), |index| index.min(node.children.len()));
            node.children.insert(index, child);
        }
    }

    fn copy_subtree(&mut self, source: NodeId, deep: bool) -> Option<NodeId> {
        let node = self.node(source)?;
        let kind = node.kind.clone();
        let children = if deep { node.children.clone() } else { Vec::new() };

        let copy = self.push_node(kind);
        for child in children {
            if let Some(child_copy) = self.copy_subtree(child, true) {
                self.adopt(copy, child_copy, None);
            }
        }
        Some(copy)
    }
}

impl Surface for SvgDocument {
    fn select(&self, selector: &str) -> Vec<NodeId> {
        let selectors = query::parse_selector_list(selector);
        if selectors.is_empty() {
            return Vec::new();
        }

        self.elements_in_order()
            .into_iter()
            .filter(|&node| {
                selectors
                    .iter()
                    .any(|simple| simple.matches(self.tag_name(node), self.attribute(node, "id")))
            })
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements_in_order()
            .into_iter()
            .find(|&node| self.attribute(node, "id") == Some(id))
    }

    fn tag_name(&self, node: NodeId) -> &str {
        self.element_name(node).unwrap_or_default()
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        match self.node(node).map(|node| &node.kind) {
            Some(NodeKind::Element { attributes, .. }) => attributes
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(Node {
            kind: NodeKind::Element { attributes, .. },
            ..
        }) = self.node_mut(node)
        {
            attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(Node {
            kind: NodeKind::Element { attributes, .. },
            ..
        }) = self.node_mut(node)
        {
            attributes.shift_remove(name);
        }
    }

    fn bounding_box(&self, node: NodeId) -> Option<Bounds> {
        self.measure(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.child_ids(node)
            .iter()
            .copied()
            .filter(|&child| self.is_element(child))
            .collect()
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.node(current).and_then(|node| node.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn create_element(&mut self, name: &str) -> NodeId {
        self.push_node(NodeKind::Element {
            name: name.to_string(),
            attributes: IndexMap::new(),
        })
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.adopt(parent, child, None);
    }

    fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        let Some(parent) = self.parent(reference) else {
            debug!(reference:%; "Cannot insert next to a node without parent");
            return;
        };
        // Position is looked up after `node` leaves its old place
        self.detach(node);
        let position = self
            .child_ids(parent)
            .iter()
            .position(|&sibling| sibling == reference)
            .map(|index| index + 1);
        self.adopt(parent, node, position);
    }

    fn clone_node(&mut self, node: NodeId, deep: bool) -> NodeId {
        self.copy_subtree(node, deep).unwrap_or_else(|| {
            debug!(node:%; "Cloning a stale node");
            node
        })
    }

    fn remove(&mut self, node: NodeId) {
        if node == self.root {
            debug!("Refusing to remove the document root");
            return;
        }
        self.detach(node);
        self.release(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIAGRAM: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100">
  <defs>
    <marker id="arrow-black"><g id="arrow-group-black"><rect stroke-width="1"/><polygon fill="black"/></g></marker>
  </defs>
  <g id="viewport">
    <g id="eb5" transform="translate(10 20)">
      <rect x="0" y="0" width="80" height="25"/>
      <text x="40" y="15">GCN-2</text>
    </g>
    <path id="i1" d="M 10 10 L 90 60" marker-end="url(#arrow-black)"/>
  </g>
</svg>"##;

    fn diagram() -> SvgDocument {
        SvgDocument::parse(DIAGRAM).expect("fixture parses")
    }

    #[test]
    fn test_select_by_id_and_tag() {
        let doc = diagram();
        let eb5 = doc.select("#eb5");
        assert_eq!(eb5.len(), 1);
        assert_eq!(doc.tag_name(eb5[0]), "g");

        assert_eq!(doc.select("rect").len(), 2);
        assert!(doc.select("#missing").is_empty());
    }

    #[test]
    fn test_select_compound_is_document_ordered_and_deduplicated() {
        let doc = diagram();
        let nodes = doc.select("#i1, #eb5, #eb5");
        assert_eq!(nodes.len(), 2);
        assert_eq!(doc.attribute(nodes[0], "id"), Some("eb5"));
        assert_eq!(doc.attribute(nodes[1], "id"), Some("i1"));
    }

    #[test]
    fn test_select_unsupported_matches_nothing() {
        let doc = diagram();
        assert!(doc.select("").is_empty());
        assert!(doc.select("g > rect").is_empty());
    }

    #[test]
    fn test_insert_after_places_sibling() {
        let mut doc = diagram();
        let eb5 = doc.element_by_id("eb5").unwrap();
        let viewport = doc.element_by_id("viewport").unwrap();

        let copy = doc.clone_node(eb5, false);
        assert!(!doc.is_attached(copy));
        doc.insert_after(eb5, copy);

        assert!(doc.is_attached(copy));
        let children = doc.children(viewport);
        assert_eq!(children[0], eb5);
        assert_eq!(children[1], copy);
        assert_eq!(doc.parent(copy), Some(viewport));
    }

    #[test]
    fn test_shallow_clone_has_no_children() {
        let mut doc = diagram();
        let eb5 = doc.element_by_id("eb5").unwrap();
        let shallow = doc.clone_node(eb5, false);
        assert!(doc.children(shallow).is_empty());
        assert_eq!(doc.attribute(shallow, "transform"), Some("translate(10 20)"));
    }

    #[test]
    fn test_deep_clone_copies_subtree() {
        let mut doc = diagram();
        let marker = doc.element_by_id("arrow-black").unwrap();
        let copy = doc.clone_node(marker, true);

        let polygon = doc.first_descendant(copy, "polygon").unwrap();
        doc.set_attribute(polygon, "fill", "orange");

        // The original marker keeps its color
        let original_polygon = doc.first_descendant(marker, "polygon").unwrap();
        assert_eq!(doc.attribute(original_polygon, "fill"), Some("black"));
    }

    #[test]
    fn test_remove_detaches_subtree() {
        let mut doc = diagram();
        let eb5 = doc.element_by_id("eb5").unwrap();
        doc.remove(eb5);

        assert!(!doc.is_attached(eb5));
        assert!(doc.element_by_id("eb5").is_none());
        assert!(doc.select("text").is_empty());
        assert!(!doc.to_string().contains("GCN-2"));
    }

    #[test]
    fn test_removed_slots_are_reused() {
        let mut doc = SvgDocument::new("svg");
        let root = doc.root();
        for _ in 0..1000 {
            let rect = doc.create_element("rect");
            let title = doc.create_element("title");
            doc.append_child(rect, title);
            doc.append_child(root, rect);
            doc.remove(rect);
        }

        assert_eq!(doc.node_count(), 1);
        assert_eq!(doc.element_count(), 1);
    }

    #[test]
    fn test_stale_handle_does_not_alias_reused_slot() {
        let mut doc = diagram();
        let viewport = doc.element_by_id("viewport").unwrap();

        let outline = doc.create_element("rect");
        doc.append_child(viewport, outline);
        doc.remove(outline);

        let replacement = doc.create_element("rect");
        doc.set_attribute(replacement, "class", "fresh");
        doc.append_child(viewport, replacement);
        assert_eq!(replacement.index(), outline.index());
        assert_ne!(replacement, outline);

        // Operations through the old handle leave the new element alone
        doc.set_attribute(outline, "class", "stale");
        doc.remove(outline);
        assert!(!doc.is_attached(outline));
        assert_eq!(doc.attribute(outline, "class"), None);
        assert_eq!(doc.tag_name(outline), "");
        assert!(doc.is_attached(replacement));
        assert_eq!(doc.attribute(replacement, "class"), Some("fresh"));

        // Cloning or moving a stale handle has no effect
        assert_eq!(doc.clone_node(outline, true), outline);
        doc.append_child(viewport, outline);
        assert_eq!(doc.parent(outline), None);
    }

    #[test]
    fn test_remove_root_is_ignored() {
        let mut doc = diagram();
        let root = doc.root();
        doc.remove(root);
        assert!(doc.is_attached(root));
    }

    #[test]
    fn test_attributes_roundtrip_order() {
        let mut doc = SvgDocument::new("svg");
        let rect = doc.create_element("rect");
        doc.set_attribute(rect, "x", "1");
        doc.set_attribute(rect, "y", "2");
        doc.set_attribute(rect, "x", "3");
        doc.append_child(doc.root(), rect);

        assert_eq!(
            doc.attributes(rect),
            vec![
                ("x".to_string(), "3".to_string()),
                ("y".to_string(), "2".to_string())
            ]
        );

        doc.remove_attribute(rect, "x");
        assert_eq!(doc.attribute(rect, "x"), None);
        assert_eq!(doc.element_count(), 2);
    }

    #[test]
    fn test_text_content() {
        let doc = diagram();
        let text = doc.select_first("text").unwrap();
        assert_eq!(doc.text_content(text), "GCN-2");
    }
}
