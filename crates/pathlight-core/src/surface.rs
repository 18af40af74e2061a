//! The visual-tree capability the highlighter works against.
//!
//! A [`Surface`] is a rendered diagram: a tree of elements addressable by id
//! and by selector strings, whose elements can be measured, inspected,
//! created, cloned, moved and removed. [`SvgDocument`](crate::document::SvgDocument)
//! is the in-memory implementation shipped with this crate.
//!
//! # Selector Strings
//!
//! Implementations must understand at least:
//!
//! - `#id` - the element with that id
//! - `name` - every element with that tag name
//! - `a, b` - the union of several selectors, in document order, without
//!   duplicates

use std::fmt;

use crate::geometry::Bounds;

/// Handle to an element of a [`Surface`].
///
/// Removing an element invalidates its handle (and the handles of its
/// subtree). Surfaces may recycle the storage of removed elements, so a
/// handle also carries a generation: a stale handle never refers to the
/// element that took its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    /// Creates a first-generation handle from a surface-specific index.
    pub const fn new(index: usize) -> Self {
        Self::with_generation(index, 0)
    }

    pub const fn with_generation(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// The surface-specific index of this handle.
    pub const fn index(self) -> usize {
        self.index
    }

    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.index)?;
        if self.generation > 0 {
            write!(f, "@{}", self.generation)?;
        }
        Ok(())
    }
}

/// Query and mutation operations over a rendered diagram.
pub trait Surface {
    /// Returns every attached element matching `selector`, in document
    /// order. Unsupported selectors match nothing.
    fn select(&self, selector: &str) -> Vec<NodeId>;

    /// Returns the first attached element with the given id.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Returns the first attached element matching `selector`.
    fn select_first(&self, selector: &str) -> Option<NodeId> {
        self.select(selector).into_iter().next()
    }

    /// The tag name of an element.
    fn tag_name(&self, node: NodeId) -> &str;

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// All attributes of an element, in order.
    fn attributes(&self, node: NodeId) -> Vec<(String, String)>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn remove_attribute(&mut self, node: NodeId, name: &str);

    /// The bounding box of an element in its own user space (its own
    /// `transform` is not applied), or `None` when it cannot be measured.
    fn bounding_box(&self, node: NodeId) -> Option<Bounds>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Child elements, in order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Returns `true` while the element is part of the rendered tree.
    fn is_attached(&self, node: NodeId) -> bool;

    /// Creates a detached element.
    fn create_element(&mut self, name: &str) -> NodeId;

    /// Appends a detached element as the last child of `parent`.
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Inserts a detached element as the next sibling of `reference`.
    fn insert_after(&mut self, reference: NodeId, node: NodeId);

    /// Creates a detached copy of an element. A shallow copy has the same
    /// name and attributes but no children. Copying a stale handle yields
    /// a stale handle.
    fn clone_node(&mut self, node: NodeId, deep: bool) -> NodeId;

    /// Detaches an element and its subtree from the tree and releases them.
    ///
    /// Every handle into the removed subtree becomes stale: queries on it
    /// return nothing and mutations are ignored.
    fn remove(&mut self, node: NodeId);

    /// Returns the first descendant of `node` with the given tag name.
    fn first_descendant(&self, node: NodeId, name: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.children(node).into_iter().rev().collect();
        while let Some(current) = stack.pop() {
            if self.tag_name(current) == name {
                return Some(current);
            }
            stack.extend(self.children(current).into_iter().rev());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_generations_differ() {
        let first = NodeId::new(4);
        let reused = NodeId::with_generation(4, 1);
        assert_eq!(first.index(), reused.index());
        assert_ne!(first, reused);
        assert_eq!(first.to_string(), "node#4");
        assert_eq!(reused.to_string(), "node#4@1");
    }
}
