//! Highlight group bookkeeping.
//!
//! A [`GroupTable`] maps group names to ordered sets of [`Target`]s and keeps
//! one overlay per target, shared by every group that lists the target. The
//! table only does bookkeeping: it hands back overlays that are no longer
//! referenced and the caller removes them from the surface.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use pathlight_core::surface::NodeId;

use crate::overlay::Overlay;

/// A resolved highlight subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// An element of the rendered surface.
    Visual(NodeId),
    /// A semantic element (by index) highlighted from its explicit geometry.
    Element(usize),
}

/// Group memberships and the overlays they share.
#[derive(Debug, Default)]
pub struct GroupTable {
    groups: IndexMap<String, IndexSet<Target>>,
    overlays: HashMap<Target, Overlay>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `target` is a member of `group`.
    pub fn contains(&self, group: &str, target: Target) -> bool {
        self.groups
            .get(group)
            .is_some_and(|members| members.contains(&target))
    }

    /// The overlay of `target`, whichever group it was created for.
    pub fn overlay(&self, target: Target) -> Option<&Overlay> {
        self.overlays.get(&target)
    }

    /// Records a new overlay for `target` and makes it a member of `group`.
    pub fn insert(&mut self, group: &str, target: Target, overlay: Overlay) {
        self.overlays.insert(target, overlay);
        self.add_membership(group, target);
    }

    /// Makes `target` a member of `group`, reusing its existing overlay.
    ///
    /// Returns `false` when it already was a member.
    pub fn add_membership(&mut self, group: &str, target: Target) -> bool {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(target)
    }

    /// Members of `group` in insertion order.
    pub fn members(&self, group: &str) -> Vec<Target> {
        self.groups
            .get(group)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Names of the groups that have ever been used, in creation order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of live overlays.
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Removes `target` from every group and returns its overlay.
    pub fn remove_target(&mut self, target: Target) -> Option<Overlay> {
        for members in self.groups.values_mut() {
            members.shift_remove(&target);
        }
        self.overlays.remove(&target)
    }

    /// Empties `group` and returns the overlays that no other group still
    /// references, in membership order.
    pub fn clear_group(&mut self, group: &str) -> Vec<Overlay> {
        let Some(members) = self.groups.get_mut(group) else {
            return Vec::new();
        };
        let cleared = std::mem::take(members);

        cleared
            .into_iter()
            .filter(|target| !self.groups.values().any(|members| members.contains(target)))
            .filter_map(|target| self.overlays.remove(&target))
            .collect()
    }

    /// Forgets every group and returns every overlay.
    pub fn drain(&mut self) -> Vec<Overlay> {
        self.groups.clear();
        self.overlays.drain().map(|(_, overlay)| overlay).collect()
    }
}
