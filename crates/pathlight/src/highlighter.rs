//! The highlighting engine.
//!
//! A [`Highlighter`] is created for one rendered diagram. It owns the
//! search index and the group table, and draws overlays on whatever
//! [`Surface`] the diagram was rendered to.
//!
//! # Groups
//!
//! Highlights are collected in named groups (`"default"` unless given).
//! Highlighting a node that already has an overlay from another group does
//! not draw a second one: the overlay is shared and repainted with the
//! latest styles. Clearing a group removes an overlay only once no other
//! group lists its node; attenuating a single node removes it from every
//! group at once.

use std::collections::HashMap;

use log::{debug, info, trace};

use pathlight_core::{
    semantic::{ElementKind, SemanticElement, SourceData},
    style::StyleSet,
    surface::{NodeId, Surface},
};

use crate::{
    config::HighlightConfig,
    groups::{GroupTable, Target},
    overlay::{self, Overlay},
    search::{SearchEntry, SearchIndex},
    selector::Selector,
};

/// Group used when none is named.
pub const DEFAULT_GROUP: &str = "default";

/// Highlighting state for one rendered diagram.
#[derive(Debug)]
pub struct Highlighter {
    elements: Vec<SemanticElement>,
    index: SearchIndex,
    /// Element id to the index of the last element carrying it
    ids: HashMap<String, usize>,
    groups: GroupTable,
    config: HighlightConfig,
}

impl Highlighter {
    /// Creates a highlighter for the diagram described by `source_data`.
    pub fn new(source_data: &SourceData, config: HighlightConfig) -> Self {
        let elements = source_data.elements().to_vec();
        let index = SearchIndex::build(&elements);
        let ids = elements
            .iter()
            .enumerate()
            .filter_map(|(position, element)| Some((element.id()?.to_string(), position)))
            .collect();

        info!(elements = elements.len(), searchable = index.len(); "Highlighter ready");
        Self {
            elements,
            index,
            ids,
            groups: GroupTable::new(),
            config,
        }
    }

    pub fn elements(&self) -> &[SemanticElement] {
        &self.elements
    }

    pub fn search_index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn groups(&self) -> &GroupTable {
        &self.groups
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Typeahead suggestions for `query`, up to the configured limit.
    pub fn suggest(&self, query: &str) -> Vec<&SearchEntry> {
        self.index.suggest(query, self.config.autocomplete_limit())
    }

    /// The semantic element rendered as `node`, looked up by the node's id.
    fn element_for<S: Surface + ?Sized>(&self, surface: &S, node: NodeId) -> Option<&SemanticElement> {
        let id = surface.attribute(node, "id")?;
        self.elements.get(*self.ids.get(id)?)
    }

    /// Highlights everything `selector` resolves to.
    ///
    /// `styles` only needs the properties it changes; the rest come from the
    /// configured defaults. Returns `true` when at least one target was
    /// found, even if it could not be drawn.
    pub fn highlight<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        selector: &str,
        group: Option<&str>,
        styles: Option<&StyleSet>,
    ) -> bool {
        let group = group.unwrap_or(DEFAULT_GROUP);
        let defaults = self.config.styles();
        let styles = styles.map_or_else(|| defaults.clone(), |styles| styles.merged_with(&defaults));

        let Some(targets) = self.resolve(surface, selector) else {
            debug!(selector, group; "Selector matched nothing");
            return false;
        };

        debug!(selector, group, targets = targets.len(); "Highlighting");
        for &target in &targets {
            self.highlight_target(surface, group, target, &styles);
        }
        !targets.is_empty()
    }

    /// Removes highlights from `group`.
    ///
    /// With a selector, each resolved node that is in `group` loses its
    /// overlay and leaves every group. Without one (or with an empty one),
    /// the whole group is cleared.
    pub fn attenuate<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        selector: Option<&str>,
        group: Option<&str>,
    ) {
        let group = group.unwrap_or(DEFAULT_GROUP);

        let Some(selector) = selector.filter(|selector| !selector.is_empty()) else {
            let removed = self.groups.clear_group(group);
            debug!(group, removed = removed.len(); "Group cleared");
            for overlay in removed {
                overlay.destroy(surface);
            }
            return;
        };

        let Some(targets) = self.resolve(surface, selector) else {
            return;
        };
        for target in targets {
            if !self.groups.contains(group, target) {
                continue;
            }
            if let Some(overlay) = self.groups.remove_target(target) {
                trace!(selector, group; "Overlay removed");
                overlay.destroy(surface);
            }
        }
    }

    /// Removes every overlay of every group.
    pub fn clear<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        for overlay in self.groups.drain() {
            overlay.destroy(surface);
        }
    }

    fn resolve<S: Surface + ?Sized>(&self, surface: &S, selector: &str) -> Option<Vec<Target>> {
        Selector::parse(selector)?.resolve(surface, &self.elements, &self.index)
    }

    fn highlight_target<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        group: &str,
        target: Target,
        styles: &StyleSet,
    ) {
        if self.groups.contains(group, target) {
            trace!(group; "Already highlighted in group");
            return;
        }

        if let Some(shared) = self.groups.overlay(target).cloned() {
            shared.restyle(surface, styles);
            self.groups.add_membership(group, target);
            return;
        }

        if let Some(overlay) = self.draw(surface, target, styles) {
            self.groups.insert(group, target, overlay);
        }
    }

    fn draw<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        target: Target,
        styles: &StyleSet,
    ) -> Option<Overlay> {
        match target {
            Target::Visual(node) => {
                let is_interaction = self
                    .element_for(surface, node)
                    .is_some_and(|element| element.kind() == &ElementKind::Interaction);
                if is_interaction {
                    Some(overlay::trace_line(surface, node, styles))
                } else {
                    overlay::outline_node(surface, node, styles)
                }
            }
            Target::Element(position) => {
                let bounds = self.elements.get(position)?.geometry()?;
                overlay::outline_bounds(surface, bounds, styles)
            }
        }
    }
}
