//! Overlay shapes drawn on top of the rendered diagram.
//!
//! Two kinds of overlay exist:
//!
//! - **Outline**: a translucent `rect` appended to the `#viewport` group,
//!   covering a node's bounding box (grown by [`PADDING`]) or a semantic
//!   element's explicit geometry.
//! - **Trace**: a shallow copy of an interaction line, inserted right after
//!   the original with a wider, capped-opacity stroke and recolored markers.
//!
//! Every overlay carries `pointer-events: none` so it never swallows input
//! meant for the diagram underneath.

use log::trace;

use pathlight_core::{
    geometry::{Bounds, Insets},
    style::{FILL, STROKE_OPACITY, STROKE_WIDTH, StyleSet},
    surface::{NodeId, Surface},
    transform::{parse_length, parse_translate},
};

use crate::marker::{self, MARKER_SLOTS};

/// Space between a node's bounding box and its outline.
pub const PADDING: f32 = 2.5;

/// Highest stroke opacity a traced line is drawn with.
pub const TRACE_OPACITY_CAP: f32 = 0.5;

/// Class set on outline rectangles.
pub const OUTLINE_CLASS: &str = "highlighted-node";

/// Id of the group outlines are appended to.
pub const OUTLINE_LAYER_ID: &str = "viewport";

const POINTER_EVENTS_NONE: &str = "pointer-events: none";

/// How an overlay was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Outline,
    /// Copy of the interaction line `source`
    Trace { source: NodeId },
}

/// A shape created on the surface to show a highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    node: NodeId,
    kind: OverlayKind,
}

impl Overlay {
    pub fn new(node: NodeId, kind: OverlayKind) -> Self {
        Self { node, kind }
    }

    /// The overlay element on the surface.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    /// Repaints the overlay with another style set.
    pub fn restyle<S: Surface + ?Sized>(&self, surface: &mut S, styles: &StyleSet) {
        match self.kind {
            OverlayKind::Outline => {
                surface.set_attribute(self.node, "style", &style_attribute(styles, &[]));
            }
            OverlayKind::Trace { source } => paint_trace(surface, source, self.node, styles),
        }
    }

    /// Removes the overlay from the surface.
    pub fn destroy<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.remove(self.node);
    }
}

/// `<name>:<value>;...pointer-events: none`
fn style_attribute(styles: &StyleSet, except: &[&str]) -> String {
    format!("{}{POINTER_EVENTS_NONE}", styles.to_style_string(except))
}

fn outline_layer<S: Surface + ?Sized>(surface: &S) -> Option<NodeId> {
    surface
        .element_by_id(OUTLINE_LAYER_ID)
        .or_else(|| surface.select_first("svg"))
}

/// Draws an outline rectangle covering `bounds`.
///
/// Returns `None` when the surface has neither a `#viewport` group nor an
/// `svg` element to hold it.
pub fn outline_bounds<S: Surface + ?Sized>(
    surface: &mut S,
    bounds: Bounds,
    styles: &StyleSet,
) -> Option<Overlay> {
    let layer = outline_layer(surface)?;

    let rect = surface.create_element("rect");
    surface.set_attribute(rect, "x", &bounds.min_x().to_string());
    surface.set_attribute(rect, "y", &bounds.min_y().to_string());
    surface.set_attribute(rect, "width", &bounds.width().to_string());
    surface.set_attribute(rect, "height", &bounds.height().to_string());
    surface.set_attribute(rect, "class", OUTLINE_CLASS);
    surface.set_attribute(rect, "style", &style_attribute(styles, &[]));
    surface.append_child(layer, rect);

    Some(Overlay::new(rect, OverlayKind::Outline))
}

/// Draws an outline around a rendered node.
///
/// The node's bounding box is shifted by its own `translate(...)` and grown
/// by [`PADDING`] on every side. Nodes that cannot be measured get no
/// overlay.
pub fn outline_node<S: Surface + ?Sized>(
    surface: &mut S,
    node: NodeId,
    styles: &StyleSet,
) -> Option<Overlay> {
    let Some(bounds) = surface.bounding_box(node) else {
        trace!(node:%; "Node has no bounding box");
        return None;
    };
    let offset = surface
        .attribute(node, "transform")
        .map(parse_translate)
        .unwrap_or_default();

    let bounds = bounds
        .translate(offset)
        .add_padding(Insets::uniform(PADDING));
    outline_bounds(surface, bounds, styles)
}

/// Draws a wider copy of the interaction line `source` right after it.
pub fn trace_line<S: Surface + ?Sized>(
    surface: &mut S,
    source: NodeId,
    styles: &StyleSet,
) -> Overlay {
    let copy = surface.clone_node(source, false);
    surface.remove_attribute(copy, "id");
    paint_trace(surface, source, copy, styles);
    surface.insert_after(source, copy);

    Overlay::new(copy, OverlayKind::Trace { source })
}

/// The styles a trace of `source` is painted with: the stroke is widened by
/// the highlight width and its opacity capped.
fn trace_styles<S: Surface + ?Sized>(surface: &S, source: NodeId, styles: &StyleSet) -> StyleSet {
    let original_width = surface
        .attribute(source, STROKE_WIDTH)
        .and_then(parse_length)
        .unwrap_or(0.0);
    let width = original_width + styles.stroke_width().unwrap_or(0.0);
    let opacity = styles
        .stroke_opacity()
        .unwrap_or(1.0)
        .min(TRACE_OPACITY_CAP);

    styles
        .clone()
        .with(STROKE_WIDTH, format!("{width}px"))
        .with(STROKE_OPACITY, opacity.to_string())
}

fn paint_trace<S: Surface + ?Sized>(
    surface: &mut S,
    source: NodeId,
    copy: NodeId,
    styles: &StyleSet,
) {
    let styles = trace_styles(surface, source, styles);
    surface.set_attribute(copy, "style", &style_attribute(&styles, &[FILL]));

    // Markers are always derived from the source line's own markers
    for slot in MARKER_SLOTS {
        if let Some(value) = surface.attribute(source, slot).map(str::to_string) {
            surface.set_attribute(copy, slot, &value);
        }
    }
    marker::recolor_markers(surface, copy, &styles);
}
