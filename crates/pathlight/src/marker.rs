//! Recoloring line-end markers for traced interaction lines.
//!
//! A traced line keeps its `marker-start`/`marker-mid`/`marker-end`
//! references, but the referenced markers are painted in the diagram's
//! colors. Each slot is pointed at a recolored copy of its marker whose id
//! ends in the highlight color instead, e.g. `arrow-black` becomes
//! `arrow-orange`. Copies are created once and shared by later overlays.

use log::{debug, trace};

use pathlight_core::{
    color::id_fragment,
    style::{STROKE_OPACITY, STROKE_WIDTH, StyleSet},
    surface::{NodeId, Surface},
    transform::parse_url_reference,
};

/// Marker attributes, in the order they are recolored.
pub const MARKER_SLOTS: [&str; 3] = ["marker-start", "marker-mid", "marker-end"];

/// Replaces the last dash-separated segment of `id` with the id-safe form of
/// `stroke`.
///
/// # Examples
///
/// ```
/// use pathlight::marker::derived_marker_id;
///
/// assert_eq!(derived_marker_id("mim-conversion-end-black", "orange"), "mim-conversion-end-orange");
/// assert_eq!(derived_marker_id("arrow-black", "#ff0000"), "arrow-ff0000");
/// assert_eq!(derived_marker_id("arrow", "red"), "-red");
/// ```
pub fn derived_marker_id(id: &str, stroke: &str) -> String {
    let base = id.rsplit_once('-').map_or("", |(base, _)| base);
    format!("{base}-{}", id_fragment(stroke))
}

/// Points every marker slot of `overlay` at a copy of its marker painted
/// with the `stroke` of `styles`.
///
/// Slots without a `url(#...)` value, or whose marker does not exist, are
/// left untouched.
pub fn recolor_markers<S: Surface + ?Sized>(surface: &mut S, overlay: NodeId, styles: &StyleSet) {
    let Some(stroke) = styles.stroke() else {
        return;
    };

    for slot in MARKER_SLOTS {
        let Some(marker_id) = surface
            .attribute(overlay, slot)
            .and_then(parse_url_reference)
            .map(str::to_string)
        else {
            continue;
        };

        let derived = derived_marker_id(&marker_id, stroke);
        if surface.element_by_id(&derived).is_none() {
            let Some(original) = surface.element_by_id(&marker_id) else {
                trace!(slot, marker_id; "Referenced marker not found");
                continue;
            };
            copy_marker(surface, original, &derived, stroke, styles);
        }

        surface.set_attribute(overlay, slot, &format!("url(#{derived})"));
    }
}

fn copy_marker<S: Surface + ?Sized>(
    surface: &mut S,
    original: NodeId,
    id: &str,
    stroke: &str,
    styles: &StyleSet,
) {
    debug!(id; "Creating recolored marker");

    let copy = surface.clone_node(original, true);
    surface.set_attribute(copy, "id", id);
    // Keep the arrow size independent of the wider stroke
    surface.set_attribute(copy, "markerUnits", "userSpaceOnUse");

    if let Some(group) = surface.first_descendant(copy, "g") {
        if let Some(group_id) = surface.attribute(group, "id").map(str::to_string) {
            surface.set_attribute(group, "id", &derived_marker_id(&group_id, stroke));
        }
    }

    if let Some(shape) = surface.first_descendant(copy, "polygon") {
        surface.set_attribute(shape, "fill", stroke);
        if let Some(opacity) = styles.get(STROKE_OPACITY) {
            surface.set_attribute(shape, "fill-opacity", opacity);
        }
    }

    if let (Some(rect), Some(width)) = (surface.first_descendant(copy, "rect"), styles.get(STROKE_WIDTH)) {
        surface.set_attribute(rect, "stroke-width", width);
    }

    match surface.select_first("defs") {
        Some(defs) => surface.append_child(defs, copy),
        None => surface.insert_after(original, copy),
    }
}

#[cfg(test)]
mod tests {
    use pathlight_core::document::SvgDocument;

    use super::*;

    const DIAGRAM: &str = r##"<svg>
  <defs>
    <marker id="arrow-black" markerUnits="strokeWidth">
      <g id="arrow-group-black"><rect stroke-width="1"/><polygon fill="black"/></g>
    </marker>
  </defs>
  <g id="viewport">
    <path id="line" d="M0 0L10 10" marker-start="none" marker-end="url(#arrow-black)" marker-mid="url(#ghost-black)"/>
  </g>
</svg>"##;

    fn styles(stroke: &str) -> StyleSet {
        StyleSet::highlight_default()
            .with("stroke", stroke)
            .with("stroke-opacity", "0.5")
    }

    #[test]
    fn test_recolor_creates_marker_copy() {
        let mut doc = SvgDocument::parse(DIAGRAM).unwrap();
        let line = doc.element_by_id("line").unwrap();

        recolor_markers(&mut doc, line, &styles("orange"));

        assert_eq!(doc.attribute(line, "marker-end"), Some("url(#arrow-orange)"));
        let copy = doc.element_by_id("arrow-orange").unwrap();
        assert_eq!(doc.attribute(copy, "markerUnits"), Some("userSpaceOnUse"));
        assert_eq!(doc.parent(copy), doc.select_first("defs"));

        assert!(doc.element_by_id("arrow-group-orange").is_some());
        let polygon = doc.first_descendant(copy, "polygon").unwrap();
        assert_eq!(doc.attribute(polygon, "fill"), Some("orange"));
        assert_eq!(doc.attribute(polygon, "fill-opacity"), Some("0.5"));
        let rect = doc.first_descendant(copy, "rect").unwrap();
        assert_eq!(doc.attribute(rect, "stroke-width"), Some("3px"));
    }

    #[test]
    fn test_recolor_leaves_original_marker() {
        let mut doc = SvgDocument::parse(DIAGRAM).unwrap();
        let line = doc.element_by_id("line").unwrap();
        recolor_markers(&mut doc, line, &styles("orange"));

        let original = doc.element_by_id("arrow-black").unwrap();
        assert_eq!(doc.attribute(original, "markerUnits"), Some("strokeWidth"));
        let polygon = doc.first_descendant(original, "polygon").unwrap();
        assert_eq!(doc.attribute(polygon, "fill"), Some("black"));
        assert!(doc.element_by_id("arrow-group-black").is_some());
    }

    #[test]
    fn test_recolor_reuses_existing_copy() {
        let mut doc = SvgDocument::parse(DIAGRAM).unwrap();
        let line = doc.element_by_id("line").unwrap();
        recolor_markers(&mut doc, line, &styles("orange"));
        let before = doc.element_count();

        let other = doc.clone_node(line, false);
        doc.insert_after(line, other);
        doc.set_attribute(other, "marker-end", "url(#arrow-black)");
        recolor_markers(&mut doc, other, &styles("orange"));

        // Only the clone itself was added
        assert_eq!(doc.element_count(), before + 1);
        assert_eq!(doc.select("marker").len(), 2);
    }

    #[test]
    fn test_recolor_skips_unresolvable_slots() {
        let mut doc = SvgDocument::parse(DIAGRAM).unwrap();
        let line = doc.element_by_id("line").unwrap();
        recolor_markers(&mut doc, line, &styles("orange"));

        assert_eq!(doc.attribute(line, "marker-start"), Some("none"));
        assert_eq!(doc.attribute(line, "marker-mid"), Some("url(#ghost-black)"));
    }

    #[test]
    fn test_recolor_without_defs_places_copy_next_to_marker() {
        let mut doc = SvgDocument::parse(
            r##"<svg><marker id="m-black"><polygon/></marker><path id="p" marker-end="url(#m-black)"/></svg>"##,
        )
        .unwrap();
        let path = doc.element_by_id("p").unwrap();
        recolor_markers(&mut doc, path, &styles("#00ff00"));

        let copy = doc.element_by_id("m-00ff00").unwrap();
        let root = doc.root();
        assert_eq!(doc.children(root)[1], copy);
    }
}
