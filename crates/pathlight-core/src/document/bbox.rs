//! Bounding boxes of SVG elements.
//!
//! Boxes are computed in the element's own user space: the element's own
//! `transform` is not applied, but a container unions its children each
//! shifted by the child's `translate(...)`. Path boxes include curve control
//! points, so they may be slightly larger than the painted curve. Text is
//! measured with an average glyph width rather than real font metrics.

use svgtypes::{PathParser, PathSegment, PointsParser};

use super::SvgDocument;
use crate::{
    geometry::{Bounds, Point, Size},
    surface::{NodeId, Surface},
    transform::{parse_length, parse_translate},
};

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH_RATIO: f32 = 0.6;
/// Distance from the top of a line box to the baseline, as a fraction of the
/// font size.
const ASCENT_RATIO: f32 = 0.8;
const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Elements that never paint by themselves.
const NON_RENDERING: &[&str] = &[
    "defs",
    "marker",
    "clipPath",
    "mask",
    "pattern",
    "symbol",
    "linearGradient",
    "radialGradient",
    "filter",
    "style",
    "script",
    "title",
    "desc",
    "metadata",
];

impl SvgDocument {
    fn number(&self, node: NodeId, name: &str) -> Option<f32> {
        self.attribute(node, name).and_then(parse_length)
    }

    fn number_or_zero(&self, node: NodeId, name: &str) -> f32 {
        self.number(node, name).unwrap_or(0.0)
    }

    pub(super) fn measure(&self, node: NodeId) -> Option<Bounds> {
        let name = self.element_name(node)?;
        match name {
            "rect" | "image" | "foreignObject" => Some(self.box_bounds(node)),
            "use" => {
                // Without an explicit size the referenced content decides
                self.number(node, "width")?;
                self.number(node, "height")?;
                Some(self.box_bounds(node))
            }
            "circle" => {
                let r = self.number_or_zero(node, "r");
                Some(self.ellipse_bounds(node, r, r))
            }
            "ellipse" => {
                let rx = self.number_or_zero(node, "rx");
                let ry = self.number_or_zero(node, "ry");
                Some(self.ellipse_bounds(node, rx, ry))
            }
            "line" => Some(Bounds::from_corners(
                Point::new(self.number_or_zero(node, "x1"), self.number_or_zero(node, "y1")),
                Point::new(self.number_or_zero(node, "x2"), self.number_or_zero(node, "y2")),
            )),
            "polyline" | "polygon" => points_bounds(self.attribute(node, "points")?),
            "path" => path_bounds(self.attribute(node, "d")?),
            "text" => self.text_bounds(node),
            name if NON_RENDERING.contains(&name) => None,
            _ => self.container_bounds(node),
        }
    }

    fn box_bounds(&self, node: NodeId) -> Bounds {
        Bounds::new_from_top_left(
            Point::new(self.number_or_zero(node, "x"), self.number_or_zero(node, "y")),
            Size::new(
                self.number_or_zero(node, "width"),
                self.number_or_zero(node, "height"),
            ),
        )
    }

    fn ellipse_bounds(&self, node: NodeId, rx: f32, ry: f32) -> Bounds {
        let center = Point::new(self.number_or_zero(node, "cx"), self.number_or_zero(node, "cy"));
        Bounds::from_corners(
            Point::new(center.x() - rx, center.y() - ry),
            Point::new(center.x() + rx, center.y() + ry),
        )
    }

    fn text_bounds(&self, node: NodeId) -> Option<Bounds> {
        let content = self.text_content(node);
        let content = content.trim();
        if content.is_empty() {
            return None;
        }

        let font_size = self.number(node, "font-size").unwrap_or(DEFAULT_FONT_SIZE);
        let width = content.chars().count() as f32 * font_size * GLYPH_WIDTH_RATIO;
        let x = self.number_or_zero(node, "x");
        let baseline = self.number_or_zero(node, "y");

        let left = match self.attribute(node, "text-anchor") {
            Some("middle") => x - width / 2.0,
            Some("end") => x - width,
            _ => x,
        };

        Some(Bounds::new_from_top_left(
            Point::new(left, baseline - font_size * ASCENT_RATIO),
            Size::new(width, font_size),
        ))
    }

    fn container_bounds(&self, node: NodeId) -> Option<Bounds> {
        self.children(node)
            .into_iter()
            .filter_map(|child| {
                let offset = self
                    .attribute(child, "transform")
                    .map(parse_translate)
                    .unwrap_or_default();
                self.measure(child).map(|bounds| bounds.translate(offset))
            })
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

fn points_bounds(points: &str) -> Option<Bounds> {
    Bounds::enclosing(PointsParser::from(points).map(|(x, y)| point(x, y)))
}

fn point(x: f64, y: f64) -> Point {
    Point::new(x as f32, y as f32)
}

/// Bounds of the end points and control points of every segment.
fn path_bounds(d: &str) -> Option<Bounds> {
    let mut points = Vec::new();
    let mut current = (0.0_f64, 0.0_f64);
    let mut subpath_start = current;

    let resolve = |abs: bool, from: (f64, f64), x: f64, y: f64| {
        if abs { (x, y) } else { (from.0 + x, from.1 + y) }
    };

    for segment in PathParser::from(d).flatten() {
        match segment {
            PathSegment::MoveTo { abs, x, y } => {
                current = resolve(abs, current, x, y);
                subpath_start = current;
            }
            PathSegment::LineTo { abs, x, y } | PathSegment::SmoothQuadratic { abs, x, y } => {
                current = resolve(abs, current, x, y);
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                current.0 = if abs { x } else { current.0 + x };
            }
            PathSegment::VerticalLineTo { abs, y } => {
                current.1 = if abs { y } else { current.1 + y };
            }
            PathSegment::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                points.push(resolve(abs, current, x1, y1));
                points.push(resolve(abs, current, x2, y2));
                current = resolve(abs, current, x, y);
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                points.push(resolve(abs, current, x2, y2));
                current = resolve(abs, current, x, y);
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                points.push(resolve(abs, current, x1, y1));
                current = resolve(abs, current, x, y);
            }
            PathSegment::EllipticalArc { abs, x, y, .. } => {
                current = resolve(abs, current, x, y);
            }
            PathSegment::ClosePath { .. } => {
                current = subpath_start;
            }
        }
        points.push(current);
    }

    Bounds::enclosing(points.into_iter().map(|(x, y)| point(x, y)))
}
