//! Conversion of shared layouts and paths into SVG nodes.

use svg::node::element as svg_element;

use easel_core::{apply_stroke, color::Color, path::PathData, stroke::StrokeDefinition};

use super::{SvgNode, document::DocumentDefs};
use crate::subrender::{Primitive, TextRun};

/// A filled path without stroke.
pub(super) fn fill_node(path: &PathData, color: Color) -> svg_element::Path {
    let mut node = svg_element::Path::new()
        .set("d", path.to_svg_d())
        .set("fill", color.to_hex())
        .set("stroke", "none");
    if color.alpha() < 1.0 {
        node = node.set("fill-opacity", color.alpha());
    }
    node
}

/// A stroked path without fill.
pub(super) fn stroke_node(path: &PathData, stroke: &StrokeDefinition) -> svg_element::Path {
    let node = svg_element::Path::new()
        .set("d", path.to_svg_d())
        .set("fill", "none");
    apply_stroke!(node, stroke)
}

/// A single text run; the run is the element's only child so `white-space: pre`
/// sees exactly its characters.
pub(super) fn text_node(run: &TextRun) -> svg_element::Text {
    let mut node = svg_element::Text::new(run.text.as_str())
        .set("x", run.origin.x())
        .set("y", run.origin.y())
        .set("font-family", run.typeface.css_family())
        .set("font-size", run.font_size)
        .set("fill", run.color.to_hex())
        .set("text-anchor", run.anchor.to_svg_value())
        .set("style", "white-space: pre");
    if run.color.alpha() < 1.0 {
        node = node.set("fill-opacity", run.color.alpha());
    }
    node
}

/// Converts `primitives` into nodes; clip regions become `<clipPath>`s in `defs`.
pub(super) fn primitive_nodes(primitives: &[Primitive], defs: &mut DocumentDefs) -> Vec<SvgNode> {
    primitives
        .iter()
        .filter_map(|primitive| -> Option<SvgNode> {
            match primitive {
                Primitive::Fill { path, .. } | Primitive::Stroke { path, .. } if path.is_empty() => None,
                Primitive::Fill { path, color } => Some(Box::new(fill_node(path, *color))),
                Primitive::Stroke { path, stroke } => Some(Box::new(stroke_node(path, stroke))),
                Primitive::Text(run) => Some(Box::new(text_node(run))),
                Primitive::Clip { bounds, children } => {
                    let id = defs.next_id("clip");
                    let rect = svg_element::Rectangle::new()
                        .set("x", bounds.min_x())
                        .set("y", bounds.min_y())
                        .set("width", bounds.width())
                        .set("height", bounds.height());
                    defs.add(svg_element::ClipPath::new().set("id", id.as_str()).add(rect));

                    let mut group = svg_element::Group::new().set("clip-path", format!("url(#{id})"));
                    for node in primitive_nodes(children, defs) {
                        group = group.add(node);
                    }
                    Some(Box::new(group))
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use easel_core::geometry::{Bounds, Point, Size};

    use super::*;

    fn color(hex: &str) -> Color {
        Color::new(hex).unwrap()
    }

    #[test]
    fn test_text_is_escaped_and_anchored() {
        let run = TextRun::new(Point::new(1.0, 2.0), "a < b & c", 12.0, color("#112233"))
            .with_anchor(crate::subrender::TextAnchor::Middle);
        let out = text_node(&run).to_string();
        assert!(out.contains("a &lt; b &amp; c"), "{out}");
        assert!(out.contains(r#"text-anchor="middle""#));
        assert!(out.contains(r##"fill="#112233""##));
    }

    #[test]
    fn test_text_content_has_no_padding() {
        let run = TextRun::new(Point::new(0.0, 19.5), "hi", 16.0, color("#000000"));
        let out = text_node(&run).to_string();
        assert!(out.ends_with(">hi</text>"), "{out}");

        let indented = TextRun::new(Point::default(), "    let x = 1;", 14.0, color("#000000"));
        let out = text_node(&indented).to_string();
        assert!(out.contains(">    let x = 1;</text>"), "{out}");
    }

    #[test]
    fn test_clip_primitive_defines_clip_path() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let primitives = vec![
            Primitive::fill(PathData::rect(bounds), color("#ff0000")),
            Primitive::Clip {
                bounds,
                children: vec![Primitive::Text(TextRun::new(Point::default(), "x", 10.0, color("#000000")))],
            },
        ];
        let mut defs = DocumentDefs::default();
        let nodes = primitive_nodes(&primitives, &mut defs);
        assert_eq!(nodes.len(), 2);
        assert!(nodes[1].to_string().contains(r#"clip-path="url(#clip-1)""#));
    }

    #[test]
    fn test_empty_paths_are_dropped() {
        let primitives = vec![Primitive::fill(PathData::new(), color("#ff0000"))];
        assert!(primitive_nodes(&primitives, &mut DocumentDefs::default()).is_empty());
    }

    #[test]
    fn test_translucent_fill_sets_opacity() {
        let bounds = Bounds::new_from_top_left(Point::default(), Size::new(1.0, 1.0));
        let out = fill_node(&PathData::rect(bounds), color("#ff0000").with_alpha(0.5)).to_string();
        assert!(out.contains("fill-opacity=\"0.5\""), "{out}");
    }
}
