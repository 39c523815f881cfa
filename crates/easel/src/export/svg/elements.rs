//! Per-element nodes.
//!
//! An element becomes a group carrying its paint transform and opacity. A
//! bound label is grouped with its container, the element's link wraps that
//! group in an anchor, and a clipping frame wraps the result last, so
//! multi-node elements are always clipped as one unit.

use log::{trace, warn};
use svg::node::element as svg_element;
use url::Url;

use easel_core::{
    element::{Element, ElementKind},
    embed::normalize_link,
    paint_order::PaintItem,
    path::{PathData, shape_paths},
    stroke::StrokeStyle,
    theme::Palette,
    transform::{effective_opacity, element_abs_coords, paint_transform},
};

use super::{
    ElementError, Svg, SvgNode,
    document::{DocumentDefs, ExportContext},
    embed::embed_node,
    primitives::{fill_node, primitive_nodes, stroke_node},
    symbols::image_node,
};
use crate::subrender::{
    code_block::layout_code_block, file_card::layout_file_card, label::layout_text,
    table::layout_table,
};

/// Margin around an arrow kept visible when its label is masked out.
const LABEL_MASK_MARGIN: f64 = 64.0;
/// Gap between an arrow stroke and its label.
const LABEL_GAP: f64 = 4.0;

impl Svg {
    /// Renders one paint item: the element, its bound label, link and frame clip.
    ///
    /// Failures of the element and of its label are reported separately; what
    /// could be rendered is still returned.
    pub(super) fn render_item<'a>(
        &self,
        item: &PaintItem<'a>,
        ctx: &ExportContext<'_>,
        defs: &mut DocumentDefs,
    ) -> (Option<SvgNode>, Vec<(&'a Element, ElementError)>) {
        let mut errors = Vec::new();
        let element = item.element;

        let mut nodes = Vec::new();
        match self.element_group(element, ctx, defs) {
            Ok(Some(group)) => {
                let masked = match item.bound_text {
                    Some(label) if element.is_arrow() => {
                        let mask_id = label_mask(element, label, ctx, defs);
                        group.set("mask", format!("url(#{mask_id})"))
                    }
                    _ => group,
                };
                nodes.push(masked);
            }
            Ok(None) => {}
            Err(err) => errors.push((element, err)),
        }
        if let Some(label) = item.bound_text {
            match self.element_group(label, ctx, defs) {
                Ok(Some(group)) => nodes.push(group),
                Ok(None) => {}
                Err(err) => errors.push((label, err)),
            }
        }

        let mut node: SvgNode = match nodes.len() {
            0 => return (None, errors),
            1 => Box::new(nodes.remove(0)),
            _ => {
                let mut group = svg_element::Group::new();
                for node in nodes {
                    group = group.add(node);
                }
                Box::new(group)
            }
        };

        if let Some(link) = element.link().filter(|_| !element.is_embeddable()) {
            node = wrap_link(element, link, node);
        }
        if let Some(frame) = item.frame.filter(|_| item.clip) {
            let clip_id = defs.frame_clip_id(frame, ctx);
            node = Box::new(
                svg_element::Group::new()
                    .set("clip-path", format!("url(#{clip_id})"))
                    .add(node),
            );
        }
        (Some(node), errors)
    }

    /// The transformed group of one element, or `None` if it draws nothing.
    fn element_group(
        &self,
        element: &Element,
        ctx: &ExportContext<'_>,
        defs: &mut DocumentDefs,
    ) -> Result<Option<svg_element::Group>, ElementError> {
        let content = self.element_content(element, ctx, defs)?;
        if content.is_empty() {
            return Ok(None);
        }

        let transform = paint_transform(element, ctx.elements, ctx.offset);
        let mut group = svg_element::Group::new().set("transform", transform.to_string());
        let opacity = effective_opacity(element, ctx.elements);
        if opacity < 1.0 {
            group = group.set("opacity", opacity);
        }
        for node in content {
            group = group.add(node);
        }
        Ok(Some(group))
    }

    /// Nodes of `element` in document coordinates.
    fn element_content(
        &self,
        element: &Element,
        ctx: &ExportContext<'_>,
        defs: &mut DocumentDefs,
    ) -> Result<Vec<SvgNode>, ElementError> {
        let nodes = match element.kind() {
            ElementKind::Rectangle
            | ElementKind::Diamond
            | ElementKind::Ellipse
            | ElementKind::Line(_)
            | ElementKind::Arrow(_)
            | ElementKind::Freedraw(_) => shape_nodes(element, ctx.palette)?,
            ElementKind::Text(text) => {
                let bounds = element_abs_coords(element, ctx.elements).bounds();
                primitive_nodes(&layout_text(element, text, bounds, ctx.palette), defs)
            }
            ElementKind::Image(data) => {
                image_node(element, data, ctx, defs, self.export.reuse_images())
                    .into_iter()
                    .collect()
            }
            // frame chrome is editor-only; members are clipped by their own nodes
            ElementKind::Frame(_) => Vec::new(),
            ElementKind::Embeddable => {
                let mut nodes = vec![embed_node(element, ctx, defs)];
                let stroke = element
                    .stroke()
                    .with_color(ctx.palette.element_color(element.stroke_color()));
                if !stroke.is_invisible() {
                    let outline = PathData::rounded_rect(element.rect(), element.corner_radius());
                    nodes.push(Box::new(stroke_node(&outline, &stroke)));
                }
                nodes
            }
            ElementKind::Table(data) => primitive_nodes(&layout_table(element, data, ctx.palette), defs),
            ElementKind::Code(data) => primitive_nodes(
                &layout_code_block(element, data, self.tokenizer.as_ref(), ctx.palette),
                defs,
            ),
            ElementKind::File(data) => primitive_nodes(
                &layout_file_card(element, data, ctx.palette, ctx.measure),
                defs,
            ),
            // rejected before the document is built
            ElementKind::Unsupported => Vec::new(),
        };
        Ok(nodes)
    }
}

/// Background and stroke sub-shapes plus arrowheads.
fn shape_nodes(element: &Element, palette: &Palette) -> Result<Vec<SvgNode>, ElementError> {
    let Some(paths) = shape_paths(element)? else {
        return Ok(Vec::new());
    };
    if paths.outline.is_empty() {
        return Err(ElementError::Path { id: element.id() });
    }

    let stroke = element
        .stroke()
        .with_color(palette.element_color(element.stroke_color()));
    let mut nodes: Vec<SvgNode> = Vec::new();
    if let Some(fill) = &paths.fill {
        let background = palette.element_color(element.background_color());
        if !background.is_transparent() {
            nodes.push(Box::new(fill_node(fill, background)));
        }
    }
    if !stroke.is_invisible() {
        nodes.push(Box::new(stroke_node(&paths.outline, &stroke)));
    }

    let head_stroke = stroke.clone().with_style(StrokeStyle::Solid);
    for head in &paths.arrowheads {
        if head.filled {
            nodes.push(Box::new(fill_node(&head.path, stroke.color())));
        } else {
            nodes.push(Box::new(stroke_node(&head.path, &head_stroke)));
        }
    }
    Ok(nodes)
}

/// Defines a mask hiding the arrow stroke under its label.
fn label_mask(arrow: &Element, label: &Element, ctx: &ExportContext<'_>, defs: &mut DocumentDefs) -> String {
    let outer = element_abs_coords(arrow, ctx.elements)
        .bounds()
        .expand(LABEL_MASK_MARGIN + arrow.stroke_width());
    let hole = element_abs_coords(label, ctx.elements)
        .bounds()
        .expand(LABEL_GAP);
    let rect = |bounds: easel_core::geometry::Bounds, fill: &str| {
        svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("fill", fill)
    };

    let id = defs.next_id(&format!("mask-{}", arrow.id().to_svg_id()));
    defs.add(
        svg_element::Mask::new()
            .set("id", id.as_str())
            .set("maskUnits", "userSpaceOnUse")
            .add(rect(outer, "#ffffff"))
            .add(rect(hole, "#000000")),
    );
    trace!(element_id:% = arrow.id(), mask = id; "Masked arrow label");
    id
}

/// Wraps `node` in an anchor, or returns it unchanged if `link` is not a URL.
fn wrap_link(element: &Element, link: &str, node: SvgNode) -> SvgNode {
    let link = normalize_link(link);
    match Url::parse(&link) {
        Ok(url) => Box::new(svg_element::Anchor::new().set("href", url.as_str()).add(node)),
        Err(err) => {
            warn!(element_id:% = element.id(), link = link, err:err; "Ignoring malformed element link");
            node
        }
    }
}
