//! Document assembly.

use std::collections::HashSet;

use log::{debug, warn};
use svg::node::element as svg_element;

use easel_core::{
    config::RenderConfig,
    element::{Element, ElementKind, ElementMap, FileMap},
    geometry::{Bounds, Point, Size},
    identifier::Id,
    paint_order::resolve_paint_order,
    theme::Palette,
    transform::{common_bounds, fmt_num, paint_transform},
};

use super::{Svg, SvgNode, primitives::primitive_nodes, symbols::SymbolTable};
use crate::{backdrop::grid_primitives, error::RenderError, scene::Scene, subrender::MeasureFn};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Read-only inputs shared while rendering one document.
pub(super) struct ExportContext<'a> {
    pub elements: &'a ElementMap,
    pub files: &'a FileMap,
    pub config: &'a RenderConfig,
    pub palette: &'a Palette,
    /// Translation from document to SVG user space.
    pub offset: Point,
    pub measure: MeasureFn<'a>,
}

/// Everything that ends up in the document's `<defs>`.
#[derive(Default)]
pub(super) struct DocumentDefs {
    nodes: Vec<SvgNode>,
    frame_clips: HashSet<Id>,
    pub symbols: SymbolTable,
    next_id: usize,
}

impl DocumentDefs {
    /// A fresh definition id, unique within the document.
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    pub fn add(&mut self, node: impl Into<SvgNode>) {
        self.nodes.push(node.into());
    }

    /// Id of the clip path for `frame`, defining it on first use.
    ///
    /// The clip rectangle carries the frame's own transform, so it rotates
    /// with the frame regardless of how the clipped element is rotated.
    pub fn frame_clip_id(&mut self, frame: &Element, ctx: &ExportContext<'_>) -> String {
        let id = format!("frame-clip-{}", frame.id().to_svg_id());
        if self.frame_clips.insert(frame.id()) {
            let rect = frame.rect();
            let clip_rect = svg_element::Rectangle::new()
                .set("x", rect.min_x())
                .set("y", rect.min_y())
                .set("width", rect.width())
                .set("height", rect.height())
                .set(
                    "transform",
                    paint_transform(frame, ctx.elements, ctx.offset).to_string(),
                );
            self.add(svg_element::ClipPath::new().set("id", id.as_str()).add(clip_rect));
        }
        id
    }

    fn into_definitions(self) -> svg_element::Definitions {
        let mut defs = svg_element::Definitions::new();
        for symbol in self.symbols.into_symbols() {
            defs = defs.add(symbol);
        }
        for node in self.nodes {
            defs = defs.add(node);
        }
        defs
    }
}

impl Svg {
    /// Renders the complete scene into an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedElement`] before building anything if
    /// the scene holds an element kind this backend cannot draw.
    pub fn render_document(&self, scene: &Scene) -> Result<svg::Document, RenderError> {
        let config = scene.render_config(&self.render);
        let elements = scene.elements();
        let order = resolve_paint_order(elements, &config);
        if let Some(item) = order
            .iter()
            .find(|item| matches!(item.element.kind(), ElementKind::Unsupported))
        {
            return Err(RenderError::UnsupportedElement {
                id: item.element.id(),
            });
        }

        let palette = Palette::for_theme(config.theme);
        let padding = self.export.padding();
        let painted = order
            .iter()
            .flat_map(|item| std::iter::once(item.element).chain(item.bound_text));
        let content = common_bounds(painted, elements).unwrap_or_default();
        let offset = Point::new(padding - content.min_x(), padding - content.min_y());
        let size = Size::new(
            content.width() + 2.0 * padding,
            content.height() + 2.0 * padding,
        );

        let doc = svg::Document::new()
            .set("xmlns", SVG_NS)
            .set("xmlns:xlink", XLINK_NS)
            .set(
                "viewBox",
                format!("0 0 {} {}", fmt_num(size.width()), fmt_num(size.height())),
            )
            .set("width", size.width())
            .set("height", size.height());

        let ctx = ExportContext {
            elements,
            files: scene.files(),
            config: &config,
            palette: &palette,
            offset,
            measure: &crate::subrender::measure_sans,
        };
        let mut defs = DocumentDefs::default();
        let mut body: Vec<SvgNode> = Vec::new();

        if self.export.background() {
            body.push(Box::new(self.background(size, &ctx)));
        }
        if self.export.include_grid() {
            let visible = content.expand(padding);
            body.push(Box::new(self.export_grid(visible, &ctx, &mut defs)));
        }

        let mut failed = 0;
        for item in order.iter() {
            let (node, errors) = self.render_item(item, &ctx, &mut defs);
            for (element, err) in errors {
                warn!(
                    element_id:% = element.id(),
                    x = element.x(),
                    y = element.y(),
                    width = element.width(),
                    height = element.height(),
                    angle = element.angle(),
                    err:err;
                    "Failed to export element"
                );
                failed += 1;
            }
            body.extend(node);
        }

        debug!(
            nodes = body.len(),
            failed = failed,
            symbols = defs.symbols.len();
            "SVG document assembled"
        );

        let mut doc = doc.add(defs.into_definitions());
        for node in body {
            doc = doc.add(node);
        }
        Ok(doc)
    }

    fn background(&self, size: Size, ctx: &ExportContext<'_>) -> svg_element::Rectangle {
        let color = ctx.palette.background(ctx.config.view_background_color);
        svg_element::Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", size.width())
            .set("height", size.height())
            .set("fill", color.to_hex())
            .set("fill-opacity", color.alpha())
    }

    /// The grid at zoom 1, laid out with the same steps as the live canvas.
    fn export_grid(&self, visible: Bounds, ctx: &ExportContext<'_>, defs: &mut DocumentDefs) -> svg_element::Group {
        let mut grid = ctx.config.grid.clone();
        grid.visible = true;
        let mut group = svg_element::Group::new().set(
            "transform",
            format!("translate({} {})", fmt_num(ctx.offset.x()), fmt_num(ctx.offset.y())),
        );
        for node in primitive_nodes(&grid_primitives(&grid, ctx.palette, visible, 1.0), defs) {
            group = group.add(node);
        }
        group
    }
}
