//! The immediate frame renderer.

use log::{debug, warn};

use easel_core::{
    config::RenderConfig,
    element::{Element, ElementKind, ElementMap, FileMap},
    geometry::{Bounds, Point, Size},
    identifier::Id,
    paint_order::{PaintItem, PaintOrder, resolve_paint_order},
    syntax::Tokenizer,
    theme::Palette,
    transform::{effective_opacity, link_handle_bounds, paint_transform},
};
use easel_syntax::SyntaxTokenizer;

use super::{
    AffordanceKind, IconCache, PaintError, Surface,
    elements::{DrawContext, draw_element, replay},
};
use crate::{
    backdrop::{axes_primitives, grid_primitives},
    error::RenderError,
    subrender::{Primitive, measure_sans},
};

/// Outcome of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Elements painted without error, bound labels included.
    pub painted: usize,
    /// Elements whose drawing failed and were skipped.
    pub failed: Vec<Id>,
}

/// Paints complete frames onto a [`Surface`].
///
/// The renderer keeps no element state between frames; its only memory is the
/// affordance [`IconCache`].
pub struct RasterRenderer {
    icons: IconCache,
    tokenizer: Box<dyn Tokenizer>,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self::with_tokenizer(Box::new(SyntaxTokenizer::new()))
    }

    /// Uses `tokenizer` to color code blocks.
    pub fn with_tokenizer(tokenizer: Box<dyn Tokenizer>) -> Self {
        Self {
            icons: IconCache::new(),
            tokenizer,
        }
    }

    pub fn icons(&self) -> &IconCache {
        &self.icons
    }

    /// Drops every cached icon bitmap.
    pub fn clear_caches(&mut self) {
        self.icons.clear();
    }

    /// Paints one full frame.
    ///
    /// Per-element failures are logged and skipped; the frame always completes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedElement`] before touching the surface
    /// when the scene contains an element kind this renderer cannot draw.
    pub fn render_frame<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        elements: &ElementMap,
        files: &FileMap,
        config: &RenderConfig,
    ) -> Result<FrameReport, RenderError> {
        let order = resolve_paint_order(elements, config);
        if let Some(item) = order
            .iter()
            .find(|item| matches!(item.element.kind(), ElementKind::Unsupported))
        {
            return Err(RenderError::UnsupportedElement {
                id: item.element.id(),
            });
        }

        let palette = Palette::for_theme(config.theme);
        let zoom = config.effective_zoom();
        let scroll = config.scroll();
        let visible = Bounds::new_from_top_left(
            Point::new(-scroll.x(), -scroll.y()),
            Size::new(f64::from(surface.width()) / zoom, f64::from(surface.height()) / zoom),
        );

        surface.clear(palette.background(config.view_background_color));
        surface.save();
        surface.scale(zoom, zoom);

        if config.grid.visible {
            let grid = grid_primitives(&config.grid, &palette, visible, zoom);
            paint_backdrop(surface, scroll, &grid);
        }
        if config.axes {
            let axes = axes_primitives(&config.grid, &palette, visible, zoom);
            paint_backdrop(surface, scroll, &axes);
        }

        let ctx = DrawContext {
            elements,
            files,
            config,
            palette: &palette,
            tokenizer: self.tokenizer.as_ref(),
            measure: &measure_sans,
        };
        let mut report = FrameReport::default();
        for item in order.iter() {
            paint_item(surface, item, &ctx, &mut report);
        }
        if !config.exporting {
            paint_link_icons(surface, &mut self.icons, &order, &ctx);
        }
        surface.restore();

        debug!(
            painted = report.painted,
            failed = report.failed.len(),
            zoom = zoom;
            "Frame rendered"
        );
        Ok(report)
    }
}

/// Draws the link affordance next to every linked element.
fn paint_link_icons<S: Surface + ?Sized>(
    surface: &mut S,
    icons: &mut IconCache,
    order: &PaintOrder<'_>,
    ctx: &DrawContext<'_>,
) {
    let zoom = ctx.config.effective_zoom();
    let scroll = ctx.config.scroll();
    for item in order.iter() {
        let element = item.element;
        if element.link().is_none() || element.is_embeddable() {
            continue;
        }
        let Some(icon) = icons.icon(AffordanceKind::Link, zoom, ctx.palette) else {
            continue;
        };
        let handle = link_handle_bounds(element, ctx.elements, zoom);
        let src = Bounds::new_from_top_left(
            Point::default(),
            Size::new(f64::from(icon.width()), f64::from(icon.height())),
        );

        surface.save();
        surface.translate(scroll.x(), scroll.y());
        surface.rotate(handle.angle.to_degrees(), handle.bounds.center());
        if let Err(err) = surface.draw_image(icon, src, handle.bounds) {
            warn!(element_id:% = element.id(), err:err; "Failed to draw link icon");
        }
        surface.restore();
    }
}

fn paint_backdrop<S: Surface + ?Sized>(surface: &mut S, scroll: Point, primitives: &[Primitive]) {
    surface.save();
    surface.translate(scroll.x(), scroll.y());
    if let Err(err) = replay(surface, primitives) {
        warn!(err:err; "Failed to paint grid");
    }
    surface.restore();
}

/// Paints an item and its bound label, isolating failures of each.
fn paint_item<S: Surface + ?Sized>(surface: &mut S, item: &PaintItem<'_>, ctx: &DrawContext<'_>, report: &mut FrameReport) {
    let frame = item.frame.filter(|_| item.clip);
    record(
        paint_element(surface, item.element, item.bound_text, frame, ctx),
        item.element,
        report,
    );
    if let Some(label) = item.bound_text {
        record(paint_element(surface, label, None, frame, ctx), label, report);
    }
}

fn record(result: Result<(), PaintError>, element: &Element, report: &mut FrameReport) {
    match result {
        Ok(()) => report.painted += 1,
        Err(err) => {
            warn!(
                element_id:% = element.id(),
                x = element.x(),
                y = element.y(),
                width = element.width(),
                height = element.height(),
                angle = element.angle(),
                err:err;
                "Failed to paint element"
            );
            report.failed.push(element.id());
        }
    }
}

/// Save, frame clip, paint transform, opacity, draw, restore.
fn paint_element<S: Surface + ?Sized>(
    surface: &mut S,
    element: &Element,
    bound_text: Option<&Element>,
    clip_frame: Option<&Element>,
    ctx: &DrawContext<'_>,
) -> Result<(), PaintError> {
    let scroll = ctx.config.scroll();
    surface.save();
    if let Some(frame) = clip_frame {
        let transform = paint_transform(frame, ctx.elements, scroll);
        let offset = transform.offset();
        surface.translate(offset.x(), offset.y());
        surface.rotate(transform.degrees(), transform.pivot());
        surface.clip_rect(frame.rect());
        surface.rotate(-transform.degrees(), transform.pivot());
        surface.translate(-offset.x(), -offset.y());
    }

    let transform = paint_transform(element, ctx.elements, scroll);
    let offset = transform.offset();
    surface.translate(offset.x(), offset.y());
    surface.rotate(transform.degrees(), transform.pivot());
    surface.multiply_alpha(effective_opacity(element, ctx.elements));

    let result = draw_element(surface, element, bound_text, ctx);
    surface.restore();
    result
}
