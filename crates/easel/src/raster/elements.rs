//! Per-kind drawing routines.
//!
//! Every routine draws in document coordinates; the caller has already applied
//! the element's paint transform, frame clip and opacity.

use log::trace;

use easel_core::{
    config::{RenderConfig, Thumbnail},
    element::{Bitmap, Element, ElementKind, ElementMap, FileMap, FrameData, ImageData},
    embed::embed_placeholder_label,
    geometry::{Bounds, Point, Size},
    path::{PathData, shape_paths},
    stroke::{StrokeDefinition, StrokeStyle},
    syntax::Tokenizer,
    theme::Palette,
    transform::element_abs_coords,
};

use super::{PaintError, Surface};
use crate::subrender::{
    MeasureFn, Primitive, TextRun,
    code_block::layout_code_block,
    embed::{EmbedRendering, placeholder_primitives, resolve_embed},
    file_card::layout_file_card,
    label::layout_text,
    table::layout_table,
};

/// Margin around an arrow kept paintable when its label is cut out.
const LABEL_CLIP_MARGIN: f64 = 64.0;
/// Gap between an arrow stroke and its label.
const LABEL_GAP: f64 = 4.0;
const FRAME_NAME_FONT_SIZE: f64 = 14.0;
const FRAME_NAME_OFFSET: f64 = 6.0;
const DEFAULT_FRAME_NAME: &str = "Frame";

/// Read-only inputs shared by every drawing routine of one frame.
pub(super) struct DrawContext<'a> {
    pub elements: &'a ElementMap,
    pub files: &'a FileMap,
    pub config: &'a RenderConfig,
    pub palette: &'a Palette,
    pub tokenizer: &'a dyn Tokenizer,
    pub measure: MeasureFn<'a>,
}

/// Draws `element`; `bound_text` is its label, if any.
pub(super) fn draw_element<S: Surface + ?Sized>(
    surface: &mut S,
    element: &Element,
    bound_text: Option<&Element>,
    ctx: &DrawContext<'_>,
) -> Result<(), PaintError> {
    match element.kind() {
        ElementKind::Rectangle
        | ElementKind::Diamond
        | ElementKind::Ellipse
        | ElementKind::Line(_)
        | ElementKind::Freedraw(_) => draw_shape(surface, element, ctx),
        ElementKind::Arrow(_) => match bound_text {
            Some(label) => {
                let outer = element_abs_coords(element, ctx.elements)
                    .bounds()
                    .expand(LABEL_CLIP_MARGIN + element.stroke_width());
                let hole = element_abs_coords(label, ctx.elements).bounds().expand(LABEL_GAP);
                surface.clip_exclude(outer, hole);
                draw_shape(surface, element, ctx)
            }
            None => draw_shape(surface, element, ctx),
        },
        ElementKind::Text(_) => draw_text(surface, element, ctx),
        ElementKind::Image(data) => draw_image(surface, element, data, ctx),
        ElementKind::Frame(data) => draw_frame(surface, element, data, ctx),
        ElementKind::Embeddable => draw_embed(surface, element, ctx),
        ElementKind::Table(data) => replay(surface, &layout_table(element, data, ctx.palette)),
        ElementKind::Code(data) => replay(
            surface,
            &layout_code_block(element, data, ctx.tokenizer, ctx.palette),
        ),
        ElementKind::File(data) => replay(
            surface,
            &layout_file_card(element, data, ctx.palette, ctx.measure),
        ),
        // rejected before the frame starts
        ElementKind::Unsupported => Ok(()),
    }
}

/// Replays sub-renderer output onto `surface`.
pub(super) fn replay<S: Surface + ?Sized>(surface: &mut S, primitives: &[Primitive]) -> Result<(), PaintError> {
    for primitive in primitives {
        match primitive {
            Primitive::Fill { path, color } => surface.fill_path(path, *color)?,
            Primitive::Stroke { path, stroke } => surface.stroke_path(path, stroke)?,
            Primitive::Text(run) => surface.fill_text(run),
            Primitive::Clip { bounds, children } => {
                surface.save();
                surface.clip_rect(*bounds);
                let result = replay(surface, children);
                surface.restore();
                result?;
            }
        }
    }
    Ok(())
}

/// The element's stroke with its color mapped into the theme.
pub(super) fn themed_stroke(element: &Element, palette: &Palette) -> StrokeDefinition {
    element
        .stroke()
        .with_color(palette.element_color(element.stroke_color()))
}

fn draw_shape<S: Surface + ?Sized>(surface: &mut S, element: &Element, ctx: &DrawContext<'_>) -> Result<(), PaintError> {
    let Some(paths) = shape_paths(element)? else {
        return Ok(());
    };
    if paths.outline.is_empty() {
        return Err(PaintError::Path { id: element.id() });
    }

    let stroke = themed_stroke(element, ctx.palette);
    if let Some(fill) = &paths.fill {
        let background = ctx.palette.element_color(element.background_color());
        if !background.is_transparent() {
            surface.fill_path(fill, background)?;
        }
    }
    if !stroke.is_invisible() {
        surface.stroke_path(&paths.outline, &stroke)?;
    }

    let head_stroke = stroke.clone().with_style(StrokeStyle::Solid);
    for head in &paths.arrowheads {
        if head.filled {
            surface.fill_path(&head.path, stroke.color())?;
        } else {
            surface.stroke_path(&head.path, &head_stroke)?;
        }
    }
    Ok(())
}

/// Draws a text element, standalone or bound, at its resolved position.
pub(super) fn draw_text<S: Surface + ?Sized>(
    surface: &mut S,
    element: &Element,
    ctx: &DrawContext<'_>,
) -> Result<(), PaintError> {
    let Some(text) = element.text() else {
        return Ok(());
    };
    let bounds = element_abs_coords(element, ctx.elements).bounds();
    replay(surface, &layout_text(element, text, bounds, ctx.palette))
}

fn draw_image<S: Surface + ?Sized>(
    surface: &mut S,
    element: &Element,
    data: &ImageData,
    ctx: &DrawContext<'_>,
) -> Result<(), PaintError> {
    let bitmap = data
        .file_id
        .and_then(|id| ctx.files.get(&id))
        .and_then(|file| file.bitmap.as_ref());
    let Some(bitmap) = bitmap else {
        trace!(element_id:% = element.id(); "Image not loaded, skipping");
        return Ok(());
    };

    let src = match data.crop {
        Some(crop) if crop.natural_width > 0.0 && crop.natural_height > 0.0 => {
            let sx = f64::from(bitmap.width()) / crop.natural_width;
            let sy = f64::from(bitmap.height()) / crop.natural_height;
            Bounds::new_from_top_left(
                Point::new(crop.x * sx, crop.y * sy),
                Size::new(crop.width * sx, crop.height * sy),
            )
        }
        _ => full_bounds(bitmap),
    };
    let dst = element.rect();

    if !data.is_mirrored() {
        return surface.draw_image(bitmap, src, dst);
    }
    let center = dst.center();
    surface.save();
    surface.translate(center.x(), center.y());
    surface.scale(data.scale[0].signum(), data.scale[1].signum());
    surface.translate(-center.x(), -center.y());
    let result = surface.draw_image(bitmap, src, dst);
    surface.restore();
    result
}

fn full_bounds(bitmap: &Bitmap) -> Bounds {
    Bounds::new_from_top_left(
        Point::default(),
        Size::new(f64::from(bitmap.width()), f64::from(bitmap.height())),
    )
}

fn draw_frame<S: Surface + ?Sized>(
    surface: &mut S,
    element: &Element,
    data: &FrameData,
    ctx: &DrawContext<'_>,
) -> Result<(), PaintError> {
    let policy = &ctx.config.frame_rendering;
    if ctx.config.exporting || !policy.enabled {
        return Ok(());
    }
    let zoom = ctx.config.effective_zoom();
    if policy.outline {
        let outline = StrokeDefinition::hairline(ctx.palette.frame_outline, 1.0 / zoom);
        surface.stroke_path(&PathData::rect(element.rect()), &outline)?;
    }
    if policy.name {
        let name = data.name.as_deref().unwrap_or(DEFAULT_FRAME_NAME);
        let origin = Point::new(element.x(), element.y() - FRAME_NAME_OFFSET / zoom);
        surface.fill_text(&TextRun::new(
            origin,
            name,
            FRAME_NAME_FONT_SIZE / zoom,
            ctx.palette.frame_name,
        ));
    }
    Ok(())
}

fn draw_embed<S: Surface + ?Sized>(surface: &mut S, element: &Element, ctx: &DrawContext<'_>) -> Result<(), PaintError> {
    let rect = element.rect();
    match resolve_embed(element, ctx.config) {
        EmbedRendering::Anchor {
            thumbnail: Some(Thumbnail::Bitmap(bitmap)),
            ..
        } => surface.draw_image(bitmap, full_bounds(bitmap), rect)?,
        EmbedRendering::Anchor { label, .. } => {
            replay(surface, &placeholder_primitives(rect, &label, ctx.palette, ctx.measure))?;
        }
        // the host overlays the live frame; the canvas keeps its placeholder
        EmbedRendering::Live(_) => {
            let label = embed_placeholder_label(element.link(), true);
            replay(surface, &placeholder_primitives(rect, &label, ctx.palette, ctx.measure))?;
        }
    }
    let stroke = themed_stroke(element, ctx.palette);
    if !stroke.is_invisible() {
        surface.stroke_path(&PathData::rounded_rect(rect, element.corner_radius()), &stroke)?;
    }
    Ok(())
}
