//! tiny-skia implementation of [`Surface`].

use cosmic_text::{Buffer, Metrics, Shaping, SwashCache};
use tiny_skia::{
    FillRule, FilterQuality, LineCap, LineJoin, Mask, Paint, Path, PathBuilder, Pattern, Pixmap,
    PixmapRef, Rect, SpreadMode, Stroke, StrokeDash, Transform,
};

use easel_core::{
    color::Color,
    element::Bitmap,
    geometry::{Bounds, Point},
    path::{PathCommand, PathData},
    stroke::{StrokeCap, StrokeDefinition, StrokeJoin},
    text::with_font_system,
};

use super::{PaintError, Surface};
use crate::{
    error::RenderError,
    subrender::{TextAnchor, TextRun},
};

/// Extra line spacing used only to position glyphs vertically.
const TEXT_LINE_FACTOR: f32 = 1.2;

#[derive(Clone)]
struct State {
    transform: Transform,
    mask: Option<Mask>,
    alpha: f32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            mask: None,
            alpha: 1.0,
        }
    }
}

/// Paints into an owned [`Pixmap`].
pub struct PixmapSurface {
    pixmap: Pixmap,
    state: State,
    stack: Vec<State>,
    swash_cache: SwashCache,
}

impl PixmapSurface {
    /// Allocates a transparent surface.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] for a zero or oversized surface.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| RenderError::Surface(format!("cannot allocate a {width}x{height} surface")))?;
        Ok(Self {
            pixmap,
            state: State::default(),
            stack: Vec::new(),
            swash_cache: SwashCache::new(),
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Encodes the current pixels as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        self.pixmap
            .encode_png()
            .map_err(|err| RenderError::Surface(err.to_string()))
    }

    fn paint(&self, color: Color) -> Paint<'static> {
        let [r, g, b, a] = color.to_rgba8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, scale_alpha(a, self.state.alpha));
        paint.anti_alias = true;
        paint
    }

    fn clip_with(&mut self, path: &Path, rule: FillRule) {
        let transform = self.state.transform;
        match self.state.mask.as_mut() {
            Some(mask) => mask.intersect_path(path, rule, true, transform),
            None => {
                if let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) {
                    mask.fill_path(path, rule, true, transform);
                    self.state.mask = Some(mask);
                }
            }
        }
    }
}

fn scale_alpha(alpha: u8, factor: f32) -> u8 {
    (f32::from(alpha) * factor.clamp(0.0, 1.0)).round() as u8
}

/// Converts shared path data to a tiny-skia path.
///
/// Returns `None` for an empty or degenerate path.
pub(crate) fn to_skia_path(path: &PathData) -> Option<Path> {
    let mut builder = PathBuilder::new();
    for command in path.commands() {
        match *command {
            PathCommand::MoveTo(p) => builder.move_to(p.x() as f32, p.y() as f32),
            PathCommand::LineTo(p) => builder.line_to(p.x() as f32, p.y() as f32),
            PathCommand::QuadTo(c, p) => builder.quad_to(c.x() as f32, c.y() as f32, p.x() as f32, p.y() as f32),
            PathCommand::CubicTo(c1, c2, p) => builder.cubic_to(
                c1.x() as f32,
                c1.y() as f32,
                c2.x() as f32,
                c2.y() as f32,
                p.x() as f32,
                p.y() as f32,
            ),
            PathCommand::Close => builder.close(),
        }
    }
    builder.finish()
}

fn to_skia_rect(bounds: Bounds) -> Option<Rect> {
    Rect::from_xywh(
        bounds.min_x() as f32,
        bounds.min_y() as f32,
        bounds.width() as f32,
        bounds.height() as f32,
    )
}

fn to_skia_stroke(definition: &StrokeDefinition) -> Stroke {
    Stroke {
        width: definition.width() as f32,
        line_cap: match definition.cap() {
            StrokeCap::Butt => LineCap::Butt,
            StrokeCap::Round => LineCap::Round,
            StrokeCap::Square => LineCap::Square,
        },
        line_join: match definition.join() {
            StrokeJoin::Miter => LineJoin::Miter,
            StrokeJoin::Round => LineJoin::Round,
            StrokeJoin::Bevel => LineJoin::Bevel,
        },
        dash: definition
            .dash_array()
            .and_then(|[dash, gap]| StrokeDash::new(vec![dash as f32, gap as f32], 0.0)),
        ..Stroke::default()
    }
}

impl Surface for PixmapSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform.pre_translate(dx as f32, dy as f32);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform = self.state.transform.pre_scale(sx as f32, sy as f32);
    }

    fn rotate(&mut self, degrees: f64, pivot: Point) {
        let rotation = Transform::from_rotate_at(degrees as f32, pivot.x() as f32, pivot.y() as f32);
        self.state.transform = self.state.transform.pre_concat(rotation);
    }

    fn multiply_alpha(&mut self, alpha: f64) {
        self.state.alpha *= alpha.clamp(0.0, 1.0) as f32;
    }

    fn clip_rect(&mut self, bounds: Bounds) {
        match to_skia_rect(bounds) {
            Some(rect) => self.clip_with(&PathBuilder::from_rect(rect), FillRule::Winding),
            // an empty clip hides everything
            None => self.state.alpha = 0.0,
        }
    }

    fn clip_exclude(&mut self, outer: Bounds, hole: Bounds) {
        let mut builder = PathBuilder::new();
        if let Some(rect) = to_skia_rect(outer) {
            builder.push_rect(rect);
        }
        if let Some(rect) = to_skia_rect(hole) {
            builder.push_rect(rect);
        }
        if let Some(path) = builder.finish() {
            self.clip_with(&path, FillRule::EvenOdd);
        }
    }

    fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color.to_rgba8();
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    fn fill_path(&mut self, path: &PathData, color: Color) -> Result<(), PaintError> {
        let Some(path) = to_skia_path(path) else {
            return Ok(());
        };
        let paint = self.paint(color);
        self.pixmap.fill_path(
            &path,
            &paint,
            FillRule::Winding,
            self.state.transform,
            self.state.mask.as_ref(),
        );
        Ok(())
    }

    fn stroke_path(&mut self, path: &PathData, stroke: &StrokeDefinition) -> Result<(), PaintError> {
        let Some(path) = to_skia_path(path) else {
            return Ok(());
        };
        let paint = self.paint(stroke.color());
        self.pixmap.stroke_path(
            &path,
            &paint,
            &to_skia_stroke(stroke),
            self.state.transform,
            self.state.mask.as_ref(),
        );
        Ok(())
    }

    fn fill_text(&mut self, run: &TextRun) {
        if run.text.is_empty() || run.font_size <= 0.0 {
            return;
        }
        let size = run.font_size as f32;
        let metrics = Metrics::new(size, size * TEXT_LINE_FACTOR);
        let [r, g, b, a] = run.color.to_rgba8();
        let text_color = cosmic_text::Color::rgba(r, g, b, a);

        let Self {
            pixmap,
            state,
            swash_cache,
            ..
        } = self;

        with_font_system(|font_system| {
            let mut buffer = Buffer::new(font_system, metrics);
            let (width, baseline) = {
                let mut buffer = buffer.borrow_with(font_system);
                buffer.set_size(None, None);
                buffer.set_text(&run.text, &run.typeface.font_kind().attrs(), Shaping::Advanced, None);
                buffer.shape_until_scroll(true);
                let width = buffer
                    .layout_runs()
                    .filter_map(|line| line.glyphs.last().map(|g| g.x + g.w))
                    .fold(0.0f32, f32::max);
                let baseline = buffer.layout_runs().next().map_or(size, |line| line.line_y);
                (width, baseline)
            };

            let left = match run.anchor {
                TextAnchor::Start => run.origin.x() as f32,
                TextAnchor::Middle => run.origin.x() as f32 - width / 2.0,
                TextAnchor::End => run.origin.x() as f32 - width,
            };
            let top = run.origin.y() as f32 - baseline;

            buffer.draw(font_system, swash_cache, text_color, |x, y, w, h, color| {
                let Some(rect) = Rect::from_xywh(left + x as f32, top + y as f32, w as f32, h as f32) else {
                    return;
                };
                let mut paint = Paint::default();
                paint.set_color_rgba8(color.r(), color.g(), color.b(), scale_alpha(color.a(), state.alpha));
                pixmap.fill_rect(rect, &paint, state.transform, state.mask.as_ref());
            });
        });
    }

    fn draw_image(&mut self, bitmap: &Bitmap, src: Bounds, dst: Bounds) -> Result<(), PaintError> {
        if src.width() <= 0.0 || src.height() <= 0.0 {
            return Err(PaintError::Image(format!(
                "empty source region {}x{}",
                src.width(),
                src.height()
            )));
        }
        let source = PixmapRef::from_bytes(bitmap.data(), bitmap.width(), bitmap.height())
            .ok_or_else(|| PaintError::Image("bitmap buffer does not match its size".to_string()))?;
        let Some(rect) = to_skia_rect(dst) else {
            return Ok(());
        };

        let sx = dst.width() / src.width();
        let sy = dst.height() / src.height();
        let placement = Transform::from_row(
            sx as f32,
            0.0,
            0.0,
            sy as f32,
            (dst.min_x() - src.min_x() * sx) as f32,
            (dst.min_y() - src.min_y() * sy) as f32,
        );
        let paint = Paint {
            shader: Pattern::new(
                source,
                SpreadMode::Pad,
                FilterQuality::Bilinear,
                self.state.alpha,
                placement,
            ),
            anti_alias: true,
            ..Paint::default()
        };
        self.pixmap
            .fill_rect(rect, &paint, self.state.transform, self.state.mask.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use easel_core::geometry::Size;

    use super::*;

    fn pixel(surface: &PixmapSurface, x: u32, y: u32) -> [u8; 4] {
        let color = surface.pixmap().pixel(x, y).unwrap();
        [color.red(), color.green(), color.blue(), color.alpha()]
    }

    fn square(x: f64, y: f64, side: f64) -> Bounds {
        Bounds::new_from_top_left(Point::new(x, y), Size::new(side, side))
    }

    #[test]
    fn test_zero_sized_surface_is_an_error() {
        assert!(matches!(PixmapSurface::new(0, 10), Err(RenderError::Surface(_))));
    }

    #[test]
    fn test_fill_respects_transform() {
        let mut surface = PixmapSurface::new(20, 20).unwrap();
        surface.translate(10.0, 0.0);
        surface
            .fill_path(&PathData::rect(square(0.0, 0.0, 5.0)), Color::new("#ff0000").unwrap())
            .unwrap();
        assert_eq!(pixel(&surface, 12, 2), [255, 0, 0, 255]);
        assert_eq!(pixel(&surface, 2, 2)[3], 0);
    }

    #[test]
    fn test_clip_and_restore() {
        let mut surface = PixmapSurface::new(20, 20).unwrap();
        let red = Color::new("#ff0000").unwrap();
        surface.save();
        surface.clip_rect(square(0.0, 0.0, 10.0));
        surface.fill_path(&PathData::rect(square(0.0, 0.0, 20.0)), red).unwrap();
        surface.restore();
        assert_eq!(pixel(&surface, 5, 5)[3], 255);
        assert_eq!(pixel(&surface, 15, 15)[3], 0);

        surface.fill_path(&PathData::rect(square(0.0, 0.0, 20.0)), red).unwrap();
        assert_eq!(pixel(&surface, 15, 15)[3], 255);
    }

    #[test]
    fn test_clip_exclude_leaves_hole() {
        let mut surface = PixmapSurface::new(20, 20).unwrap();
        surface.clip_exclude(square(0.0, 0.0, 20.0), square(5.0, 5.0, 10.0));
        surface
            .fill_path(&PathData::rect(square(0.0, 0.0, 20.0)), Color::new("#000000").unwrap())
            .unwrap();
        assert_eq!(pixel(&surface, 1, 1)[3], 255);
        assert_eq!(pixel(&surface, 10, 10)[3], 0);
    }

    #[test]
    fn test_alpha_multiplies() {
        let mut surface = PixmapSurface::new(4, 4).unwrap();
        surface.multiply_alpha(0.5);
        surface
            .fill_path(&PathData::rect(square(0.0, 0.0, 4.0)), Color::new("#000000").unwrap())
            .unwrap();
        let alpha = pixel(&surface, 1, 1)[3];
        assert!((126..=129).contains(&alpha), "alpha = {alpha}");
    }

    #[test]
    fn test_draw_image_maps_source_region() {
        // 2x1 bitmap: red, blue
        let data = vec![255, 0, 0, 255, 0, 0, 255, 255];
        let bitmap = Bitmap::new(2, 1, data).unwrap();
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        let src = Bounds::new_from_top_left(Point::new(1.0, 0.0), Size::new(1.0, 1.0));
        surface.draw_image(&bitmap, src, square(0.0, 0.0, 10.0)).unwrap();
        let [r, _, b, a] = pixel(&surface, 5, 5);
        assert!(r < 8 && b > 247 && a > 247, "got {r} {b} {a}");
    }

    #[test]
    fn test_png_encoding() {
        let mut surface = PixmapSurface::new(3, 3).unwrap();
        surface.clear(Color::new("#ffffff").unwrap());
        let png = surface.encode_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
