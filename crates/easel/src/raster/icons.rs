//! Bitmaps for editor affordances, rasterized once per zoom level.

use std::collections::HashMap;

use log::debug;
use tiny_skia::{FillRule, LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

use easel_core::{
    color::Color, config::Theme, element::Bitmap, theme::Palette, transform::LINK_ICON_SIZE,
};

/// The kinds of affordance icon drawn over elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffordanceKind {
    /// Element carries an external link.
    Link,
}

type IconKey = (AffordanceKind, Theme);

/// Rasterized affordance icons, one per kind and theme.
///
/// Each entry remembers the zoom it was rasterized for and is replaced when a
/// frame asks for a different zoom, so continuous zooming never grows the cache.
#[derive(Debug, Default)]
pub struct IconCache {
    icons: HashMap<IconKey, (u64, Bitmap)>,
}

impl IconCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The icon of `kind` for `zoom`, rasterizing it when the cached one was
    /// made for another zoom.
    ///
    /// Returns `None` when the icon is too small to rasterize.
    pub fn icon(&mut self, kind: AffordanceKind, zoom: f64, palette: &Palette) -> Option<&Bitmap> {
        let key = (kind, palette.theme());
        let zoom_bits = zoom.to_bits();
        let stale = self.icons.get(&key).is_none_or(|(bits, _)| *bits != zoom_bits);
        if stale {
            let pixels = icon_pixels(zoom);
            debug!(pixels = pixels, zoom = zoom; "Rasterizing affordance icon");
            match rasterize(kind, pixels, palette) {
                Some(bitmap) => {
                    self.icons.insert(key, (zoom_bits, bitmap));
                }
                None => {
                    self.icons.remove(&key);
                    return None;
                }
            }
        }
        self.icons.get(&key).map(|(_, bitmap)| bitmap)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn clear(&mut self) {
        self.icons.clear();
    }
}

/// Icon edge length in device pixels.
fn icon_pixels(zoom: f64) -> u32 {
    let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
    (LINK_ICON_SIZE * zoom / zoom.max(1.0)).ceil().max(1.0) as u32
}

fn paint_for(color: Color) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn rasterize(kind: AffordanceKind, pixels: u32, palette: &Palette) -> Option<Bitmap> {
    let mut pixmap = Pixmap::new(pixels, pixels)?;
    let size = pixels as f32;
    let half = size / 2.0;

    let background = PathBuilder::from_circle(half, half, half)?;
    pixmap.fill_path(
        &background,
        &paint_for(palette.link_icon_background),
        FillRule::Winding,
        Transform::identity(),
        None,
    );

    match kind {
        AffordanceKind::Link => {
            // an arrow leaving the box towards the north-east
            let mut builder = PathBuilder::new();
            builder.move_to(size * 0.3, size * 0.7);
            builder.line_to(size * 0.7, size * 0.3);
            builder.move_to(size * 0.42, size * 0.3);
            builder.line_to(size * 0.7, size * 0.3);
            builder.line_to(size * 0.7, size * 0.58);
            let glyph = builder.finish()?;
            let stroke = Stroke {
                width: (size / 9.0).max(1.0),
                line_cap: LineCap::Round,
                ..Stroke::default()
            };
            pixmap.stroke_path(
                &glyph,
                &paint_for(palette.link_icon_foreground),
                &stroke,
                Transform::identity(),
                None,
            );
        }
    }

    Bitmap::new(pixels, pixels, pixmap.take())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icons_are_cached_per_zoom() {
        let palette = Palette::for_theme(Theme::Light);
        let mut cache = IconCache::new();
        let first = cache.icon(AffordanceKind::Link, 0.5, &palette).unwrap().clone();
        assert_eq!(cache.icon(AffordanceKind::Link, 0.5, &palette), Some(&first));
        assert_eq!(cache.len(), 1);

        let zoomed = cache.icon(AffordanceKind::Link, 1.0, &palette).unwrap();
        assert_ne!(zoomed.width(), first.width());
        assert_eq!(cache.len(), 1);

        cache.icon(AffordanceKind::Link, 1.0, &Palette::for_theme(Theme::Dark));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_continuous_zoom_keeps_one_entry() {
        let palette = Palette::for_theme(Theme::Light);
        let mut cache = IconCache::new();
        for step in 0..500 {
            let zoom = 1.0 + f64::from(step) * 0.01;
            assert!(cache.icon(AffordanceKind::Link, zoom, &palette).is_some());
            assert!(cache.len() <= 1);
        }
    }

    #[test]
    fn test_icon_keeps_screen_size_when_zoomed_in() {
        assert_eq!(icon_pixels(1.0), 14);
        assert_eq!(icon_pixels(4.0), 14);
        assert_eq!(icon_pixels(0.5), 7);
        assert_eq!(icon_pixels(f64::NAN), 14);
    }

    #[test]
    fn test_icon_has_painted_pixels() {
        let palette = Palette::for_theme(Theme::Dark);
        let mut cache = IconCache::new();
        let icon = cache.icon(AffordanceKind::Link, 1.0, &palette).unwrap();
        assert_eq!((icon.width(), icon.height()), (14, 14));
        assert!(icon.data().chunks(4).any(|px| px[3] == 255));
    }
}
