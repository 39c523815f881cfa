//! Line layout of text elements.

use easel_core::{
    element::{Element, TextAlign, TextData, VerticalAlign},
    geometry::{Bounds, Point},
    theme::Palette,
};

use super::{Primitive, TextAnchor, TextRun, Typeface, centered_baseline};

/// Lays out `text` inside `bounds`, one [`TextRun`] per source line.
///
/// `bounds` is the text box in document coordinates; for bound labels the
/// caller passes the resolved position rather than the stored one.
pub fn layout_text(element: &Element, text: &TextData, bounds: Bounds, palette: &Palette) -> Vec<Primitive> {
    let advance = text.line_advance();
    let lines: Vec<&str> = text.text.split('\n').map(|l| l.trim_end_matches('\r')).collect();
    let block_height = advance * lines.len() as f64;

    let top = match text.vertical_align {
        VerticalAlign::Top => bounds.min_y(),
        VerticalAlign::Middle => bounds.min_y() + (bounds.height() - block_height) / 2.0,
        VerticalAlign::Bottom => bounds.max_y() - block_height,
    };
    let (x, anchor) = match text.text_align {
        TextAlign::Left => (bounds.min_x(), TextAnchor::Start),
        TextAlign::Center => (bounds.center().x(), TextAnchor::Middle),
        TextAlign::Right => (bounds.max_x(), TextAnchor::End),
    };

    let color = palette.element_color(element.stroke_color());
    let typeface = Typeface::Named(text.font_family.css_family());
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(i, line)| {
            let line_top = top + advance * i as f64;
            let origin = Point::new(x, centered_baseline(line_top, advance, text.font_size));
            Primitive::Text(
                TextRun::new(origin, line, text.font_size, color)
                    .with_typeface(typeface.clone())
                    .with_anchor(anchor),
            )
        })
        .collect()
}
