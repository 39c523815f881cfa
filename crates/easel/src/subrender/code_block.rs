//! Syntax-highlighted code cards.
//!
//! The card is laid out in document coordinates: an optional header with the
//! language label and a color dot, an optional line-number gutter, then the
//! token spans of every visible line. Visibility is decided in content space
//! (vertical scroll plus crop offset) so that scrolling and cropping compose.

use std::ops::Range;

use easel_core::{
    color::Color,
    element::{CodeData, Element},
    geometry::{Bounds, Point, Size},
    path::PathData,
    stroke::StrokeDefinition,
    syntax::{TokenPalette, Tokenizer, flatten_tokens, split_lines},
    theme::Palette,
};
use log::trace;

use super::{Primitive, TextAnchor, TextRun, Typeface, centered_baseline};

pub const CARD_RADIUS: f64 = 8.0;
pub const HEADER_HEIGHT: f64 = 32.0;
const DOT_SIZE: f64 = 8.0;
const PADDING: f64 = 12.0;
const HEADER_FONT_SIZE: f64 = 12.0;
const LINE_HEIGHT_FACTOR: f64 = 1.5;
const ADVANCE_FACTOR: f64 = 0.6;

/// Color of the header dot for `language`.
pub fn language_color(language: &str) -> Color {
    let [r, g, b] = match language.to_ascii_lowercase().as_str() {
        "rust" | "rs" => [0xde, 0xa5, 0x84],
        "javascript" | "js" | "jsx" => [0xf1, 0xe0, 0x5a],
        "typescript" | "ts" | "tsx" => [0x31, 0x78, 0xc6],
        "python" | "py" => [0x35, 0x72, 0xa5],
        "json" => [0x29, 0x29, 0x29],
        _ => [0x86, 0x8e, 0x96],
    };
    Color::from_rgba8(r, g, b, 255)
}

/// Geometry of a code card, independent of its content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodeBlockLayout {
    pub card: Bounds,
    pub header: Option<Bounds>,
    pub gutter: Option<Bounds>,
    /// Region the source text is clipped to.
    pub viewport: Bounds,
    pub line_height: f64,
    /// Horizontal distance between monospace cells.
    pub advance: f64,
    /// Top of the visible window in content space.
    pub scroll: f64,
    /// Horizontal crop offset.
    pub scroll_x: f64,
}

impl CodeBlockLayout {
    pub fn new(card: Bounds, data: &CodeData, line_count: usize) -> Self {
        let line_height = data.font_size * LINE_HEIGHT_FACTOR;
        let advance = data.font_size * ADVANCE_FACTOR;

        let header = data
            .show_header
            .then(|| Bounds::new_from_top_left(card.min_point(), Size::new(card.width(), HEADER_HEIGHT)));
        let body_top = header.map_or(card.min_y(), |h| h.max_y());
        let body = Bounds::from_corners(Point::new(card.min_x(), body_top), card.max_point());

        let gutter = data.show_line_numbers.then(|| {
            let width = gutter_width(line_count, advance);
            Bounds::from_corners(body.min_point(), Point::new(body.min_x() + width, body.max_y()))
        });
        let viewport_left = gutter.map_or(body.min_x(), |g| g.max_x());
        let viewport = Bounds::from_corners(Point::new(viewport_left, body.min_y()), body.max_point());

        let crop = data.content_crop.unwrap_or_default();
        Self {
            card,
            header,
            gutter,
            viewport,
            line_height,
            advance,
            scroll: data.scroll_top + crop.y,
            scroll_x: crop.x,
        }
    }

    /// Height of the visible text window.
    pub fn window_height(&self) -> f64 {
        (self.viewport.height() - PADDING).max(0.0)
    }

    /// Indices of lines intersecting the visible window.
    pub fn visible_lines(&self, line_count: usize) -> Range<usize> {
        let window_top = self.scroll;
        let window_bottom = self.scroll + self.window_height();
        let visible: Vec<usize> = (0..line_count)
            .filter(|i| {
                let top = *i as f64 * self.line_height;
                let bottom = top + self.line_height;
                top < window_bottom && bottom > window_top
            })
            .collect();
        match (visible.first(), visible.last()) {
            (Some(first), Some(last)) => *first..*last + 1,
            _ => 0..0,
        }
    }

    /// Top of line `index` in document coordinates.
    pub fn line_top(&self, index: usize) -> f64 {
        self.viewport.min_y() + PADDING + index as f64 * self.line_height - self.scroll
    }

    /// Left edge of column `column` in document coordinates.
    pub fn column_x(&self, column: usize) -> f64 {
        self.viewport.min_x() + PADDING - self.scroll_x + column as f64 * self.advance
    }
}

fn gutter_width(line_count: usize, advance: f64) -> f64 {
    let digits = line_count.max(1).to_string().len();
    digits as f64 * advance + 2.0 * PADDING
}

/// Lays out a code card for `element`.
pub fn layout_code_block(
    element: &Element,
    data: &CodeData,
    tokenizer: &dyn Tokenizer,
    palette: &Palette,
) -> Vec<Primitive> {
    let tokens = tokenizer.tokenize(&data.source, &data.language);
    let token_palette = TokenPalette::for_theme(palette.theme());
    let spans = flatten_tokens(&tokens, palette.code_text, &token_palette);
    let lines = split_lines(&spans);

    let layout = CodeBlockLayout::new(element.rect(), data, lines.len());
    let visible = layout.visible_lines(lines.len());
    trace!(
        element_id:% = element.id(),
        lines = lines.len(),
        first = visible.start,
        end = visible.end;
        "Laid out code block"
    );

    let mut out = vec![
        Primitive::fill(PathData::rounded_rect(layout.card, CARD_RADIUS), palette.code_card),
        Primitive::stroke(
            PathData::rounded_rect(layout.card, CARD_RADIUS),
            StrokeDefinition::hairline(palette.code_header, 1.0),
        ),
    ];

    if let Some(header) = layout.header {
        out.push(Primitive::fill(top_rounded_rect(header, CARD_RADIUS), palette.code_header));
        let dot_center = Point::new(header.min_x() + PADDING + DOT_SIZE / 2.0, header.center().y());
        out.push(Primitive::fill(
            PathData::circle(dot_center, DOT_SIZE / 2.0),
            language_color(&data.language),
        ));
        let label_origin = Point::new(
            dot_center.x() + DOT_SIZE,
            centered_baseline(header.min_y(), header.height(), HEADER_FONT_SIZE),
        );
        out.push(Primitive::Text(TextRun::new(
            label_origin,
            &data.language,
            HEADER_FONT_SIZE,
            palette.code_line_number,
        )));
    }

    if let Some(gutter) = layout.gutter {
        out.push(Primitive::fill(PathData::rect(gutter), palette.code_gutter));
        let numbers = visible
            .clone()
            .map(|i| {
                let origin = Point::new(
                    gutter.max_x() - PADDING,
                    centered_baseline(layout.line_top(i), layout.line_height, data.font_size),
                );
                Primitive::Text(
                    TextRun::new(origin, &(i + 1).to_string(), data.font_size, palette.code_line_number)
                        .with_typeface(Typeface::Mono)
                        .with_anchor(TextAnchor::End),
                )
            })
            .collect();
        out.push(Primitive::Clip {
            bounds: gutter,
            children: numbers,
        });
    }

    let mut code = Vec::new();
    for index in visible {
        let baseline = centered_baseline(layout.line_top(index), layout.line_height, data.font_size);
        let mut column = 0;
        for span in &lines[index] {
            code.push(Primitive::Text(
                TextRun::new(
                    Point::new(layout.column_x(column), baseline),
                    &span.text,
                    data.font_size,
                    span.color,
                )
                .with_typeface(Typeface::Mono),
            ));
            column += span.text.chars().count();
        }
    }
    out.push(Primitive::Clip {
        bounds: layout.viewport,
        children: code,
    });
    out
}

/// A rectangle whose top corners are rounded.
fn top_rounded_rect(bounds: Bounds, radius: f64) -> PathData {
    let r = radius.min(bounds.width() / 2.0).min(bounds.height()).max(0.0);
    let (x0, y0, x1, y1) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());
    let mut path = PathData::new();
    path.move_to(Point::new(x0, y1))
        .line_to(Point::new(x0, y0 + r))
        .quad_to(Point::new(x0, y0), Point::new(x0 + r, y0))
        .line_to(Point::new(x1 - r, y0))
        .quad_to(Point::new(x1, y0), Point::new(x1, y0 + r))
        .line_to(Point::new(x1, y1))
        .close();
    path
}
