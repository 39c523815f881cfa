//! File cards: a document stub with a colored type badge and the file name.

use easel_core::{
    color::Color,
    element::{Element, FileCardData},
    geometry::{Bounds, Point, Size},
    path::PathData,
    stroke::StrokeDefinition,
    text::truncate_with_ellipsis,
    theme::Palette,
};

use super::{MeasureFn, Primitive, TextAnchor, TextRun, centered_baseline};

pub const CARD_RADIUS: f64 = 8.0;
const PADDING: f64 = 12.0;
const GAP: f64 = 8.0;
const BADGE_HEIGHT: f64 = 20.0;
const BADGE_MIN_WIDTH: f64 = 32.0;
const BADGE_TEXT_PADDING: f64 = 12.0;
const BADGE_RADIUS: f64 = 4.0;
const BADGE_FONT_SIZE: f64 = 11.0;
const NAME_FONT_SIZE: f64 = 14.0;
const DEFAULT_LABEL: &str = "FILE";

/// Lower-cased extension of `file_name`, if it has one.
///
/// # Examples
///
/// ```
/// use easel::subrender::file_card::file_extension;
///
/// assert_eq!(file_extension("Report.PDF").as_deref(), Some("pdf"));
/// assert_eq!(file_extension(".env"), None);
/// assert_eq!(file_extension("Makefile"), None);
/// ```
pub fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then(|| ext.to_ascii_lowercase())
}

/// Badge color for a lower-cased extension.
pub fn badge_color(extension: Option<&str>) -> Color {
    let [r, g, b] = match extension {
        Some("pdf") => [0xe0, 0x31, 0x31],
        Some("doc" | "docx") => [0x19, 0x71, 0xc2],
        Some("xls" | "xlsx" | "csv") => [0x2f, 0x9e, 0x44],
        Some("ppt" | "pptx") => [0xe8, 0x59, 0x0c],
        Some("zip" | "rar" | "7z") => [0x86, 0x8e, 0x96],
        Some("txt" | "md") => [0x49, 0x50, 0x57],
        Some("png" | "jpg" | "jpeg" | "gif" | "svg" | "webp") => [0xae, 0x3e, 0xc9],
        Some("json" | "js" | "ts" | "rs" | "py") => [0xf0, 0x8c, 0x00],
        _ => [0x70, 0x48, 0xe8],
    };
    Color::from_rgba8(r, g, b, 255)
}

/// Lays out a file card inside the element box.
pub fn layout_file_card(element: &Element, data: &FileCardData, palette: &Palette, measure: MeasureFn) -> Vec<Primitive> {
    let rect = element.rect();
    let extension = file_extension(&data.file_name);
    let label = extension
        .as_deref()
        .map(str::to_uppercase)
        .unwrap_or_else(|| DEFAULT_LABEL.to_string());

    let badge_width = (measure(&label, BADGE_FONT_SIZE) + BADGE_TEXT_PADDING).max(BADGE_MIN_WIDTH);
    let badge = Bounds::new_from_top_left(
        Point::new(rect.min_x() + PADDING, rect.center().y() - BADGE_HEIGHT / 2.0),
        Size::new(badge_width, BADGE_HEIGHT),
    );

    let card = PathData::rounded_rect(rect, CARD_RADIUS);
    let mut out = vec![
        Primitive::fill(card.clone(), palette.element_color(palette.file_card_background)),
        Primitive::stroke(card, StrokeDefinition::hairline(palette.file_card_border, 1.0)),
        Primitive::fill(
            PathData::rounded_rect(badge, BADGE_RADIUS),
            palette.element_color(badge_color(extension.as_deref())),
        ),
        Primitive::Text(
            TextRun::new(
                Point::new(badge.center().x(), centered_baseline(badge.min_y(), BADGE_HEIGHT, BADGE_FONT_SIZE)),
                &label,
                BADGE_FONT_SIZE,
                palette.badge_text,
            )
            .with_anchor(TextAnchor::Middle),
        ),
    ];

    let name_x = badge.max_x() + GAP;
    let available = rect.max_x() - PADDING - name_x;
    let name = truncate_with_ellipsis(&data.file_name, available, |s| measure(s, NAME_FONT_SIZE));
    if !name.is_empty() {
        out.push(Primitive::Text(TextRun::new(
            Point::new(name_x, centered_baseline(rect.min_y(), rect.height(), NAME_FONT_SIZE)),
            &name,
            NAME_FONT_SIZE,
            palette.file_card_text,
        )));
    }
    out
}
