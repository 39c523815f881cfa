//! Spreadsheet-like tables.
//!
//! Cell text size follows the row height so a resized table keeps its
//! proportions in both the live view and the export.

use easel_core::{
    element::{Element, TableData},
    geometry::{Bounds, Point, Size},
    path::PathData,
    stroke::StrokeDefinition,
    theme::Palette,
};

use super::{Primitive, TextRun, centered_baseline};

const CELL_PADDING: f64 = 8.0;
const MIN_FONT_SIZE: f64 = 12.0;
const MAX_FONT_SIZE: f64 = 72.0;
const FONT_TO_ROW: f64 = 0.44;

/// Cell font size for a row of `row_height`.
///
/// # Examples
///
/// ```
/// use easel::subrender::table::cell_font_size;
///
/// assert_eq!(cell_font_size(10.0), 12.0);
/// assert_eq!(cell_font_size(50.0), 22.0);
/// assert_eq!(cell_font_size(500.0), 72.0);
/// ```
pub fn cell_font_size(row_height: f64) -> f64 {
    (row_height * FONT_TO_ROW).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Widths of each column, summing to `total_width`.
///
/// Stored widths are scaled proportionally; a missing, mismatched or
/// non-positive list falls back to equal columns.
pub fn column_widths(data: &TableData, columns: usize, total_width: f64) -> Vec<f64> {
    if columns == 0 {
        return Vec::new();
    }
    if let Some(stored) = &data.column_widths {
        let sum: f64 = stored.iter().sum();
        if stored.len() == columns && sum > 0.0 && stored.iter().all(|w| w.is_finite() && *w >= 0.0) {
            return stored.iter().map(|w| w / sum * total_width).collect();
        }
    }
    vec![total_width / columns as f64; columns]
}

/// Lays out `data` inside the element box.
pub fn layout_table(element: &Element, data: &TableData, palette: &Palette) -> Vec<Primitive> {
    let rect = element.rect();
    let rows = data.cells.len();
    let columns = data.cells.iter().map(Vec::len).max().unwrap_or(0);
    if rows == 0 || columns == 0 {
        return vec![Primitive::stroke(
            PathData::rect(rect),
            StrokeDefinition::hairline(palette.table_grid, 1.0),
        )];
    }

    let row_height = rect.height() / rows as f64;
    let widths = column_widths(data, columns, rect.width());
    let mut edges = Vec::with_capacity(columns + 1);
    edges.push(rect.min_x());
    for width in &widths {
        let last = edges.last().copied().unwrap_or(rect.min_x());
        edges.push(last + width);
    }

    let grid = StrokeDefinition::hairline(palette.table_grid, 1.0);
    let mut out = Vec::new();

    if data.header_row {
        let header = Bounds::new_from_top_left(rect.min_point(), Size::new(rect.width(), row_height));
        out.push(Primitive::fill(PathData::rect(header), palette.table_header));
    }

    // internal lines only; the border is stroked once below
    let mut lines = PathData::new();
    for row in 1..rows {
        let y = rect.min_y() + row as f64 * row_height;
        lines.move_to(Point::new(rect.min_x(), y)).line_to(Point::new(rect.max_x(), y));
    }
    for x in &edges[1..columns] {
        lines.move_to(Point::new(*x, rect.min_y())).line_to(Point::new(*x, rect.max_y()));
    }
    if !lines.is_empty() {
        out.push(Primitive::stroke(lines, grid.clone()));
    }
    out.push(Primitive::stroke(PathData::rect(rect), grid));

    let font_size = cell_font_size(row_height);
    for (r, row) in data.cells.iter().enumerate() {
        let top = rect.min_y() + r as f64 * row_height;
        for (c, text) in row.iter().enumerate().filter(|(_, t)| !t.is_empty()) {
            let cell = Bounds::from_corners(Point::new(edges[c], top), Point::new(edges[c + 1], top + row_height));
            let origin = Point::new(cell.min_x() + CELL_PADDING, centered_baseline(top, row_height, font_size));
            out.push(Primitive::Clip {
                bounds: cell,
                children: vec![Primitive::Text(TextRun::new(origin, text, font_size, palette.table_text))],
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use easel_core::{config::Theme, element::ElementKind};
    use float_cmp::assert_approx_eq;

    use super::*;

    fn table(cells: &[&[&str]], header_row: bool) -> (Element, TableData) {
        let data = TableData {
            cells: cells.iter().map(|r| r.iter().map(|s| s.to_string()).collect()).collect(),
            column_widths: None,
            header_row,
        };
        let element = Element::new("t", ElementKind::Table(data.clone()), 10.0, 20.0, 200.0, 100.0);
        (element, data)
    }

    #[test]
    fn test_font_size_follows_row_height() {
        let (element, data) = table(&[&["a", "b"], &["c", "d"]], false);
        let out = layout_table(&element, &data, &Palette::for_theme(Theme::Light));
        let runs: Vec<&TextRun> = out.iter().flat_map(Primitive::text_runs).collect();
        assert_eq!(runs.len(), 4);
        assert!(runs.iter().all(|r| r.font_size == 22.0));
        assert_approx_eq!(f64, runs[0].origin.x(), 18.0);
        assert_approx_eq!(f64, runs[1].origin.x(), 118.0);
    }

    #[test]
    fn test_header_fill_only_when_requested() {
        let palette = Palette::for_theme(Theme::Light);
        let has_header = |out: &[Primitive]| {
            out.iter()
                .any(|p| matches!(p, Primitive::Fill { color, .. } if *color == palette.table_header))
        };
        let (element, data) = table(&[&["h"], &["v"]], true);
        assert!(has_header(&layout_table(&element, &data, &palette)));
        let (element, data) = table(&[&["h"], &["v"]], false);
        assert!(!has_header(&layout_table(&element, &data, &palette)));
    }

    #[test]
    fn test_internal_lines_exclude_border() {
        let (element, data) = table(&[&["a", "b", "c"], &["d", "e", "f"]], false);
        let out = layout_table(&element, &data, &Palette::for_theme(Theme::Light));
        let Some(Primitive::Stroke { path, .. }) = out.first() else {
            panic!("expected grid lines first");
        };
        // one row line and two column lines, each a move + line
        assert_eq!(path.commands().len(), 6);
    }

    #[test]
    fn test_column_widths_scale_to_element() {
        let data = TableData {
            cells: vec![vec!["a".into(), "b".into()]],
            column_widths: Some(vec![1.0, 3.0]),
            header_row: false,
        };
        assert_eq!(column_widths(&data, 2, 200.0), vec![50.0, 150.0]);
        assert_eq!(column_widths(&data, 3, 300.0), vec![100.0, 100.0, 100.0]);
    }

    #[test]
    fn test_empty_table_draws_border_only() {
        let (element, data) = table(&[], false);
        let out = layout_table(&element, &data, &Palette::for_theme(Theme::Light));
        assert_eq!(out.len(), 1);
    }
}
