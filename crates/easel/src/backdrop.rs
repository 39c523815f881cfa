//! Grid and axes, laid out once for both backends.
//!
//! Positions come from integer cell indices via [`grid_lines`], and the
//! major/minor split from [`is_on_major`](easel_core::grid::is_on_major), so
//! the live canvas and an exported grid line up exactly.

use log::debug;

use easel_core::{
    config::{GridConfig, GridKind},
    geometry::{Bounds, Point},
    grid::{GridLine, GridSteps, compute_grid_steps, format_axis_label, grid_lines},
    path::PathData,
    stroke::StrokeDefinition,
    theme::Palette,
};

use crate::subrender::{Primitive, TextRun};

/// Upper bound on grid dots per frame.
const MAX_DOTS: usize = 250_000;
const MINOR_DOT_RADIUS: f64 = 1.0;
const MAJOR_DOT_RADIUS: f64 = 1.5;
const AXIS_FONT_SIZE: f64 = 10.0;
const AXIS_LABEL_GAP: f64 = 3.0;

/// Grid primitives covering `visible` (document units) at `zoom`.
///
/// Stroke widths and dot sizes are divided by `zoom` so they stay constant on
/// screen.
pub fn grid_primitives(grid: &GridConfig, palette: &Palette, visible: Bounds, zoom: f64) -> Vec<Primitive> {
    let steps = compute_grid_steps(grid.cell_size, grid.subdivision, zoom);
    let columns = grid_lines(visible.min_x(), visible.max_x(), &steps, grid.subdivision);
    let rows = grid_lines(visible.min_y(), visible.max_y(), &steps, grid.subdivision);
    debug!(
        level = steps.level,
        minor = steps.minor,
        columns = columns.len(),
        rows = rows.len();
        "Laying out grid"
    );

    let opacity = grid.opacity.clamp(0.0, 1.0) as f32;
    let minor_color = palette.grid_minor.with_alpha(palette.grid_minor.alpha() * opacity);
    let major_color = palette.grid_major.with_alpha(palette.grid_major.alpha() * opacity);

    let mut minor = PathData::new();
    let mut major = PathData::new();
    match grid.kind {
        GridKind::Lines => {
            for line in &columns {
                let path = if line.major { &mut major } else { &mut minor };
                path.move_to(Point::new(line.position, visible.min_y()))
                    .line_to(Point::new(line.position, visible.max_y()));
            }
            for line in &rows {
                let path = if line.major { &mut major } else { &mut minor };
                path.move_to(Point::new(visible.min_x(), line.position))
                    .line_to(Point::new(visible.max_x(), line.position));
            }
            let mut out = Vec::new();
            if !minor.is_empty() {
                out.push(Primitive::stroke(minor, StrokeDefinition::hairline(minor_color, 1.0 / zoom)));
            }
            if !major.is_empty() {
                out.push(Primitive::stroke(major, StrokeDefinition::hairline(major_color, 1.0 / zoom)));
            }
            out
        }
        GridKind::Dots => {
            if columns.len().saturating_mul(rows.len()) > MAX_DOTS {
                debug!(columns = columns.len(), rows = rows.len(); "Too many grid dots, skipping");
                return Vec::new();
            }
            for column in &columns {
                for row in &rows {
                    let is_major = column.major && row.major;
                    let radius = if is_major { MAJOR_DOT_RADIUS } else { MINOR_DOT_RADIUS } / zoom;
                    let dot = PathData::circle(Point::new(column.position, row.position), radius);
                    if is_major {
                        major.append(&dot);
                    } else {
                        minor.append(&dot);
                    }
                }
            }
            let mut out = Vec::new();
            if !minor.is_empty() {
                out.push(Primitive::fill(minor, minor_color));
            }
            if !major.is_empty() {
                out.push(Primitive::fill(major, major_color));
            }
            out
        }
    }
}

/// Axis lines through the origin and labels on every major line.
pub fn axes_primitives(grid: &GridConfig, palette: &Palette, visible: Bounds, zoom: f64) -> Vec<Primitive> {
    let steps = compute_grid_steps(grid.cell_size, grid.subdivision, zoom);
    let mut axes = PathData::new();
    if (visible.min_y()..=visible.max_y()).contains(&0.0) {
        axes.move_to(Point::new(visible.min_x(), 0.0))
            .line_to(Point::new(visible.max_x(), 0.0));
    }
    if (visible.min_x()..=visible.max_x()).contains(&0.0) {
        axes.move_to(Point::new(0.0, visible.min_y()))
            .line_to(Point::new(0.0, visible.max_y()));
    }

    let mut out = Vec::new();
    if !axes.is_empty() {
        out.push(Primitive::stroke(axes, StrokeDefinition::hairline(palette.axis, 1.0 / zoom)));
    }

    let size = AXIS_FONT_SIZE / zoom;
    let gap = AXIS_LABEL_GAP / zoom;
    // keep labels on screen when the axis itself is scrolled away
    let label_y = 0.0f64.max(visible.min_y() + size + gap).min(visible.max_y() - gap);
    let label_x = 0.0f64.max(visible.min_x() + gap).min(visible.max_x() - gap);

    let columns = grid_lines(visible.min_x(), visible.max_x(), &steps, grid.subdivision);
    for line in labelled(&columns) {
        let origin = Point::new(line.position + gap, label_y - gap);
        out.push(axis_label(&steps, line, origin, size, palette));
    }
    let rows = grid_lines(visible.min_y(), visible.max_y(), &steps, grid.subdivision);
    for line in labelled(&rows) {
        let origin = Point::new(label_x + gap, line.position - gap);
        out.push(axis_label(&steps, line, origin, size, palette));
    }
    out
}

fn labelled(lines: &[GridLine]) -> impl Iterator<Item = &GridLine> {
    lines.iter().filter(|line| line.major && line.index != 0)
}

fn axis_label(steps: &GridSteps, line: &GridLine, origin: Point, size: f64, palette: &Palette) -> Primitive {
    let text = format_axis_label(line.position, steps);
    Primitive::Text(TextRun::new(origin, &text, size, palette.axis_label))
}

#[cfg(test)]
mod tests {
    use easel_core::{config::Theme, geometry::Size};

    use super::*;

    fn visible(w: f64, h: f64) -> Bounds {
        Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(w, h))
    }

    #[test]
    fn test_lines_split_minor_and_major() {
        let grid = GridConfig::default();
        let palette = Palette::for_theme(Theme::Light);
        let out = grid_primitives(&grid, &palette, visible(100.0, 100.0), 1.0);
        assert_eq!(out.len(), 2);
        let Primitive::Stroke { path, .. } = &out[1] else {
            panic!("expected major lines");
        };
        // x = 0 and x = 100, y = 0 and y = 100
        assert_eq!(path.commands().len(), 8);
    }

    #[test]
    fn test_dots_guard_against_density() {
        let grid = GridConfig {
            kind: GridKind::Dots,
            ..GridConfig::default()
        };
        let palette = Palette::for_theme(Theme::Light);
        assert!(grid_primitives(&grid, &palette, visible(150_000.0, 150_000.0), 1.0).is_empty());
        assert!(!grid_primitives(&grid, &palette, visible(100.0, 100.0), 1.0).is_empty());
    }

    #[test]
    fn test_axis_labels_use_level_precision() {
        let grid = GridConfig::default();
        let palette = Palette::for_theme(Theme::Light);
        let zoom = 25.0;
        let out = axes_primitives(&grid, &palette, visible(8.0, 8.0), zoom);
        let labels: Vec<&str> = out
            .iter()
            .flat_map(Primitive::text_runs)
            .map(|run| run.text.as_str())
            .collect();
        assert!(labels.contains(&"4.00"), "{labels:?}");
        assert!(!labels.contains(&"0.00"));
    }
}
