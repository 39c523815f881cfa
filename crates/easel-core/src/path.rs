//! Backend-neutral path geometry.
//!
//! Shapes are built once as [`PathData`] in absolute document coordinates and
//! handed to either backend: the vector backend serializes them with
//! [`PathData::to_svg_d`], the raster backend replays the commands into its own
//! path builder. Arrowheads and closed-line fills are derived here as well, so the
//! two outputs cannot disagree on shape.

use log::trace;

use crate::{
    element::{Arrowhead, Element, ElementKind},
    error::GeometryError,
    geometry::{Bounds, Point},
    transform::{fmt_num, validate_geometry},
};

/// Control-point distance for a quarter circle drawn with one cubic curve.
const KAPPA: f64 = 0.552_284_749_830_793_4;
const ARROWHEAD_MAX_SIZE: f64 = 30.0;
const ARROWHEAD_BARB_ANGLE: f64 = 25.0;

/// A single path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CubicTo(Point, Point, Point),
    Close,
}

/// An ordered list of path commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn quad_to(&mut self, control: Point, p: Point) -> &mut Self {
        self.commands.push(PathCommand::QuadTo(control, p));
        self
    }

    pub fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) -> &mut Self {
        self.commands.push(PathCommand::CubicTo(c1, c2, p));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Appends every command of `other`, keeping its sub-paths separate.
    pub fn append(&mut self, other: &PathData) -> &mut Self {
        self.commands.extend_from_slice(&other.commands);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// An axis-aligned rectangle.
    pub fn rect(bounds: Bounds) -> Self {
        Self::polygon(&bounds.corners())
    }

    /// A rectangle with circular corners; `radius` is clamped to half the
    /// shorter side.
    pub fn rounded_rect(bounds: Bounds, radius: f64) -> Self {
        let r = radius.min(bounds.width() / 2.0).min(bounds.height() / 2.0).max(0.0);
        if r == 0.0 {
            return Self::rect(bounds);
        }
        let (x0, y0, x1, y1) = (bounds.min_x(), bounds.min_y(), bounds.max_x(), bounds.max_y());
        let k = r * (1.0 - KAPPA);
        let mut path = Self::new();
        path.move_to(Point::new(x0 + r, y0))
            .line_to(Point::new(x1 - r, y0))
            .cubic_to(Point::new(x1 - k, y0), Point::new(x1, y0 + k), Point::new(x1, y0 + r))
            .line_to(Point::new(x1, y1 - r))
            .cubic_to(Point::new(x1, y1 - k), Point::new(x1 - k, y1), Point::new(x1 - r, y1))
            .line_to(Point::new(x0 + r, y1))
            .cubic_to(Point::new(x0 + k, y1), Point::new(x0, y1 - k), Point::new(x0, y1 - r))
            .line_to(Point::new(x0, y0 + r))
            .cubic_to(Point::new(x0, y0 + k), Point::new(x0 + k, y0), Point::new(x0 + r, y0))
            .close();
        path
    }

    /// An ellipse inscribed in `bounds`.
    pub fn ellipse(bounds: Bounds) -> Self {
        let c = bounds.center();
        let (rx, ry) = (bounds.width() / 2.0, bounds.height() / 2.0);
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);
        let (cx, cy) = (c.x(), c.y());
        let mut path = Self::new();
        path.move_to(Point::new(cx + rx, cy))
            .cubic_to(Point::new(cx + rx, cy + ky), Point::new(cx + kx, cy + ry), Point::new(cx, cy + ry))
            .cubic_to(Point::new(cx - kx, cy + ry), Point::new(cx - rx, cy + ky), Point::new(cx - rx, cy))
            .cubic_to(Point::new(cx - rx, cy - ky), Point::new(cx - kx, cy - ry), Point::new(cx, cy - ry))
            .cubic_to(Point::new(cx + kx, cy - ry), Point::new(cx + rx, cy - ky), Point::new(cx + rx, cy))
            .close();
        path
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        Self::ellipse(Bounds::from_corners(
            Point::new(center.x() - radius, center.y() - radius),
            Point::new(center.x() + radius, center.y() + radius),
        ))
    }

    /// A diamond touching the midpoints of each side of `bounds`.
    pub fn diamond(bounds: Bounds) -> Self {
        let c = bounds.center();
        Self::polygon(&[
            Point::new(c.x(), bounds.min_y()),
            Point::new(bounds.max_x(), c.y()),
            Point::new(c.x(), bounds.max_y()),
            Point::new(bounds.min_x(), c.y()),
        ])
    }

    /// An open path through `points`.
    pub fn polyline(points: &[Point]) -> Self {
        let mut path = Self::new();
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
        }
        path
    }

    /// A closed path through `points`.
    pub fn polygon(points: &[Point]) -> Self {
        let mut path = Self::polyline(points);
        if !path.is_empty() {
            path.close();
        }
        path
    }

    /// Serializes to an SVG path `d` attribute.
    ///
    /// # Examples
    ///
    /// ```
    /// use easel_core::geometry::Point;
    /// use easel_core::path::PathData;
    ///
    /// let path = PathData::polygon(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 5.5)]);
    /// assert_eq!(path.to_svg_d(), "M0 0 L10 0 L10 5.5 Z");
    /// ```
    pub fn to_svg_d(&self) -> String {
        self.commands
            .iter()
            .map(|cmd| match cmd {
                PathCommand::MoveTo(p) => format!("M{}", fmt_point(*p)),
                PathCommand::LineTo(p) => format!("L{}", fmt_point(*p)),
                PathCommand::QuadTo(c, p) => format!("Q{} {}", fmt_point(*c), fmt_point(*p)),
                PathCommand::CubicTo(c1, c2, p) => {
                    format!("C{} {} {}", fmt_point(*c1), fmt_point(*c2), fmt_point(*p))
                }
                PathCommand::Close => "Z".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn fmt_coord(value: f64) -> String {
    fmt_num((value * 1000.0).round() / 1000.0)
}

fn fmt_point(p: Point) -> String {
    format!("{} {}", fmt_coord(p.x()), fmt_coord(p.y()))
}

/// Geometry of one arrowhead.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowheadPath {
    pub path: PathData,
    /// Filled with the stroke color instead of stroked.
    pub filled: bool,
}

/// Builds the arrowhead of `kind` at `tip` for a segment arriving from `from`.
///
/// Returns `None` for a zero-length segment.
pub fn arrowhead_path(kind: Arrowhead, tip: Point, from: Point, stroke_width: f64) -> Option<ArrowheadPath> {
    let length = tip.distance(from);
    if length <= f64::EPSILON {
        return None;
    }
    let size = ARROWHEAD_MAX_SIZE.min(length / 2.0) * (stroke_width / 2.0).clamp(1.0, 2.0);
    let back = from.sub_point(tip).scale(size / length).add_point(tip);
    let barb = ARROWHEAD_BARB_ANGLE.to_radians();
    let left = back.rotate_around(tip, barb);
    let right = back.rotate_around(tip, -barb);

    let (path, filled) = match kind {
        Arrowhead::Arrow => (PathData::polyline(&[left, tip, right]), false),
        Arrowhead::Triangle => (PathData::polygon(&[tip, left, right]), true),
        Arrowhead::Bar => {
            let half = size / 2.0;
            let quarter_turn = std::f64::consts::FRAC_PI_2;
            let dir = from.sub_point(tip).scale(half / length).add_point(tip);
            let a = dir.rotate_around(tip, quarter_turn);
            let b = dir.rotate_around(tip, -quarter_turn);
            (PathData::polyline(&[a, b]), false)
        }
        Arrowhead::Dot => (PathData::circle(tip, size / 4.0), true),
    };
    Some(ArrowheadPath { path, filled })
}

/// Paths for a geometric element.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePaths {
    /// Area filled with the background color, if any.
    pub fill: Option<PathData>,
    /// Outline stroked with the element stroke.
    pub outline: PathData,
    pub arrowheads: Vec<ArrowheadPath>,
}

/// Builds the paths of a shape-like element in absolute coordinates.
///
/// Returns `Ok(None)` for kinds that are drawn by a dedicated routine (text,
/// images, frames, embeds, tables, code blocks, file cards).
pub fn shape_paths(element: &Element) -> Result<Option<ShapePaths>, GeometryError> {
    validate_geometry(element)?;
    let rect = element.rect();
    let shape = match element.kind() {
        ElementKind::Rectangle => {
            let outline = PathData::rounded_rect(rect, element.corner_radius());
            closed_shape(outline)
        }
        ElementKind::Diamond => closed_shape(PathData::diamond(rect)),
        ElementKind::Ellipse => closed_shape(PathData::ellipse(rect)),
        ElementKind::Line(data) | ElementKind::Arrow(data) => {
            let points = absolute_points(element, &data.points);
            let outline = PathData::polyline(&points);
            let fill = data.is_closed().then(|| PathData::polygon(&points));
            let mut arrowheads = Vec::new();
            if let (Some(kind), [first, second, ..]) = (data.start_arrowhead, points.as_slice()) {
                arrowheads.extend(arrowhead_path(kind, *first, *second, element.stroke_width()));
            }
            if let (Some(kind), [.., before, last]) = (data.end_arrowhead, points.as_slice()) {
                arrowheads.extend(arrowhead_path(kind, *last, *before, element.stroke_width()));
            }
            ShapePaths {
                fill,
                outline,
                arrowheads,
            }
        }
        ElementKind::Freedraw(data) => ShapePaths {
            fill: None,
            outline: PathData::polyline(&absolute_points(element, &data.points)),
            arrowheads: Vec::new(),
        },
        _ => return Ok(None),
    };
    trace!(element_id:% = element.id(), kind = element.kind().name(); "Built shape paths");
    Ok(Some(shape))
}

fn closed_shape(outline: PathData) -> ShapePaths {
    ShapePaths {
        fill: Some(outline.clone()),
        outline,
        arrowheads: Vec::new(),
    }
}

fn absolute_points(element: &Element, points: &[Point]) -> Vec<Point> {
    let origin = element.origin();
    points.iter().map(|p| p.add_point(origin)).collect()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::element::{LinearData, Roundness};

    #[test]
    fn test_rect_path() {
        let rect = Bounds::new_from_top_left(Point::new(10.0, 10.0), crate::geometry::Size::new(50.0, 50.0));
        assert_eq!(PathData::rect(rect).to_svg_d(), "M10 10 L60 10 L60 60 L10 60 Z");
    }

    #[test]
    fn test_rounded_rect_clamps_radius() {
        let rect = Bounds::from_corners(Point::new(0.0, 0.0), Point::new(20.0, 10.0));
        let path = PathData::rounded_rect(rect, 100.0);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(Point::new(5.0, 0.0)));
        assert_eq!(path.commands().last(), Some(&PathCommand::Close));
    }

    #[test]
    fn test_ellipse_starts_on_right_edge() {
        let rect = Bounds::from_corners(Point::new(0.0, 0.0), Point::new(40.0, 20.0));
        let path = PathData::ellipse(rect);
        assert_eq!(path.commands()[0], PathCommand::MoveTo(Point::new(40.0, 10.0)));
        assert_eq!(path.commands().len(), 6);
    }

    #[test]
    fn test_arrowhead_size_is_capped_by_segment() {
        let head = arrowhead_path(Arrowhead::Arrow, Point::new(20.0, 0.0), Point::new(0.0, 0.0), 2.0).unwrap();
        let PathCommand::MoveTo(barb) = head.path.commands()[0] else {
            panic!("arrowhead must start with a move");
        };
        // size = min(30, 20 / 2) = 10, rotated by 25 degrees
        assert_approx_eq!(f64, barb.distance(Point::new(20.0, 0.0)), 10.0, epsilon = 1e-9);
        assert!(!head.filled);
    }

    #[test]
    fn test_arrowhead_zero_length_segment() {
        let p = Point::new(5.0, 5.0);
        assert!(arrowhead_path(Arrowhead::Triangle, p, p, 2.0).is_none());
    }

    #[test]
    fn test_closed_line_is_filled() {
        let data = LinearData::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 0.0),
        ]);
        let line = Element::new("l", ElementKind::Line(data), 5.0, 5.0, 10.0, 10.0);
        let shape = shape_paths(&line).unwrap().unwrap();
        assert!(shape.fill.is_some());
        assert_eq!(shape.outline.commands()[0], PathCommand::MoveTo(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_arrow_with_both_heads() {
        let mut data = LinearData::new(vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        data.start_arrowhead = Some(Arrowhead::Bar);
        data.end_arrowhead = Some(Arrowhead::Triangle);
        let arrow = Element::new("a", ElementKind::Arrow(data), 0.0, 0.0, 100.0, 0.0);
        let shape = shape_paths(&arrow).unwrap().unwrap();
        assert_eq!(shape.arrowheads.len(), 2);
        assert!(shape.fill.is_none());
        assert!(shape.arrowheads[1].filled);
    }

    #[test]
    fn test_rounded_rectangle_uses_roundness() {
        let rect = Element::new("r", ElementKind::Rectangle, 0.0, 0.0, 100.0, 40.0)
            .with_roundness(Roundness::Proportional);
        let shape = shape_paths(&rect).unwrap().unwrap();
        assert_eq!(shape.outline.commands()[0], PathCommand::MoveTo(Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_non_shape_kinds_have_no_paths() {
        let text = Element::new("t", ElementKind::Text(crate::element::TextData::new("hi")), 0.0, 0.0, 10.0, 10.0);
        assert_eq!(shape_paths(&text), Ok(None));
    }

    #[test]
    fn test_invalid_geometry_is_reported() {
        let rect = Element::new("bad", ElementKind::Rectangle, f64::NAN, 0.0, 10.0, 10.0);
        assert!(matches!(
            shape_paths(&rect),
            Err(GeometryError::NonFinite { field: "x", .. })
        ));
    }
}
