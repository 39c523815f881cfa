//! Element coordinates, rotation pivots and paint transforms.
//!
//! Every backend positions an element the same way: translate by an offset
//! (scroll on the raster surface, export padding in SVG), then rotate by the
//! element angle about its pivot. [`PaintTransform`] captures that pair and
//! renders it as the SVG `transform` attribute; the raster backend replays it as
//! `translate` + `rotate` surface calls in the same order.
//!
//! Pivots are the element's own center, except for text bound to an arrow: the
//! arrow may have moved since the label was stored, so the label is centered on
//! the arrow's current midpoint instead. Text bound to any other container keeps
//! its stored position.

use std::fmt;

use crate::{
    element::{Element, ElementKind, ElementMap},
    error::GeometryError,
    geometry::{Bounds, Point, Size},
};

/// Size of the link affordance icon in screen pixels at zoom 1.
pub const LINK_ICON_SIZE: f64 = 14.0;
const LINK_ICON_MARGIN: f64 = 4.0;

/// Absolute, unrotated coordinates of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsCoords {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Rotation pivot.
    pub cx: f64,
    pub cy: f64,
}

impl AbsCoords {
    pub fn bounds(&self) -> Bounds {
        Bounds::from_corners(Point::new(self.x1, self.y1), Point::new(self.x2, self.y2))
    }

    pub fn pivot(&self) -> Point {
        Point::new(self.cx, self.cy)
    }
}

/// "Translate by `offset`, then rotate by `degrees` about `pivot`."
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintTransform {
    offset: Point,
    degrees: f64,
    pivot: Point,
}

impl PaintTransform {
    pub fn new(offset: Point, degrees: f64, pivot: Point) -> Self {
        Self {
            offset,
            degrees,
            pivot,
        }
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn pivot(&self) -> Point {
        self.pivot
    }

    /// The equivalent affine matrix `[a, b, c, d, e, f]` (SVG `matrix()` order).
    pub fn matrix(&self) -> [f64; 6] {
        let (sin, cos) = self.degrees.to_radians().sin_cos();
        let (px, py) = (self.pivot.x(), self.pivot.y());
        // rotate about pivot: T(p) R T(-p), then pre-translate by offset
        let e = px - cos * px + sin * py + self.offset.x();
        let f = py - sin * px - cos * py + self.offset.y();
        [cos, sin, -sin, cos, e, f]
    }

    /// Maps a document point through this transform.
    pub fn apply(&self, point: Point) -> Point {
        let [a, b, c, d, e, f] = self.matrix();
        Point::new(
            a * point.x() + c * point.y() + e,
            b * point.x() + d * point.y() + f,
        )
    }
}

/// Formats a number for SVG attributes, folding `-0` into `0`.
pub fn fmt_num(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        format!("{value}")
    }
}

impl fmt::Display for PaintTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate({} {}) rotate({} {} {})",
            fmt_num(self.offset.x()),
            fmt_num(self.offset.y()),
            fmt_num(self.degrees),
            fmt_num(self.pivot.x()),
            fmt_num(self.pivot.y()),
        )
    }
}

/// Checks that an element's stored geometry can be painted.
pub fn validate_geometry(element: &Element) -> Result<(), GeometryError> {
    let id = element.id();
    for (field, value) in [
        ("x", element.x()),
        ("y", element.y()),
        ("width", element.width()),
        ("height", element.height()),
        ("angle", element.angle()),
        ("opacity", element.opacity()),
    ] {
        if !value.is_finite() {
            return Err(GeometryError::NonFinite { id, field });
        }
    }
    if let Some(points) = element.points() {
        if points.iter().any(|p| !p.is_finite()) {
            return Err(GeometryError::NonFinite {
                id,
                field: "points",
            });
        }
        if matches!(element.kind(), ElementKind::Line(_) | ElementKind::Arrow(_))
            && points.len() < 2
        {
            return Err(GeometryError::TooFewPoints {
                id,
                count: points.len(),
            });
        }
    } else if element.width() < 0.0 || element.height() < 0.0 {
        return Err(GeometryError::NegativeSize {
            id,
            width: element.width(),
            height: element.height(),
        });
    }
    Ok(())
}

/// The point a bound label is centered on, for an arrow container.
///
/// An odd number of points centers on the middle point; an even number centers
/// on the midpoint of the middle segment.
pub fn arrow_label_anchor(arrow: &Element) -> Option<Point> {
    let points = arrow.points()?;
    if points.is_empty() {
        return None;
    }
    let origin = arrow.origin();
    let mid = points.len() / 2;
    let anchor = if points.len() % 2 == 1 {
        points[mid]
    } else {
        points[mid - 1].midpoint(points[mid])
    };
    Some(anchor.add_point(origin))
}

/// Top-left position of `text` when bound to `container`.
///
/// Only arrow containers reposition their label; for every other container the
/// stored text position is returned unchanged.
pub fn bound_text_position(container: &Element, text: &Element) -> Point {
    if !container.is_arrow() {
        return text.origin();
    }
    match arrow_label_anchor(container) {
        Some(anchor) => Point::new(
            anchor.x() - text.width() / 2.0,
            anchor.y() - text.height() / 2.0,
        ),
        None => text.origin(),
    }
}

/// The container `element` is bound to, if it is a bound text present in `map`.
pub fn bound_container<'a>(element: &Element, map: &'a ElementMap) -> Option<&'a Element> {
    element.container_id().and_then(|id| map.get(&id))
}

/// Returns the absolute coordinates and pivot of `element`.
///
/// Linear elements use the extents of their points. Bound text follows its
/// container as described in [`bound_text_position`].
///
/// # Examples
///
/// ```
/// use easel_core::element::{Element, ElementKind, ElementMap};
/// use easel_core::transform::element_abs_coords;
///
/// let rect = Element::new("r", ElementKind::Rectangle, 10.0, 10.0, 50.0, 50.0);
/// let coords = element_abs_coords(&rect, &ElementMap::new());
/// assert_eq!((coords.x1, coords.y1, coords.x2, coords.y2), (10.0, 10.0, 60.0, 60.0));
/// assert_eq!((coords.cx, coords.cy), (35.0, 35.0));
/// ```
pub fn element_abs_coords(element: &Element, map: &ElementMap) -> AbsCoords {
    let extent = element
        .points()
        .and_then(|points| Bounds::from_points(points.iter().copied()));
    if let Some(extent) = extent {
        let bounds = extent.translate(element.origin());
        let center = bounds.center();
        return AbsCoords {
            x1: bounds.min_x(),
            y1: bounds.min_y(),
            x2: bounds.max_x(),
            y2: bounds.max_y(),
            cx: center.x(),
            cy: center.y(),
        };
    }

    let origin = match bound_container(element, map) {
        Some(container) => bound_text_position(container, element),
        None => element.origin(),
    };
    let bounds = Bounds::new_from_top_left(origin, element.size());
    let center = bounds.center();
    AbsCoords {
        x1: bounds.min_x(),
        y1: bounds.min_y(),
        x2: bounds.max_x(),
        y2: bounds.max_y(),
        cx: center.x(),
        cy: center.y(),
    }
}

/// The paint transform of `element`, given the backend's offset.
pub fn paint_transform(element: &Element, map: &ElementMap, offset: Point) -> PaintTransform {
    let coords = element_abs_coords(element, map);
    PaintTransform::new(offset, element.angle().to_degrees(), coords.pivot())
}

/// Axis-aligned bounds of the rotated element.
pub fn element_bounds(element: &Element, map: &ElementMap) -> Bounds {
    let coords = element_abs_coords(element, map);
    match element.points() {
        Some(points) if !points.is_empty() => {
            let origin = element.origin();
            let rotated = points
                .iter()
                .map(|p| p.add_point(origin).rotate_around(coords.pivot(), element.angle()));
            Bounds::from_points(rotated).unwrap_or_else(|| coords.bounds())
        }
        _ => coords.bounds().rotated(coords.pivot(), element.angle()),
    }
}

/// Bounds enclosing every element, or `None` if there are none.
pub fn common_bounds<'a>(
    elements: impl IntoIterator<Item = &'a Element>,
    map: &ElementMap,
) -> Option<Bounds> {
    elements
        .into_iter()
        .map(|e| element_bounds(e, map))
        .reduce(|acc, b| acc.merge(&b))
}

/// Opacity of `element` in 0.0-1.0, multiplied by its containing frame's opacity.
pub fn effective_opacity(element: &Element, map: &ElementMap) -> f64 {
    let own = element.opacity() / 100.0;
    let frame = element
        .frame_id()
        .and_then(|id| map.get(&id))
        .map(|frame| frame.opacity() / 100.0)
        .unwrap_or(1.0);
    (own * frame).clamp(0.0, 1.0)
}

/// Placement of the link affordance icon of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkHandle {
    /// Unrotated icon box, centered on the rotated anchor.
    pub bounds: Bounds,
    /// Element rotation in radians; the icon is drawn rotated by it.
    pub angle: f64,
}

/// Computes where the link icon of `element` goes at `zoom`.
///
/// The icon sits just outside the north-east corner and keeps a constant
/// on-screen size when zoomed in.
pub fn link_handle_bounds(element: &Element, map: &ElementMap, zoom: f64) -> LinkHandle {
    let coords = element_abs_coords(element, map);
    let size = LINK_ICON_SIZE / zoom.max(1.0);
    let margin = LINK_ICON_MARGIN / zoom;
    let x = coords.x2 + margin;
    let y = coords.y1 - margin - size;
    let center = Point::new(x + size / 2.0, y + size / 2.0).rotate_around(coords.pivot(), element.angle());
    LinkHandle {
        bounds: Bounds::new_from_center(center, Size::new(size, size)),
        angle: element.angle(),
    }
}
