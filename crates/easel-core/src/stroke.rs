//! Stroke and line-style definitions.
//!
//! Both backends stroke from a [`StrokeDefinition`]: the vector backend maps it to
//! SVG presentation attributes with [`apply_stroke!`](crate::apply_stroke!), the
//! raster backend converts it to a `tiny_skia::Stroke`. Dash patterns scale with
//! the stroke width so that thick dashed lines keep visible gaps.
//!
//! # SVG Attribute Mapping
//!
//! | Rust Property | SVG Attribute | Example Values |
//! |--------------|---------------|----------------|
//! | `color` | `stroke`, `stroke-opacity` | `"#1e1e1e"`, `0.5` |
//! | `width` | `stroke-width` | `2` |
//! | `style` | `stroke-dasharray` | `"8 10"`, `"1.5 8"` |
//! | `cap` | `stroke-linecap` | `"butt"`, `"round"`, `"square"` |
//! | `join` | `stroke-linejoin` | `"miter"`, `"round"`, `"bevel"` |

use std::str::FromStr;

use serde::Deserialize;

use crate::color::Color;

/// Line pattern of an element outline, as stored in scene documents.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    /// Solid continuous line (default)
    #[default]
    Solid,
    /// Dashes of 8px separated by `8 + width` gaps
    Dashed,
    /// Short 1.5px dots separated by `6 + width` gaps
    Dotted,
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            _ => Err(format!(
                "invalid stroke style `{s}`, valid values: solid, dashed, dotted"
            )),
        }
    }
}

impl StrokeStyle {
    /// Dash/gap lengths for a stroke of the given width, or `None` for solid lines.
    ///
    /// # Examples
    ///
    /// ```
    /// use easel_core::stroke::StrokeStyle;
    ///
    /// assert_eq!(StrokeStyle::Solid.dash_array(2.0), None);
    /// assert_eq!(StrokeStyle::Dashed.dash_array(2.0), Some([8.0, 10.0]));
    /// assert_eq!(StrokeStyle::Dotted.dash_array(2.0), Some([1.5, 8.0]));
    /// ```
    pub fn dash_array(&self, width: f64) -> Option<[f64; 2]> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some([8.0, 8.0 + width]),
            Self::Dotted => Some([1.5, 6.0 + width]),
        }
    }

    /// Returns the SVG dasharray value for this style, or None for solid lines
    pub fn to_svg_value(&self, width: f64) -> Option<String> {
        self.dash_array(width)
            .map(|[dash, gap]| format!("{dash} {gap}"))
    }
}

/// Defines how line endpoints are rendered.
///
/// Maps directly to SVG `stroke-linecap` attribute values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl StrokeCap {
    /// Returns the SVG stroke-linecap value
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Defines how line corners (joins) are rendered.
///
/// Maps directly to SVG `stroke-linejoin` attribute values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl StrokeJoin {
    /// Returns the SVG stroke-linejoin value
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

/// A stroke definition for rendering lines and borders.
///
/// # Examples
///
/// ```
/// use easel_core::stroke::{StrokeCap, StrokeDefinition, StrokeStyle};
/// use easel_core::color::Color;
///
/// let stroke = StrokeDefinition::new(Color::new("#1e1e1e").unwrap(), 2.0)
///     .with_style(StrokeStyle::Dashed)
///     .with_cap(StrokeCap::Round);
/// assert_eq!(stroke.dash_array(), Some([8.0, 10.0]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f64,
    style: StrokeStyle,
    cap: StrokeCap,
    join: StrokeJoin,
}

impl StrokeDefinition {
    /// Creates a new solid stroke with round joins, the way scene outlines are drawn.
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
            cap: StrokeCap::Round,
            join: StrokeJoin::Round,
        }
    }

    /// A thin solid stroke with butt caps, used for grid lines and chrome.
    pub fn hairline(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
            cap: StrokeCap::Butt,
            join: StrokeJoin::Miter,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn cap(&self) -> StrokeCap {
        self.cap
    }

    pub fn join(&self) -> StrokeJoin {
        self.join
    }

    /// Dash pattern resolved against this stroke's width.
    pub fn dash_array(&self) -> Option<[f64; 2]> {
        self.style.dash_array(self.width)
    }

    /// Returns true when the stroke would paint nothing.
    pub fn is_invisible(&self) -> bool {
        self.width <= 0.0 || self.color.is_transparent()
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_cap(mut self, cap: StrokeCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: StrokeJoin) -> Self {
        self.join = join;
        self
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Applies every stroke attribute of a [`StrokeDefinition`] to an SVG element.
///
/// ```
/// use easel_core::stroke::StrokeDefinition;
/// use easel_core::color::Color;
/// use svg::node::element as svg_element;
///
/// let stroke = StrokeDefinition::new(Color::new("black").unwrap(), 2.0);
/// let rect = svg_element::Rectangle::new().set("x", 0).set("y", 0);
/// let rect = easel_core::apply_stroke!(rect, &stroke);
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let stroke: &$crate::stroke::StrokeDefinition = $stroke;
        let mut elem = $element
            .set("stroke", stroke.color().to_hex())
            .set("stroke-width", stroke.width())
            .set("stroke-linecap", stroke.cap().to_svg_value())
            .set("stroke-linejoin", stroke.join().to_svg_value());

        if stroke.color().alpha() < 1.0 {
            elem = elem.set("stroke-opacity", stroke.color().alpha());
        }
        if let Some(dasharray) = stroke.style().to_svg_value(stroke.width()) {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_eq!(stroke.width(), 1.0);
        assert_eq!(stroke.color().to_string(), "#000000");
        assert_eq!(stroke.style(), StrokeStyle::Solid);
        assert_eq!(stroke.cap(), StrokeCap::Round);
        assert_eq!(stroke.join(), StrokeJoin::Round);
    }

    #[test]
    fn test_stroke_builders() {
        let stroke = StrokeDefinition::hairline(Color::new("blue").unwrap(), 0.5)
            .with_width(3.0)
            .with_style(StrokeStyle::Dotted)
            .with_join(StrokeJoin::Bevel);

        assert_eq!(stroke.width(), 3.0);
        assert_eq!(stroke.cap(), StrokeCap::Butt);
        assert_eq!(stroke.join(), StrokeJoin::Bevel);
        assert_eq!(stroke.dash_array(), Some([1.5, 9.0]));
    }

    #[test]
    fn test_stroke_invisible() {
        let transparent = StrokeDefinition::new(Color::new("transparent").unwrap(), 2.0);
        assert!(transparent.is_invisible());
        assert!(StrokeDefinition::default().with_width(0.0).is_invisible());
        assert!(!StrokeDefinition::default().is_invisible());
    }

    #[test]
    fn test_stroke_style_svg_value() {
        assert_eq!(StrokeStyle::Solid.to_svg_value(4.0), None);
        assert_eq!(StrokeStyle::Dashed.to_svg_value(4.0).as_deref(), Some("8 12"));
        assert_eq!(StrokeStyle::Dotted.to_svg_value(1.0).as_deref(), Some("1.5 7"));
    }

    #[test]
    fn test_stroke_style_from_str() {
        assert_eq!(StrokeStyle::from_str("dashed").unwrap(), StrokeStyle::Dashed);
        let result = StrokeStyle::from_str("wavy");
        assert!(result.unwrap_err().contains("invalid stroke style"));
    }

    #[test]
    fn test_stroke_style_deserialize() {
        let style: StrokeStyle = serde_json::from_str("\"dotted\"").unwrap();
        assert_eq!(style, StrokeStyle::Dotted);
    }

    #[test]
    fn test_cap_join_svg_values() {
        assert_eq!(StrokeCap::Square.to_svg_value(), "square");
        assert_eq!(StrokeJoin::Miter.to_svg_value(), "miter");
    }
}
