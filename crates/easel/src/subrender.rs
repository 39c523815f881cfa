//! Backend-neutral layouts for element kinds with internal structure.
//!
//! Code blocks, tables, file cards, text and embed placeholders are laid out
//! once into a list of [`Primitive`]s. The raster backend replays the list as
//! surface calls and the vector backend turns it into SVG nodes, so both
//! outputs share every coordinate, font size and color.

pub mod code_block;
pub mod embed;
pub mod file_card;
pub mod label;
pub mod table;

use easel_core::{
    color::Color,
    geometry::{Bounds, Point},
    path::PathData,
    stroke::StrokeDefinition,
    text::{FontKind, measure_text},
};

/// Font selection for a [`TextRun`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Typeface {
    Sans,
    Mono,
    /// A CSS family list; the first entry is used for rasterization.
    Named(String),
}

impl Typeface {
    /// Value of the SVG `font-family` attribute.
    pub fn css_family(&self) -> String {
        match self {
            Self::Sans => "Helvetica, Arial, sans-serif".to_string(),
            Self::Mono => "Cascadia, Consolas, monospace".to_string(),
            Self::Named(family) => family.clone(),
        }
    }

    pub fn font_kind(&self) -> FontKind<'_> {
        match self {
            Self::Sans => FontKind::SansSerif,
            Self::Mono => FontKind::Monospace,
            Self::Named(family) => {
                FontKind::Named(family.split(',').next().map(str::trim).unwrap_or(family))
            }
        }
    }
}

/// Horizontal alignment of a [`TextRun`] relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// A single line of text positioned on its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Baseline point the anchor refers to.
    pub origin: Point,
    pub text: String,
    pub font_size: f64,
    pub color: Color,
    pub typeface: Typeface,
    pub anchor: TextAnchor,
}

impl TextRun {
    pub fn new(origin: Point, text: &str, font_size: f64, color: Color) -> Self {
        Self {
            origin,
            text: text.to_string(),
            font_size,
            color,
            typeface: Typeface::Sans,
            anchor: TextAnchor::Start,
        }
    }

    pub fn with_typeface(mut self, typeface: Typeface) -> Self {
        self.typeface = typeface;
        self
    }

    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }
}

/// One drawing instruction of a sub-renderer layout.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Fill { path: PathData, color: Color },
    Stroke { path: PathData, stroke: StrokeDefinition },
    Text(TextRun),
    /// Draws `children` clipped to `bounds`.
    Clip {
        bounds: Bounds,
        children: Vec<Primitive>,
    },
}

impl Primitive {
    pub fn fill(path: PathData, color: Color) -> Self {
        Self::Fill { path, color }
    }

    pub fn stroke(path: PathData, stroke: StrokeDefinition) -> Self {
        Self::Stroke { path, stroke }
    }

    /// Every text run in this primitive tree, in paint order.
    pub fn text_runs(&self) -> Vec<&TextRun> {
        match self {
            Self::Text(run) => vec![run],
            Self::Clip { children, .. } => children.iter().flat_map(Primitive::text_runs).collect(),
            Self::Fill { .. } | Self::Stroke { .. } => Vec::new(),
        }
    }
}

/// Width of `text` at `font_size`, used for layout decisions.
pub type MeasureFn<'a> = &'a dyn Fn(&str, f64) -> f64;

/// Measures with the shared font system in the sans-serif family.
pub fn measure_sans(text: &str, font_size: f64) -> f64 {
    measure_text(text, font_size, 1.0, FontKind::SansSerif).width()
}

/// Baseline of a line of `font_size` text vertically centered in a box.
pub fn centered_baseline(top: f64, box_height: f64, font_size: f64) -> f64 {
    top + box_height / 2.0 + font_size * 0.35
}
