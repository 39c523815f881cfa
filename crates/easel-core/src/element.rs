//! Scene element data model.
//!
//! An [`Element`] is one drawable unit of a scene. The common attributes live on
//! the element itself; everything specific to a kind lives in the
//! [`ElementKind`] variant. Elements deserialize from the camelCase JSON shape of
//! scene documents, with the kind selected by the `type` field. Kinds this
//! engine does not know deserialize to [`ElementKind::Unsupported`] so that the
//! mismatch is reported when the element is painted instead of failing the whole
//! load.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::{
    color::Color,
    geometry::{Bounds, Point, Size},
    identifier::Id,
    stroke::{StrokeCap, StrokeDefinition, StrokeJoin, StrokeStyle},
};

/// Elements in paint (z) order, keyed by id.
pub type ElementMap = IndexMap<Id, Element>;

/// Radius used by adaptive roundness once the shorter side exceeds the cutoff.
pub const ADAPTIVE_RADIUS: f64 = 32.0;
const ROUNDNESS_PROPORTION: f64 = 0.25;

/// How an element's corners are rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Roundness {
    /// Radius grows with the element: a quarter of the shorter side.
    Proportional,
    /// Radius grows with the element up to [`ADAPTIVE_RADIUS`].
    Adaptive,
}

impl Roundness {
    /// Corner radius for a side of length `x` (the shorter side of the element).
    ///
    /// # Examples
    ///
    /// ```
    /// use easel_core::element::Roundness;
    ///
    /// assert_eq!(Roundness::Proportional.radius(400.0), 100.0);
    /// assert_eq!(Roundness::Adaptive.radius(100.0), 25.0);
    /// assert_eq!(Roundness::Adaptive.radius(400.0), 32.0);
    /// ```
    pub fn radius(self, x: f64) -> f64 {
        match self {
            Self::Proportional => x * ROUNDNESS_PROPORTION,
            Self::Adaptive => {
                let cutoff = ADAPTIVE_RADIUS / ROUNDNESS_PROPORTION;
                if x <= cutoff {
                    x * ROUNDNESS_PROPORTION
                } else {
                    ADAPTIVE_RADIUS
                }
            }
        }
    }
}

/// Decoration at either end of a linear element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrowhead {
    Arrow,
    Triangle,
    Bar,
    #[serde(alias = "circle")]
    Dot,
}

/// Points and end decorations of a `line` or `arrow`.
///
/// Points are relative to the element's `(x, y)`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearData {
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub start_arrowhead: Option<Arrowhead>,
    #[serde(default)]
    pub end_arrowhead: Option<Arrowhead>,
}

impl LinearData {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// A line is closed when it has at least three points and its ends coincide.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 2 => first.distance(*last) < 1e-6,
            _ => false,
        }
    }
}

/// Free-hand stroke samples, relative to the element's `(x, y)`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FreedrawData {
    #[serde(default)]
    pub points: Vec<Point>,
}

/// Font family of a text element.
///
/// Scene documents use either the numeric family ids (1, 2, 3) or a name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FontFamily {
    #[default]
    Virgil,
    Helvetica,
    Cascadia,
    Named(String),
}

impl FontFamily {
    /// The CSS `font-family` list for this family.
    pub fn css_family(&self) -> String {
        match self {
            Self::Virgil => "Virgil, Segoe UI Emoji".to_string(),
            Self::Helvetica => "Helvetica, Segoe UI Emoji".to_string(),
            Self::Cascadia => "Cascadia, Segoe UI Emoji".to_string(),
            Self::Named(name) => name.clone(),
        }
    }

    pub fn is_monospace(&self) -> bool {
        matches!(self, Self::Cascadia)
    }
}

impl<'de> Deserialize<'de> for FontFamily {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u32),
            Name(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(2) => Self::Helvetica,
            Raw::Number(3) => Self::Cascadia,
            Raw::Number(_) => Self::Virgil,
            Raw::Name(name) => match name.to_ascii_lowercase().as_str() {
                "virgil" => Self::Virgil,
                "helvetica" => Self::Helvetica,
                "cascadia" => Self::Cascadia,
                _ => Self::Named(name),
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextData {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    #[serde(default)]
    pub container_id: Option<Id>,
}

impl TextData {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            font_size: default_font_size(),
            font_family: FontFamily::default(),
            text_align: TextAlign::default(),
            vertical_align: VerticalAlign::default(),
            line_height: default_line_height(),
            container_id: None,
        }
    }

    pub fn with_container(mut self, container_id: Id) -> Self {
        self.container_id = Some(container_id);
        self
    }

    /// Distance between consecutive baselines in document units.
    pub fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }
}

/// Sub-region of an image's intrinsic pixels that is visible.
///
/// `x`, `y`, `width` and `height` are in natural pixel units of the source.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crop {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub natural_width: f64,
    pub natural_height: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    #[serde(default)]
    pub file_id: Option<Id>,
    #[serde(default)]
    pub crop: Option<Crop>,
    #[serde(default = "default_scale")]
    pub scale: [f64; 2],
}

impl ImageData {
    pub fn new(file_id: Id) -> Self {
        Self {
            file_id: Some(file_id),
            crop: None,
            scale: default_scale(),
        }
    }

    pub fn with_crop(mut self, crop: Crop) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn is_mirrored(&self) -> bool {
        self.scale[0] < 0.0 || self.scale[1] < 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FrameData {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    #[serde(default)]
    pub cells: Vec<Vec<String>>,
    #[serde(default)]
    pub column_widths: Option<Vec<f64>>,
    #[serde(default)]
    pub header_row: bool,
}

/// Horizontal and vertical offsets of the visible code window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct ContentCrop {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeData {
    #[serde(default)]
    pub source: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_code_font_size")]
    pub font_size: f64,
    #[serde(default = "default_true")]
    pub show_line_numbers: bool,
    #[serde(default = "default_true")]
    pub show_header: bool,
    #[serde(default)]
    pub scroll_top: f64,
    #[serde(default)]
    pub content_crop: Option<ContentCrop>,
}

impl CodeData {
    pub fn new(source: &str, language: &str) -> Self {
        Self {
            source: source.to_string(),
            language: language.to_string(),
            font_size: default_code_font_size(),
            show_line_numbers: true,
            show_header: true,
            scroll_top: 0.0,
            content_crop: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCardData {
    #[serde(default)]
    pub file_name: String,
}

/// Kind-specific payload of an element, selected by the `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Rectangle,
    Diamond,
    Ellipse,
    Line(LinearData),
    Arrow(LinearData),
    Freedraw(FreedrawData),
    Text(TextData),
    Image(ImageData),
    Frame(FrameData),
    /// Externally embedded web content, identified by the element link.
    #[serde(alias = "iframe")]
    Embeddable,
    Table(TableData),
    Code(CodeData),
    #[serde(alias = "document")]
    File(FileCardData),
    /// Any kind this engine cannot draw.
    #[serde(other)]
    Unsupported,
}

impl ElementKind {
    /// Stable lowercase name of the kind, as used in scene documents.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Diamond => "diamond",
            Self::Ellipse => "ellipse",
            Self::Line(_) => "line",
            Self::Arrow(_) => "arrow",
            Self::Freedraw(_) => "freedraw",
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Frame(_) => "frame",
            Self::Embeddable => "embeddable",
            Self::Table(_) => "table",
            Self::Code(_) => "code",
            Self::File(_) => "file",
            Self::Unsupported => "unsupported",
        }
    }
}

/// One drawable unit of a scene.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    id: Id,
    #[serde(flatten)]
    kind: ElementKind,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    angle: f64,
    #[serde(default = "default_opacity")]
    opacity: f64,
    #[serde(default = "default_stroke_color")]
    stroke_color: Color,
    #[serde(default = "default_background_color")]
    background_color: Color,
    #[serde(default = "default_stroke_width")]
    stroke_width: f64,
    #[serde(default)]
    stroke_style: StrokeStyle,
    #[serde(default)]
    roundness: Option<Roundness>,
    #[serde(default)]
    group_ids: Vec<Id>,
    #[serde(default)]
    frame_id: Option<Id>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    is_deleted: bool,
}

impl Element {
    /// Creates an element of `kind` at `(x, y)` with the given size and the
    /// document defaults for every style attribute.
    pub fn new(id: &str, kind: ElementKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Id::new(id),
            kind,
            x,
            y,
            width,
            height,
            angle: 0.0,
            opacity: default_opacity(),
            stroke_color: default_stroke_color(),
            background_color: default_background_color(),
            stroke_width: default_stroke_width(),
            stroke_style: StrokeStyle::default(),
            roundness: None,
            group_ids: Vec::new(),
            frame_id: None,
            link: None,
            is_deleted: false,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Rotation in radians, clockwise on screen.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Opacity in the document range 0-100.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        self.stroke_style
    }

    pub fn roundness(&self) -> Option<Roundness> {
        self.roundness
    }

    /// Group ids, innermost first.
    pub fn group_ids(&self) -> &[Id] {
        &self.group_ids
    }

    pub fn frame_id(&self) -> Option<Id> {
        self.frame_id
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref().filter(|link| !link.trim().is_empty())
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Top-left corner of the unrotated box.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The stored, unrotated box `(x, y, width, height)`.
    pub fn rect(&self) -> Bounds {
        Bounds::new_from_top_left(self.origin(), self.size())
    }

    /// Corner radius for rectangles, diamonds and cards.
    pub fn corner_radius(&self) -> f64 {
        self.roundness
            .map(|r| r.radius(self.width.abs().min(self.height.abs())))
            .unwrap_or(0.0)
    }

    /// The outline stroke described by this element's style attributes.
    pub fn stroke(&self) -> StrokeDefinition {
        let stroke = StrokeDefinition::new(self.stroke_color, self.stroke_width)
            .with_style(self.stroke_style);
        match self.kind {
            ElementKind::Freedraw(_) => stroke.with_cap(StrokeCap::Round).with_join(StrokeJoin::Round),
            _ => stroke,
        }
    }

    pub fn is_embeddable(&self) -> bool {
        matches!(self.kind, ElementKind::Embeddable)
    }

    pub fn is_frame(&self) -> bool {
        matches!(self.kind, ElementKind::Frame(_))
    }

    pub fn is_arrow(&self) -> bool {
        matches!(self.kind, ElementKind::Arrow(_))
    }

    /// Points of `line`/`arrow`/`freedraw` elements, relative to the origin.
    pub fn points(&self) -> Option<&[Point]> {
        match &self.kind {
            ElementKind::Line(data) | ElementKind::Arrow(data) => Some(&data.points),
            ElementKind::Freedraw(data) => Some(&data.points),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&TextData> {
        match &self.kind {
            ElementKind::Text(data) => Some(data),
            _ => None,
        }
    }

    /// Id of the container this text element is bound to.
    pub fn container_id(&self) -> Option<Id> {
        self.text().and_then(|t| t.container_id)
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_stroke_color(mut self, color: Color) -> Self {
        self.stroke_color = color;
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_stroke_style(mut self, style: StrokeStyle) -> Self {
        self.stroke_style = style;
        self
    }

    pub fn with_roundness(mut self, roundness: Roundness) -> Self {
        self.roundness = Some(roundness);
        self
    }

    pub fn with_group_ids(mut self, group_ids: &[&str]) -> Self {
        self.group_ids = group_ids.iter().map(|g| Id::new(g)).collect();
        self
    }

    pub fn with_frame_id(mut self, frame_id: &str) -> Self {
        self.frame_id = Some(Id::new(frame_id));
        self
    }

    pub fn with_link(mut self, link: &str) -> Self {
        self.link = Some(link.to_string());
        self
    }

    pub fn with_deleted(mut self, deleted: bool) -> Self {
        self.is_deleted = deleted;
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Decoded bitmap pixels: premultiplied RGBA8, row-major, no padding.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl Bitmap {
    /// Wraps decoded pixels, or returns `None` when the buffer does not match
    /// `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        (data.len() == expected && width > 0 && height > 0).then(|| Self {
            width,
            height,
            data: data.into(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// A binary asset referenced by image elements.
///
/// `data_url` feeds the vector backend; `bitmap` is filled by the prefetch
/// phase for the raster backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryFile {
    pub id: Id,
    pub mime_type: String,
    pub data_url: String,
    pub bitmap: Option<Bitmap>,
}

/// Binary assets keyed by file id.
pub type FileMap = IndexMap<Id, BinaryFile>;

fn default_opacity() -> f64 {
    100.0
}

fn default_stroke_color() -> Color {
    Color::from_rgba8(0x1e, 0x1e, 0x1e, 255)
}

fn default_background_color() -> Color {
    Color::from_rgba8(0, 0, 0, 0)
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_font_size() -> f64 {
    20.0
}

fn default_line_height() -> f64 {
    1.25
}

fn default_scale() -> [f64; 2] {
    [1.0, 1.0]
}

fn default_language() -> String {
    "plaintext".to_string()
}

fn default_code_font_size() -> f64 {
    14.0
}

fn default_true() -> bool {
    true
}
