//! Color handling for scene elements and theme palettes
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Scene documents store colors as CSS strings
//! (`"#1e1e1e"`, `"transparent"`, `"rgba(0, 0, 0, 0.5)"`); both backends need
//! them as 8-bit RGBA, and the dark theme needs them pushed through the same
//! filter chain regardless of backend.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{AlphaColor, DynamicColor, Srgb};
use serde::{Deserialize, Deserializer};

/// Wrapper around the `DynamicColor` type from the color crate
///
/// Equality and hashing compare the resolved 8-bit sRGB channels, so `"red"`
/// and `"#ff0000"` are the same color.
#[derive(Clone, Copy, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.to_rgba8() == other.to_rgba8()
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_rgba8().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string such as "#ff0000",
    /// "rgb(255, 0, 0)", "red" or "transparent".
    ///
    /// # Examples
    ///
    /// ```
    /// use easel_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// assert_eq!(red.to_rgba8(), [255, 0, 0, 255]);
    /// assert!(Color::new("transparent").unwrap().is_transparent());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str.trim()) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Creates a color from 8-bit straight (non-premultiplied) RGBA channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let srgb = AlphaColor::<Srgb>::new([
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        ]);
        Self {
            color: DynamicColor::from_alpha_color(srgb),
        }
    }

    /// Returns the color as 8-bit straight RGBA channels in sRGB.
    pub fn to_rgba8(self) -> [u8; 4] {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        [rgba.r, rgba.g, rgba.b, rgba.a]
    }

    /// Returns the `#rrggbb` form of the color, ignoring alpha.
    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Creates a new color with the specified alpha (transparency) value.
    ///
    /// # Examples
    ///
    /// ```
    /// use easel_core::color::Color;
    ///
    /// let red = Color::new("red").unwrap();
    /// let semi_transparent_red = red.with_alpha(0.5);
    /// assert_eq!(semi_transparent_red.alpha(), 0.5);
    /// ```
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color, between
    /// 0.0 (fully transparent) and 1.0 (fully opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Returns true if painting this color would have no visible effect.
    pub fn is_transparent(&self) -> bool {
        self.alpha() <= 0.0
    }

    /// Applies the dark-theme filter chain: `invert(93%)` followed by
    /// `hue-rotate(180deg)`, using the CSS filter-effects definitions.
    /// Alpha is preserved.
    ///
    /// # Examples
    ///
    /// ```
    /// use easel_core::color::Color;
    ///
    /// // Near-black strokes become light gray on the dark canvas.
    /// let [r, g, b, _] = Color::new("#000000").unwrap().dark_filtered().to_rgba8();
    /// assert!(r > 200 && g > 200 && b > 200);
    /// ```
    pub fn dark_filtered(self) -> Self {
        let [r, g, b, a] = self.to_rgba8();
        let rgb = [r, g, b].map(|c| invert(f64::from(c) / 255.0, 0.93));
        let rotated = hue_rotate(rgb, 180.0);
        let [r, g, b] = rotated.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        Self::from_rgba8(r, g, b, a)
    }

    /// Returns a sanitized, ID-safe string representation of this color,
    /// usable inside SVG `id` attributes.
    pub fn to_id_safe_string(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        format!("c{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

fn invert(channel: f64, amount: f64) -> f64 {
    amount * (1.0 - channel) + (1.0 - amount) * channel
}

fn hue_rotate([r, g, b]: [f64; 3], degrees: f64) -> [f64; 3] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let matrix = [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ];
    matrix.map(|row| row[0] * r + row[1] * g + row[2] * b)
}

impl Default for Color {
    fn default() -> Self {
        Self::from_rgba8(0, 0, 0, 255)
    }
}

/// Formats the color as CSS: `#rrggbb` when opaque, `rgba(...)` otherwise.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            let alpha = f64::from(a) / 255.0;
            write!(f, "rgba({r}, {g}, {b}, {alpha:.3})")
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(&value).map_err(serde::de::Error::custom)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

impl From<Color> for svg::node::Value {
    fn from(color: Color) -> Self {
        Self::from(color.to_string())
    }
}
