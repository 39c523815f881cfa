//! Theme palettes shared by both backends.
//!
//! [`Palette`] holds every non-element color the renderers need. Element
//! colors come from the document and are passed through
//! [`Palette::element_color`], which applies the dark-theme filter so the raster
//! surface and the exported SVG agree.

use crate::{color::Color, config::Theme};

/// Resolved colors for one theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    theme: Theme,
    pub canvas_background: Color,
    pub grid_minor: Color,
    pub grid_major: Color,
    pub axis: Color,
    pub axis_label: Color,
    pub frame_outline: Color,
    pub frame_name: Color,
    pub link_icon_background: Color,
    pub link_icon_foreground: Color,
    pub embed_placeholder_background: Color,
    pub embed_placeholder_text: Color,
    pub code_card: Color,
    pub code_header: Color,
    pub code_gutter: Color,
    pub code_line_number: Color,
    pub code_text: Color,
    pub table_header: Color,
    pub table_grid: Color,
    pub table_text: Color,
    pub file_card_background: Color,
    pub file_card_border: Color,
    pub file_card_text: Color,
    pub badge_text: Color,
}

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgba8(r, g, b, 255)
}

impl Palette {
    /// Palette for `theme`.
    ///
    /// # Examples
    ///
    /// ```
    /// use easel_core::{config::Theme, theme::Palette};
    ///
    /// let light = Palette::for_theme(Theme::Light);
    /// assert_eq!(light.canvas_background.to_hex(), "#ffffff");
    /// ```
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::light(),
            Theme::Dark => Self::dark(),
        }
    }

    fn light() -> Self {
        Self {
            theme: Theme::Light,
            canvas_background: rgb(0xff, 0xff, 0xff),
            grid_minor: Color::from_rgba8(0xe5, 0xe5, 0xe5, 255),
            grid_major: Color::from_rgba8(0xdd, 0xdd, 0xdd, 255),
            axis: rgb(0x99, 0x99, 0x99),
            axis_label: rgb(0x70, 0x70, 0x70),
            frame_outline: rgb(0xbb, 0xbb, 0xbb),
            frame_name: rgb(0x99, 0x99, 0x99),
            link_icon_background: rgb(0xff, 0xff, 0xff),
            link_icon_foreground: rgb(0x1e, 0x1e, 0x1e),
            embed_placeholder_background: rgb(0xf1, 0xf3, 0xf5),
            embed_placeholder_text: rgb(0x49, 0x50, 0x57),
            code_card: rgb(0xf8, 0xf9, 0xfa),
            code_header: rgb(0xe9, 0xec, 0xef),
            code_gutter: rgb(0xf1, 0xf3, 0xf5),
            code_line_number: rgb(0xad, 0xb5, 0xbd),
            code_text: rgb(0x21, 0x25, 0x29),
            table_header: rgb(0xe9, 0xec, 0xef),
            table_grid: rgb(0xce, 0xd4, 0xda),
            table_text: rgb(0x1e, 0x1e, 0x1e),
            file_card_background: rgb(0xff, 0xff, 0xff),
            file_card_border: rgb(0xce, 0xd4, 0xda),
            file_card_text: rgb(0x1e, 0x1e, 0x1e),
            badge_text: rgb(0xff, 0xff, 0xff),
        }
    }

    fn dark() -> Self {
        Self {
            theme: Theme::Dark,
            canvas_background: rgb(0x12, 0x12, 0x12),
            grid_minor: rgb(0x22, 0x22, 0x22),
            grid_major: rgb(0x2c, 0x2c, 0x2c),
            axis: rgb(0x66, 0x66, 0x66),
            axis_label: rgb(0x9a, 0x9a, 0x9a),
            frame_outline: rgb(0x55, 0x55, 0x55),
            frame_name: rgb(0x7a, 0x7a, 0x7a),
            link_icon_background: rgb(0x23, 0x25, 0x29),
            link_icon_foreground: rgb(0xe3, 0xe3, 0xe8),
            embed_placeholder_background: rgb(0x23, 0x25, 0x29),
            embed_placeholder_text: rgb(0xce, 0xd4, 0xda),
            code_card: rgb(0x1e, 0x1f, 0x22),
            code_header: rgb(0x2b, 0x2d, 0x31),
            code_gutter: rgb(0x23, 0x25, 0x29),
            code_line_number: rgb(0x6c, 0x75, 0x7d),
            code_text: rgb(0xe9, 0xec, 0xef),
            table_header: rgb(0x2b, 0x2d, 0x31),
            table_grid: rgb(0x49, 0x50, 0x57),
            table_text: rgb(0xe3, 0xe3, 0xe8),
            file_card_background: rgb(0x23, 0x25, 0x29),
            file_card_border: rgb(0x49, 0x50, 0x57),
            file_card_text: rgb(0xe3, 0xe3, 0xe8),
            badge_text: rgb(0xff, 0xff, 0xff),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Maps a document color into this theme.
    pub fn element_color(&self, color: Color) -> Color {
        match self.theme {
            Theme::Light => color,
            Theme::Dark => color.dark_filtered(),
        }
    }

    /// Background of the canvas, honoring a document override.
    pub fn background(&self, view_background: Option<Color>) -> Color {
        match view_background {
            Some(color) => self.element_color(color),
            None => self.canvas_background,
        }
    }
}
