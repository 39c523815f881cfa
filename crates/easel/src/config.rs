//! Configuration types for Easel rendering and export.
//!
//! All types implement [`serde::Deserialize`] so the CLI can load them from
//! TOML; every field has a default.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining render, export and style settings.
//! - [`ExportConfig`] - Controls how standalone documents and snapshots are produced.
//! - [`StyleConfig`] - Visual overrides such as the background color.
//!
//! # Example
//!
//! ```
//! # use easel::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().background_color().is_ok());
//! assert_eq!(config.export().padding(), 10.0);
//! ```

use serde::Deserialize;

use easel_core::{color::Color, config::RenderConfig};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Render settings shared by both backends.
    #[serde(default)]
    render: RenderConfig,

    #[serde(default)]
    export: ExportConfig,

    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(render: RenderConfig, export: ExportConfig, style: StyleConfig) -> Self {
        Self {
            render,
            export,
            style,
        }
    }

    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Mutable access, used to apply command-line overrides.
    pub fn render_mut(&mut self) -> &mut RenderConfig {
        &mut self.render
    }

    pub fn export(&self) -> &ExportConfig {
        &self.export
    }

    pub fn export_mut(&mut self) -> &mut ExportConfig {
        &mut self.export
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Settings for exported documents and snapshots.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Margin around the scene bounds, in document units.
    padding: f64,
    /// Paints the canvas background behind the scene.
    background: bool,
    /// Includes the grid in exported output.
    include_grid: bool,
    /// Shares one bitmap definition between images of the same file.
    reuse_images: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            padding: 10.0,
            background: true,
            include_grid: false,
            reuse_images: true,
        }
    }
}

impl ExportConfig {
    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn background(&self) -> bool {
        self.background
    }

    pub fn include_grid(&self) -> bool {
        self.include_grid
    }

    pub fn reuse_images(&self) -> bool {
        self.reuse_images
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_background(mut self, background: bool) -> Self {
        self.background = background;
        self
    }

    pub fn with_include_grid(mut self, include_grid: bool) -> Self {
        self.include_grid = include_grid;
        self
    }

    pub fn with_reuse_images(mut self, reuse_images: bool) -> Self {
        self.reuse_images = reuse_images;
        self
    }
}

/// Visual styling configuration.
///
/// Fields that are not set fall back to the scene or theme defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Background [`Color`] override, as a color string.
    #[serde(default)]
    background_color: Option<String>,
}

impl StyleConfig {
    pub fn new(background_color: Option<String>) -> Self {
        Self { background_color }
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }
}
