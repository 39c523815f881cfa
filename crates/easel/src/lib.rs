//! Easel - scene rendering for a 2D diagram editor.
//!
//! A scene of heterogeneous drawable elements is rendered by two independent
//! backends that agree on transforms, clipping, opacity, paint order and
//! theming: an immediate-mode raster backend for the live canvas and PNG
//! snapshots, and a retained-mode SVG backend for standalone exports.

pub mod backdrop;
pub mod config;
pub mod export;
pub mod raster;
pub mod scene;
pub mod subrender;

mod error;

pub use easel_core::{color, element, geometry, identifier, paint_order, transform};

pub use error::{EaselError, RenderError};

use log::{debug, info};

use easel_core::{color::Color, config::RenderConfig, transform::common_bounds};

use config::AppConfig;
use export::{Exporter, svg::SvgBuilder};
use raster::{PixmapSurface, RasterRenderer};
use scene::Scene;

/// Facade for loading scenes and rendering them with either backend.
///
/// # Examples
///
/// ```rust,no_run
/// use easel::{SceneRenderer, config::AppConfig};
///
/// let source = r#"{ "elements": [
///     { "id": "a", "type": "rectangle", "x": 10, "y": 10, "width": 50, "height": 50 }
/// ] }"#;
///
/// let renderer = SceneRenderer::new(AppConfig::default());
/// let scene = renderer.load_scene(source)
///     .expect("Failed to load scene");
///
/// let svg = renderer.render_svg(&scene)
///     .expect("Failed to render");
/// let png = renderer.render_png(&scene, 2.0)
///     .expect("Failed to render");
/// ```
#[derive(Default)]
pub struct SceneRenderer {
    config: AppConfig,
}

impl SceneRenderer {
    /// Create a new scene renderer with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a scene document.
    ///
    /// Tombstoned elements are dropped here; nothing downstream sees them.
    ///
    /// # Errors
    ///
    /// Returns [`EaselError::Scene`] carrying the source text when the
    /// document is not a valid scene.
    pub fn load_scene(&self, source: &str) -> Result<Scene, EaselError> {
        info!("Loading scene");
        let scene = Scene::from_json(source).map_err(|err| EaselError::new_scene_error(err, source))?;
        debug!(elements = scene.elements().len(), files = scene.files().len(); "Scene loaded");
        Ok(scene)
    }

    /// Render a scene to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`EaselError::Render`] for a scene with an unsupported element
    /// kind and [`EaselError::Config`] for an invalid style override.
    pub fn render_svg(&self, scene: &Scene) -> Result<String, EaselError> {
        let mut exporter = SvgBuilder::new()
            .with_render_config(self.config.render().clone())
            .with_export_config(self.config.export().clone())
            .with_background_color(self.background_override()?)
            .build();

        let mut out = Vec::new();
        exporter.export_scene(scene, &mut out)?;
        let svg = String::from_utf8(out).map_err(|err| EaselError::Export(Box::new(err)))?;

        info!(bytes = svg.len(); "SVG rendered successfully");
        Ok(svg)
    }

    /// Render a scene to PNG bytes at `scale` pixels per document unit.
    ///
    /// Uses the raster backend's immediate entry point with the exporting
    /// flag set, so editor affordances never appear.
    ///
    /// # Errors
    ///
    /// Returns [`EaselError::Render`] for an unsupported element kind or a
    /// surface that cannot be allocated, and [`EaselError::Config`] for an
    /// invalid style override or scale.
    pub fn render_png(&self, scene: &Scene, scale: f64) -> Result<Vec<u8>, EaselError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(EaselError::Config(format!("invalid PNG scale `{scale}`")));
        }
        let export = self.config.export();
        let mut config: RenderConfig = scene.render_config(self.config.render());
        config.exporting = true;
        config.zoom = scale;
        config.grid.visible = export.include_grid();
        config.axes = false;
        if let Some(color) = self.background_override()? {
            config.view_background_color = Some(color);
        }
        if !export.background() {
            config.view_background_color = Some(Color::from_rgba8(0, 0, 0, 0));
        }

        let padding = export.padding();
        let content = common_bounds(scene.elements().values(), scene.elements()).unwrap_or_default();
        config.scroll_x = padding - content.min_x();
        config.scroll_y = padding - content.min_y();
        let width = ((content.width() + 2.0 * padding) * scale).ceil().max(1.0) as u32;
        let height = ((content.height() + 2.0 * padding) * scale).ceil().max(1.0) as u32;
        config.viewport_width = f64::from(width);
        config.viewport_height = f64::from(height);

        info!(width = width, height = height, scale = scale; "Rendering PNG snapshot");
        let mut surface = PixmapSurface::new(width, height)?;
        let report = RasterRenderer::new().render_frame(&mut surface, scene.elements(), scene.files(), &config)?;
        debug!(painted = report.painted, failed = report.failed.len(); "Snapshot painted");

        Ok(surface.encode_png()?)
    }

    fn background_override(&self) -> Result<Option<Color>, EaselError> {
        self.config.style().background_color().map_err(EaselError::Config)
    }
}
