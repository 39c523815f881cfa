//! CLI logic for the Easel scene exporter.
//!
//! Reads a scene document, decodes its embedded bitmaps and writes either an
//! SVG document or a PNG snapshot, depending on the output extension.

pub mod assets;
pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::fs;

use log::info;

use easel::{EaselError, SceneRenderer};

/// Run the Easel CLI application
///
/// # Errors
///
/// Returns `EaselError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Scene parsing errors
/// - Fatal render errors
pub fn run(args: &Args) -> Result<(), EaselError> {
    let format = args.output_format();
    info!(
        input_path = args.input,
        output_path = args.output,
        format:? = format;
        "Processing scene"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(theme) = args.theme {
        app_config.render_mut().theme = theme;
    }
    if args.no_background {
        let export = app_config.export().clone().with_background(false);
        *app_config.export_mut() = export;
    }

    let source = fs::read_to_string(&args.input)?;

    let renderer = SceneRenderer::new(app_config);
    let mut scene = renderer.load_scene(&source)?;

    let bytes = match format {
        OutputFormat::Svg => renderer.render_svg(&scene)?.into_bytes(),
        OutputFormat::Png => {
            assets::prefetch_bitmaps(&mut scene);
            renderer.render_png(&scene, args.scale)?
        }
    };

    fs::write(&args.output, bytes)?;

    info!(output_file = args.output; "Scene exported successfully");

    Ok(())
}
