//! SVG export backend.
//!
//! [`Svg`] turns a [`Scene`] into one self-contained SVG document: every
//! element becomes a group carrying the same `translate(..) rotate(..)`
//! transform the raster backend applies, frame containment becomes a shared
//! `<clipPath>`, bitmaps are defined once as `<symbol>`s and instantiated with
//! `<use>`, and embedded web content degrades to plain hyperlinks.
//!
//! Exports are one-shot: all per-document state (symbol table, definition
//! ids) lives in the call that renders the document.

mod document;
mod elements;
mod embed;
mod primitives;
mod symbols;

use std::io;

use log::{debug, error, info};
use thiserror::Error;

use easel_core::{
    color::Color,
    config::RenderConfig,
    error::GeometryError,
    identifier::Id,
    syntax::Tokenizer,
};
use easel_syntax::SyntaxTokenizer;

use crate::{config::ExportConfig, error::RenderError, export, scene::Scene};

type SvgNode = Box<dyn svg::Node>;

/// A failure while exporting one element.
///
/// Like [`PaintError`](crate::raster::PaintError) on the raster side these are
/// logged and the element is left out; the document is still produced.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ElementError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("element `{id}` produced an empty outline")]
    Path { id: Id },
}

/// Builder for [`Svg`] exporters.
///
/// # Examples
///
/// ```
/// use easel::export::svg::SvgBuilder;
/// use easel::config::ExportConfig;
///
/// let svg = SvgBuilder::new()
///     .with_export_config(ExportConfig::default().with_padding(20.0))
///     .build();
/// assert_eq!(svg.export_config().padding(), 20.0);
/// ```
pub struct SvgBuilder {
    render: RenderConfig,
    export: ExportConfig,
    background_color: Option<Color>,
    tokenizer: Option<Box<dyn Tokenizer>>,
}

impl Default for SvgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgBuilder {
    pub fn new() -> Self {
        Self {
            render: RenderConfig::default(),
            export: ExportConfig::default(),
            background_color: None,
            tokenizer: None,
        }
    }

    /// Base render configuration; scene app state is applied on top of it.
    pub fn with_render_config(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    pub fn with_export_config(mut self, export: ExportConfig) -> Self {
        self.export = export;
        self
    }

    /// Overrides the document background color.
    pub fn with_background_color(mut self, color: Option<Color>) -> Self {
        self.background_color = color;
        self
    }

    /// Uses `tokenizer` to color code blocks.
    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn build(self) -> Svg {
        let mut render = self.render;
        render.exporting = true;
        if self.background_color.is_some() {
            render.view_background_color = self.background_color;
        }
        Svg {
            render,
            export: self.export,
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| Box::new(SyntaxTokenizer::new())),
        }
    }
}

/// The SVG exporter.
pub struct Svg {
    render: RenderConfig,
    export: ExportConfig,
    tokenizer: Box<dyn Tokenizer>,
}

impl Svg {
    pub fn export_config(&self) -> &ExportConfig {
        &self.export
    }

    /// Renders `scene` into a string.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnsupportedElement`] for a scene holding an
    /// element kind this backend cannot draw.
    pub fn render_to_string(&self, scene: &Scene) -> Result<String, RenderError> {
        let doc = self.render_document(scene)?;
        Ok(doc.to_string())
    }

    /// Writes a rendered document to `out`.
    fn write_document(&self, doc: &svg::Document, out: &mut dyn io::Write) -> Result<(), export::Error> {
        if let Err(err) = write!(out, "{doc}") {
            error!(err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }
        Ok(())
    }
}

impl export::Exporter for Svg {
    fn export_scene(&mut self, scene: &Scene, out: &mut dyn io::Write) -> Result<(), export::Error> {
        info!(elements = scene.elements().len(); "Exporting scene to SVG");
        let doc = self.render_document(scene)?;
        debug!("SVG document rendered");

        self.write_document(&doc, out)
    }
}
