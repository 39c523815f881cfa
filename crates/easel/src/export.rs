//! Export of scenes into standalone documents.
//!
//! This module provides the [`Exporter`] trait implemented by the export
//! backends. Unlike the raster backend, an export is a synchronous one-shot
//! call: the exporter builds a complete document for one scene, writes it and
//! keeps nothing for the next call.
//!
//! # Available Backends
//!
//! - [`svg`] — SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`]. Per-element failures never reach it;
//! only fatal render errors and I/O errors do. [`Error`] converts into
//! [`EaselError`] at the crate boundary.
//!
//! [`EaselError`]: crate::EaselError

/// SVG export backend.
pub mod svg;

use std::io;

use crate::{error::RenderError, scene::Scene};

/// Abstraction for scene export backends.
pub trait Exporter {
    /// Exports `scene` and writes the document to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the scene cannot be rendered at all, or
    /// [`Error::Io`] if writing the output fails.
    fn export_scene(&mut self, scene: &Scene, out: &mut dyn io::Write) -> Result<(), Error>;
}

/// Errors that can occur during export.
///
/// This type is converted into [`EaselError`] at the crate boundary via the
/// [`From`] implementation in [`crate::error`].
///
/// [`EaselError`]: crate::EaselError
#[derive(Debug)]
pub enum Error {
    /// A fatal render failure, such as an unsupported element kind.
    Render(RenderError),
    /// An I/O error encountered while writing output.
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(err) => write!(f, "Render error: {err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}
