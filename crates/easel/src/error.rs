//! Error types for Easel operations.
//!
//! [`EaselError`] is what the facade returns. Per-element paint failures never
//! reach it: each backend logs and skips them. Only the failures that make a
//! whole render meaningless surface here, see [`RenderError`].

use std::io;

use thiserror::Error;

use easel_core::identifier::Id;

/// Render failures that abort the whole frame or export.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// The scene holds an element kind this engine does not know how to draw.
    #[error("element `{id}` has an unsupported kind")]
    UnsupportedElement { id: Id },

    #[error("surface error: {0}")]
    Surface(String),
}

/// The main error type for Easel operations.
///
/// # Diagnostic Variants
///
/// The `Scene` variant keeps the scene source next to the JSON error so that
/// callers can point at the offending line and column.
#[derive(Debug, Error)]
pub enum EaselError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid scene: {err}")]
    Scene { err: serde_json::Error, src: String },

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<crate::export::Error> for EaselError {
    fn from(error: crate::export::Error) -> Self {
        match error {
            // keep fatal render errors distinguishable from write failures
            crate::export::Error::Render(err) => Self::Render(err),
            err @ crate::export::Error::Io(_) => Self::Export(Box::new(err)),
        }
    }
}

impl EaselError {
    /// Create a new `Scene` error with the associated source text.
    pub fn new_scene_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Scene {
            err,
            src: src.into(),
        }
    }
}
