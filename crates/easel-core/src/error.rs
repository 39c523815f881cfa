//! Error types raised by the core geometry routines.

use thiserror::Error;

use crate::identifier::Id;

/// Geometry that cannot be turned into coordinates or paths.
///
/// These are per-element problems: backends log them and keep painting the
/// remaining elements.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("element `{id}` has non-finite {field}")]
    NonFinite { id: Id, field: &'static str },

    #[error("element `{id}` has negative size {width}x{height}")]
    NegativeSize { id: Id, width: f64, height: f64 },

    #[error("linear element `{id}` has {count} point(s), at least 2 are required")]
    TooFewPoints { id: Id, count: usize },

    #[error("path could not be built: {0}")]
    Path(String),
}
