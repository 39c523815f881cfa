//! Raster backend.
//!
//! [`RasterRenderer::render_frame`] paints a full frame onto any [`Surface`]:
//! background, grid, axes, both paint passes and the editor affordances. It is
//! the immediate entry point; [`InteractiveCanvas`] adds trailing-edge
//! coalescing on top for continuous input.
//!
//! Two surfaces ship with the crate: [`PixmapSurface`] rasterizes with
//! tiny-skia, [`RecordingSurface`] records calls for deterministic tests.

mod canvas;
mod elements;
mod icons;
mod pixmap;
mod recording;
mod renderer;
mod scheduler;
mod surface;

pub use canvas::{FrameRequest, InteractiveCanvas};
pub use icons::{AffordanceKind, IconCache};
pub use pixmap::PixmapSurface;
pub use recording::{RecordingSurface, SurfaceCall};
pub use renderer::{FrameReport, RasterRenderer};
pub use scheduler::RepaintScheduler;
pub use surface::Surface;

use thiserror::Error;

use easel_core::{error::GeometryError, identifier::Id};

/// A failure while painting one element.
///
/// These never abort a frame: the renderer logs them with the element's
/// geometry and moves on to the next element.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PaintError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("path of element `{id}` is empty or degenerate")]
    Path { id: Id },

    #[error("image could not be drawn: {0}")]
    Image(String),
}
