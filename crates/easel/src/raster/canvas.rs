//! The editor-facing raster entry point.

use std::rc::Rc;

use log::trace;

use easel_core::{
    config::RenderConfig,
    element::{ElementMap, FileMap},
};

use super::{FrameReport, RasterRenderer, RepaintScheduler, Surface};
use crate::error::RenderError;

/// Everything one frame paints from.
///
/// Maps are shared so that queuing a request never copies the scene.
#[derive(Debug, Clone)]
pub struct FrameRequest {
    pub elements: Rc<ElementMap>,
    pub files: Rc<FileMap>,
    pub config: RenderConfig,
}

impl FrameRequest {
    pub fn new(elements: Rc<ElementMap>, files: Rc<FileMap>, config: RenderConfig) -> Self {
        Self {
            elements,
            files,
            config,
        }
    }
}

/// Owns a persistent surface and repaints it on request.
///
/// Immediate requests paint synchronously. Throttled requests go through a
/// [`RepaintScheduler`]; the host calls
/// [`on_animation_frame`](Self::on_animation_frame) on each display refresh
/// while [`needs_frame`](Self::needs_frame) is true.
pub struct InteractiveCanvas<S: Surface> {
    surface: S,
    renderer: RasterRenderer,
    scheduler: RepaintScheduler<FrameRequest>,
}

impl<S: Surface> InteractiveCanvas<S> {
    pub fn new(surface: S) -> Self {
        Self::with_renderer(surface, RasterRenderer::new())
    }

    pub fn with_renderer(surface: S, renderer: RasterRenderer) -> Self {
        Self {
            surface,
            renderer,
            scheduler: RepaintScheduler::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn renderer_mut(&mut self) -> &mut RasterRenderer {
        &mut self.renderer
    }

    /// Swaps in a new surface, e.g. after the viewport was resized.
    pub fn replace_surface(&mut self, surface: S) -> S {
        std::mem::replace(&mut self.surface, surface)
    }

    /// Requests a repaint.
    ///
    /// With `throttled == false` the frame is painted now and its report
    /// returned. Otherwise the request is queued and `Ok(None)` returned.
    ///
    /// # Errors
    ///
    /// Returns the renderer's fatal error for an immediate request.
    pub fn request_render(
        &mut self,
        request: FrameRequest,
        throttled: bool,
    ) -> Result<Option<FrameReport>, RenderError> {
        if !throttled {
            return self.paint(&request).map(Some);
        }
        if self.scheduler.request(request) {
            trace!("Repaint scheduled");
        }
        Ok(None)
    }

    /// True while a throttled repaint is waiting for a display refresh.
    pub fn needs_frame(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Paints the pending throttled request, if any.
    ///
    /// # Errors
    ///
    /// Returns the renderer's fatal error; the trailing request, if any, stays
    /// queued.
    pub fn on_animation_frame(&mut self) -> Result<Option<FrameReport>, RenderError> {
        match self.scheduler.on_tick() {
            Some(request) => self.paint(&request).map(Some),
            None => Ok(None),
        }
    }

    /// Drops any queued repaint.
    pub fn cancel_pending(&mut self) {
        self.scheduler.cancel();
    }

    fn paint(&mut self, request: &FrameRequest) -> Result<FrameReport, RenderError> {
        self.renderer
            .render_frame(&mut self.surface, &request.elements, &request.files, &request.config)
    }
}
