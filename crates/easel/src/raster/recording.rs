//! A surface that records calls instead of drawing.

use easel_core::{
    color::Color,
    element::Bitmap,
    geometry::{Bounds, Point},
    path::PathData,
    stroke::StrokeDefinition,
};

use super::{PaintError, Surface};
use crate::subrender::TextRun;

/// One recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Save,
    Restore,
    Translate { dx: f64, dy: f64 },
    Scale { sx: f64, sy: f64 },
    Rotate { degrees: f64, cx: f64, cy: f64 },
    MultiplyAlpha(f64),
    ClipRect(Bounds),
    ClipExclude { outer: Bounds, hole: Bounds },
    Clear(Color),
    FillPath { path: PathData, color: Color },
    StrokePath { path: PathData, stroke: StrokeDefinition },
    FillText(TextRun),
    DrawImage { src: Bounds, dst: Bounds },
}

/// Records every call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<SurfaceCall> {
        std::mem::take(&mut self.calls)
    }

    /// Text of every `FillText` call, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::FillText(run) => Some(run.text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn save(&mut self) {
        self.calls.push(SurfaceCall::Save);
    }

    fn restore(&mut self) {
        self.calls.push(SurfaceCall::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.calls.push(SurfaceCall::Translate { dx, dy });
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.calls.push(SurfaceCall::Scale { sx, sy });
    }

    fn rotate(&mut self, degrees: f64, pivot: Point) {
        self.calls.push(SurfaceCall::Rotate {
            degrees,
            cx: pivot.x(),
            cy: pivot.y(),
        });
    }

    fn multiply_alpha(&mut self, alpha: f64) {
        self.calls.push(SurfaceCall::MultiplyAlpha(alpha));
    }

    fn clip_rect(&mut self, bounds: Bounds) {
        self.calls.push(SurfaceCall::ClipRect(bounds));
    }

    fn clip_exclude(&mut self, outer: Bounds, hole: Bounds) {
        self.calls.push(SurfaceCall::ClipExclude { outer, hole });
    }

    fn clear(&mut self, color: Color) {
        self.calls.push(SurfaceCall::Clear(color));
    }

    fn fill_path(&mut self, path: &PathData, color: Color) -> Result<(), PaintError> {
        self.calls.push(SurfaceCall::FillPath {
            path: path.clone(),
            color,
        });
        Ok(())
    }

    fn stroke_path(&mut self, path: &PathData, stroke: &StrokeDefinition) -> Result<(), PaintError> {
        self.calls.push(SurfaceCall::StrokePath {
            path: path.clone(),
            stroke: stroke.clone(),
        });
        Ok(())
    }

    fn fill_text(&mut self, run: &TextRun) {
        self.calls.push(SurfaceCall::FillText(run.clone()));
    }

    fn draw_image(&mut self, _bitmap: &Bitmap, src: Bounds, dst: Bounds) -> Result<(), PaintError> {
        self.calls.push(SurfaceCall::DrawImage { src, dst });
        Ok(())
    }
}
