use easel_core::{
    color::Color,
    element::Bitmap,
    geometry::{Bounds, Point},
    path::PathData,
    stroke::StrokeDefinition,
};

use super::PaintError;
use crate::subrender::TextRun;

/// A canvas-like drawing target.
///
/// Transforms compose in call order, so `translate` followed by `rotate`
/// rotates about a pivot given in the translated space. `save` pushes the
/// transform, clip and alpha; `restore` pops them.
pub trait Surface {
    /// Width in device pixels.
    fn width(&self) -> u32;

    /// Height in device pixels.
    fn height(&self) -> u32;

    fn save(&mut self);

    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);

    fn scale(&mut self, sx: f64, sy: f64);

    /// Rotates by `degrees` (clockwise, y down) about `pivot`.
    fn rotate(&mut self, degrees: f64, pivot: Point);

    /// Multiplies the alpha applied to everything painted from now on.
    fn multiply_alpha(&mut self, alpha: f64);

    /// Intersects the clip with `bounds` under the current transform.
    fn clip_rect(&mut self, bounds: Bounds);

    /// Intersects the clip with `outer` minus `hole`.
    fn clip_exclude(&mut self, outer: Bounds, hole: Bounds);

    /// Fills the whole surface, ignoring transform, clip and alpha.
    fn clear(&mut self, color: Color);

    fn fill_path(&mut self, path: &PathData, color: Color) -> Result<(), PaintError>;

    fn stroke_path(&mut self, path: &PathData, stroke: &StrokeDefinition) -> Result<(), PaintError>;

    fn fill_text(&mut self, run: &TextRun);

    /// Draws the `src` region of `bitmap` (in bitmap pixels) into `dst`.
    fn draw_image(&mut self, bitmap: &Bitmap, src: Bounds, dst: Bounds) -> Result<(), PaintError>;
}
