//! Stateful 2D rendering context.
//!
//! The device never talks to tiny-skia directly. All drawing goes through
//! [`RenderContext`], which keeps paint, stroke, transform and clip state
//! between calls the way a canvas context does. [`SkiaContext`] is the
//! pixmap-backed implementation.

mod skia;

pub use skia::SkiaContext;

use crate::style::{FillRule, LineCap, LineJoin};
use tiny_skia::{FilterQuality, Path, Pixmap, Transform};

/// Fill style of a rendering context.
#[derive(Debug, Clone)]
pub enum FillStyle {
    /// Solid color fill.
    Color(tiny_skia::Color),
    /// Raster image fill.
    Pattern(RasterPattern),
}

impl Default for FillStyle {
    fn default() -> Self {
        FillStyle::Color(tiny_skia::Color::BLACK)
    }
}

/// A premultiplied image used as a pad-extended pattern fill.
#[derive(Debug, Clone)]
pub struct RasterPattern {
    /// The pattern image.
    pub pixmap: Pixmap,
    /// Pattern-to-user-space transform.
    pub transform: Transform,
    /// Sampling quality.
    pub quality: FilterQuality,
}

/// Axis-aligned clip rectangle in device units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ClipRect {
    /// Build a clip from two corners given in any order.
    pub fn from_corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            left: x0.min(x1),
            top: y0.min(y1),
            right: x0.max(x1),
            bottom: y0.max(y1),
        }
    }
}

/// A stateful drawing context bound to one canvas.
pub trait RenderContext {
    /// The canvas the context draws into.
    fn pixmap(&self) -> &Pixmap;

    /// Set the paint used by fills.
    fn set_fill_style(&mut self, style: FillStyle);

    /// Set the color used by strokes.
    fn set_stroke_color(&mut self, color: tiny_skia::Color);

    /// Set the stroke width in device units.
    fn set_stroke_width(&mut self, width: f32);

    /// Set the dash pattern; an empty pattern draws continuous lines.
    fn set_stroke_dash(&mut self, pattern: Vec<f32>);

    fn set_stroke_cap(&mut self, cap: LineCap);

    fn set_stroke_join(&mut self, join: LineJoin);

    fn set_stroke_miter_limit(&mut self, limit: f32);

    /// Replace the current clip with a rectangle.
    fn set_clip_rect(&mut self, rect: ClipRect);

    /// Rotate by `angle` radians about `(x, y)`, composing with the current transform.
    fn rotate_about(&mut self, angle: f32, x: f32, y: f32);

    /// Reset the transform to identity.
    fn reset_transform(&mut self);

    /// Fill a path with the current fill style.
    fn fill_path(&mut self, path: &Path, rule: FillRule);

    /// Stroke a path with the current stroke configuration.
    fn stroke_path(&mut self, path: &Path);

    /// Replace every pixel inside the clip with the current fill style.
    fn fill_all(&mut self);
}
