//! tiny-skia backed rendering context.

use super::{ClipRect, FillStyle, RenderContext};
use crate::error::{InkError, InkResult};
use crate::style::{FillRule, LineCap, LineJoin};
use tiny_skia::{Mask, Paint, Path, PathBuilder, Pixmap, Rect, SpreadMode, Stroke, Transform};

/// Maximum canvas dimension (same as Chrome).
const MAX_DIMENSION: u32 = 32767;

/// Rendering context drawing into an owned premultiplied RGBA pixmap.
pub struct SkiaContext {
    /// Pixel buffer.
    pixmap: Pixmap,
    /// Current transform.
    transform: Transform,
    /// Current fill style.
    fill: FillStyle,
    /// Current stroke color.
    stroke_color: tiny_skia::Color,
    /// Current stroke geometry (width, caps, joins, dash).
    stroke: Stroke,
    /// Current clip, `None` when unclipped.
    clip: Option<Mask>,
}

impl SkiaContext {
    /// Create a context with a transparent canvas of the given size.
    pub fn new(width: u32, height: u32) -> InkResult<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(InkError::InvalidDimensions { width, height });
        }
        let pixmap =
            Pixmap::new(width, height).ok_or(InkError::InvalidDimensions { width, height })?;

        Ok(Self {
            pixmap,
            transform: Transform::identity(),
            fill: FillStyle::default(),
            stroke_color: tiny_skia::Color::BLACK,
            stroke: Stroke::default(),
            clip: None,
        })
    }

    /// Get canvas width.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Get canvas height.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Current transform.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Current fill style.
    pub fn fill_style(&self) -> &FillStyle {
        &self.fill
    }

    /// Current stroke configuration.
    pub fn stroke(&self) -> &Stroke {
        &self.stroke
    }

    /// Whether a clip is active.
    pub fn has_clip(&self) -> bool {
        self.clip.is_some()
    }

    fn fill_paint(style: &FillStyle) -> Paint<'_> {
        let mut paint = Paint {
            anti_alias: true,
            ..Default::default()
        };
        match style {
            FillStyle::Color(color) => paint.set_color(*color),
            FillStyle::Pattern(pattern) => {
                paint.shader = tiny_skia::Pattern::new(
                    pattern.pixmap.as_ref(),
                    SpreadMode::Pad,
                    pattern.quality,
                    1.0,
                    pattern.transform,
                );
            }
        }
        paint
    }

    fn clip_mask(&self, rect: ClipRect) -> Option<Mask> {
        let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())?;
        if let Some(bounds) = Rect::from_ltrb(rect.left, rect.top, rect.right, rect.bottom) {
            let path = PathBuilder::from_rect(bounds);
            mask.fill_path(&path, tiny_skia::FillRule::Winding, false, Transform::identity());
        }
        Some(mask)
    }
}

impl RenderContext for SkiaContext {
    fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    fn set_fill_style(&mut self, style: FillStyle) {
        self.fill = style;
    }

    fn set_stroke_color(&mut self, color: tiny_skia::Color) {
        self.stroke_color = color;
    }

    fn set_stroke_width(&mut self, width: f32) {
        self.stroke.width = width;
    }

    fn set_stroke_dash(&mut self, pattern: Vec<f32>) {
        // StrokeDash rejects empty, odd-length and all-zero patterns; all draw solid.
        self.stroke.dash = tiny_skia::StrokeDash::new(pattern, 0.0);
    }

    fn set_stroke_cap(&mut self, cap: LineCap) {
        self.stroke.line_cap = cap.into();
    }

    fn set_stroke_join(&mut self, join: LineJoin) {
        self.stroke.line_join = join.into();
    }

    fn set_stroke_miter_limit(&mut self, limit: f32) {
        self.stroke.miter_limit = limit;
    }

    fn set_clip_rect(&mut self, rect: ClipRect) {
        log::debug!(target: "ink", "clip {:?}", rect);
        let full = rect.left <= 0.0
            && rect.top <= 0.0
            && rect.right >= self.pixmap.width() as f32
            && rect.bottom >= self.pixmap.height() as f32;
        self.clip = if full { None } else { self.clip_mask(rect) };
    }

    fn rotate_about(&mut self, angle: f32, x: f32, y: f32) {
        let cos = angle.cos();
        let sin = angle.sin();
        let rotation = Transform::from_row(cos, sin, -sin, cos, 0.0, 0.0);
        self.transform = self
            .transform
            .pre_translate(x, y)
            .pre_concat(rotation)
            .pre_translate(-x, -y);
    }

    fn reset_transform(&mut self) {
        self.transform = Transform::identity();
    }

    fn fill_path(&mut self, path: &Path, rule: FillRule) {
        let paint = Self::fill_paint(&self.fill);
        self.pixmap
            .fill_path(path, &paint, rule.into(), self.transform, self.clip.as_ref());
    }

    fn stroke_path(&mut self, path: &Path) {
        let mut paint = Paint {
            anti_alias: true,
            ..Default::default()
        };
        paint.set_color(self.stroke_color);
        self.pixmap
            .stroke_path(path, &paint, &self.stroke, self.transform, self.clip.as_ref());
    }

    fn fill_all(&mut self) {
        let Some(bounds) =
            Rect::from_xywh(0.0, 0.0, self.pixmap.width() as f32, self.pixmap.height() as f32)
        else {
            return;
        };
        let mut paint = Self::fill_paint(&self.fill);
        paint.blend_mode = tiny_skia::BlendMode::Source;
        paint.anti_alias = false;
        self.pixmap
            .fill_rect(bounds, &paint, Transform::identity(), self.clip.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(ctx: &SkiaContext, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * ctx.width() + x) * 4) as usize;
        let data = ctx.pixmap().data();
        [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]
    }

    fn square(x: f32, y: f32, size: f32) -> Path {
        PathBuilder::from_rect(Rect::from_xywh(x, y, size, size).unwrap())
    }

    #[test]
    fn test_new_context_defaults() {
        let ctx = SkiaContext::new(40, 30).unwrap();
        assert_eq!(ctx.width(), 40);
        assert_eq!(ctx.height(), 30);
        assert!(!ctx.has_clip());
        assert!(ctx.transform().is_identity());
        assert!(ctx.pixmap().data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            SkiaContext::new(0, 10),
            Err(InkError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            SkiaContext::new(10, MAX_DIMENSION + 1),
            Err(InkError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_fill_all_replaces_pixels() {
        let mut ctx = SkiaContext::new(10, 10).unwrap();
        ctx.set_fill_style(FillStyle::Color(tiny_skia::Color::from_rgba8(255, 0, 0, 255)));
        ctx.fill_all();
        ctx.set_fill_style(FillStyle::Color(tiny_skia::Color::TRANSPARENT));
        ctx.fill_all();
        assert_eq!(pixel(&ctx, 5, 5), [0, 0, 0, 0]);
    }

    #[test]
    fn test_clip_is_replaced_not_intersected() {
        let mut ctx = SkiaContext::new(40, 40).unwrap();
        ctx.set_fill_style(FillStyle::Color(tiny_skia::Color::from_rgba8(0, 0, 255, 255)));

        ctx.set_clip_rect(ClipRect::from_corners(0.0, 0.0, 10.0, 10.0));
        ctx.set_clip_rect(ClipRect::from_corners(20.0, 20.0, 30.0, 30.0));
        ctx.fill_path(&square(0.0, 0.0, 40.0), FillRule::NonZero);

        assert_eq!(pixel(&ctx, 5, 5), [0, 0, 0, 0]);
        assert_eq!(pixel(&ctx, 25, 25), [0, 0, 255, 255]);
        assert_eq!(pixel(&ctx, 35, 35), [0, 0, 0, 0]);
    }

    #[test]
    fn test_full_canvas_clip_clears_mask() {
        let mut ctx = SkiaContext::new(20, 20).unwrap();
        ctx.set_clip_rect(ClipRect::from_corners(2.0, 2.0, 5.0, 5.0));
        assert!(ctx.has_clip());
        ctx.set_clip_rect(ClipRect::from_corners(0.0, 20.0, 20.0, 0.0));
        assert!(!ctx.has_clip());
    }

    #[test]
    fn test_rotate_about_keeps_pivot_fixed() {
        let mut ctx = SkiaContext::new(10, 10).unwrap();
        ctx.rotate_about(std::f32::consts::FRAC_PI_2, 5.0, 5.0);
        let mut pivot = [tiny_skia::Point::from_xy(5.0, 5.0)];
        ctx.transform().map_points(&mut pivot);
        assert!((pivot[0].x - 5.0).abs() < 1e-4);
        assert!((pivot[0].y - 5.0).abs() < 1e-4);

        ctx.reset_transform();
        assert!(ctx.transform().is_identity());
    }

    #[test]
    fn test_dash_pattern_validation() {
        let mut ctx = SkiaContext::new(10, 10).unwrap();
        ctx.set_stroke_dash(vec![4.0, 2.0]);
        assert!(ctx.stroke().dash.is_some());
        ctx.set_stroke_dash(Vec::new());
        assert!(ctx.stroke().dash.is_none());
    }
}
