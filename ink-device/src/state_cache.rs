//! Mirror of the rendering context's paint and stroke state.
//!
//! Drawing a scatter plot issues thousands of primitives with identical
//! styling. Every setter here compares against the last value it pushed to
//! the context and skips the update when nothing changed. All slots start
//! unset, so the first draw always synchronizes.

use crate::color::PackedColor;
use crate::context::{FillStyle, RenderContext};
use crate::style::{convert_linetype, LineCap, LineJoin};

/// Last-applied style values, one slot per axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderStateCache {
    stroke_color: Option<PackedColor>,
    fill_color: Option<PackedColor>,
    line_width: Option<f32>,
    line_type: Option<i32>,
    line_cap: Option<LineCap>,
    line_join: Option<LineJoin>,
    miter_limit: Option<f32>,
}

impl RenderStateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached stroke color, if synchronized.
    pub fn stroke_color(&self) -> Option<PackedColor> {
        self.stroke_color
    }

    /// Cached fill color, if synchronized.
    pub fn fill_color(&self) -> Option<PackedColor> {
        self.fill_color
    }

    /// Cached line width in device units, if synchronized.
    pub fn line_width(&self) -> Option<f32> {
        self.line_width
    }

    /// Cached line type code, if synchronized.
    pub fn line_type(&self) -> Option<i32> {
        self.line_type
    }

    pub fn set_stroke_color<C: RenderContext>(&mut self, ctx: &mut C, color: PackedColor) {
        if self.stroke_color != Some(color) {
            ctx.set_stroke_color(color.into());
            self.stroke_color = Some(color);
        }
    }

    pub fn set_fill_color<C: RenderContext>(&mut self, ctx: &mut C, color: PackedColor) {
        if self.fill_color != Some(color) {
            ctx.set_fill_style(FillStyle::Color(color.into()));
            self.fill_color = Some(color);
        }
    }

    /// Set the stroke width in device units.
    ///
    /// Must precede [`set_line_type`](Self::set_line_type): dash lengths are
    /// multiples of the width, so a width change invalidates the dash.
    pub fn set_line_width<C: RenderContext>(&mut self, ctx: &mut C, width: f32) {
        if self.line_width != Some(width) {
            ctx.set_stroke_width(width);
            self.line_width = Some(width);
            self.line_type = None;
        }
    }

    pub fn set_line_type<C: RenderContext>(&mut self, ctx: &mut C, lty: i32) {
        if self.line_type != Some(lty) {
            let width = self.line_width.unwrap_or(1.0);
            ctx.set_stroke_dash(convert_linetype(lty, width));
            self.line_type = Some(lty);
        }
    }

    pub fn set_line_cap<C: RenderContext>(&mut self, ctx: &mut C, cap: LineCap) {
        if self.line_cap != Some(cap) {
            ctx.set_stroke_cap(cap);
            self.line_cap = Some(cap);
        }
    }

    pub fn set_line_join<C: RenderContext>(&mut self, ctx: &mut C, join: LineJoin) {
        if self.line_join != Some(join) {
            ctx.set_stroke_join(join);
            self.line_join = Some(join);
        }
    }

    pub fn set_miter_limit<C: RenderContext>(&mut self, ctx: &mut C, limit: f32) {
        if self.miter_limit != Some(limit) {
            ctx.set_stroke_miter_limit(limit);
            self.miter_limit = Some(limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ClipRect, SkiaContext};
    use crate::style::FillRule;
    use tiny_skia::{Path, Pixmap};

    /// Counts setter calls and forwards them to a real context.
    struct CountingContext {
        inner: SkiaContext,
        calls: Vec<&'static str>,
    }

    impl CountingContext {
        fn new() -> Self {
            Self {
                inner: SkiaContext::new(4, 4).unwrap(),
                calls: Vec::new(),
            }
        }

        fn count(&self, name: &str) -> usize {
            self.calls.iter().filter(|&&c| c == name).count()
        }
    }

    impl RenderContext for CountingContext {
        fn pixmap(&self) -> &Pixmap {
            self.inner.pixmap()
        }
        fn set_fill_style(&mut self, style: FillStyle) {
            self.calls.push("fill_style");
            self.inner.set_fill_style(style);
        }
        fn set_stroke_color(&mut self, color: tiny_skia::Color) {
            self.calls.push("stroke_color");
            self.inner.set_stroke_color(color);
        }
        fn set_stroke_width(&mut self, width: f32) {
            self.calls.push("width");
            self.inner.set_stroke_width(width);
        }
        fn set_stroke_dash(&mut self, pattern: Vec<f32>) {
            self.calls.push("dash");
            self.inner.set_stroke_dash(pattern);
        }
        fn set_stroke_cap(&mut self, cap: LineCap) {
            self.calls.push("cap");
            self.inner.set_stroke_cap(cap);
        }
        fn set_stroke_join(&mut self, join: LineJoin) {
            self.calls.push("join");
            self.inner.set_stroke_join(join);
        }
        fn set_stroke_miter_limit(&mut self, limit: f32) {
            self.calls.push("miter");
            self.inner.set_stroke_miter_limit(limit);
        }
        fn set_clip_rect(&mut self, rect: ClipRect) {
            self.inner.set_clip_rect(rect);
        }
        fn rotate_about(&mut self, angle: f32, x: f32, y: f32) {
            self.inner.rotate_about(angle, x, y);
        }
        fn reset_transform(&mut self) {
            self.inner.reset_transform();
        }
        fn fill_path(&mut self, path: &Path, rule: FillRule) {
            self.inner.fill_path(path, rule);
        }
        fn stroke_path(&mut self, path: &Path) {
            self.inner.stroke_path(path);
        }
        fn fill_all(&mut self) {
            self.inner.fill_all();
        }
    }

    #[test]
    fn test_first_call_always_synchronizes() {
        let mut ctx = CountingContext::new();
        let mut cache = RenderStateCache::new();
        cache.set_stroke_color(&mut ctx, PackedColor::BLACK);
        cache.set_fill_color(&mut ctx, PackedColor::BLACK);
        cache.set_line_cap(&mut ctx, LineCap::default());
        cache.set_line_join(&mut ctx, LineJoin::default());
        cache.set_miter_limit(&mut ctx, 10.0);
        assert_eq!(
            ctx.calls,
            vec!["stroke_color", "fill_style", "cap", "join", "miter"]
        );
    }

    #[test]
    fn test_repeats_are_elided() {
        let mut ctx = CountingContext::new();
        let mut cache = RenderStateCache::new();
        for _ in 0..3 {
            cache.set_stroke_color(&mut ctx, PackedColor::rgb(1, 2, 3));
            cache.set_fill_color(&mut ctx, PackedColor::rgb(4, 5, 6));
            cache.set_miter_limit(&mut ctx, 5.0);
        }
        assert_eq!(ctx.count("stroke_color"), 1);
        assert_eq!(ctx.count("fill_style"), 1);
        assert_eq!(ctx.count("miter"), 1);

        cache.set_fill_color(&mut ctx, PackedColor::rgb(7, 8, 9));
        assert_eq!(ctx.count("fill_style"), 2);
        assert_eq!(cache.fill_color(), Some(PackedColor::rgb(7, 8, 9)));
    }

    #[test]
    fn test_width_change_invalidates_dash() {
        let mut ctx = CountingContext::new();
        let mut cache = RenderStateCache::new();

        cache.set_line_width(&mut ctx, 2.0);
        cache.set_line_type(&mut ctx, 0x44);
        cache.set_line_width(&mut ctx, 2.0);
        cache.set_line_type(&mut ctx, 0x44);
        assert_eq!(ctx.count("width"), 1);
        assert_eq!(ctx.count("dash"), 1);

        cache.set_line_width(&mut ctx, 3.0);
        cache.set_line_type(&mut ctx, 0x44);
        cache.set_line_type(&mut ctx, 0x44);
        assert_eq!(ctx.count("width"), 2);
        assert_eq!(ctx.count("dash"), 2);
        assert!(ctx.inner.stroke().dash.is_some());
    }
}
