//! Primitive drawing.
//!
//! Every primitive decides up front whether its fill and its stroke would
//! show. Invisible parts are skipped before any state reaches the context.

use super::{GraphicsContext, InkDevice};
use crate::context::{ClipRect, FillStyle, RenderContext};
use crate::geometry::{
    circle_path, compound_path, line_path, polygon_path, polyline_path, rect_path,
};
use crate::raster::{mount_raster, raster_pattern, RasterImage, RasterPlacement};
use crate::sink::PageSink;
use crate::style::{FillRule, LineJoin, LTY_BLANK};
use crate::text::FontBackend;
use tiny_skia::Path;

/// Smallest radius a circle is drawn with.
const MIN_CIRCLE_RADIUS: f64 = 0.5;

/// Miter limit used for rectangle outlines.
const RECT_MITER_LIMIT: f32 = 5.0;

fn stroke_visible(gc: &GraphicsContext) -> bool {
    gc.col.is_visible() && gc.lwd > 0.0 && gc.lty != LTY_BLANK
}

impl<S: PageSink, B: FontBackend, C: RenderContext> InkDevice<S, B, C> {
    // --- Style application ---

    fn apply_fill(&mut self, gc: &GraphicsContext) {
        self.state.set_fill_color(&mut self.context, gc.fill);
    }

    /// Push stroke state; `join` is `(join, miter limit)` for primitives with corners.
    fn apply_stroke(&mut self, gc: &GraphicsContext, join: Option<(LineJoin, f32)>) {
        let width = self.device_line_width(gc.lwd);
        self.state.set_stroke_color(&mut self.context, gc.col);
        self.state.set_line_width(&mut self.context, width);
        self.state.set_line_cap(&mut self.context, gc.lend);
        if let Some((join, limit)) = join {
            self.state.set_line_join(&mut self.context, join);
            self.state.set_miter_limit(&mut self.context, limit);
        }
        self.state.set_line_type(&mut self.context, gc.lty);
    }

    fn fill_and_stroke(
        &mut self,
        path: &Path,
        rule: FillRule,
        draw_fill: bool,
        draw_stroke: bool,
        gc: &GraphicsContext,
        join: Option<(LineJoin, f32)>,
    ) {
        if draw_fill {
            self.apply_fill(gc);
            self.context.fill_path(path, rule);
        }
        if draw_stroke {
            self.apply_stroke(gc, join);
            self.context.stroke_path(path);
        }
    }

    // --- Primitives ---

    pub fn set_clip(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        self.clip = ClipRect::from_corners(x0 as f32, y0 as f32, x1 as f32, y1 as f32);
        self.context.set_clip_rect(self.clip);
    }

    pub fn draw_circle(&mut self, x: f64, y: f64, r: f64, gc: &GraphicsContext) {
        let draw_fill = gc.fill.is_visible();
        let draw_stroke = stroke_visible(gc);
        if !draw_fill && !draw_stroke {
            return;
        }
        log::debug!(target: "ink", "circle ({}, {}) r={}", x, y, r);
        let Some(path) = circle_path(x, y, r, MIN_CIRCLE_RADIUS) else {
            return;
        };
        self.fill_and_stroke(&path, FillRule::NonZero, draw_fill, draw_stroke, gc, None);
    }

    pub fn draw_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, gc: &GraphicsContext) {
        let draw_fill = gc.fill.is_visible();
        let draw_stroke = stroke_visible(gc);
        if !draw_fill && !draw_stroke {
            return;
        }
        log::debug!(target: "ink", "rect ({}, {}) ({}, {})", x0, y0, x1, y1);
        let Some(path) = rect_path(x0, y0, x1, y1) else {
            return;
        };
        let join = Some((LineJoin::Miter, RECT_MITER_LIMIT));
        self.fill_and_stroke(&path, FillRule::NonZero, draw_fill, draw_stroke, gc, join);
    }

    pub fn draw_polygon(&mut self, x: &[f64], y: &[f64], gc: &GraphicsContext) {
        let draw_fill = gc.fill.is_visible();
        let draw_stroke = stroke_visible(gc);
        if !draw_fill && !draw_stroke {
            return;
        }
        let Some(path) = polygon_path(x, y) else {
            return;
        };
        log::debug!(target: "ink", "polygon n={}", x.len().min(y.len()));
        let join = Some((gc.ljoin, gc.lmitre as f32));
        self.fill_and_stroke(&path, FillRule::NonZero, draw_fill, draw_stroke, gc, join);
    }

    pub fn draw_polyline(&mut self, x: &[f64], y: &[f64], gc: &GraphicsContext) {
        if !stroke_visible(gc) {
            return;
        }
        let Some(path) = polyline_path(x, y) else {
            return;
        };
        log::debug!(target: "ink", "polyline n={}", x.len().min(y.len()));
        let join = Some((gc.ljoin, gc.lmitre as f32));
        self.fill_and_stroke(&path, FillRule::NonZero, false, true, gc, join);
    }

    pub fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, gc: &GraphicsContext) {
        if !stroke_visible(gc) {
            return;
        }
        let Some(path) = line_path(x1, y1, x2, y2) else {
            return;
        };
        self.fill_and_stroke(&path, FillRule::NonZero, false, true, gc, None);
    }

    /// Draw closed subpaths read from one coordinate stream.
    pub fn draw_path(
        &mut self,
        counts: &[usize],
        x: &[f64],
        y: &[f64],
        rule: FillRule,
        gc: &GraphicsContext,
    ) {
        let draw_fill = gc.fill.is_visible();
        let draw_stroke = stroke_visible(gc);
        if !draw_fill && !draw_stroke {
            return;
        }
        let Some(path) = compound_path(counts, x, y) else {
            return;
        };
        log::debug!(target: "ink", "path subpaths={} rule={:?}", counts.len(), rule);
        let join = Some((gc.ljoin, gc.lmitre as f32));
        self.fill_and_stroke(&path, rule, draw_fill, draw_stroke, gc, join);
    }

    /// Draw a host raster into its destination rectangle.
    ///
    /// The pattern fill and rotation are undone afterwards so the cached fill
    /// color stays in effect.
    pub fn draw_raster(&mut self, image: &RasterImage<'_>, placement: &RasterPlacement) {
        let pixmap = match mount_raster(image) {
            Ok(Some(pixmap)) => pixmap,
            Ok(None) => return,
            Err(err) => {
                self.warn(&format!("ink failed to mount raster: {}", err));
                return;
            }
        };
        let Some(rect) = rect_path(
            placement.x,
            placement.y,
            placement.x + placement.width,
            placement.y + placement.height,
        ) else {
            return;
        };
        log::debug!(
            target: "ink",
            "raster {}x{} -> {:?}",
            image.width,
            image.height,
            placement
        );

        let pattern = raster_pattern(pixmap, placement);
        self.context.set_fill_style(FillStyle::Pattern(pattern));
        if placement.rotation != 0.0 {
            let angle = (-placement.rotation).to_radians() as f32;
            self.context
                .rotate_about(angle, placement.x as f32, placement.y as f32);
        }
        self.context.fill_path(&rect, FillRule::NonZero);

        self.context.reset_transform();
        let restored = match self.state.fill_color() {
            Some(color) => FillStyle::Color(color.into()),
            None => FillStyle::default(),
        };
        self.context.set_fill_style(restored);
    }
}
