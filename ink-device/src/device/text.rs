//! Text drawing and metric queries.

use super::{GraphicsContext, InkDevice};
use crate::context::RenderContext;
use crate::sink::PageSink;
use crate::text::{CharMetric, FontBackend};

impl<S: PageSink, B: FontBackend, C: RenderContext> InkDevice<S, B, C> {
    /// Load the font `gc` asks for; reports and returns false on failure.
    fn load_font(&mut self, gc: &GraphicsContext) -> bool {
        let size = self.device_font_size(gc);
        match self.fonts.load_font(&gc.fontfamily, gc.fontface, size) {
            Ok(()) => true,
            Err(err) => {
                self.warn(&format!(
                    "ink failed to load font: '{}' ({})",
                    gc.fontfamily, err
                ));
                false
            }
        }
    }

    pub fn draw_text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        rot: f64,
        hadj: f64,
        gc: &GraphicsContext,
    ) {
        if !gc.col.is_visible() || text.is_empty() {
            return;
        }
        if !self.load_font(gc) {
            return;
        }
        log::debug!(target: "ink", "text '{}' at ({}, {}) rot={} hadj={}", text, x, y, rot, hadj);
        self.state.set_fill_color(&mut self.context, gc.col);
        if let Err(err) = self
            .fonts
            .plot_text(&mut self.context, x, y, text, rot, hadj)
        {
            self.warn(&format!("ink failed to draw text: {}", err));
        }
    }

    /// Advance width of `text` in device units.
    pub fn string_width(&mut self, text: &str, gc: &GraphicsContext) -> f64 {
        if !self.load_font(gc) {
            return 0.0;
        }
        match self.fonts.text_width(text) {
            Ok(width) => width as f64,
            Err(err) => {
                self.warn(&format!("ink failed to shape text: {}", err));
                0.0
            }
        }
    }

    /// Ascent, descent and ink width of character `c` in device units.
    pub fn char_metric(&mut self, c: i32, gc: &GraphicsContext) -> CharMetric {
        if !self.load_font(gc) {
            return CharMetric::default();
        }
        match self.fonts.char_metric(c) {
            Ok(metric) => metric,
            Err(err) => {
                self.warn(&format!("ink failed to shape text: {}", err));
                CharMetric::default()
            }
        }
    }
}
