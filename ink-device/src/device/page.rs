//! Page lifecycle.

use super::InkDevice;
use crate::color::PackedColor;
use crate::context::{ClipRect, RenderContext};
use crate::sink::{demultiplied_rgba, PageSink};
use crate::text::FontBackend;

impl<S: PageSink, B: FontBackend, C: RenderContext> InkDevice<S, B, C> {
    /// Write the current page if one has been started.
    fn flush_page(&mut self) {
        if self.page_no == 0 {
            return;
        }
        if let Err(err) = self.sink.write_page(self.context.pixmap(), self.page_no) {
            self.warn(&format!("ink could not write to the given file: {}", err));
        }
    }

    /// Finish the current page and clear the canvas.
    ///
    /// The canvas is replaced with `background`, or with the configured
    /// background when `background` is fully transparent. `advance` is false
    /// only for the implicit page set up when the device opens.
    pub fn start_page(&mut self, background: PackedColor, advance: bool) {
        self.flush_page();

        let width = self.context.pixmap().width() as f32;
        let height = self.context.pixmap().height() as f32;
        self.clip = ClipRect::from_corners(0.0, 0.0, width, height);
        self.context.set_clip_rect(self.clip);
        let fill = if background.is_visible() {
            background
        } else {
            self.config.background
        };
        self.state.set_fill_color(&mut self.context, fill);
        self.context.fill_all();

        if advance {
            self.page_no += 1;
        }
        log::debug!(target: "ink", "page {} started", self.page_no);
    }

    /// Write the final page. A device that never started a page writes page 1.
    pub fn finish(&mut self) {
        if self.page_no == 0 {
            self.page_no = 1;
        }
        self.flush_page();
    }

    /// Current canvas as straight RGBA bytes.
    pub fn capture_rgba(&self) -> Vec<u8> {
        demultiplied_rgba(self.context.pixmap())
    }
}
