//! The raster device and the callback surface a plotting host drives.
//!
//! [`InkDevice`] owns one rendering context, a style cache in front of it,
//! a font cache and a page sink. Hosts call into it through the
//! [`GraphicsDevice`] trait, one method per host callback, passing the
//! current graphical parameters as a [`GraphicsContext`].

mod drawing;
mod page;
mod text;

use crate::color::PackedColor;
use crate::config::{DeviceConfig, DeviceDescription};
use crate::context::{ClipRect, RenderContext, SkiaContext};
use crate::diagnostics::{DiagnosticSink, LogDiagnostics, Severity};
use crate::error::InkResult;
use crate::raster::{RasterImage, RasterPlacement};
use crate::sink::{BmpSink, PageSink, PngSink};
use crate::state_cache::RenderStateCache;
use crate::style::{FontFace, LineCap, LineJoin, LTY_SOLID};
use crate::text::{EmbeddedBackend, FontBackend, FontCache};

/// Graphical parameters accompanying every drawing call.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsContext {
    /// Stroke and text color.
    pub col: PackedColor,
    /// Fill color; the page background for [`GraphicsDevice::new_page`].
    pub fill: PackedColor,
    /// Line width in host units (1/96 inch).
    pub lwd: f64,
    /// Packed line type code.
    pub lty: i32,
    pub lend: LineCap,
    pub ljoin: LineJoin,
    pub lmitre: f64,
    pub fontfamily: String,
    pub fontface: FontFace,
    /// Point size.
    pub ps: f64,
    /// Character expansion applied to `ps`.
    pub cex: f64,
}

impl Default for GraphicsContext {
    fn default() -> Self {
        Self {
            col: PackedColor::BLACK,
            fill: PackedColor::TRANSPARENT_WHITE,
            lwd: 1.0,
            lty: LTY_SOLID,
            lend: LineCap::Round,
            ljoin: LineJoin::Round,
            lmitre: 10.0,
            fontfamily: String::new(),
            fontface: FontFace::PLAIN,
            ps: 12.0,
            cex: 1.0,
        }
    }
}

impl GraphicsContext {
    /// Font size in points after expansion.
    pub fn font_size(&self) -> f64 {
        self.cex * self.ps
    }
}

/// Callbacks a plotting host issues against a device.
///
/// Coordinates are device units with the origin at the top left.
pub trait GraphicsDevice {
    /// Finish the current page and start a new one filled with `gc.fill`.
    fn new_page(&mut self, gc: &GraphicsContext);

    /// Finish the last page.
    fn close(&mut self);

    /// Restrict drawing to the rectangle spanned by the two corners.
    fn clip(&mut self, x0: f64, x1: f64, y0: f64, y1: f64);

    /// Device extent as `(left, right, bottom, top)`.
    fn size(&self) -> (f64, f64, f64, f64);

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, gc: &GraphicsContext);

    fn polyline(&mut self, x: &[f64], y: &[f64], gc: &GraphicsContext);

    fn polygon(&mut self, x: &[f64], y: &[f64], gc: &GraphicsContext);

    /// Several subpaths sharing one coordinate stream; `counts` holds the
    /// vertex count of each. `winding` selects the nonzero rule over even-odd.
    fn path(
        &mut self,
        x: &[f64],
        y: &[f64],
        counts: &[usize],
        winding: bool,
        gc: &GraphicsContext,
    );

    fn rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, gc: &GraphicsContext);

    fn circle(&mut self, x: f64, y: f64, r: f64, gc: &GraphicsContext);

    fn raster(
        &mut self,
        image: &RasterImage<'_>,
        placement: &RasterPlacement,
        gc: &GraphicsContext,
    );

    /// Draw `text` at `(x, y)` rotated by `rot` degrees, with `hadj` of the
    /// string's width left of the anchor.
    fn text(&mut self, x: f64, y: f64, text: &str, rot: f64, hadj: f64, gc: &GraphicsContext);

    /// Advance width of `text`; zero when no font can be loaded.
    fn str_width(&mut self, text: &str, gc: &GraphicsContext) -> f64;

    /// `(ascent, descent, width)` of character `c`; zeros when no font can be loaded.
    fn metric_info(&mut self, c: i32, gc: &GraphicsContext) -> (f64, f64, f64);

    /// The current page as straight RGBA bytes, row-major from the top.
    fn capture(&self) -> Vec<u8>;
}

/// Raster device writing pages through a [`PageSink`].
pub struct InkDevice<S, B = EmbeddedBackend, C = SkiaContext> {
    context: C,
    state: RenderStateCache,
    fonts: FontCache<B>,
    /// Bounds of the clip last pushed to the context.
    clip: ClipRect,
    sink: S,
    diagnostics: Box<dyn DiagnosticSink>,
    config: DeviceConfig,
    size_mod: f64,
    lwd_mod: f64,
    page_no: u32,
}

/// Device writing one PNG file per page.
pub type PngDevice<B = EmbeddedBackend> = InkDevice<PngSink, B>;

/// Device writing one BMP file per page.
pub type BmpDevice<B = EmbeddedBackend> = InkDevice<BmpSink, B>;

impl<S: PageSink, B: FontBackend, C: RenderContext> InkDevice<S, B, C> {
    /// Assemble a device from its parts and clear the canvas to the
    /// configured background. The page counter stays at zero.
    pub fn from_parts(
        config: DeviceConfig,
        context: C,
        backend: B,
        sink: S,
        diagnostics: Box<dyn DiagnosticSink>,
    ) -> Self {
        let size_mod = config.size_modifier();
        let lwd_mod = config.line_width_modifier();
        log::debug!(
            target: "ink",
            "open device {}x{} res={} scaling={}",
            config.width,
            config.height,
            config.res,
            config.scaling
        );
        let background = config.background;
        let clip = ClipRect::from_corners(0.0, 0.0, config.width as f32, config.height as f32);
        let mut device = Self {
            context,
            state: RenderStateCache::new(),
            fonts: FontCache::new(backend),
            clip,
            sink,
            diagnostics,
            config,
            size_mod,
            lwd_mod,
            page_no: 0,
        };
        device.start_page(background, false);
        device
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Static parameters to report to the host.
    pub fn description(&self) -> DeviceDescription {
        self.config.description()
    }

    /// Number of the page being drawn; zero before the host's first page.
    pub fn page_number(&self) -> u32 {
        self.page_no
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn fonts(&self) -> &FontCache<B> {
        &self.fonts
    }

    pub fn state(&self) -> &RenderStateCache {
        &self.state
    }

    /// Current clip bounds in device units.
    pub fn clip_rect(&self) -> ClipRect {
        self.clip
    }

    fn warn(&mut self, message: &str) {
        self.diagnostics.report(Severity::Warning, message);
    }

    /// Font size in device units for a host request.
    fn device_font_size(&self, gc: &GraphicsContext) -> f32 {
        (gc.font_size() * self.size_mod) as f32
    }

    /// Line width in device units for a host request.
    fn device_line_width(&self, lwd: f64) -> f32 {
        (lwd * self.lwd_mod) as f32
    }
}

/// Builder for [`InkDevice`].
pub struct InkDeviceBuilder<S, B = EmbeddedBackend> {
    config: DeviceConfig,
    sink: S,
    backend: Option<B>,
    diagnostics: Option<Box<dyn DiagnosticSink>>,
}

impl<S: PageSink> InkDeviceBuilder<S, EmbeddedBackend> {
    /// Create a new builder writing to `sink`.
    pub fn new(config: DeviceConfig, sink: S) -> Self {
        Self {
            config,
            sink,
            backend: None,
            diagnostics: None,
        }
    }
}

impl<S: PageSink, B: FontBackend> InkDeviceBuilder<S, B> {
    /// Use a specific font backend instead of the default one.
    pub fn with_backend<B2: FontBackend>(self, backend: B2) -> InkDeviceBuilder<S, B2> {
        InkDeviceBuilder {
            config: self.config,
            sink: self.sink,
            backend: Some(backend),
            diagnostics: self.diagnostics,
        }
    }

    /// Route diagnostics somewhere other than the `log` facade.
    pub fn with_diagnostics(mut self, diagnostics: impl DiagnosticSink + 'static) -> Self {
        self.diagnostics = Some(Box::new(diagnostics));
        self
    }

    /// Build the device on a caller-supplied rendering context.
    pub fn build_with_context<C: RenderContext>(self, context: C) -> InkDevice<S, B, C>
    where
        B: Default,
    {
        let diagnostics = self
            .diagnostics
            .unwrap_or_else(|| Box::new(LogDiagnostics));
        InkDevice::from_parts(
            self.config,
            context,
            self.backend.unwrap_or_default(),
            self.sink,
            diagnostics,
        )
    }

    /// Build the device on a tiny-skia canvas of the configured size.
    pub fn build(self) -> InkResult<InkDevice<S, B>>
    where
        B: Default,
    {
        let context = SkiaContext::new(self.config.width, self.config.height)?;
        Ok(self.build_with_context(context))
    }
}

impl<S: PageSink> InkDevice<S> {
    /// Create a builder for a device writing to `sink`.
    pub fn builder(config: DeviceConfig, sink: S) -> InkDeviceBuilder<S> {
        InkDeviceBuilder::new(config, sink)
    }
}

impl PngDevice {
    /// Open a PNG device writing to `config.file`.
    pub fn png(config: DeviceConfig) -> InkResult<Self> {
        let sink = PngSink::new(config.file.clone(), config.res as f32);
        InkDeviceBuilder::new(config, sink).build()
    }
}

impl BmpDevice {
    /// Open a BMP device writing to `config.file`.
    pub fn bmp(config: DeviceConfig) -> InkResult<Self> {
        let sink = BmpSink::new(config.file.clone());
        InkDeviceBuilder::new(config, sink).build()
    }
}

impl<S: PageSink, B: FontBackend, C: RenderContext> GraphicsDevice for InkDevice<S, B, C> {
    fn new_page(&mut self, gc: &GraphicsContext) {
        self.start_page(gc.fill, true);
    }

    fn close(&mut self) {
        self.finish();
    }

    fn clip(&mut self, x0: f64, x1: f64, y0: f64, y1: f64) {
        self.set_clip(x0, y0, x1, y1);
    }

    fn size(&self) -> (f64, f64, f64, f64) {
        (0.0, self.config.width as f64, self.config.height as f64, 0.0)
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, gc: &GraphicsContext) {
        self.draw_line(x1, y1, x2, y2, gc);
    }

    fn polyline(&mut self, x: &[f64], y: &[f64], gc: &GraphicsContext) {
        self.draw_polyline(x, y, gc);
    }

    fn polygon(&mut self, x: &[f64], y: &[f64], gc: &GraphicsContext) {
        self.draw_polygon(x, y, gc);
    }

    fn path(
        &mut self,
        x: &[f64],
        y: &[f64],
        counts: &[usize],
        winding: bool,
        gc: &GraphicsContext,
    ) {
        let rule = if winding {
            crate::style::FillRule::NonZero
        } else {
            crate::style::FillRule::EvenOdd
        };
        self.draw_path(counts, x, y, rule, gc);
    }

    fn rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, gc: &GraphicsContext) {
        self.draw_rect(x0, y0, x1, y1, gc);
    }

    fn circle(&mut self, x: f64, y: f64, r: f64, gc: &GraphicsContext) {
        self.draw_circle(x, y, r, gc);
    }

    fn raster(
        &mut self,
        image: &RasterImage<'_>,
        placement: &RasterPlacement,
        _gc: &GraphicsContext,
    ) {
        self.draw_raster(image, placement);
    }

    fn text(&mut self, x: f64, y: f64, text: &str, rot: f64, hadj: f64, gc: &GraphicsContext) {
        self.draw_text(x, y, text, rot, hadj, gc);
    }

    fn str_width(&mut self, text: &str, gc: &GraphicsContext) -> f64 {
        self.string_width(text, gc)
    }

    fn metric_info(&mut self, c: i32, gc: &GraphicsContext) -> (f64, f64, f64) {
        let metric = self.char_metric(c, gc);
        (metric.ascent as f64, metric.descent as f64, metric.width as f64)
    }

    fn capture(&self) -> Vec<u8> {
        self.capture_rgba()
    }
}
