//! Raster graphics device for plotting hosts, built on tiny-skia.
//!
//! A plotting host issues primitives (circles, rectangles, polygons, paths,
//! rasters, text) and page breaks; this crate turns them into drawing
//! operations on a retained canvas and hands finished pages to a sink. It
//! uses:
//! - `tiny-skia` for rasterization
//! - `fontdb` and `ttf-parser` for font lookup, metrics and outlines
//! - `cosmic-text` for full text shaping with font fallback
//! - `png` and `image` for writing pages
//!
//! # Example
//!
//! ```rust,ignore
//! use ink_device::{DeviceConfig, GraphicsContext, GraphicsDevice, PngDevice};
//!
//! let mut device = PngDevice::png(DeviceConfig::default())?;
//! let gc = GraphicsContext::default();
//! device.new_page(&gc);
//! device.circle(240.0, 240.0, 100.0, &gc);
//! device.close();
//! ```

mod color;
mod config;
mod context;
mod device;
mod diagnostics;
mod error;
mod font_config;
mod geometry;
mod raster;
mod sink;
mod state_cache;
mod style;
mod text;

// Re-export public API
pub use color::PackedColor;
pub use config::{DeviceConfig, DeviceDescription};
pub use context::{ClipRect, FillStyle, RasterPattern, RenderContext, SkiaContext};
pub use device::{
    BmpDevice, GraphicsContext, GraphicsDevice, InkDevice, InkDeviceBuilder, PngDevice,
};
pub use diagnostics::{DiagnosticSink, LogDiagnostics, Severity};
pub use error::{InkError, InkResult};
pub use font_config::{
    font_config_to_fontdb, CustomFont, FontConfig, GenericFamilyMap, ResolvedFontConfig,
};
pub use geometry::{
    circle_path, compound_path, line_path, polygon_path, polyline_path, rect_path, PathAssembler,
};
pub use raster::{
    mount_raster, premultiply_pixel, raster_pattern, RasterImage, RasterPlacement,
};
pub use sink::{
    demultiplied_rgba, encode_png, expand_page_template, BmpSink, MemorySink, NullSink, PageSink,
    PngSink,
};
pub use state_cache::RenderStateCache;
pub use style::{convert_linetype, FillRule, FontFace, LineCap, LineJoin, LTY_BLANK, LTY_SOLID};
pub use text::{
    CharMetric, CosmicBackend, EmbeddedBackend, FaceMetrics, FontBackend, FontCache, FontOrigin,
    FontQuery, FontSource, ShapedGlyph, ShapedText,
};

/// Re-exported so callers can implement [`RenderContext`] and [`PageSink`].
pub use tiny_skia;
