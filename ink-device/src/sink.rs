//! Destinations for finished pages.

use crate::error::{InkError, InkResult};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::path::PathBuf;
use tiny_skia::Pixmap;

lazy_static! {
    /// `%%` or a printf integer conversion with optional zero flag and width.
    static ref PAGE_PLACEHOLDER: Regex = Regex::new(r"%(%|(0?)(\d*)[di])").unwrap();
}

/// Receives each page when it is finished.
pub trait PageSink {
    /// Persist `canvas` as page number `page` (1-based).
    fn write_page(&mut self, canvas: &Pixmap, page: u32) -> InkResult<()>;
}

/// Substitute `page` into the first integer placeholder of `template`.
///
/// `%%` becomes a literal percent sign. Placeholders after the first are
/// left untouched.
pub fn expand_page_template(template: &str, page: u32) -> String {
    let mut substituted = false;
    PAGE_PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            if &caps[1] == "%" {
                return "%".to_string();
            }
            if substituted {
                return caps[0].to_string();
            }
            substituted = true;
            let width: usize = caps[3].parse().unwrap_or(0);
            if caps[2].is_empty() {
                format!("{:width$}", page, width = width)
            } else {
                format!("{:0width$}", page, width = width)
            }
        })
        .into_owned()
}

/// Canvas pixels as straight (non-premultiplied) RGBA bytes.
pub fn demultiplied_rgba(canvas: &Pixmap) -> Vec<u8> {
    let mut data = Vec::with_capacity(canvas.data().len());
    for pixel in canvas.pixels() {
        let color = pixel.demultiply();
        data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    data
}

/// Encode a canvas as PNG with the given pixel density.
pub fn encode_png(canvas: &Pixmap, ppi: f32) -> InkResult<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, canvas.width(), canvas.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        // Pixel density metadata (pixels per meter)
        let ppm = (ppi.max(0.0) / 0.0254).round() as u32;
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&demultiplied_rgba(canvas))?;
    }
    Ok(buf)
}

/// Writes each page to a PNG file named from a path template.
#[derive(Debug, Clone)]
pub struct PngSink {
    template: String,
    ppi: f32,
}

impl PngSink {
    pub fn new(template: impl Into<String>, ppi: f32) -> Self {
        Self {
            template: template.into(),
            ppi,
        }
    }

    /// Path page `page` will be written to.
    pub fn path_for(&self, page: u32) -> PathBuf {
        PathBuf::from(expand_page_template(&self.template, page))
    }
}

impl PageSink for PngSink {
    fn write_page(&mut self, canvas: &Pixmap, page: u32) -> InkResult<()> {
        let path = self.path_for(page);
        log::debug!(target: "ink", "writing page {} to {}", page, path.display());
        let bytes = encode_png(canvas, self.ppi)?;
        std::fs::write(&path, bytes)?;
        Ok(())
    }
}

/// Writes each page to a BMP file named from a path template.
#[derive(Debug, Clone)]
pub struct BmpSink {
    template: String,
}

impl BmpSink {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Path page `page` will be written to.
    pub fn path_for(&self, page: u32) -> PathBuf {
        PathBuf::from(expand_page_template(&self.template, page))
    }
}

impl PageSink for BmpSink {
    fn write_page(&mut self, canvas: &Pixmap, page: u32) -> InkResult<()> {
        let path = self.path_for(page);
        log::debug!(target: "ink", "writing page {} to {}", page, path.display());
        let image =
            image::RgbaImage::from_raw(canvas.width(), canvas.height(), demultiplied_rgba(canvas))
                .ok_or_else(|| InkError::ImageError("canvas buffer size mismatch".to_string()))?;
        image.save_with_format(&path, image::ImageFormat::Bmp)?;
        Ok(())
    }
}

/// Keeps every page in memory as straight RGBA bytes.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub pages: Vec<(u32, Vec<u8>)>,
}

impl PageSink for MemorySink {
    fn write_page(&mut self, canvas: &Pixmap, page: u32) -> InkResult<()> {
        self.pages.push((page, demultiplied_rgba(canvas)));
        Ok(())
    }
}

/// Discards every page.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PageSink for NullSink {
    fn write_page(&mut self, _canvas: &Pixmap, _page: u32) -> InkResult<()> {
        Ok(())
    }
}
