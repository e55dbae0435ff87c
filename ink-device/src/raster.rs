//! Raster image conversion and placement.
//!
//! Hosts hand over rasters as packed, non-premultiplied colors in row-major
//! order with the first row at the top. The canvas stores premultiplied
//! pixels, so every raster is converted before it is mounted as a pattern.

use crate::color::PackedColor;
use crate::context::RasterPattern;
use crate::error::{InkError, InkResult};
use tiny_skia::{FilterQuality, Pixmap, PremultipliedColorU8, Transform};

/// A raster as supplied by the host.
#[derive(Debug, Clone, Copy)]
pub struct RasterImage<'a> {
    /// Packed non-premultiplied pixels, `width * height` entries.
    pub pixels: &'a [u32],
    pub width: u32,
    pub height: u32,
}

/// Destination of a raster draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterPlacement {
    /// Anchor X in device units.
    pub x: f64,
    /// Anchor Y in device units.
    pub y: f64,
    /// Final width in device units.
    pub width: f64,
    /// Final height in device units; negative when the anchor is the bottom edge.
    pub height: f64,
    /// Rotation in degrees, counter-clockwise.
    pub rotation: f64,
    /// Bilinear sampling when true, nearest-neighbor otherwise.
    pub interpolate: bool,
}

/// Scale a channel by alpha. The shift form equals `v * a / 255` in integer arithmetic.
#[inline]
fn premultiply_channel(value: u8, alpha: u8) -> u8 {
    let scaled = value as u32 * alpha as u32;
    ((scaled + 1 + ((scaled + 1) >> 8)) >> 8) as u8
}

/// Premultiply a single pixel, returning `(r, g, b, a)`.
pub fn premultiply_pixel(color: PackedColor) -> (u8, u8, u8, u8) {
    let a = color.alpha();
    if a == 0 {
        return (0, 0, 0, 0);
    }
    (
        premultiply_channel(color.red(), a),
        premultiply_channel(color.green(), a),
        premultiply_channel(color.blue(), a),
        a,
    )
}

/// Mount a host raster as a premultiplied pixmap.
///
/// Returns `Ok(None)` for zero-sized rasters, which draw nothing.
pub fn mount_raster(image: &RasterImage<'_>) -> InkResult<Option<Pixmap>> {
    if image.width == 0 || image.height == 0 {
        return Ok(None);
    }
    let expected = image.width as usize * image.height as usize;
    if image.pixels.len() != expected {
        return Err(InkError::RasterMount(format!(
            "Data length {} does not match expected {} for {}x{} raster",
            image.pixels.len(),
            expected,
            image.width,
            image.height
        )));
    }
    let mut pixmap = Pixmap::new(image.width, image.height).ok_or_else(|| {
        InkError::RasterMount(format!(
            "Cannot allocate {}x{} raster",
            image.width, image.height
        ))
    })?;

    for (dst, &src) in pixmap.pixels_mut().iter_mut().zip(image.pixels) {
        let (r, g, b, a) = premultiply_pixel(PackedColor(src));
        // Channels never exceed alpha after premultiplication.
        if let Some(color) = PremultipliedColorU8::from_rgba(r, g, b, a) {
            *dst = color;
        }
    }
    Ok(Some(pixmap))
}

/// Build the pattern that maps a mounted raster onto its destination rectangle.
///
/// The pattern is anchored at `(x, y + height)` and scaled by
/// `(width / w, -height / h)`, flipping the raster's top-down rows into the
/// host's bottom-anchored rectangle.
pub fn raster_pattern(pixmap: Pixmap, placement: &RasterPlacement) -> RasterPattern {
    let src_w = pixmap.width() as f64;
    let src_h = pixmap.height() as f64;
    let transform = Transform::from_translate(
        placement.x as f32,
        (placement.y + placement.height) as f32,
    )
    .pre_scale(
        (placement.width / src_w) as f32,
        (-placement.height / src_h) as f32,
    );
    let quality = if placement.interpolate {
        FilterQuality::Bilinear
    } else {
        FilterQuality::Nearest
    };
    RasterPattern {
        pixmap,
        transform,
        quality,
    }
}
