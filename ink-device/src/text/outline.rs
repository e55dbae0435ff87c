//! Glyph outlines, metrics and kerning read straight from font tables.

use super::{FaceMetrics, ShapedGlyph, ShapedText};
use tiny_skia::{Path, PathBuilder};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

/// Collects a glyph outline into device units, flipping y to point down.
struct PathSink {
    builder: PathBuilder,
    scale: f32,
}

impl OutlineBuilder for PathSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x * self.scale, -y * self.scale);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x * self.scale, -y * self.scale);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder
            .quad_to(x1 * self.scale, -y1 * self.scale, x * self.scale, -y * self.scale);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            x1 * self.scale,
            -y1 * self.scale,
            x2 * self.scale,
            -y2 * self.scale,
            x * self.scale,
            -y * self.scale,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

fn units_to_size(face: &Face<'_>, size: f32) -> f32 {
    size / face.units_per_em() as f32
}

/// Outline of `glyph` at `size`, relative to its pen position.
pub(crate) fn glyph_path(face: &Face<'_>, glyph: GlyphId, size: f32) -> Option<Path> {
    let mut sink = PathSink {
        builder: PathBuilder::new(),
        scale: units_to_size(face, size),
    };
    face.outline_glyph(glyph, &mut sink)?;
    sink.builder.finish()
}

/// Ascent and descent at `size`.
pub(crate) fn face_metrics(face: &Face<'_>, size: f32) -> FaceMetrics {
    let scale = units_to_size(face, size);
    FaceMetrics {
        ascent: face.ascender() as f32 * scale,
        descent: -(face.descender() as f32) * scale,
    }
}

/// Horizontal ink extent of `glyph` at `size`.
pub(crate) fn glyph_x_bounds(face: &Face<'_>, glyph: GlyphId, size: f32) -> Option<(f32, f32)> {
    let scale = units_to_size(face, size);
    let bbox = face.glyph_bounding_box(glyph)?;
    Some((bbox.x_min as f32 * scale, bbox.x_max as f32 * scale))
}

fn kerning(face: &Face<'_>, left: GlyphId, right: GlyphId) -> i16 {
    let Some(kern) = face.tables().kern else {
        return 0;
    };
    kern.subtables
        .into_iter()
        .filter(|subtable| subtable.horizontal && !subtable.variable)
        .find_map(|subtable| subtable.glyphs_kerning(left, right))
        .unwrap_or(0)
}

/// Grows the ink box of a run glyph by glyph.
#[derive(Default)]
pub(crate) struct InkBounds {
    bounds: Option<(f32, f32)>,
}

impl InkBounds {
    pub(crate) fn add(&mut self, left: f32, right: f32) {
        self.bounds = Some(match self.bounds {
            Some((l, r)) => (l.min(left), r.max(right)),
            None => (left, right),
        });
    }

    pub(crate) fn apply(self, text: &mut ShapedText) {
        let (left, right) = self.bounds.unwrap_or((0.0, 0.0));
        text.ink_left = left;
        text.ink_right = right;
    }
}

/// Lay `text` out on one line using character maps, advances and pair kerning.
///
/// Characters missing from the face map to glyph 0 and still advance.
pub(crate) fn shape_simple(face: &Face<'_>, text: &str, size: f32) -> ShapedText {
    let scale = units_to_size(face, size);
    let mut shaped = ShapedText::default();
    let mut ink = InkBounds::default();
    let mut pen = 0.0f32;
    let mut previous: Option<GlyphId> = None;

    for ch in text.chars() {
        let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
        if let Some(prev) = previous {
            pen += kerning(face, prev, glyph) as f32 * scale;
        }
        if let Some((left, right)) = glyph_x_bounds(face, glyph, size) {
            ink.add(pen + left, pen + right);
        }
        shaped.glyphs.push(ShapedGlyph {
            id: glyph.0,
            x: pen,
            y: 0.0,
            size,
            font: None,
        });
        pen += face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * scale;
        previous = Some(glyph);
    }

    shaped.advance = pen;
    ink.apply(&mut shaped);
    shaped
}
