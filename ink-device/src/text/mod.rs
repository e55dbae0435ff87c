//! Font resolution, shaping and glyph-run emission.
//!
//! A [`FontBackend`] turns a family and style into a concrete font, shapes
//! strings with it and produces glyph outlines. [`FontCache`] sits in front of
//! a backend and keeps the most recent font, string and character so that the
//! long runs of identical queries a plot makes are answered without reloading
//! or reshaping.

mod cache;
mod cosmic;
mod embedded;
mod outline;

pub use cache::{CharMetric, FontCache};
pub use cosmic::CosmicBackend;
pub use embedded::EmbeddedBackend;

use crate::error::InkResult;
use crate::font_config::GenericFamilyMap;
use crate::style::FontFace;
use std::path::PathBuf;
use tiny_skia::Path;

/// A font request as made by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontQuery<'a> {
    pub family: &'a str,
    pub bold: bool,
    pub italic: bool,
    pub symbol: bool,
}

impl<'a> FontQuery<'a> {
    pub fn new(family: &'a str, face: FontFace) -> Self {
        Self {
            family,
            bold: face.is_bold(),
            italic: face.is_italic(),
            symbol: face.is_symbol(),
        }
    }

    pub(crate) fn weight(&self) -> fontdb::Weight {
        if self.bold {
            fontdb::Weight::BOLD
        } else {
            fontdb::Weight::NORMAL
        }
    }

    pub(crate) fn style(&self) -> fontdb::Style {
        if self.italic {
            fontdb::Style::Italic
        } else {
            fontdb::Style::Normal
        }
    }
}

/// Where the bytes of a font file live.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FontOrigin {
    /// A file on disk.
    File(PathBuf),
    /// Data registered in memory with the font database.
    Memory(fontdb::ID),
}

/// A resolved font: its file and the face index inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontSource {
    pub origin: FontOrigin,
    pub index: u32,
}

/// Font-wide vertical metrics at the loaded size, in device units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FaceMetrics {
    pub ascent: f32,
    /// Distance below the baseline, positive.
    pub descent: f32,
}

/// One positioned glyph of a shaped run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub id: u16,
    /// Pen position relative to the run origin, device units, y down.
    pub x: f32,
    pub y: f32,
    /// Size the glyph was shaped at.
    pub size: f32,
    /// Face the glyph came from when it differs from the loaded face.
    pub font: Option<fontdb::ID>,
}

/// Result of shaping a string with the loaded font.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedText {
    pub glyphs: Vec<ShapedGlyph>,
    /// Total horizontal advance.
    pub advance: f32,
    /// Leftmost inked x, relative to the run origin.
    pub ink_left: f32,
    /// Rightmost inked x, relative to the run origin.
    pub ink_right: f32,
}

impl ShapedText {
    /// Width of the inked bounding box; zero for blank text.
    pub fn ink_width(&self) -> f32 {
        (self.ink_right - self.ink_left).max(0.0)
    }
}

/// Font loading and shaping primitives.
///
/// The loading steps are split so that a caller can skip the ones whose
/// inputs did not change: a file is loaded once per origin, a face once per
/// index, and a size once per size.
pub trait FontBackend {
    /// Resolve a request to a concrete font.
    fn resolve(&mut self, query: &FontQuery<'_>) -> InkResult<FontSource>;

    /// Load the font file behind `source`.
    fn load_file(&mut self, source: &FontSource) -> InkResult<()>;

    /// Open the face at `source.index` in the loaded file.
    fn load_face(&mut self, source: &FontSource) -> InkResult<()>;

    /// Scale the loaded face to `size` device units.
    fn load_size(&mut self, size: f32) -> InkResult<FaceMetrics>;

    /// Shape `text` with the loaded face at the loaded size.
    fn shape(&mut self, text: &str) -> InkResult<ShapedText>;

    /// Outline of a shaped glyph relative to its pen position, y down.
    fn glyph_outline(&mut self, glyph: &ShapedGlyph) -> Option<Path>;
}

/// Candidate families for a request, most preferred first.
///
/// Generic host names map onto the configured preference lists; the symbol
/// flag overrides the requested family entirely.
pub(crate) fn candidate_families(
    query: &FontQuery<'_>,
    families: &GenericFamilyMap,
) -> Vec<String> {
    if query.symbol {
        return families.symbol.clone();
    }
    match query.family {
        "" | "sans" | "sans-serif" => families.sans_serif.clone(),
        "serif" => families.serif.clone(),
        "mono" | "monospace" => families.monospace.clone(),
        name => vec![name.to_string()],
    }
}

/// Resolve a request against a font database, falling back to sans-serif.
pub(crate) fn query_database(
    db: &fontdb::Database,
    names: &[String],
    query: &FontQuery<'_>,
) -> Option<fontdb::ID> {
    let mut families: Vec<fontdb::Family<'_>> =
        names.iter().map(|name| fontdb::Family::Name(name)).collect();
    families.push(fontdb::Family::SansSerif);
    db.query(&fontdb::Query {
        families: &families,
        weight: query.weight(),
        stretch: fontdb::Stretch::Normal,
        style: query.style(),
    })
}

/// The file and face index a database entry points at.
pub(crate) fn source_of(db: &fontdb::Database, id: fontdb::ID) -> Option<FontSource> {
    let face = db.face(id)?;
    let origin = match &face.source {
        fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
            FontOrigin::File(path.clone())
        }
        fontdb::Source::Binary(_) => FontOrigin::Memory(id),
    };
    Some(FontSource {
        origin,
        index: face.index,
    })
}
