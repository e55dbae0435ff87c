//! Lightweight backend: one fixed family list, simple shaping.

use super::outline::{face_metrics, glyph_path, shape_simple};
use super::{
    query_database, source_of, FaceMetrics, FontBackend, FontOrigin, FontQuery, FontSource,
    ShapedGlyph, ShapedText,
};
use crate::error::{InkError, InkResult};
use crate::font_config::{FontConfig, ResolvedFontConfig};
use std::sync::Arc;
use tiny_skia::Path;
use ttf_parser::{Face, GlyphId};

/// Resolves every request to the built-in sans-serif list and shapes with
/// cmap lookups, horizontal advances and `kern` pairs.
///
/// Requested family names are ignored; only the bold, italic and symbol
/// flags are honored.
pub struct EmbeddedBackend {
    db: fontdb::Database,
    families: Vec<String>,
    symbol_families: Vec<String>,
    /// Bytes of the loaded font file.
    data: Option<Arc<Vec<u8>>>,
    /// Face index within `data`.
    index: Option<u32>,
    size: f32,
}

impl EmbeddedBackend {
    pub fn new(fonts: ResolvedFontConfig) -> Self {
        Self {
            families: fonts.families.sans_serif.clone(),
            symbol_families: fonts.families.symbol.clone(),
            db: fonts.fontdb,
            data: None,
            index: None,
            size: 0.0,
        }
    }

    fn face(&self) -> InkResult<Face<'_>> {
        let (Some(data), Some(index)) = (&self.data, self.index) else {
            return Err(InkError::FontNotFound("no face loaded".to_string()));
        };
        Face::parse(data, index).map_err(|e| InkError::font_load("embedded", e))
    }
}

impl Default for EmbeddedBackend {
    fn default() -> Self {
        Self::new(FontConfig::default().resolve())
    }
}

impl FontBackend for EmbeddedBackend {
    fn resolve(&mut self, query: &FontQuery<'_>) -> InkResult<FontSource> {
        let names = if query.symbol {
            &self.symbol_families
        } else {
            &self.families
        };
        let id = query_database(&self.db, names, query)
            .ok_or_else(|| InkError::FontNotFound(names.join(", ")))?;
        source_of(&self.db, id).ok_or_else(|| InkError::FontNotFound(names.join(", ")))
    }

    fn load_file(&mut self, source: &FontSource) -> InkResult<()> {
        self.data = None;
        self.index = None;
        let data = match &source.origin {
            FontOrigin::File(path) => std::fs::read(path)
                .map_err(|e| InkError::font_load(&path.display().to_string(), e))?,
            FontOrigin::Memory(id) => self
                .db
                .with_face_data(*id, |data, _| data.to_vec())
                .ok_or_else(|| InkError::font_load("memory font", "face data unavailable"))?,
        };
        log::debug!(target: "ink", "loaded font file {:?} ({} bytes)", source.origin, data.len());
        self.data = Some(Arc::new(data));
        Ok(())
    }

    fn load_face(&mut self, source: &FontSource) -> InkResult<()> {
        self.index = Some(source.index);
        if let Err(err) = self.face() {
            self.index = None;
            return Err(err);
        }
        Ok(())
    }

    fn load_size(&mut self, size: f32) -> InkResult<FaceMetrics> {
        let metrics = face_metrics(&self.face()?, size);
        self.size = size;
        Ok(metrics)
    }

    fn shape(&mut self, text: &str) -> InkResult<ShapedText> {
        Ok(shape_simple(&self.face()?, text, self.size))
    }

    fn glyph_outline(&mut self, glyph: &ShapedGlyph) -> Option<Path> {
        let face = self.face().ok()?;
        glyph_path(&face, GlyphId(glyph.id), glyph.size)
    }
}
