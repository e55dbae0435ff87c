//! Full-featured backend: system font resolution and cosmic-text shaping.

use super::outline::{face_metrics, glyph_path, glyph_x_bounds, InkBounds};
use super::{
    candidate_families, query_database, source_of, FaceMetrics, FontBackend, FontQuery,
    FontSource, ShapedGlyph, ShapedText,
};
use crate::error::{InkError, InkResult};
use crate::font_config::{FontConfig, GenericFamilyMap, ResolvedFontConfig};
use cosmic_text::{Attrs, Buffer, Family, Font, FontSystem, Metrics, Shaping};
use std::collections::HashMap;
use std::sync::Arc;
use tiny_skia::Path;
use ttf_parser::{Face, GlyphId};

/// Attributes of the loaded face, as cosmic-text needs them for shaping.
#[derive(Debug, Clone)]
struct LoadedFace {
    id: fontdb::ID,
    family: String,
    weight: fontdb::Weight,
    style: fontdb::Style,
    stretch: fontdb::Stretch,
}

/// Font data shared with the font system's cache, plus the face index in it.
struct CachedFace {
    font: Arc<Font>,
    index: u32,
}

/// Honors the requested family, shapes with cosmic-text and falls back to
/// other installed fonts per glyph.
pub struct CosmicBackend {
    font_system: FontSystem,
    families: GenericFamilyMap,
    /// Face chosen by the last `resolve`.
    resolved: Option<fontdb::ID>,
    face: Option<LoadedFace>,
    /// Faces used since the last file load, keyed by database id.
    cached: HashMap<fontdb::ID, CachedFace>,
    size: f32,
}

impl CosmicBackend {
    pub fn new(fonts: ResolvedFontConfig) -> Self {
        let font_system = FontSystem::new_with_locale_and_db("en".to_string(), fonts.fontdb);
        Self {
            font_system,
            families: fonts.families,
            resolved: None,
            face: None,
            cached: HashMap::new(),
            size: 0.0,
        }
    }

    fn loaded(&self) -> InkResult<&LoadedFace> {
        self.face
            .as_ref()
            .ok_or_else(|| InkError::FontNotFound("no face loaded".to_string()))
    }

    /// Run `f` on a parsed face. Font data comes from the font system's
    /// cache, so no file is reopened for faces seen since the last load.
    fn with_face<T>(&mut self, id: fontdb::ID, f: impl FnOnce(&Face<'_>) -> T) -> Option<T> {
        if !self.cached.contains_key(&id) {
            let index = self.font_system.db().face(id)?.index;
            let weight = self
                .face
                .as_ref()
                .map_or(fontdb::Weight::NORMAL, |face| face.weight);
            let font = self.font_system.get_font(id, weight)?;
            self.cached.insert(id, CachedFace { font, index });
        }
        let cached = self.cached.get(&id)?;
        let face = Face::parse(cached.font.data(), cached.index).ok()?;
        Some(f(&face))
    }

    /// Number of faces currently held in the face cache.
    pub fn cached_faces(&self) -> usize {
        self.cached.len()
    }
}

impl Default for CosmicBackend {
    fn default() -> Self {
        Self::new(FontConfig::default().resolve())
    }
}

impl FontBackend for CosmicBackend {
    fn resolve(&mut self, query: &FontQuery<'_>) -> InkResult<FontSource> {
        let names = candidate_families(query, &self.families);
        let db = self.font_system.db();
        let id = query_database(db, &names, query)
            .ok_or_else(|| InkError::FontNotFound(query.family.to_string()))?;
        let source =
            source_of(db, id).ok_or_else(|| InkError::FontNotFound(query.family.to_string()))?;
        self.resolved = Some(id);
        Ok(source)
    }

    fn load_file(&mut self, source: &FontSource) -> InkResult<()> {
        self.face = None;
        self.cached.clear();
        let id = self
            .resolved
            .ok_or_else(|| InkError::font_load("unresolved", "load_file before resolve"))?;
        // Maps the file and keeps it in the font system's cache.
        if self.with_face(id, |_| ()).is_none() {
            return Err(InkError::font_load(&format!("{:?}", source.origin), "unreadable"));
        }
        Ok(())
    }

    fn load_face(&mut self, source: &FontSource) -> InkResult<()> {
        let id = self
            .resolved
            .ok_or_else(|| InkError::font_load("unresolved", "load_face before resolve"))?;
        let info = self
            .font_system
            .db()
            .face(id)
            .ok_or_else(|| InkError::FontNotFound(format!("{:?}", source.origin)))?;
        let family = info
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_default();
        let face = LoadedFace {
            id,
            family,
            weight: info.weight,
            style: info.style,
            stretch: info.stretch,
        };
        // A face of the same file may be requested with a new weight.
        self.cached.remove(&id);
        self.face = Some(face.clone());
        if self.with_face(id, |_| ()).is_none() {
            self.face = None;
            return Err(InkError::font_load(&face.family, "cannot parse face"));
        }
        log::debug!(target: "ink", "loaded face '{}' index {}", face.family, source.index);
        Ok(())
    }

    fn load_size(&mut self, size: f32) -> InkResult<FaceMetrics> {
        let id = self.loaded()?.id;
        let metrics = self
            .with_face(id, |face| face_metrics(face, size))
            .ok_or_else(|| InkError::font_load("loaded face", "cannot parse face"))?;
        self.size = size;
        Ok(metrics)
    }

    fn shape(&mut self, text: &str) -> InkResult<ShapedText> {
        let face = self.loaded()?.clone();
        let size = self.size;

        let metrics = Metrics::new(size, size * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        let attrs = Attrs::new()
            .family(Family::Name(&face.family))
            .weight(face.weight)
            .style(face.style)
            .stretch(face.stretch);
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);

        let mut shaped = ShapedText::default();
        let mut placed = Vec::new();
        for run in buffer.layout_runs() {
            shaped.advance = shaped.advance.max(run.line_w);
            for glyph in run.glyphs.iter() {
                placed.push(ShapedGlyph {
                    id: glyph.glyph_id,
                    x: glyph.x + glyph.font_size * glyph.x_offset,
                    y: glyph.y - glyph.font_size * glyph.y_offset,
                    size: glyph.font_size,
                    font: Some(glyph.font_id),
                });
            }
        }

        let mut ink = InkBounds::default();
        for glyph in &placed {
            let id = glyph.font.unwrap_or(face.id);
            if let Some(Some((left, right))) = self.with_face(id, |f| {
                glyph_x_bounds(f, GlyphId(glyph.id), glyph.size)
            }) {
                ink.add(glyph.x + left, glyph.x + right);
            }
        }
        shaped.glyphs = placed;
        ink.apply(&mut shaped);
        Ok(shaped)
    }

    fn glyph_outline(&mut self, glyph: &ShapedGlyph) -> Option<Path> {
        let id = glyph.font.or_else(|| self.face.as_ref().map(|f| f.id))?;
        self.with_face(id, |face| glyph_path(face, GlyphId(glyph.id), glyph.size))
            .flatten()
    }
}
