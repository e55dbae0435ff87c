//! Single-slot caches in front of a font backend.

use super::{FaceMetrics, FontBackend, FontQuery, FontSource, ShapedText};
use crate::context::RenderContext;
use crate::error::{InkError, InkResult};
use crate::style::{FillRule, FontFace};
use tiny_skia::{PathBuilder, Transform};

/// Metrics of a single character.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CharMetric {
    /// Font-wide ascent.
    pub ascent: f32,
    /// Font-wide descent, positive below the baseline.
    pub descent: f32,
    /// Width of the character's ink box.
    pub width: f32,
}

/// Remembers the last font, string and character.
///
/// Reloading is staged: the file only when its origin changes, the face
/// when the file reloaded or the index changed, the size when anything
/// above reloaded or the size changed. Any reload drops both shaped slots.
pub struct FontCache<B> {
    backend: B,
    source: Option<FontSource>,
    size: Option<f32>,
    metrics: FaceMetrics,
    last_string: Option<(String, ShapedText)>,
    last_char: Option<(u32, ShapedText)>,
}

impl<B: FontBackend> FontCache<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            source: None,
            size: None,
            metrics: FaceMetrics::default(),
            last_string: None,
            last_char: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Whether a font is ready for shaping.
    pub fn is_loaded(&self) -> bool {
        self.source.is_some() && self.size.is_some()
    }

    /// Metrics of the loaded font.
    pub fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn unload(&mut self) {
        self.source = None;
        self.size = None;
        self.metrics = FaceMetrics::default();
        self.clear_shaped();
    }

    fn clear_shaped(&mut self) {
        self.last_string = None;
        self.last_char = None;
    }

    /// Make `family` in `face` at `size` device units the active font.
    pub fn load_font(&mut self, family: &str, face: FontFace, size: f32) -> InkResult<()> {
        let result = self
            .backend
            .resolve(&FontQuery::new(family, face))
            .and_then(|source| self.load_source(source, size));
        if result.is_err() {
            self.unload();
        }
        result
    }

    fn load_source(&mut self, source: FontSource, size: f32) -> InkResult<()> {
        let mut refresh = false;

        let same_file = self
            .source
            .as_ref()
            .is_some_and(|current| current.origin == source.origin);
        if !same_file {
            self.source = None;
            self.backend.load_file(&source)?;
            refresh = true;
        }

        let same_face = self
            .source
            .as_ref()
            .is_some_and(|current| current.index == source.index);
        if refresh || !same_face {
            self.backend.load_face(&source)?;
            refresh = true;
        }
        self.source = Some(source);

        if refresh || self.size != Some(size) {
            self.metrics = self.backend.load_size(size)?;
            self.size = Some(size);
            refresh = true;
        }

        if refresh {
            log::debug!(target: "ink", "font reloaded at size {}", size);
            self.clear_shaped();
        }
        Ok(())
    }

    fn ensure_loaded(&self) -> InkResult<()> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(InkError::FontNotFound("no font loaded".to_string()))
        }
    }

    fn shape_string(&mut self, text: &str) -> InkResult<&ShapedText> {
        self.ensure_loaded()?;
        let cached = matches!(&self.last_string, Some((last, _)) if last == text);
        if !cached {
            let shaped = self.backend.shape(text)?;
            self.last_string = Some((text.to_string(), shaped));
        }
        match &self.last_string {
            Some((_, shaped)) => Ok(shaped),
            None => Err(InkError::FontNotFound("no font loaded".to_string())),
        }
    }

    fn shape_char(&mut self, code: u32) -> InkResult<&ShapedText> {
        self.ensure_loaded()?;
        let cached = matches!(&self.last_char, Some((last, _)) if *last == code);
        if !cached {
            let text = char::from_u32(code).map(String::from).unwrap_or_default();
            let shaped = self.backend.shape(&text)?;
            self.last_char = Some((code, shaped));
        }
        match &self.last_char {
            Some((_, shaped)) => Ok(shaped),
            None => Err(InkError::FontNotFound("no font loaded".to_string())),
        }
    }

    /// Total advance of `text` with the active font.
    pub fn text_width(&mut self, text: &str) -> InkResult<f32> {
        Ok(self.shape_string(text)?.advance)
    }

    /// Ink width of one character plus font-wide ascent and descent.
    ///
    /// Negative codes are treated as their absolute value.
    pub fn char_metric(&mut self, c: i32) -> InkResult<CharMetric> {
        let width = self.shape_char(c.unsigned_abs())?.ink_width();
        Ok(CharMetric {
            ascent: self.metrics.ascent,
            descent: self.metrics.descent,
            width,
        })
    }

    /// Draw `text` with the context's current fill.
    ///
    /// `(x, y)` is the reference point on the baseline, `rot` the
    /// counter-clockwise rotation in degrees and `hadj` the fraction of the
    /// advance that lies left of the reference point.
    pub fn plot_text<C: RenderContext>(
        &mut self,
        ctx: &mut C,
        x: f64,
        y: f64,
        text: &str,
        rot: f64,
        hadj: f64,
    ) -> InkResult<()> {
        let advance = self.shape_string(text)?.advance as f64;
        let angle = (-rot).to_radians();
        let shift = advance * hadj;
        let x = (x - shift * angle.cos()) as f32;
        let y = (y - shift * angle.sin()) as f32;

        let Some((_, shaped)) = &self.last_string else {
            return Ok(());
        };
        let mut builder = PathBuilder::new();
        for glyph in &shaped.glyphs {
            let Some(outline) = self.backend.glyph_outline(glyph) else {
                continue;
            };
            if let Some(placed) =
                outline.transform(Transform::from_translate(x + glyph.x, y + glyph.y))
            {
                builder.push_path(&placed);
            }
        }
        let Some(run) = builder.finish() else {
            return Ok(());
        };

        if angle != 0.0 {
            ctx.rotate_about(angle as f32, x, y);
        }
        ctx.fill_path(&run, FillRule::NonZero);
        if angle != 0.0 {
            ctx.reset_transform();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{FontOrigin, ShapedGlyph};
    use tiny_skia::Path;

    /// Backend with fixed metrics that records each step it performs.
    #[derive(Default)]
    struct StepBackend {
        steps: Vec<String>,
        fail_face: bool,
    }

    impl FontBackend for StepBackend {
        fn resolve(&mut self, query: &FontQuery<'_>) -> InkResult<FontSource> {
            let file = if query.bold { "bold.ttf" } else { "regular.ttf" };
            Ok(FontSource {
                origin: FontOrigin::File(file.into()),
                index: query.italic as u32,
            })
        }

        fn load_file(&mut self, source: &FontSource) -> InkResult<()> {
            self.steps.push(format!("file {:?}", source.origin));
            Ok(())
        }

        fn load_face(&mut self, source: &FontSource) -> InkResult<()> {
            self.steps.push(format!("face {}", source.index));
            if self.fail_face {
                return Err(InkError::font_load("test", "broken face"));
            }
            Ok(())
        }

        fn load_size(&mut self, size: f32) -> InkResult<FaceMetrics> {
            self.steps.push(format!("size {}", size));
            Ok(FaceMetrics {
                ascent: size * 0.8,
                descent: size * 0.2,
            })
        }

        fn shape(&mut self, text: &str) -> InkResult<ShapedText> {
            self.steps.push(format!("shape {}", text));
            let n = text.chars().count() as f32;
            Ok(ShapedText {
                glyphs: Vec::new(),
                advance: n * 10.0,
                ink_left: 1.0,
                ink_right: n * 10.0 - 1.0,
            })
        }

        fn glyph_outline(&mut self, _glyph: &ShapedGlyph) -> Option<Path> {
            None
        }
    }

    fn count(cache: &FontCache<StepBackend>, prefix: &str) -> usize {
        cache
            .backend()
            .steps
            .iter()
            .filter(|s| s.starts_with(prefix))
            .count()
    }

    #[test]
    fn test_staged_reload() {
        let mut cache = FontCache::new(StepBackend::default());
        cache.load_font("", FontFace::PLAIN, 12.0).unwrap();
        assert_eq!(cache.backend().steps.len(), 3);

        // identical request reloads nothing
        cache.load_font("", FontFace::PLAIN, 12.0).unwrap();
        assert_eq!(cache.backend().steps.len(), 3);

        // size only
        cache.load_font("", FontFace::PLAIN, 14.0).unwrap();
        assert_eq!(count(&cache, "file"), 1);
        assert_eq!(count(&cache, "face"), 1);
        assert_eq!(count(&cache, "size"), 2);

        // same file, new face index, same size
        cache.load_font("", FontFace::ITALIC, 14.0).unwrap();
        assert_eq!(count(&cache, "file"), 1);
        assert_eq!(count(&cache, "face"), 2);
        assert_eq!(count(&cache, "size"), 3);

        // new file reloads everything
        cache.load_font("", FontFace::BOLD_ITALIC, 14.0).unwrap();
        assert_eq!(count(&cache, "file"), 2);
        assert_eq!(count(&cache, "face"), 3);
        assert_eq!(count(&cache, "size"), 4);
    }

    #[test]
    fn test_string_memo() {
        let mut cache = FontCache::new(StepBackend::default());
        cache.load_font("", FontFace::PLAIN, 12.0).unwrap();
        assert_eq!(cache.text_width("abc").unwrap(), 30.0);
        assert_eq!(cache.text_width("abc").unwrap(), 30.0);
        assert_eq!(count(&cache, "shape"), 1);
        cache.text_width("abcd").unwrap();
        assert_eq!(count(&cache, "shape"), 2);
    }

    #[test]
    fn test_reload_clears_memo() {
        let mut cache = FontCache::new(StepBackend::default());
        cache.load_font("", FontFace::PLAIN, 12.0).unwrap();
        cache.text_width("abc").unwrap();
        cache.char_metric(77).unwrap();
        cache.load_font("", FontFace::PLAIN, 13.0).unwrap();
        cache.text_width("abc").unwrap();
        cache.char_metric(77).unwrap();
        assert_eq!(count(&cache, "shape"), 4);
    }

    #[test]
    fn test_char_metric_uses_absolute_code() {
        let mut cache = FontCache::new(StepBackend::default());
        cache.load_font("", FontFace::PLAIN, 10.0).unwrap();
        let positive = cache.char_metric(77).unwrap();
        let negative = cache.char_metric(-77).unwrap();
        assert_eq!(positive, negative);
        assert_eq!(count(&cache, "shape"), 1);
        assert_eq!(positive.width, 8.0);
        assert_eq!(positive.ascent, 8.0);
        assert_eq!(positive.descent, 2.0);
    }

    #[test]
    fn test_failed_load_leaves_cache_unloaded() {
        let mut cache = FontCache::new(StepBackend::default());
        cache.load_font("", FontFace::PLAIN, 12.0).unwrap();
        assert!(cache.is_loaded());

        cache.backend_mut().fail_face = true;
        assert!(cache.load_font("", FontFace::BOLD, 12.0).is_err());
        assert!(!cache.is_loaded());
        assert!(cache.text_width("abc").is_err());

        // next successful load starts from scratch
        cache.backend_mut().fail_face = false;
        cache.load_font("", FontFace::BOLD, 12.0).unwrap();
        assert!(cache.is_loaded());
    }
}
