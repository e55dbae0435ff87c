#![allow(dead_code)]

use ink_device::tiny_skia::{self, Path, PathBuilder, Pixmap, Rect};
use ink_device::{
    ClipRect, DeviceConfig, FaceMetrics, FillRule, FillStyle, FontBackend, FontOrigin, FontQuery,
    FontSource, GraphicsContext, InkDevice, InkDeviceBuilder, InkError, InkResult, LineCap,
    LineJoin, MemorySink, PackedColor, RenderContext, Severity, ShapedGlyph, ShapedText,
    SkiaContext,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn initialize() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// One call made against a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    FillColor(tiny_skia::Color),
    FillPattern,
    StrokeColor(tiny_skia::Color),
    Width(f32),
    Dash(Vec<f32>),
    Cap(LineCap),
    Join(LineJoin),
    Miter(f32),
    Clip(ClipRect),
    Rotate(f32, f32, f32),
    Reset,
    Fill(FillRule, Rect),
    Stroke(Rect),
    FillAll,
}

impl Op {
    pub fn is_draw(&self) -> bool {
        matches!(self, Op::Fill(..) | Op::Stroke(_) | Op::FillAll)
    }
}

/// Records every call and forwards it to a real canvas.
pub struct RecordingContext {
    pub inner: SkiaContext,
    pub ops: Vec<Op>,
}

impl RecordingContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: SkiaContext::new(width, height).unwrap(),
            ops: Vec::new(),
        }
    }
}

impl RenderContext for RecordingContext {
    fn pixmap(&self) -> &Pixmap {
        self.inner.pixmap()
    }

    fn set_fill_style(&mut self, style: FillStyle) {
        self.ops.push(match &style {
            FillStyle::Color(color) => Op::FillColor(*color),
            FillStyle::Pattern(_) => Op::FillPattern,
        });
        self.inner.set_fill_style(style);
    }

    fn set_stroke_color(&mut self, color: tiny_skia::Color) {
        self.ops.push(Op::StrokeColor(color));
        self.inner.set_stroke_color(color);
    }

    fn set_stroke_width(&mut self, width: f32) {
        self.ops.push(Op::Width(width));
        self.inner.set_stroke_width(width);
    }

    fn set_stroke_dash(&mut self, pattern: Vec<f32>) {
        self.ops.push(Op::Dash(pattern.clone()));
        self.inner.set_stroke_dash(pattern);
    }

    fn set_stroke_cap(&mut self, cap: LineCap) {
        self.ops.push(Op::Cap(cap));
        self.inner.set_stroke_cap(cap);
    }

    fn set_stroke_join(&mut self, join: LineJoin) {
        self.ops.push(Op::Join(join));
        self.inner.set_stroke_join(join);
    }

    fn set_stroke_miter_limit(&mut self, limit: f32) {
        self.ops.push(Op::Miter(limit));
        self.inner.set_stroke_miter_limit(limit);
    }

    fn set_clip_rect(&mut self, rect: ClipRect) {
        self.ops.push(Op::Clip(rect));
        self.inner.set_clip_rect(rect);
    }

    fn rotate_about(&mut self, angle: f32, x: f32, y: f32) {
        self.ops.push(Op::Rotate(angle, x, y));
        self.inner.rotate_about(angle, x, y);
    }

    fn reset_transform(&mut self) {
        self.ops.push(Op::Reset);
        self.inner.reset_transform();
    }

    fn fill_path(&mut self, path: &Path, rule: FillRule) {
        self.ops.push(Op::Fill(rule, path.bounds()));
        self.inner.fill_path(path, rule);
    }

    fn stroke_path(&mut self, path: &Path) {
        self.ops.push(Op::Stroke(path.bounds()));
        self.inner.stroke_path(path);
    }

    fn fill_all(&mut self) {
        self.ops.push(Op::FillAll);
        self.inner.fill_all();
    }
}

/// Font backend with fixed geometry: every character advances by the font
/// size and a run inks the box `[1, advance - 1]`.
#[derive(Debug, Default)]
pub struct MockBackend {
    pub resolves: usize,
    pub files: usize,
    pub faces: usize,
    pub sizes: Vec<f32>,
    pub shaped: Vec<String>,
    size: f32,
}

/// Family name the mock refuses to resolve.
pub const MISSING_FAMILY: &str = "No Such Font";

impl FontBackend for MockBackend {
    fn resolve(&mut self, query: &FontQuery<'_>) -> InkResult<FontSource> {
        self.resolves += 1;
        if query.family == MISSING_FAMILY {
            return Err(InkError::FontNotFound(query.family.to_string()));
        }
        Ok(FontSource {
            origin: FontOrigin::File(format!("{}.ttf", query.family).into()),
            index: query.bold as u32 + 2 * query.italic as u32,
        })
    }

    fn load_file(&mut self, _source: &FontSource) -> InkResult<()> {
        self.files += 1;
        Ok(())
    }

    fn load_face(&mut self, _source: &FontSource) -> InkResult<()> {
        self.faces += 1;
        Ok(())
    }

    fn load_size(&mut self, size: f32) -> InkResult<FaceMetrics> {
        self.sizes.push(size);
        self.size = size;
        Ok(FaceMetrics {
            ascent: size * 0.75,
            descent: size * 0.25,
        })
    }

    fn shape(&mut self, text: &str) -> InkResult<ShapedText> {
        self.shaped.push(text.to_string());
        let step = self.size;
        let glyphs: Vec<ShapedGlyph> = text
            .chars()
            .enumerate()
            .map(|(i, c)| ShapedGlyph {
                id: c as u16,
                x: i as f32 * step,
                y: 0.0,
                size: self.size,
                font: None,
            })
            .collect();
        let advance = glyphs.len() as f32 * step;
        Ok(ShapedText {
            glyphs,
            advance,
            ink_left: 1.0,
            ink_right: (advance - 1.0).max(1.0),
        })
    }

    fn glyph_outline(&mut self, glyph: &ShapedGlyph) -> Option<Path> {
        // a box from the baseline up to the ascent, one advance wide
        let rect = Rect::from_xywh(0.0, -glyph.size * 0.75, glyph.size, glyph.size * 0.75)?;
        Some(PathBuilder::from_rect(rect))
    }
}

pub type TestDevice = InkDevice<MemorySink, MockBackend, RecordingContext>;

/// Collected diagnostics.
pub type Messages = Rc<RefCell<Vec<(Severity, String)>>>;

/// Build a recording device with a mock backend and an in-memory sink.
pub fn test_device(config: DeviceConfig) -> (TestDevice, Messages) {
    initialize();
    let messages: Messages = Rc::new(RefCell::new(Vec::new()));
    let collected = messages.clone();
    let context = RecordingContext::new(config.width, config.height);
    let device = InkDeviceBuilder::new(config, MemorySink::default())
        .with_backend(MockBackend::default())
        .with_diagnostics(move |severity: Severity, message: &str| {
            collected.borrow_mut().push((severity, message.to_string()));
        })
        .build_with_context(context);
    (device, messages)
}

pub fn small_config() -> DeviceConfig {
    DeviceConfig {
        width: 100,
        height: 80,
        ..DeviceConfig::default()
    }
}

/// Ops recorded after the first `skip` entries.
pub fn ops_since(device: &TestDevice, skip: usize) -> &[Op] {
    &device.context().ops[skip..]
}

/// Straight RGBA of one pixel of a capture.
pub fn pixel(capture: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let idx = ((y * width + x) * 4) as usize;
    [capture[idx], capture[idx + 1], capture[idx + 2], capture[idx + 3]]
}

pub fn red() -> PackedColor {
    PackedColor::rgb(255, 0, 0)
}

pub fn blue() -> PackedColor {
    PackedColor::rgb(0, 0, 255)
}

pub fn invisible() -> PackedColor {
    PackedColor::rgba(255, 0, 0, 0)
}

/// A context that draws with `col` and `fill` and otherwise defaults.
pub fn gc_with(col: PackedColor, fill: PackedColor) -> GraphicsContext {
    GraphicsContext {
        col,
        fill,
        ..GraphicsContext::default()
    }
}
