//! Path construction from flat coordinate arrays.
//!
//! Hosts pass vertices as parallel `x` and `y` slices. Subpaths with fewer
//! than two vertices are degenerate and produce no geometry; when several
//! subpaths share one coordinate stream, skipping a degenerate subpath still
//! consumes its vertices so later subpaths stay aligned.

use tiny_skia::{Path, PathBuilder};

/// Builds a path one subpath at a time.
#[derive(Default)]
pub struct PathAssembler {
    builder: PathBuilder,
}

impl PathAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subpath through `points`. Returns false if it was degenerate.
    pub fn add_subpath<I>(&mut self, points: I, closed: bool) -> bool
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut points = points.into_iter();
        let (Some(first), Some(second)) = (points.next(), points.next()) else {
            return false;
        };
        self.builder.move_to(first.0 as f32, first.1 as f32);
        self.builder.line_to(second.0 as f32, second.1 as f32);
        for (x, y) in points {
            self.builder.line_to(x as f32, y as f32);
        }
        if closed {
            self.builder.close();
        }
        true
    }

    /// Finish the path; `None` if nothing was added.
    pub fn finish(self) -> Option<Path> {
        self.builder.finish()
    }
}

fn zip_points<'a>(x: &'a [f64], y: &'a [f64]) -> impl Iterator<Item = (f64, f64)> + 'a {
    x.iter().copied().zip(y.iter().copied())
}

/// A closed polygon through every vertex.
pub fn polygon_path(x: &[f64], y: &[f64]) -> Option<Path> {
    let mut assembler = PathAssembler::new();
    assembler.add_subpath(zip_points(x, y), true);
    assembler.finish()
}

/// An open chain through every vertex.
pub fn polyline_path(x: &[f64], y: &[f64]) -> Option<Path> {
    let mut assembler = PathAssembler::new();
    assembler.add_subpath(zip_points(x, y), false);
    assembler.finish()
}

/// A single two-point segment.
pub fn line_path(x1: f64, y1: f64, x2: f64, y2: f64) -> Option<Path> {
    let mut builder = PathBuilder::new();
    builder.move_to(x1 as f32, y1 as f32);
    builder.line_to(x2 as f32, y2 as f32);
    builder.finish()
}

/// Several closed subpaths read from one shared coordinate stream.
///
/// `counts[i]` is the number of vertices in subpath `i`. Counts running past
/// the end of the coordinate arrays are truncated.
pub fn compound_path(counts: &[usize], x: &[f64], y: &[f64]) -> Option<Path> {
    let available = x.len().min(y.len());
    let mut assembler = PathAssembler::new();
    let mut cursor = 0usize;
    for &count in counts {
        if cursor >= available {
            break;
        }
        let end = cursor.saturating_add(count).min(available);
        if count >= 2 {
            assembler.add_subpath(zip_points(&x[cursor..end], &y[cursor..end]), true);
        }
        cursor = end;
    }
    assembler.finish()
}

/// A circle outline with the radius clamped to at least `min_radius`.
pub fn circle_path(x: f64, y: f64, r: f64, min_radius: f64) -> Option<Path> {
    let r = if r < min_radius { min_radius } else { r };
    PathBuilder::from_circle(x as f32, y as f32, r as f32)
}

/// An axis-aligned rectangle from two corners in any order.
pub fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64) -> Option<Path> {
    let rect = tiny_skia::Rect::from_ltrb(
        x0.min(x1) as f32,
        y0.min(y1) as f32,
        x0.max(x1) as f32,
        y0.max(y1) as f32,
    )?;
    Some(PathBuilder::from_rect(rect))
}
