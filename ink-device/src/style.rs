//! Style types and line-type decoding.

/// Line type code for a continuous line.
pub const LTY_SOLID: i32 = 0;
/// Line type code for a line that is never drawn.
pub const LTY_BLANK: i32 = -1;

/// Maximum number of dash nibbles read from a line type code.
const MAX_DASH_NIBBLES: usize = 8;

/// Line cap style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Rounded edge extending past the endpoint.
    #[default]
    Round,
    /// Flat edge at the endpoint.
    Butt,
    /// Square edge extending past the endpoint.
    Square,
}

impl From<LineCap> for tiny_skia::LineCap {
    fn from(cap: LineCap) -> Self {
        match cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        }
    }
}

/// Line join style for stroke operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Rounded corner.
    #[default]
    Round,
    /// Sharp corner, clipped at the miter limit.
    Miter,
    /// Beveled corner.
    Bevel,
}

impl From<LineJoin> for tiny_skia::LineJoin {
    fn from(join: LineJoin) -> Self {
        match join {
            LineJoin::Miter => tiny_skia::LineJoin::MiterClip,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        }
    }
}

/// Fill rule for path operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Non-zero winding rule (default).
    #[default]
    NonZero,
    /// Even-odd rule.
    EvenOdd,
}

impl From<FillRule> for tiny_skia::FillRule {
    fn from(rule: FillRule) -> Self {
        match rule {
            FillRule::NonZero => tiny_skia::FillRule::Winding,
            FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        }
    }
}

/// Font face selector as used by plotting hosts.
///
/// Codes: 1 plain, 2 bold, 3 italic, 4 bold italic, 5 symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontFace(pub i32);

impl FontFace {
    pub const PLAIN: FontFace = FontFace(1);
    pub const BOLD: FontFace = FontFace(2);
    pub const ITALIC: FontFace = FontFace(3);
    pub const BOLD_ITALIC: FontFace = FontFace(4);
    pub const SYMBOL: FontFace = FontFace(5);

    pub fn is_bold(self) -> bool {
        self.0 == 2 || self.0 == 4
    }

    pub fn is_italic(self) -> bool {
        self.0 == 3 || self.0 == 4
    }

    pub fn is_symbol(self) -> bool {
        self.0 == 5
    }
}

impl Default for FontFace {
    fn default() -> Self {
        FontFace::PLAIN
    }
}

/// Decode a packed line type into device-unit dash/gap lengths.
///
/// The code is read as 4-bit nibbles from the low end, in (dash, gap) pairs,
/// each scaled by `line_width`. Decoding stops after eight nibbles or when a
/// dash nibble is zero. [`LTY_SOLID`] decodes to an empty pattern.
pub fn convert_linetype(lty: i32, line_width: f32) -> Vec<f32> {
    let mut pattern = Vec::new();
    if lty == LTY_SOLID {
        return pattern;
    }
    let mut bits = lty as u32;
    let mut read = 0;
    while read < MAX_DASH_NIBBLES && bits & 15 != 0 {
        let dash = (bits & 15) as f32 * line_width;
        bits >>= 4;
        let gap = (bits & 15) as f32 * line_width;
        bits >>= 4;
        pattern.push(dash);
        pattern.push(gap);
        read += 2;
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_is_empty_for_any_width() {
        for width in [0.0, 1.0, 3.5, 1000.0] {
            assert!(convert_linetype(LTY_SOLID, width).is_empty());
        }
    }

    #[test]
    fn test_single_pair() {
        assert_eq!(convert_linetype(0x24, 3.0), vec![12.0, 6.0]);
    }

    #[test]
    fn test_dashed_and_dotdash() {
        // "dashed" and "dotdash" as packed by plotting hosts
        assert_eq!(convert_linetype(0x44, 1.0), vec![4.0, 4.0]);
        assert_eq!(convert_linetype(0x3431, 2.0), vec![2.0, 6.0, 8.0, 6.0]);
    }

    #[test]
    fn test_stops_at_zero_dash_nibble() {
        assert_eq!(convert_linetype(0x3024, 1.0), vec![4.0, 2.0]);
    }

    #[test]
    fn test_reads_at_most_eight_nibbles() {
        let pattern = convert_linetype(0x1111_1111, 1.0);
        assert_eq!(pattern.len(), 8);
        assert!(pattern.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_face_flags() {
        assert!(!FontFace::PLAIN.is_bold());
        assert!(FontFace::BOLD.is_bold() && !FontFace::BOLD.is_italic());
        assert!(FontFace::ITALIC.is_italic());
        assert!(FontFace::BOLD_ITALIC.is_bold() && FontFace::BOLD_ITALIC.is_italic());
        assert!(FontFace::SYMBOL.is_symbol() && !FontFace::SYMBOL.is_bold());
    }
}
