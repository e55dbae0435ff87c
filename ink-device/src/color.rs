//! Packed host colors.

/// A 32-bit color as packed by the plotting host.
///
/// Red occupies the low byte, followed by green, blue and alpha in the high
/// byte. Channels are not premultiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedColor(pub u32);

impl PackedColor {
    /// Fully transparent white, used by hosts to mean "no color".
    pub const TRANSPARENT_WHITE: PackedColor = PackedColor::rgba(255, 255, 255, 0);
    /// Opaque black.
    pub const BLACK: PackedColor = PackedColor::rgba(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: PackedColor = PackedColor::rgba(255, 255, 255, 255);

    /// Pack four channels into a color.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        PackedColor((r as u32) | (g as u32) << 8 | (b as u32) << 16 | (a as u32) << 24)
    }

    /// Pack an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn red(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub const fn blue(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// A color is invisible iff its alpha channel is exactly zero.
    pub const fn is_visible(self) -> bool {
        self.alpha() != 0
    }
}

impl From<u32> for PackedColor {
    fn from(value: u32) -> Self {
        PackedColor(value)
    }
}

impl From<PackedColor> for tiny_skia::Color {
    fn from(color: PackedColor) -> Self {
        tiny_skia::Color::from_rgba8(color.red(), color.green(), color.blue(), color.alpha())
    }
}
