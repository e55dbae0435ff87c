//! Device configuration and the static description handed to plotting hosts.

use crate::color::PackedColor;
use crate::style::{LineCap, LineJoin, LTY_SOLID};

/// Construction-time options for a device.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceConfig {
    /// Output path template; the first integer placeholder receives the page number.
    pub file: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Base point size for text.
    pub pointsize: f64,
    /// Default page background. A fully transparent value clears the page.
    pub background: PackedColor,
    /// Resolution in dots per inch.
    pub res: f64,
    /// Logical scaling factor applied on top of the resolution.
    pub scaling: f64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            file: "Rplot%03d.png".to_string(),
            width: 480,
            height: 480,
            pointsize: 12.0,
            background: PackedColor::WHITE,
            res: 72.0,
            scaling: 1.0,
        }
    }
}

impl DeviceConfig {
    /// Multiplier from points to device units, applied to font sizes.
    pub fn size_modifier(&self) -> f64 {
        self.scaling * self.res / 72.0
    }

    /// Multiplier from host line widths to device units.
    pub fn line_width_modifier(&self) -> f64 {
        self.scaling * self.res / 96.0
    }

    /// Describe the device the way a plotting host expects at registration.
    pub fn description(&self) -> DeviceDescription {
        let size_mod = self.size_modifier();
        DeviceDescription {
            left: 0.0,
            right: self.width as f64,
            bottom: self.height as f64,
            top: 0.0,
            start_fill: self.background,
            start_col: PackedColor::BLACK,
            start_ps: self.pointsize,
            start_lty: LTY_SOLID,
            start_font: 1,
            start_gamma: 1.0,
            char_width: 0.9 * self.pointsize * size_mod,
            char_height: 1.2 * self.pointsize * size_mod,
            x_char_offset: 0.4900,
            y_char_offset: 0.3333,
            y_line_bias: 0.2,
            inches_per_raster: 1.0 / (72.0 * size_mod),
            can_clip: true,
            can_hadj: 2,
            have_transparency: 2,
            have_transparent_bg: 2,
            has_text_utf8: true,
            default_lend: LineCap::Round,
            default_ljoin: LineJoin::Round,
        }
    }
}

/// Static device parameters reported to the host.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceDescription {
    /// Device extent in device units.
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub start_fill: PackedColor,
    pub start_col: PackedColor,
    pub start_ps: f64,
    pub start_lty: i32,
    pub start_font: i32,
    pub start_gamma: f64,
    /// Nominal character width in device units.
    pub char_width: f64,
    /// Nominal character height in device units.
    pub char_height: f64,
    pub x_char_offset: f64,
    pub y_char_offset: f64,
    pub y_line_bias: f64,
    /// Inches per device unit, identical on both axes.
    pub inches_per_raster: f64,
    pub can_clip: bool,
    /// 2 = arbitrary horizontal adjustment supported.
    pub can_hadj: i32,
    /// 2 = full alpha transparency supported.
    pub have_transparency: i32,
    pub have_transparent_bg: i32,
    pub has_text_utf8: bool,
    pub default_lend: LineCap,
    pub default_ljoin: LineJoin,
}
