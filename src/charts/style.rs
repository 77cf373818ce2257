//! Figure geometry and palette shared by the report charts.

use plotters::style::{FontDesc, FontFamily, FontStyle, RGBColor};

/// Bars of the yearly discovery counts.
pub const DISCOVERY_BLUE: RGBColor = RGBColor(0x4c, 0x72, 0xb0);
/// Running total line.
pub const ACCUMULATED_RED: RGBColor = RGBColor(0xc4, 0x4e, 0x52);
/// Bins under the molecular weight threshold.
pub const COMPLIANT_GREEN: RGBColor = RGBColor(0x2e, 0xcc, 0x71);
/// Bins at or above the threshold.
pub const EXCEEDING_GRAY: RGBColor = RGBColor(0x95, 0xa5, 0xa6);
/// Threshold marker and its annotation.
pub const THRESHOLD_RED: RGBColor = RGBColor(0xe7, 0x4c, 0x3c);

pub const BAR_OPACITY: f64 = 0.7;
/// Bar width in category units.
pub const BAR_WIDTH: f64 = 0.8;

pub const TITLE_PT: f64 = 16.0;
pub const AXIS_LABEL_PT: f64 = 12.0;
pub const TICK_PT: f64 = 10.0;

/// Sans-serif font at a pixel size.
pub fn font(size_px: f64, style: FontStyle) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size_px, style)
}

/// Physical figure size and resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureSpec {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
}

impl FigureSpec {
    pub const fn new(width_in: f64, height_in: f64, dpi: u32) -> Self {
        Self {
            width_in,
            height_in,
            dpi,
        }
    }

    /// Pixel size of the raster.
    pub fn pixels(&self) -> (u32, u32) {
        (
            self.inches(self.width_in).max(1) as u32,
            self.inches(self.height_in).max(1) as u32,
        )
    }

    /// Convert a length in inches to whole pixels.
    pub fn inches(&self, inches: f64) -> i32 {
        (inches * self.dpi as f64).round() as i32
    }

    /// Convert a typographic point size to pixels.
    pub fn points(&self, pt: f64) -> f64 {
        pt * self.dpi as f64 / 72.0
    }
}
