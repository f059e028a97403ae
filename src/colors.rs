//! Colour constants for the operator console.
//!
//! Colours travel through the render pipeline as packed `0xRRGGBB` values so that
//! themes can be loaded from configuration files without any conversion. The
//! surface backend unpacks them into [`Rgb888`] only when pixels are produced.
//!
//! The palette follows the usual vehicle-display conventions: green for enabled
//! controls, amber/orange for warnings and red for errors and critical alarms.

use embedded_graphics::pixelcolor::Rgb888;

// =============================================================================
// Standard Colours
// =============================================================================

/// Pure black. Blackout canvas and text on light label backgrounds.
pub const BLACK: u32 = 0x00_0000;

/// Pure white. Default foreground and icon colour.
pub const WHITE: u32 = 0xFF_FFFF;

/// Pure red. Error status cells and critical alarms.
pub const RED: u32 = 0xFF_0000;

/// Pure green.
pub const GREEN: u32 = 0x00_FF00;

/// Pure blue.
pub const BLUE: u32 = 0x00_00FF;

/// Pure yellow. Selected label borders and changing labels.
pub const YELLOW: u32 = 0xFF_FF00;

// =============================================================================
// Application Colours
// =============================================================================

/// Orange warning colour. "Off" status cells and caution alarms.
pub const ORANGE: u32 = 0xFF_A500;

/// Amber highlight used for the current table row.
pub const AMBER: u32 = 0xFF_BF00;

/// Dark olive green. Default theme background behind the canvas.
pub const DARK_OLIVE_GREEN: u32 = 0x55_6B2F;

/// Dark green used for enabled label backgrounds.
pub const DARK_GREEN: u32 = 0x00_6400;

/// Olive used for selected label backgrounds.
pub const OLIVE: u32 = 0x80_8000;

/// Mid grey used for disabled labels and table grid lines.
pub const GREY: u32 = 0x80_8080;

/// Dark grey used for disabled label backgrounds.
pub const DARK_GREY: u32 = 0x40_4040;

/// Dark blue used as the default table background.
pub const DARK_BLUE: u32 = 0x00_008B;

/// Light grey used for the status bar background.
pub const LIGHT_GREY: u32 = 0xD3_D3D3;

/// Sky blue used for the compass sight arc.
pub const SKY_BLUE: u32 = 0x87_CEEB;

/// Cyan used for the compass weapon heading.
pub const CYAN: u32 = 0x00_FFFF;

// =============================================================================
// Conversion Helpers
// =============================================================================

/// Red channel of a packed colour.
#[inline]
pub const fn red(rgb: u32) -> u8 {
    ((rgb >> 16) & 0xFF) as u8
}

/// Green channel of a packed colour.
#[inline]
pub const fn green(rgb: u32) -> u8 {
    ((rgb >> 8) & 0xFF) as u8
}

/// Blue channel of a packed colour.
#[inline]
pub const fn blue(rgb: u32) -> u8 {
    (rgb & 0xFF) as u8
}

/// Pack three channels into a `0xRRGGBB` value.
#[inline]
pub const fn pack(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Convert a packed colour into the pixel type used by the display.
#[inline]
pub const fn to_rgb888(rgb: u32) -> Rgb888 {
    Rgb888::new(red(rgb), green(rgb), blue(rgb))
}

/// Scale every channel by `factor` (clamped to 0.0..=1.0). Used for display brightness.
pub fn dim(rgb: u32, factor: f32) -> u32 {
    let factor = factor.clamp(0.0, 1.0);
    let scale = |c: u8| (f32::from(c) * factor).round() as u8;
    pack(scale(red(rgb)), scale(green(rgb)), scale(blue(rgb)))
}
