//! Font selection and text metrics.
//!
//! The render pipeline asks for fonts by nominal pixel size; the surface backend
//! maps that size onto the nearest `ProFont` face. Widgets use the same mapping
//! through [`text_width`] so that centred and right-aligned text lines up with
//! what the backend actually draws.
//!
//! # Text Alignment
//!
//! Alignment is resolved by widgets before emission (the pipeline only knows a
//! baseline start point), so the `TextStyle` constants below are only used by
//! the backend when it renders a string.

use embedded_graphics::{
    mono_font::MonoFont,
    text::{Alignment, Baseline, TextStyle, TextStyleBuilder},
};
use profont::{
    PROFONT_7_POINT,
    PROFONT_9_POINT,
    PROFONT_10_POINT,
    PROFONT_12_POINT,
    PROFONT_14_POINT,
    PROFONT_18_POINT,
    PROFONT_24_POINT,
};

// =============================================================================
// Text Styles (const - zero runtime cost)
// =============================================================================

/// Left-aligned text on the alphabetic baseline. Used for every pipeline string.
pub const BASELINE_LEFT: TextStyle =
    TextStyleBuilder::new().alignment(Alignment::Left).baseline(Baseline::Alphabetic).build();

// =============================================================================
// Font Sizes
// =============================================================================

/// Default label font size in pixels.
pub const FONT_SIZE_LABEL: f32 = 12.0;

/// Status bar and table cell font size.
pub const FONT_SIZE_TABLE: f32 = 10.0;

/// Message box title size.
pub const FONT_SIZE_TITLE: f32 = 14.0;

/// `ProFont` faces by ascending nominal size.
const FACES: [(f32, &MonoFont<'static>); 7] = [
    (7.0, &PROFONT_7_POINT),
    (9.0, &PROFONT_9_POINT),
    (10.0, &PROFONT_10_POINT),
    (12.0, &PROFONT_12_POINT),
    (14.0, &PROFONT_14_POINT),
    (18.0, &PROFONT_18_POINT),
    (24.0, &PROFONT_24_POINT),
];

/// Largest face not bigger than `size` (the smallest face below 7).
pub fn font_for_size(size: f32) -> &'static MonoFont<'static> {
    FACES.iter().rev().find(|(s, _)| *s <= size).map_or(FACES[0].1, |(_, font)| *font)
}

/// Rendered width of `text` at `size`, in pixels.
pub fn text_width(text: &str, size: f32) -> f32 {
    let font = font_for_size(size);
    let advance = font.character_size.width + font.character_spacing;
    (text.chars().count() as u32 * advance) as f32
}

/// Height of one line of text at `size`, in pixels.
pub fn text_height(size: f32) -> f32 {
    font_for_size(size).character_size.height as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_for_size_picks_nearest_below() {
        let size = |f: &MonoFont<'_>| f.character_size;
        assert_eq!(size(font_for_size(12.0)), PROFONT_12_POINT.character_size, "exact size");
        assert_eq!(size(font_for_size(13.5)), PROFONT_12_POINT.character_size, "rounds down");
        assert_eq!(size(font_for_size(2.0)), PROFONT_7_POINT.character_size, "smallest face");
        assert_eq!(size(font_for_size(60.0)), PROFONT_24_POINT.character_size, "largest face");
    }

    #[test]
    fn test_text_width_scales_with_length() {
        let one = text_width("A", FONT_SIZE_LABEL);
        assert!(one > 0.0);
        assert_eq!(text_width("ABCD", FONT_SIZE_LABEL), one * 4.0, "monospace");
        assert_eq!(text_width("", FONT_SIZE_LABEL), 0.0);
    }

    #[test]
    fn test_text_height_positive() {
        assert!(text_height(FONT_SIZE_TITLE) > text_height(FONT_SIZE_TABLE));
    }
}
