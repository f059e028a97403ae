//! On-screen keyboard.

use std::any::Any;

use super::{Frame, Placement, Widget, WidgetKind, icons};
use crate::{
    colors::{DARK_GREY, GREY, WHITE},
    config::{TABLE_WIDTH, TABLE_X},
    render::FontWeight,
    styles::FONT_SIZE_TITLE,
};

const PANEL_TOP: i32 = 265;
const PADDING: i32 = 5;
const BUTTON: i32 = 33;
const PITCH: i32 = BUTTON + 5;

/// Row start positions; each row is shifted right of the one above.
const ROW_X: [i32; 3] = [125, 140, 160];

type Layout = [&'static [char]; 3];

const UPPER: Layout = [
    &['Q', 'W', 'E', 'R', 'T', 'Y', 'U', 'I', 'O', 'P'],
    &['A', 'S', 'D', 'F', 'G', 'H', 'J', 'K', 'L'],
    &['Z', 'X', 'C', 'V', 'B', 'N', 'M', ' '],
];

const LOWER: Layout = [
    &['q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p'],
    &['a', 's', 'd', 'f', 'g', 'h', 'j', 'k', 'l'],
    &['z', 'x', 'c', 'v', 'b', 'n', 'm', ' '],
];

const NUMBERS: Layout = [
    &['1', '2', '3', '4', '5', '6', '7', '8', '9', '0'],
    &['-', '_', '.', ',', ';', ':', '"', '-', '-'],
    &['!', '@', '#', '$', '%', '^', '&', ' '],
];

/// Character set shown on the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeyboardMode {
    #[default]
    Upper,
    Lower,
    Numbers,
}

impl KeyboardMode {
    const fn layout(self) -> &'static Layout {
        match self {
            Self::Upper => &UPPER,
            Self::Lower => &LOWER,
            Self::Numbers => &NUMBERS,
        }
    }

    /// Mode selected by the mode key: upper, lower, numbers, then round again.
    pub const fn next(self) -> Self {
        match self {
            Self::Upper => Self::Lower,
            Self::Lower => Self::Numbers,
            Self::Numbers => Self::Upper,
        }
    }
}

#[derive(Debug)]
pub struct KeyboardWidget {
    placement: Placement,
    mode: KeyboardMode,
}

impl KeyboardWidget {
    pub const fn new() -> Self {
        Self { placement: Placement::new(false, TABLE_X, PANEL_TOP), mode: KeyboardMode::Upper }
    }

    #[inline]
    pub const fn mode(&self) -> KeyboardMode {
        self.mode
    }

    #[inline]
    pub const fn set_mode(&mut self, mode: KeyboardMode) {
        self.mode = mode;
    }

    fn button(frame: &mut Frame<'_>, x: i32, top: i32, width: i32, height: i32, text: &str) {
        frame.pipeline.set_colour_foreground(WHITE);
        frame.pipeline.set_colour_background(DARK_GREY);
        frame.rounded_rect(x, top, width, height, 4.0, true);
        if !text.is_empty() {
            frame.pipeline.draw_colour(WHITE);
            frame.text_centred(x, top + height / 2 + 5, width, text, FONT_SIZE_TITLE);
        }
    }
}

impl Default for KeyboardWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for KeyboardWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Keyboard
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let top = self.placement.y;
        let row_top = |row: i32| top + PADDING + PITCH * row;

        frame.pipeline.set_colour_foreground(GREY);
        frame.pipeline.set_colour_background(DARK_GREY);
        frame.line_width(1.0);
        frame.rounded_rect(self.placement.x, top, TABLE_WIDTH, PADDING + PITCH * 4 + 1, 6.0, true);
        frame.font(FontWeight::Bold, FONT_SIZE_TITLE);

        let mut buffer = [0u8; 4];
        for (row, keys) in self.mode.layout().iter().enumerate() {
            let row = row as i32;
            for (i, key) in keys.iter().enumerate() {
                let text = key.encode_utf8(&mut buffer);
                Self::button(frame, ROW_X[row as usize] + i as i32 * PITCH, row_top(row), BUTTON, BUTTON, text.trim());
            }
        }

        // Enter sits on the blank key closing the third row
        let enter_x = ROW_X[2] + 7 * PITCH;
        frame.pipeline.set_colour(WHITE);
        icons::draw(frame.pipeline, icons::Icon::RightArrow, (enter_x + BUTTON / 2) as f32, Frame::row(row_top(2) + BUTTON / 2), 8.0, 10.0);

        let bottom = row_top(3);
        Self::button(frame, 144, bottom, PITCH, BUTTON, "123");
        Self::button(frame, 185, bottom, BUTTON + 202, BUTTON, "SPACE");
        Self::button(frame, enter_x, bottom, BUTTON, BUTTON, "");
        frame.pipeline.set_colour(WHITE);
        icons::draw(frame.pipeline, icons::Icon::UpArrow, (enter_x + BUTTON / 2) as f32, Frame::row(bottom + BUTTON / 2), 12.0, 11.0);
        Self::button(frame, 463, bottom - 30, 50, 50, "Mode");
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Rig;
    use super::*;
    use crate::render::DrawCommand;

    fn texts(rig: &Rig) -> Vec<String> {
        rig.pipeline
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_upper_layout_keys() {
        let mut rig = Rig::new();
        rig.draw(&mut KeyboardWidget::new());
        let texts = texts(&rig);
        assert_eq!(texts.first().map(String::as_str), Some("Q"));
        assert!(texts.contains(&"SPACE".to_owned()));
        assert!(texts.contains(&"Mode".to_owned()));
        // 26 printable keys, the blank keys carry no text
        assert_eq!(texts.len(), 26 + 3);
    }

    #[test]
    fn test_mode_switches_layout() {
        let mut rig = Rig::new();
        let mut keyboard = KeyboardWidget::new();
        keyboard.set_mode(KeyboardMode::Numbers);
        rig.draw(&mut keyboard);
        assert_eq!(texts(&rig).first().map(String::as_str), Some("1"));
        assert_eq!(KeyboardMode::Numbers.next(), KeyboardMode::Upper);
    }

    #[test]
    fn test_panel_outline_first() {
        let mut rig = Rig::new();
        rig.draw(&mut KeyboardWidget::new());
        let panel = rig.pipeline.commands().iter().find_map(|c| match c {
            DrawCommand::RoundedRectangle { width, height, .. } => Some((*width, *height)),
            _ => None,
        });
        assert_eq!(panel, Some((420.0, (PADDING + PITCH * 4 + 1) as f32)));
    }
}
