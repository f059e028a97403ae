//! Label bars around the screen edge.
//!
//! | Widget | Bank | Keys |
//! |--------|------|------|
//! | [`TopLabels`] | `screen.top` | SA..BMS |
//! | [`BottomLabels`] | `screen.bottom` | F13..F20 |
//! | [`SideLabels::left`] | `screen.left` | F1..F6 |
//! | [`SideLabels::right`] | `screen.right` | F7..F12 |
//!
//! Each drawn label also registers a hotspot, except disabled ones, so a touch
//! on a label behaves like pressing its bezel key.

use std::any::Any;

use super::{Frame, Placement, Widget, WidgetKind, icons, icons::Icon};
use crate::{
    colors::{BLACK, DARK_GREEN, GREY, YELLOW},
    config::{BOTTOM_LABELS_Y, MINIMUM_WIDTH},
    keys::{AREA_KEYS, Key},
    labels::{FunctionKeyLabel, LabelState},
    render::{FontWeight, LineJoin},
    styles::{FONT_SIZE_LABEL, FONT_SIZE_TITLE, text_width},
    touch::FunctionGroup,
};

fn border(frame: &mut Frame<'_>) {
    frame.pipeline.set_line_join(LineJoin::Round);
    frame.line_width(frame.ctx.theme.label_border_thickness);
}

// =============================================================================
// Top Labels
// =============================================================================

/// Top bar margin either side.
const TOP_OFFSET: i32 = (MINIMUM_WIDTH as f32 * 0.02) as i32;

/// Slot pitch across the top bar.
const TOP_PITCH: i32 = (MINIMUM_WIDTH as i32 - TOP_OFFSET * 2) / 8;

const TOP_HEIGHT: i32 = 10;

/// Area-select bars. Disabled areas leave a gap.
#[derive(Debug)]
pub struct TopLabels {
    placement: Placement,
}

impl TopLabels {
    pub const fn new() -> Self {
        Self { placement: Placement::new(true, 0, 1) }
    }
}

impl Default for TopLabels {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for TopLabels {
    fn kind(&self) -> WidgetKind {
        WidgetKind::TopLabels
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        if !frame.screen.top.visible {
            return;
        }
        let top = self.placement.y;
        let spacing = TOP_PITCH / 10;
        border(frame);
        for (i, (label, key)) in frame.screen.top.labels.iter().zip(AREA_KEYS).enumerate() {
            if label.state == LabelState::Disabled {
                continue;
            }
            let x = i as i32 * TOP_PITCH + TOP_OFFSET;
            frame.label_colours(label.state);
            frame.label_box(x, top, TOP_PITCH - 10, TOP_HEIGHT, 4.0);
            frame.hotspot(FunctionGroup::Top, key, x, top, TOP_PITCH - spacing, TOP_HEIGHT);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// =============================================================================
// Bottom Labels
// =============================================================================

const BOTTOM_OFFSET: i32 = 20;
const BOTTOM_PITCH: i32 = 75;
const BOTTOM_WIDTH: i32 = BOTTOM_PITCH - 5;
const BOTTOM_HEIGHT: i32 = 20;

/// Common task bar. Slots 4 and 5 carry arrows instead of text.
#[derive(Debug)]
pub struct BottomLabels {
    placement: Placement,
}

impl BottomLabels {
    pub const fn new() -> Self {
        Self { placement: Placement::new(true, 0, BOTTOM_LABELS_Y) }
    }
}

impl Default for BottomLabels {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for BottomLabels {
    fn kind(&self) -> WidgetKind {
        WidgetKind::BottomLabels
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let top = self.placement.y;
        border(frame);
        frame.font(FontWeight::Normal, FONT_SIZE_LABEL);
        for (i, label) in frame.screen.bottom.labels.iter().enumerate() {
            if label.state == LabelState::Hidden {
                continue;
            }
            let x = i as i32 * BOTTOM_PITCH + BOTTOM_OFFSET;
            let text_colour = frame.label_colours(label.state);
            frame.label_box(x, top, BOTTOM_WIDTH, BOTTOM_HEIGHT, 4.0);
            if label.state != LabelState::Disabled
                && let Some(key) = Key::function(13 + i)
            {
                frame.hotspot(FunctionGroup::Bottom, key, x, top, BOTTOM_WIDTH, BOTTOM_HEIGHT);
            }
            match i {
                4 => icons::draw(frame.pipeline, Icon::UpArrow, (x + 34) as f32, Frame::row(top + 9), 15.0, 8.0),
                5 => icons::draw(frame.pipeline, Icon::DownArrow, (x + 34) as f32, Frame::row(top + 10), 15.0, 8.0),
                _ => {
                    frame.pipeline.draw_colour(text_colour);
                    frame.text_centred(x, top + 14, BOTTOM_WIDTH, &label.text, FONT_SIZE_LABEL);
                }
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// =============================================================================
// Side Labels
// =============================================================================

const SIDE_WIDTH: i32 = 100;
const SIDE_HEIGHT: i32 = 50;
const SIDE_FIRST: i32 = 38;
const SIDE_PITCH: i32 = 72;

/// Text area width inside a side label.
const SIDE_TEXT_WIDTH: i32 = 98;

/// Which panel a [`SideLabels`] widget draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Six function key labels down one side.
///
/// A `.` in the text splits it over two lines, and `icon:<name>` draws the
/// named icon instead of text.
#[derive(Debug)]
pub struct SideLabels {
    placement: Placement,
    side: Side,
}

impl SideLabels {
    pub const fn left() -> Self {
        Self { placement: Placement::new(true, 0, 0), side: Side::Left }
    }

    pub const fn right() -> Self {
        Self { placement: Placement::new(true, MINIMUM_WIDTH as i32 - SIDE_WIDTH - 1, 0), side: Side::Right }
    }

    fn draw_label(&self, frame: &mut Frame<'_>, top: i32, label: &FunctionKeyLabel) {
        let x = self.placement.x;
        let text_colour = frame.label_colours(label.state);
        frame.label_box(x, top, SIDE_WIDTH, SIDE_HEIGHT, 6.0);
        frame.pipeline.draw_colour(text_colour);
        frame.font(FontWeight::Normal, FONT_SIZE_TITLE);

        let text = label.text.as_str();
        if let Some(icon) = Icon::from_label(text) {
            let (cx, cy) = ((x + SIDE_WIDTH / 2) as f32, Frame::row(top + SIDE_HEIGHT / 2));
            icons::draw(frame.pipeline, icon, cx, cy, 20.0, 20.0);
        } else if let Some((first, second)) = text.split_once('.') {
            frame.text_centred(x, top + 20, SIDE_TEXT_WIDTH, first, FONT_SIZE_TITLE);
            frame.text_centred(x, top + 40, SIDE_TEXT_WIDTH, second, FONT_SIZE_TITLE);
        } else {
            let baseline = if label.toggle_active { 17 } else { 30 };
            frame.text_centred(x, top + baseline, SIDE_TEXT_WIDTH, text, FONT_SIZE_TITLE);
        }

        if label.toggle_active {
            self.draw_toggle(frame, top, label);
        }
    }

    /// The two toggle boxes; the lit one is yellow.
    fn draw_toggle(&self, frame: &mut Frame<'_>, top: i32, label: &FunctionKeyLabel) {
        let (x, top) = (self.placement.x, top + 25);
        let (on, off) = if label.toggle_on { (YELLOW, GREY) } else { (GREY, YELLOW) };
        frame.pipeline.set_colour_foreground(DARK_GREEN);
        for (offset, width, fill, text) in
            [(5, 40, on, label.toggle_text1.as_str()), (50, 45, off, label.toggle_text2.as_str())]
        {
            frame.pipeline.set_colour_background(fill);
            frame.label_box(x + offset, top, width, 20, 4.0);
            frame.pipeline.draw_colour(BLACK);
            let inset = ((width as f32 - text_width(text, FONT_SIZE_TITLE)) / 2.0).max(2.0) as i32;
            frame.text(x + offset + inset, top + 15, text);
        }
    }
}

impl Widget for SideLabels {
    fn kind(&self) -> WidgetKind {
        match self.side {
            Side::Left => WidgetKind::LeftLabels,
            Side::Right => WidgetKind::RightLabels,
        }
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let (bank, group, first_key) = match self.side {
            Side::Left => (&frame.screen.left, FunctionGroup::Left, 1),
            Side::Right => (&frame.screen.right, FunctionGroup::Right, 7),
        };
        if !bank.visible {
            return;
        }
        border(frame);
        for (i, label) in bank.labels.iter().enumerate() {
            if label.state == LabelState::Hidden {
                continue;
            }
            let top = SIDE_FIRST + i as i32 * SIDE_PITCH;
            self.draw_label(frame, top, label);
            if label.state != LabelState::Disabled
                && let Some(key) = Key::function(first_key + i)
            {
                frame.hotspot(group, key, self.placement.x, top, SIDE_WIDTH, SIDE_HEIGHT);
            }
        }
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

    // -------------------------------------------------------------------------
    // Top
    // -------------------------------------------------------------------------

    #[test]
    fn test_top_skips_disabled_slots() {
        let mut rig = Rig::new();
        rig.draw(&mut TopLabels::new());
        // STR is disabled in the default bank
        let boxes = rig.pipeline.commands().iter().filter(|c| matches!(c, DrawCommand::RoundedRectangle { .. })).count();
        assert_eq!(boxes, 7);
        assert!(rig.touch.iter().all(|h| h.binding != Key::Str), "no hotspot for disabled area");
    }

    #[test]
    fn test_top_hotspot_hits_area_key() {
        let mut rig = Rig::new();
        rig.draw(&mut TopLabels::new());
        // First bar spans x 12..81, y 469..479 in bottom-left space
        assert_eq!(rig.touch.check(FunctionGroup::Top, 40, 474), Some(Key::Sa));
        assert_eq!(rig.touch.check(FunctionGroup::Top, 40 + TOP_PITCH * 3, 474), Some(Key::Sys));
    }

    #[test]
    fn test_top_hidden_bank_draws_nothing() {
        let mut rig = Rig::new();
        rig.screen.top.visible = false;
        rig.draw(&mut TopLabels::new());
        assert!(rig.touch.is_empty());
    }

    // -------------------------------------------------------------------------
    // Bottom
    // -------------------------------------------------------------------------

    #[test]
    fn test_bottom_arrows_replace_text() {
        let mut rig = Rig::new();
        rig.draw(&mut BottomLabels::new());
        let texts = texts(&rig);
        assert!(texts.contains(&"Alarms".to_string()));
        assert_eq!(texts.len(), 6, "slots 4 and 5 draw icons");
        assert!(rig.pipeline.commands().contains(&DrawCommand::Save), "icon drawn");
    }

    #[test]
    fn test_bottom_disabled_has_no_hotspot() {
        let mut rig = Rig::new();
        rig.screen.bottom.set_disabled(3);
        rig.draw(&mut BottomLabels::new());
        assert_eq!(rig.touch.check(FunctionGroup::Bottom, 3 * BOTTOM_PITCH + 30, 10), None);
        assert_eq!(rig.touch.check(FunctionGroup::Bottom, BOTTOM_PITCH + 30, 10), Some(Key::F14));
    }

    // -------------------------------------------------------------------------
    // Side
    // -------------------------------------------------------------------------

    #[test]
    fn test_side_splits_dotted_text() {
        let mut rig = Rig::new();
        rig.screen.left = crate::labels::FunctionKeys::new(std::array::from_fn(|i| {
            FunctionKeyLabel::new(if i == 0 { LabelState::Enabled } else { LabelState::Hidden }, "Sort.Ascending")
        }));
        rig.draw(&mut SideLabels::left());
        assert_eq!(texts(&rig), vec!["Sort".to_string(), "Ascending".to_string()]);
        assert_eq!(rig.touch.check(FunctionGroup::Left, 50, 480 - 60), Some(Key::F1));
    }

    #[test]
    fn test_right_side_binds_f7_onwards() {
        let mut rig = Rig::new();
        rig.screen.right =
            crate::labels::FunctionKeys::new(std::array::from_fn(|_| FunctionKeyLabel::new(LabelState::Enabled, "x")));
        let mut right = SideLabels::right();
        assert_eq!(right.kind(), WidgetKind::RightLabels);
        rig.draw(&mut right);
        let top = SIDE_FIRST + SIDE_PITCH;
        let y = 480 - top - SIDE_HEIGHT / 2;
        assert_eq!(rig.touch.check(FunctionGroup::Right, 590, y), Some(Key::F8));
    }

    #[test]
    fn test_side_toggle_draws_both_texts() {
        let mut rig = Rig::new();
        rig.screen.left = crate::labels::FunctionKeys::new(std::array::from_fn(|i| {
            if i == 0 {
                FunctionKeyLabel::with_toggle(LabelState::Enabled, "Laser", "On", "Off", true)
            } else {
                FunctionKeyLabel::new(LabelState::Hidden, "")
            }
        }));
        rig.draw(&mut SideLabels::left());
        assert_eq!(texts(&rig), vec!["Laser".to_string(), "On".to_string(), "Off".to_string()]);
        assert!(rig.pipeline.commands().contains(&DrawCommand::ColourBackground(YELLOW)), "lit toggle");
    }

    #[test]
    fn test_side_icon_label() {
        let mut rig = Rig::new();
        rig.screen.left = crate::labels::FunctionKeys::new(std::array::from_fn(|_| {
            FunctionKeyLabel::new(LabelState::Disabled, "icon:uparrow")
        }));
        rig.draw(&mut SideLabels::left());
        assert!(texts(&rig).is_empty(), "icons replace text");
        assert!(rig.touch.is_empty(), "disabled labels are not touchable");
    }
}
