//! Alarm indicator strip and operating mode banner.

use std::any::Any;

use super::{Frame, Placement, Widget, WidgetKind};
use crate::{
    colors::{AMBER, DARK_BLUE, RED, WHITE},
    config::{ALARM_INDICATOR_Y, MINIMUM_HEIGHT, MINIMUM_WIDTH, TABLE_WIDTH, TABLE_X},
    keys::Key,
    render::FontWeight,
    styles::{FONT_SIZE_LABEL, FONT_SIZE_TITLE, text_height, text_width},
    touch::FunctionGroup,
};

/// Severity of the alarm on the indicator strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AlarmType {
    #[default]
    Advisory,
    Caution,
    Warning,
}

// =============================================================================
// Alarm Indicator
// =============================================================================

const INDICATOR_HEIGHT: i32 = 20;

/// Latest alarm text above the bottom labels. Touching it acknowledges (F16).
#[derive(Debug)]
pub struct AlarmIndicator {
    placement: Placement,
    pub alarm_type: AlarmType,
    pub text: String,
}

impl AlarmIndicator {
    pub const fn new() -> Self {
        Self { placement: Placement::new(false, TABLE_X, ALARM_INDICATOR_Y), alarm_type: AlarmType::Advisory, text: String::new() }
    }

    pub fn set(&mut self, alarm_type: AlarmType, text: &str) {
        self.alarm_type = alarm_type;
        text.clone_into(&mut self.text);
    }
}

impl Default for AlarmIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for AlarmIndicator {
    fn kind(&self) -> WidgetKind {
        WidgetKind::AlarmIndicator
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let (x, top) = (self.placement.x, self.placement.y);
        let background = match self.alarm_type {
            AlarmType::Advisory => frame.ctx.theme.label_enabled.background,
            AlarmType::Caution => RED,
            AlarmType::Warning => AMBER,
        };
        frame.font(FontWeight::Normal, FONT_SIZE_TITLE);
        frame.pipeline.set_colour_background(background);
        frame.pipeline.set_colour_foreground(WHITE);
        frame.line_width(1.0);
        frame.rounded_rect(x, top, TABLE_WIDTH, INDICATOR_HEIGHT, 6.0, true);
        frame.pipeline.draw_colour(WHITE);
        frame.text_centred(x, top + 15, TABLE_WIDTH, &self.text, FONT_SIZE_TITLE);
        frame.hotspot(FunctionGroup::AlarmsIndicator, Key::F16, x, top, TABLE_WIDTH, INDICATOR_HEIGHT);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// =============================================================================
// Mode Banner
// =============================================================================

/// Distance of the banner's lower edge from the top of the screen.
const BANNER_BOTTOM: i32 = (MINIMUM_HEIGHT as f32 * 0.12) as i32;

/// "Training" or "Maintenance" banner, drawn only in those screen modes.
#[derive(Debug)]
pub struct ModeBanner {
    placement: Placement,
}

impl ModeBanner {
    pub const fn new() -> Self {
        Self { placement: Placement::new(true, 0, BANNER_BOTTOM) }
    }
}

impl Default for ModeBanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for ModeBanner {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Mode
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let Some(text) = frame.screen.mode.banner() else {
            return;
        };
        let width = text_width(text, FONT_SIZE_LABEL) as i32;
        let height = text_height(FONT_SIZE_LABEL) as i32 + 15;
        let centre = MINIMUM_WIDTH as i32 / 2;
        let bottom = self.placement.y;

        frame.pipeline.set_colour_foreground(WHITE);
        frame.pipeline.set_colour_background(DARK_BLUE);
        frame.line_width(1.0);
        frame.font(FontWeight::Normal, FONT_SIZE_LABEL);
        frame.rounded_rect(centre - width / 2 - 5, bottom - height, width + 10, height, 6.0, true);
        frame.pipeline.draw_colour(WHITE);
        frame.text(centre - width / 2, bottom - 6, text);
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
    use crate::{render::DrawCommand, screen::ScreenMode};

    #[test]
    fn test_indicator_colour_follows_type() {
        let mut rig = Rig::new();
        let mut indicator = AlarmIndicator::new();
        indicator.set(AlarmType::Caution, "Engine over temperature");
        rig.draw(&mut indicator);
        assert!(rig.pipeline.commands().contains(&DrawCommand::ColourBackground(RED)));
        assert!(rig.pipeline.commands().iter().any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "Engine over temperature")));
    }

    #[test]
    fn test_indicator_touch_acknowledges() {
        let mut rig = Rig::new();
        rig.draw(&mut AlarmIndicator::new());
        // 429..449 from the top is 31..51 from the bottom
        assert_eq!(rig.touch.check(FunctionGroup::AlarmsIndicator, 300, 40), Some(Key::F16));
        assert_eq!(rig.touch.check(FunctionGroup::Bottom, 300, 40), None, "own group only");
    }

    #[test]
    fn test_banner_only_in_training_and_maintenance() {
        let mut rig = Rig::new();
        rig.draw(&mut ModeBanner::new());
        assert!(rig.pipeline.is_empty(), "operational mode has no banner");

        rig.screen.mode = ScreenMode::Training;
        rig.draw(&mut ModeBanner::new());
        let text = rig.pipeline.commands().iter().find_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.clone()),
            _ => None,
        });
        assert_eq!(text.as_deref(), ScreenMode::Training.banner());
    }
}
