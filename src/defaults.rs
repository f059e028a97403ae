//! Default label banks and screen contents per functional area.
//!
//! These are the banks registered with the [`ViewRegistry`](crate::view::ViewRegistry)
//! when the system powers on. Labels starting with `icon:` are drawn as icons
//! and a `.` in the text splits it over two lines.

use crate::{
    labels::{
        CommonTaskKeys,
        FunctionKeyLabel,
        FunctionKeys,
        FunctionSelect,
        LabelState::{self, Disabled as D, Enabled as E, EnabledSelected as ES, Hidden as H},
        TextLabel,
    },
    screen::{FunctionalState, ScreenConfiguration},
    view::ViewRegistry,
};

fn side(labels: [(LabelState, &str); 6]) -> FunctionKeys {
    FunctionKeys::new(labels.map(|(state, text)| FunctionKeyLabel::new(state, text)))
}

/// Top bar: one label per functional area.
pub fn function_select() -> FunctionSelect {
    let states = [E, E, E, ES, E, D, E, E];
    let mut top = FunctionSelect::new(Default::default());
    for (slot, (label, state)) in top.labels.iter_mut().zip(states).enumerate() {
        *label = TextLabel::new(state, FunctionalState::AREAS[slot].name());
    }
    top
}

/// Bottom bar common task keys, F13 to F20.
pub fn common_task_keys() -> CommonTaskKeys {
    CommonTaskKeys::new([
        TextLabel::new(D, "Up"),
        TextLabel::new(E, "Alarms"),
        TextLabel::new(D, "Threats"),
        TextLabel::new(D, "Ack"),
        TextLabel::new(D, ""),
        TextLabel::new(D, ""),
        TextLabel::new(E, "Labels"),
        TextLabel::new(D, "Enter"),
    ])
}

/// A side panel with every slot hidden.
pub fn all_hidden() -> FunctionKeys {
    side([(H, "Unused"); 6])
}

pub fn situational_awareness() -> (FunctionKeys, FunctionKeys) {
    let left = side([
        (D, "Remote.Wpn Sight"),
        (E, "Quad"),
        (H, "Unused"),
        (E, "Front right"),
        (ES, "Front"),
        (E, "Front left"),
    ]);
    let right = side([(H, "Unused"), (H, "Unused"), (H, "Unused"), (E, "Right"), (E, "Rear"), (E, "Left")]);
    (left, right)
}

pub fn weapons() -> (FunctionKeys, FunctionKeys) {
    let left = side([(ES, "Wpn Sight"), (E, "IR Sight"), (H, ""), (H, ""), (H, ""), (H, "")]);
    let right = side([(E, "icon:waterfall"), (E, "icon:cross"), (H, ""), (H, ""), (H, ""), (H, "")]);
    (left, right)
}

pub fn defensive_systems() -> (FunctionKeys, FunctionKeys) {
    let mut left = side([(H, ""); 6]);
    left.labels[0] = FunctionKeyLabel::with_toggle(D, "ECM", "On", "Off", true);
    left.labels[1] = FunctionKeyLabel::with_toggle(D, "Spike", "On", "Off", true);
    (left, all_hidden())
}

pub fn systems() -> (FunctionKeys, FunctionKeys) {
    let left = side([
        (ES, "Overview"),
        (D, "Automotive"),
        (D, "HUMS"),
        (E, "System"),
        (E, "Licences"),
        (D, "BIT"),
    ]);
    let right = side([
        (E, "Commander.Health"),
        (D, "Gunner.Health"),
        (D, "Driver.Health"),
        (D, "Roll.Allocation"),
        (E, "Blackout"),
        (E, "icon:exit"),
    ]);
    (left, right)
}

pub fn driver() -> (FunctionKeys, FunctionKeys) {
    let right = side([(ES, "Assist"), (E, "PPI Mode"), (H, ""), (H, ""), (H, ""), (H, "")]);
    (all_hidden(), right)
}

pub fn communications() -> (FunctionKeys, FunctionKeys) {
    let left = side([(D, "Comms"), (D, "RF State"), (H, ""), (H, ""), (H, ""), (H, "")]);
    (left, all_hidden())
}

/// BMS map controls, disabled when no map data is available.
pub fn battlefield_management(map_enabled: bool) -> (FunctionKeys, FunctionKeys) {
    let s = if map_enabled { E } else { D };
    let left = side([
        (s, "Mission"),
        (H, "Unused"),
        (s, "icon:uparrow"),
        (s, "icon:downarrow"),
        (s, "icon:plus"),
        (s, "icon:rotateleft"),
    ]);
    let right = side([
        (H, "Unused"),
        (H, "Unused"),
        (s, "icon:leftarrow"),
        (s, "icon:rightarrow"),
        (s, "icon:minus"),
        (s, "icon:rotateright"),
    ]);
    (left, right)
}

pub fn alarms() -> (FunctionKeys, FunctionKeys) {
    let left = side([
        (E, "Sort.Ascending"),
        (E, "Reset"),
        (E, "Hide.Overridden"),
        (E, "Select.All"),
        (H, ""),
        (H, ""),
    ]);
    let right = side([(E, "Override"), (E, "Clear"), (E, "Add Note"), (H, ""), (E, "Page.Up"), (E, "Page.Down")]);
    (left, right)
}

/// Fresh screen with the shared banks and hidden side panels.
pub fn screen() -> ScreenConfiguration {
    ScreenConfiguration::new(function_select(), common_task_keys(), all_hidden())
}

/// Register the side panels of every functional area.
pub fn register_views(views: &mut ViewRegistry, map_enabled: bool) {
    use FunctionalState as S;

    let panels = [
        (S::SituationalAwareness, situational_awareness()),
        (S::Weapon, weapons()),
        (S::DefensiveSystems, defensive_systems()),
        (S::Systems, systems()),
        (S::Driver, driver()),
        (S::SpecialToRole, (all_hidden(), all_hidden())),
        (S::Communications, communications()),
        (S::BattlefieldManagement, battlefield_management(map_enabled)),
        (S::Alarms, alarms()),
    ];
    for (state, (left, right)) in panels {
        views.add_view(state, left, right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_systems_selected_on_top_bar() {
        let top = function_select();
        assert_eq!(top.state(3), Some(ES), "SYS starts selected");
        assert_eq!(top.state(5), Some(D), "STR disabled");
        assert_eq!(top.text(0), "SA");
        assert_eq!(top.text(7), "BMS");
    }

    #[test]
    fn test_bottom_bar_defaults() {
        let bottom = common_task_keys();
        assert_eq!(bottom.text(1), "Alarms");
        assert!(bottom.active(1), "alarms key usable");
        assert!(!bottom.active(3), "ack disabled until an alarm arrives");
        assert!(bottom.active(6), "labels key usable");
    }

    #[test]
    fn test_bms_controls_follow_map_availability() {
        let (left, right) = battlefield_management(false);
        assert_eq!(left.state(0), Some(D));
        assert_eq!(right.state(5), Some(D));
        let (left, right) = battlefield_management(true);
        assert_eq!(left.state(0), Some(E));
        assert_eq!(right.state(5), Some(E));
        assert_eq!(left.state(1), Some(H), "unused slot stays hidden");
    }

    #[test]
    fn test_defensive_toggles() {
        let (left, _) = defensive_systems();
        assert!(left.labels[0].toggle_active);
        assert_eq!(left.labels[0].toggle_text1.as_str(), "On");
        assert_eq!(left.labels[1].text.as_str(), "Spike");
    }

    #[test]
    fn test_every_area_registered() {
        let mut views = ViewRegistry::new();
        register_views(&mut views, false);
        for state in FunctionalState::AREAS {
            assert!(views.get(state).is_some(), "{state:?} registered");
        }
        assert!(views.get(FunctionalState::Alarms).is_some());
        assert!(views.get(FunctionalState::Off).is_none());
    }
}
