//! Mode state machine controller.
//!
//! [`Hmi`] owns the screen configuration, the view registry and the widgets,
//! and is the only thing that writes to them. Each [`HmiEvent`] is run
//! through the pure [`transition`] function and the resulting [`Effect`]s are
//! applied in order:
//!
//! - `Exit(state)`: per-state cleanup (`states.rs`).
//! - `Enter(state)`: apply the view, reset transient flags and set up the
//!   state's widgets (`states.rs`). Entry into a state whose selecting label
//!   is hidden does nothing but make the state current.
//! - `HandleKey(state, key)`: shared bottom-bar behaviour, then the state's own
//!   function keys (`keys.rs`).
//!
//! # Label Modes
//!
//! | Mode | Labels | Status bar | Compass | Tables |
//! |------|--------|------------|---------|--------|
//! | `All` | shown | y = 15 | SA, WPN, DRV | narrow |
//! | `StatusOnly` | hidden | y = 2 | SA, WPN, DRV, raised | wide |
//! | `Minimal` | hidden | hidden | hidden | wide |

use tracing::{debug, info};

use crate::{
    config::{
        COMPASS_X,
        COMPASS_X_DRIVER,
        COMPASS_Y,
        COMPASS_Y_LOW,
        STATUS_BAR_Y,
        STATUS_BAR_Y_LOW,
        TABLE_WIDTH,
        TABLE_WIDTH_WIDE,
        TABLE_X,
        TABLE_X_WIDE,
    },
    context::AppContext,
    defaults,
    keys::Key,
    labels::LabelMode,
    screen::{FunctionalState, ScreenConfiguration, ScreenMode},
    view::ViewRegistry,
    widgets::{AlarmsTable, Table, Widget, WidgetKind, WidgetSet},
};

mod keys;
mod states;
pub mod tables;
pub mod transition;

pub use transition::{Effect, HmiEvent, ModeState, Transition, transition};

/// Bottom-bar slots that only the alarms screen uses.
const ALARM_ONLY_SLOTS: [usize; 3] = [4, 5, 7];

/// The controller: state, screen and widgets.
pub struct Hmi {
    state: ModeState,
    pub screen: ScreenConfiguration,
    views: ViewRegistry,
    pub widgets: WidgetSet,
    /// Last SA camera selection, restored when the labels come back.
    sa_selection: Key,
    quit: bool,
}

impl Hmi {
    /// Powered-off controller with every view registered.
    pub fn new(ctx: &AppContext) -> Self {
        let mut views = ViewRegistry::new();
        defaults::register_views(&mut views, ctx.map_enabled());
        Self {
            state: ModeState::off(),
            screen: defaults::screen(),
            views,
            widgets: WidgetSet::standard(ctx),
            sa_selection: Key::F5,
            quit: false,
        }
    }

    #[inline]
    pub const fn state(&self) -> ModeState {
        self.state
    }

    #[inline]
    pub const fn current(&self) -> FunctionalState {
        self.state.current
    }

    /// The exit key was pressed on the systems screen.
    #[inline]
    pub const fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Run `event` through the state machine.
    ///
    /// Returns false when the event meant nothing in the current state.
    pub fn dispatch(&mut self, event: HmiEvent, ctx: &mut AppContext) -> bool {
        let from = self.state;
        let Transition { next, effects } = transition(from, event);
        if next.current != from.current {
            info!(from = from.current.name(), to = next.current.name(), ?event, "state transition");
        }

        let mut handled = true;
        for effect in effects {
            match effect {
                Effect::Exit(state) => self.exit(state),
                Effect::Enter(state) => self.enter(state, ctx),
                Effect::HandleKey(state, key) => self.handle_key(state, key, ctx),
                Effect::Ignored => {
                    debug!(state = from.current.name(), ?event, "event ignored");
                    handled = false;
                }
            }
        }
        self.state = next;
        handled
    }

    // =========================================================================
    // Screen Helpers
    // =========================================================================

    /// Return every transient widget and flag to its neutral setting.
    pub fn reset(&mut self) {
        self.widgets.set_visible(WidgetKind::StatusBar, true);
        self.screen.labels = LabelMode::All;
        self.apply_label_mode();
        self.screen.top.reset_all_enabled();

        self.screen.canvas.visible = true;
        self.screen.canvas.clear();
        self.widgets.set_visible(WidgetKind::Canvas, true);
        self.screen.mode = ScreenMode::Operational;

        for kind in [
            WidgetKind::Table,
            WidgetKind::Compass,
            WidgetKind::Keyboard,
            WidgetKind::Video,
            WidgetKind::DialSpeedometer,
            WidgetKind::DialRpmFuel,
        ] {
            self.widgets.set_visible(kind, false);
        }
        let (x, y) = self.compass_position(COMPASS_Y);
        self.widgets.set_position(WidgetKind::Compass, x, y);
        self.widgets.set_visible(WidgetKind::TopLabels, true);

        for slot in ALARM_ONLY_SLOTS {
            self.screen.bottom.set_disabled(slot);
        }
        self.screen.message.hide();
    }

    /// Show or hide labels, status bar and compass for the current label mode.
    pub fn apply_label_mode(&mut self) {
        let mode = self.screen.labels;
        let labels = mode == LabelMode::All;
        for kind in [WidgetKind::TopLabels, WidgetKind::BottomLabels, WidgetKind::LeftLabels, WidgetKind::RightLabels] {
            self.widgets.set_visible(kind, labels);
        }
        self.screen.top.visible = labels;

        let status_y = if labels { STATUS_BAR_Y } else { STATUS_BAR_Y_LOW };
        self.widgets.set_visible(WidgetKind::StatusBar, mode != LabelMode::Minimal);
        if let Some(status) = self.widgets.widget_mut(WidgetKind::StatusBar) {
            status.set_y(status_y);
        }

        self.widgets.set_visible(WidgetKind::Compass, self.compass_allowed());
        let (x, y) = self.compass_position(if labels { COMPASS_Y } else { COMPASS_Y_LOW });
        self.widgets.set_position(WidgetKind::Compass, x, y);

        let (table_x, width) = if labels { (TABLE_X, TABLE_WIDTH) } else { (TABLE_X_WIDE, TABLE_WIDTH_WIDE) };
        if let Some(table) = self.widgets.get_mut::<Table>(WidgetKind::Table) {
            table.width = width;
        }
        if let Some(alarms) = self.widgets.get_mut::<AlarmsTable>(WidgetKind::TableDynamic) {
            alarms.table_mut().width = width;
        }
        for kind in [WidgetKind::Table, WidgetKind::TableDynamic] {
            if let Some(table) = self.widgets.widget_mut(kind) {
                table.set_x(table_x);
            }
        }
        debug!(?mode, "label mode applied");
    }

    /// The compass belongs on this screen in this label mode.
    fn compass_allowed(&self) -> bool {
        use FunctionalState as S;
        self.screen.labels != LabelMode::Minimal
            && matches!(self.screen.current, S::SituationalAwareness | S::Weapon | S::Driver)
    }

    /// The driver screen moves the compass left to make room for the dials.
    fn compass_position(&self, y: i32) -> (i32, i32) {
        let x = if self.screen.current == FunctionalState::Driver { COMPASS_X_DRIVER } else { COMPASS_X };
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        keys::AREA_KEYS,
        labels::LabelState,
        widgets::{AlarmIndicator, CompassWidget, SortOrder, VideoWidget},
    };

    fn powered() -> (Hmi, AppContext) {
        let mut ctx = AppContext::default();
        let mut hmi = Hmi::new(&ctx);
        assert!(hmi.dispatch(HmiEvent::PowerOn, &mut ctx));
        (hmi, ctx)
    }

    fn select(hmi: &mut Hmi, ctx: &mut AppContext, state: FunctionalState) {
        hmi.dispatch(HmiEvent::Select(state), ctx);
        assert_eq!(hmi.current(), state);
    }

    // -------------------------------------------------------------------------
    // Power-on
    // -------------------------------------------------------------------------

    #[test]
    fn test_power_on_lands_in_systems() {
        let (hmi, _) = powered();
        assert_eq!(hmi.current(), FunctionalState::Systems);
        assert_eq!(hmi.screen.current, FunctionalState::Systems);
        assert_eq!(hmi.screen.top.state(3), Some(LabelState::EnabledSelected), "SYS selected");
        assert!(hmi.screen.canvas.visible);
        assert!(hmi.screen.canvas.file().is_none(), "plain background canvas");
        assert!(hmi.widgets.visible(WidgetKind::Table), "system table shown");
        assert!(hmi.widgets.visible(WidgetKind::AlarmIndicator));
        assert!(hmi.screen.bottom.active(3), "ack enabled for the pending alarm");
    }

    #[test]
    fn test_off_ignores_keys() {
        let mut ctx = AppContext::default();
        let mut hmi = Hmi::new(&ctx);
        assert!(!hmi.dispatch(HmiEvent::Key(Key::F1), &mut ctx));
        assert_eq!(hmi.current(), FunctionalState::Off);
    }

    #[test]
    fn test_power_off_blanks_the_screen() {
        let (mut hmi, mut ctx) = powered();
        hmi.dispatch(HmiEvent::PowerOff, &mut ctx);
        assert_eq!(hmi.current(), FunctionalState::Off);
        assert!(!hmi.widgets.visible(WidgetKind::StatusBar));
        assert!(!hmi.widgets.visible(WidgetKind::AlarmIndicator));
        assert!(hmi.widgets.visible(WidgetKind::Canvas));
    }

    // -------------------------------------------------------------------------
    // Entry and exit
    // -------------------------------------------------------------------------

    #[test]
    fn test_hidden_entry_leaves_screen_alone() {
        let (mut hmi, mut ctx) = powered();
        hmi.screen.top.set_state(1, LabelState::Hidden);
        let (left, right) = (hmi.screen.left.clone(), hmi.screen.right.clone());
        let table = hmi.widgets.visible(WidgetKind::Table);

        hmi.dispatch(HmiEvent::Select(FunctionalState::Weapon), &mut ctx);
        assert_eq!(hmi.current(), FunctionalState::Weapon, "state still becomes current");
        assert_eq!(hmi.screen.current, FunctionalState::Systems, "screen untouched");
        assert_eq!(hmi.screen.left, left);
        assert_eq!(hmi.screen.right, right);
        assert_eq!(hmi.screen.top.state(1), Some(LabelState::Hidden));
        assert_eq!(hmi.widgets.visible(WidgetKind::Table), table);
    }

    #[test]
    fn test_compass_only_on_sa_weapon_driver() {
        let (mut hmi, mut ctx) = powered();
        for state in FunctionalState::AREAS {
            select(&mut hmi, &mut ctx, state);
            let expected = matches!(
                state,
                FunctionalState::SituationalAwareness | FunctionalState::Weapon | FunctionalState::Driver
            );
            assert_eq!(hmi.widgets.visible(WidgetKind::Compass), expected, "compass on {state:?}");
        }
    }

    #[test]
    fn test_driver_moves_compass_and_shows_dials() {
        let (mut hmi, mut ctx) = powered();
        select(&mut hmi, &mut ctx, FunctionalState::Driver);
        let compass = hmi.widgets.widget(WidgetKind::Compass).map(|w| (w.x(), w.y()));
        assert_eq!(compass, Some((COMPASS_X_DRIVER, COMPASS_Y)));
        assert!(hmi.widgets.visible(WidgetKind::DialSpeedometer));
        assert!(hmi.widgets.visible(WidgetKind::Video));
        assert_eq!(hmi.widgets.get::<VideoWidget>(WidgetKind::Video).map(|v| v.stream.as_str()), Some("driver"));

        select(&mut hmi, &mut ctx, FunctionalState::Weapon);
        assert!(!hmi.widgets.visible(WidgetKind::DialSpeedometer), "dials hidden on exit");
        assert!(!hmi.widgets.visible(WidgetKind::Video));
        assert!(hmi.widgets.visible(WidgetKind::Canvas));
        let compass = hmi.widgets.widget(WidgetKind::Compass).map(|w| (w.x(), w.y()));
        assert_eq!(compass, Some((COMPASS_X, COMPASS_Y)));
        assert_eq!(hmi.screen.canvas.file(), Some("FrontCenter.png"));
    }

    #[test]
    fn test_top_bar_follows_area() {
        let (mut hmi, mut ctx) = powered();
        select(&mut hmi, &mut ctx, FunctionalState::Communications);
        assert_eq!(hmi.screen.top.state(6), Some(LabelState::EnabledSelected));
        assert_eq!(hmi.screen.top.state(3), Some(LabelState::Enabled), "previous area demoted");
    }

    // -------------------------------------------------------------------------
    // Lateral navigation
    // -------------------------------------------------------------------------

    #[test]
    fn test_lateral_visits_every_area_once() {
        let (mut hmi, mut ctx) = powered();
        select(&mut hmi, &mut ctx, FunctionalState::SituationalAwareness);
        let mut visited = vec![hmi.current()];
        for _ in 0..10 {
            hmi.dispatch(HmiEvent::Key(Key::NextLabel), &mut ctx);
            if visited.last() != Some(&hmi.current()) {
                visited.push(hmi.current());
            }
        }
        assert_eq!(visited, FunctionalState::AREAS.to_vec());
        assert_eq!(hmi.screen.current, FunctionalState::BattlefieldManagement, "no wrap past BMS");
    }

    // -------------------------------------------------------------------------
    // Alarms overlay
    // -------------------------------------------------------------------------

    #[test]
    fn test_alarms_overlay_round_trip() {
        let (mut hmi, mut ctx) = powered();
        select(&mut hmi, &mut ctx, FunctionalState::Weapon);
        hmi.dispatch(HmiEvent::Alarms, &mut ctx);
        assert_eq!(hmi.current(), FunctionalState::Alarms);
        assert!(hmi.widgets.visible(WidgetKind::TableDynamic));
        assert_eq!(hmi.screen.bottom.state(1), Some(LabelState::EnabledSelected));
        assert!(hmi.screen.bottom.active(7), "alarm-only slots enabled");

        hmi.dispatch(HmiEvent::Alarms, &mut ctx);
        assert_eq!(hmi.current(), FunctionalState::Weapon, "back to where we came from");
        assert!(!hmi.widgets.visible(WidgetKind::TableDynamic));
        assert!(!hmi.screen.bottom.active(7));
    }

    #[test]
    fn test_alarm_keys_drive_table() {
        let (mut hmi, mut ctx) = powered();
        hmi.dispatch(HmiEvent::Alarms, &mut ctx);
        hmi.dispatch(HmiEvent::Key(Key::F1), &mut ctx);
        let sort = hmi.widgets.get::<AlarmsTable>(WidgetKind::TableDynamic).map(AlarmsTable::sort);
        assert_eq!(sort, Some(SortOrder::Descending));
        assert_eq!(hmi.screen.left.text(0), "Sort.Descending");

        hmi.dispatch(HmiEvent::Key(Key::F1), &mut ctx);
        assert_eq!(hmi.screen.left.text(0), "Sort.Ascending");

        hmi.dispatch(HmiEvent::Key(Key::F3), &mut ctx);
        assert_eq!(hmi.screen.left.text(2), "Show.Overridden");
        let hidden = hmi.widgets.get::<AlarmsTable>(WidgetKind::TableDynamic).map(AlarmsTable::hide_override);
        assert_eq!(hidden, Some(true));

        hmi.dispatch(HmiEvent::Key(Key::F18), &mut ctx);
        let row = hmi.widgets.get::<AlarmsTable>(WidgetKind::TableDynamic).map(|t| t.table().current_row());
        assert_eq!(row, Some(2));
    }

    // -------------------------------------------------------------------------
    // Label modes
    // -------------------------------------------------------------------------

    #[test]
    fn test_label_key_cycles_modes() {
        let (mut hmi, mut ctx) = powered();
        select(&mut hmi, &mut ctx, FunctionalState::SituationalAwareness);

        hmi.dispatch(HmiEvent::Key(Key::F19), &mut ctx);
        assert_eq!(hmi.screen.labels, LabelMode::StatusOnly);
        assert!(!hmi.widgets.visible(WidgetKind::LeftLabels));
        assert!(hmi.widgets.visible(WidgetKind::StatusBar));
        assert_eq!(hmi.widgets.widget(WidgetKind::StatusBar).map(|w| w.y()), Some(STATUS_BAR_Y_LOW));
        assert!(hmi.widgets.visible(WidgetKind::Compass));
        assert_eq!(hmi.widgets.widget(WidgetKind::Table).map(|w| w.x()), Some(TABLE_X_WIDE));

        hmi.dispatch(HmiEvent::Key(Key::F19), &mut ctx);
        assert_eq!(hmi.screen.labels, LabelMode::Minimal);
        assert!(!hmi.widgets.visible(WidgetKind::StatusBar));
        assert!(!hmi.widgets.visible(WidgetKind::Compass), "no compass in minimal mode");

        hmi.dispatch(HmiEvent::Key(Key::F19), &mut ctx);
        assert_eq!(hmi.screen.labels, LabelMode::All);
        assert!(hmi.widgets.visible(WidgetKind::LeftLabels));
        assert!(hmi.widgets.visible(WidgetKind::ObjectLocalisation), "SA boxes come back with the labels");
    }

    // -------------------------------------------------------------------------
    // Common keys
    // -------------------------------------------------------------------------

    #[test]
    fn test_ack_hides_alarm_indicator() {
        let (mut hmi, mut ctx) = powered();
        hmi.dispatch(HmiEvent::Key(Key::F16), &mut ctx);
        assert!(!hmi.widgets.visible(WidgetKind::AlarmIndicator));
        assert!(!hmi.screen.bottom.active(3), "ack disabled once acknowledged");
        let indicator = hmi.widgets.get::<AlarmIndicator>(WidgetKind::AlarmIndicator).map(|a| a.text.clone());
        assert_eq!(indicator.as_deref(), Some("Engine over temperature"));
    }

    #[test]
    fn test_side_key_selects_its_panel() {
        let (mut hmi, mut ctx) = powered();
        hmi.dispatch(HmiEvent::Key(Key::F5), &mut ctx);
        assert_eq!(hmi.screen.left.state(4), Some(LabelState::EnabledSelected));
        assert_eq!(hmi.screen.left.state(0), Some(LabelState::Enabled), "overview demoted");
        let heading = hmi.widgets.get::<Table>(WidgetKind::Table).map(|t| t.rows()[0].cells[0].text.clone());
        assert_eq!(heading.as_deref(), Some("Software"), "licences table shown");
    }

    #[test]
    fn test_blackout_key_toggles_canvas() {
        let (mut hmi, mut ctx) = powered();
        select(&mut hmi, &mut ctx, FunctionalState::Weapon);
        hmi.dispatch(HmiEvent::Key(Key::Blackout), &mut ctx);
        assert!(hmi.screen.canvas.is_blackout());
        hmi.dispatch(HmiEvent::Key(Key::Blackout), &mut ctx);
        assert_eq!(hmi.screen.canvas.file(), Some("FrontCenter.png"), "image restored");
    }

    #[test]
    fn test_unassigned_key_shows_message() {
        let (mut hmi, mut ctx) = powered();
        select(&mut hmi, &mut ctx, FunctionalState::Communications);
        hmi.dispatch(HmiEvent::Key(Key::F2), &mut ctx);
        assert!(hmi.screen.message.visible);
        hmi.dispatch(HmiEvent::Key(Key::F20), &mut ctx);
        assert!(!hmi.screen.message.visible, "enter dismisses the message");
    }

    // -------------------------------------------------------------------------
    // Per-state keys
    // -------------------------------------------------------------------------

    #[test]
    fn test_sa_camera_keys() {
        let (mut hmi, mut ctx) = powered();
        select(&mut hmi, &mut ctx, FunctionalState::SituationalAwareness);
        assert!(hmi.widgets.visible(WidgetKind::ObjectLocalisation));
        assert_eq!(hmi.screen.canvas.file(), Some("Soldiers01.png"));

        hmi.dispatch(HmiEvent::Key(Key::F2), &mut ctx);
        assert_eq!(hmi.screen.canvas.file(), Some("Quad.png"));
        assert!(!hmi.widgets.visible(WidgetKind::ObjectLocalisation));
        let mode = hmi.widgets.get::<CompassWidget>(WidgetKind::Compass).map(CompassWidget::mode);
        assert!(mode.is_some_and(|m| !m.has_sight()), "quad view drops the sight");

        hmi.dispatch(HmiEvent::Key(Key::F10), &mut ctx);
        assert!(hmi.widgets.visible(WidgetKind::Video));
        assert_eq!(hmi.widgets.get::<VideoWidget>(WidgetKind::Video).map(|v| v.stream.as_str()), Some("day4"));
        assert_eq!(hmi.screen.right.state(3), Some(LabelState::EnabledSelected));
    }

    #[test]
    fn test_systems_exit_and_blackout_mode() {
        let (mut hmi, mut ctx) = powered();
        hmi.dispatch(HmiEvent::Key(Key::F11), &mut ctx);
        assert_eq!(hmi.screen.mode, ScreenMode::Blackout);
        assert!(hmi.screen.canvas.is_blackout());
        hmi.dispatch(HmiEvent::Key(Key::F11), &mut ctx);
        assert_eq!(hmi.screen.mode, ScreenMode::Operational);
        assert!(!hmi.screen.canvas.is_blackout());

        assert!(!hmi.quit_requested());
        hmi.dispatch(HmiEvent::Key(Key::F12), &mut ctx);
        assert!(hmi.quit_requested());
    }

    #[test]
    fn test_bms_zoom_and_pan() {
        let mut config = crate::config::HmiConfig::default();
        config.paths.maps = std::env::temp_dir();
        let mut ctx = AppContext::new(config);
        let mut hmi = Hmi::new(&ctx);
        hmi.dispatch(HmiEvent::PowerOn, &mut ctx);
        select(&mut hmi, &mut ctx, FunctionalState::BattlefieldManagement);
        assert!(matches!(hmi.screen.canvas.content, crate::screen::CanvasContent::Map(_)));

        let lat = ctx.test.lat;
        hmi.dispatch(HmiEvent::Key(Key::F3), &mut ctx);
        assert!((ctx.test.lat - lat - 0.008).abs() < 1e-9, "step for zoom 10000");
        hmi.dispatch(HmiEvent::Key(Key::F11), &mut ctx);
        assert_eq!(ctx.test.zoom, 5_000);
        hmi.dispatch(HmiEvent::Key(Key::F5), &mut ctx);
        hmi.dispatch(HmiEvent::Key(Key::F5), &mut ctx);
        assert_eq!(ctx.test.zoom, 20_000);
        match &hmi.screen.canvas.content {
            crate::screen::CanvasContent::Map(view) => assert_eq!(view.zoom, 20_000),
            other => panic!("expected map canvas, got {other:?}"),
        }
    }

    #[test]
    fn test_bms_without_maps_shows_logo() {
        let (mut hmi, mut ctx) = powered();
        select(&mut hmi, &mut ctx, FunctionalState::BattlefieldManagement);
        assert_eq!(hmi.screen.canvas.file(), Some("DefenceX.png"));
        let zoom = ctx.test.zoom;
        hmi.dispatch(HmiEvent::Key(Key::F5), &mut ctx);
        assert_eq!(ctx.test.zoom, zoom, "map keys inert without maps");
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    proptest! {
        #[test]
        fn test_area_keys_always_land_on_their_area(slots in prop::collection::vec(0usize..8, 1..12)) {
            let (mut hmi, mut ctx) = powered();
            for slot in slots {
                let event = HmiEvent::area(AREA_KEYS[slot]);
                prop_assert!(event.is_some());
                if let Some(event) = event {
                    hmi.dispatch(event, &mut ctx);
                }
                prop_assert_eq!(Some(hmi.current()), FunctionalState::from_slot(slot));
                prop_assert_eq!(Some(hmi.screen.current), FunctionalState::from_slot(slot));
            }
        }
    }
}
