//! Entry and exit actions for each functional state.

use tracing::debug;

use super::{ALARM_ONLY_SLOTS, Hmi, tables};
use crate::{
    colors::{GREEN, ORANGE, RED},
    config::{COMPASS_X, COMPASS_Y},
    context::AppContext,
    defaults,
    keys::Key,
    labels::{LabelMode, LabelState},
    screen::{FunctionalState, MapView},
    view::ViewRegistry,
    widgets::{
        AlarmIndicator,
        AlarmType,
        AlarmsTable,
        CompassWidget,
        ObjectLocalisation,
        Table,
        Threat,
        TrackedObject,
        VideoWidget,
        Widget,
        WidgetKind,
    },
};

/// Bottom-bar slot of the alarms key.
const ALARMS_SLOT: usize = 1;

/// Bottom-bar slot of the acknowledge key.
pub(super) const ACK_SLOT: usize = 3;

/// Detections shown on the SA camera view at power-on.
const SEED_OBJECTS: [(i32, i32, i32, i32, u32, &str); 6] = [
    (8, 174, 234, 88, GREEN, "Person"),
    (80, 83, 366, 148, GREEN, "Person"),
    (285, 144, 274, 120, GREEN, "Person"),
    (395, 187, 213, 71, GREEN, "Person"),
    (436, 88, 369, 162, ORANGE, "Person"),
    (475, 189, 43, 90, RED, "Weapon"),
];

impl Hmi {
    /// Run the entry action for `state`.
    pub(super) fn enter(&mut self, state: FunctionalState, ctx: &AppContext) {
        use FunctionalState as S;

        if state == S::Off {
            self.enter_off();
            return;
        }
        if state == S::On {
            self.enter_on(ctx);
            return;
        }
        if self.entry_hidden(state) {
            debug!(state = state.name(), "selecting label hidden, entry skipped");
            return;
        }
        debug!(state = state.name(), "entering state");

        if state == S::Alarms {
            self.views.apply(state, &mut self.screen);
            self.reset();
            self.widgets.set_visible(WidgetKind::TableDynamic, true);
            for slot in ALARM_ONLY_SLOTS {
                self.screen.bottom.force_enabled(slot);
            }
            self.screen.bottom.set_state(ALARMS_SLOT, LabelState::EnabledSelected);
            return;
        }

        self.views.apply(state, &mut self.screen);
        self.reset();
        if let Some(slot) = state.top_slot() {
            self.screen.top.set_enabled(slot);
        }

        match state {
            S::SituationalAwareness => {
                self.widgets.set_visible(WidgetKind::Compass, self.compass_allowed());
                self.widgets.set_visible(WidgetKind::ObjectLocalisation, true);
                self.sa_selection = Key::F5;
                self.screen.set_canvas_file("Soldiers01.png");
            }
            S::Weapon => {
                self.widgets.set_visible(WidgetKind::Compass, self.compass_allowed());
                self.screen.set_canvas_file("FrontCenter.png");
            }
            S::DefensiveSystems => {
                self.screen.top.visible = true;
            }
            S::Systems => {
                if let Some(table) = self.widgets.get_mut::<Table>(WidgetKind::Table) {
                    tables::system(table, ctx);
                }
                self.widgets.set_visible(WidgetKind::Table, true);
            }
            S::Driver => {
                self.widgets.set_visible(WidgetKind::Compass, self.compass_allowed());
                self.widgets.set_visible(WidgetKind::DialSpeedometer, true);
                self.widgets.set_visible(WidgetKind::DialRpmFuel, true);
                self.widgets.set_visible(WidgetKind::Canvas, false);
                if let Some(video) = self.widgets.get_mut::<VideoWidget>(WidgetKind::Video) {
                    "driver".clone_into(&mut video.stream);
                }
                self.widgets.set_visible(WidgetKind::Video, true);
            }
            S::BattlefieldManagement => {
                if ctx.map_enabled() {
                    self.screen.canvas.set_map(MapView { zoom: ctx.test.zoom, lat: ctx.test.lat, lon: ctx.test.lon });
                } else {
                    self.screen.set_canvas_file("DefenceX.png");
                }
            }
            S::SpecialToRole | S::Communications | S::Alarms | S::Off | S::On => {}
        }
    }

    /// Run the exit action for `state`.
    pub(super) fn exit(&mut self, state: FunctionalState) {
        debug!(state = state.name(), "leaving state");
        match state {
            FunctionalState::SituationalAwareness => {
                self.widgets.set_visible(WidgetKind::ObjectLocalisation, false);
            }
            FunctionalState::Driver => {
                self.widgets.set_visible(WidgetKind::DialSpeedometer, false);
                self.widgets.set_visible(WidgetKind::DialRpmFuel, false);
                self.widgets.set_visible(WidgetKind::Video, false);
                self.widgets.set_visible(WidgetKind::Canvas, true);
            }
            FunctionalState::Alarms => {
                self.widgets.set_visible(WidgetKind::TableDynamic, false);
                self.screen.bottom.reset_all_enabled();
            }
            _ => {}
        }
    }

    /// The label that selects `state` is hidden, so the state has nothing to show.
    fn entry_hidden(&self, state: FunctionalState) -> bool {
        let slot = match state.top_slot() {
            Some(slot) => self.screen.top.state(slot),
            None => self.screen.bottom.state(ALARMS_SLOT),
        };
        slot == Some(LabelState::Hidden)
    }

    /// Blank display: only the canvas remains.
    fn enter_off(&mut self) {
        debug!("powering off");
        for (_, widget) in self.widgets.iter_mut() {
            widget.set_visible(false);
        }
        self.widgets.set_visible(WidgetKind::Canvas, true);
        self.screen.canvas.clear();
        self.screen.message.hide();
        self.screen.current = FunctionalState::Off;
    }

    /// Bootstrap: fresh screen and views, seeded widgets.
    fn enter_on(&mut self, ctx: &AppContext) {
        debug!("powering on");
        self.views = ViewRegistry::new();
        defaults::register_views(&mut self.views, ctx.map_enabled());
        self.screen = defaults::screen();
        self.screen.labels = LabelMode::All;
        self.quit = false;

        if let Some(compass) = self.widgets.get_mut::<CompassWidget>(WidgetKind::Compass) {
            compass.set_bearing_sight(0);
            compass.clear_threats();
            compass.add_threat(1, Threat { bearing: 110, size: 30, colour: RED });
            compass.add_threat(2, Threat { bearing: 20, size: 30, colour: ORANGE });
        }
        self.widgets.set_position(WidgetKind::Compass, COMPASS_X, COMPASS_Y);

        if let Some(objects) = self.widgets.get_mut::<ObjectLocalisation>(WidgetKind::ObjectLocalisation) {
            objects.clear();
            for (id, (x, y, width, height, colour, label)) in (0..).zip(SEED_OBJECTS) {
                objects.add(id, TrackedObject::new(x, y, width, height, colour, label));
            }
        }

        if let Some(alarms) = self.widgets.get_mut::<AlarmsTable>(WidgetKind::TableDynamic) {
            tables::alarms(alarms, ctx);
        }
        self.widgets.set_visible(WidgetKind::TableDynamic, false);

        if let Some(indicator) = self.widgets.get_mut::<AlarmIndicator>(WidgetKind::AlarmIndicator) {
            indicator.set(AlarmType::Caution, "Engine over temperature");
        }
        self.widgets.set_visible(WidgetKind::AlarmIndicator, true);
        self.screen.bottom.force_enabled(ACK_SLOT);

        for kind in [WidgetKind::Mode, WidgetKind::MessageBox] {
            self.widgets.set_visible(kind, true);
        }
    }
}
