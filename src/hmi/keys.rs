//! Key handlers: shared bottom-bar behaviour, then each state's function keys.

use tracing::{debug, trace};

use super::{Hmi, states::ACK_SLOT, tables};
use crate::{
    context::AppContext,
    keys::Key,
    screen::{FunctionalState, MapView, MessageIcon, ScreenMode},
    widgets::{AlarmsTable, CompassWidget, PpiMode, SortOrder, Table, VideoWidget, WidgetKind},
};

/// Map step in degrees for a zoom level, zero outside the table.
pub fn map_step(zoom: u32) -> f64 {
    match zoom {
        1_620_000 => 0.000_06,
        640_000 => 0.000_12,
        320_000 => 0.000_25,
        160_000 => 0.000_5,
        80_000 => 0.001,
        40_000 => 0.002,
        20_000 => 0.004,
        10_000 => 0.008,
        5_000 => 0.016,
        2_500 => 0.048,
        1_250 => 0.112,
        625 => 0.2,
        _ => 0.0,
    }
}

impl Hmi {
    /// Handle `key` while `state` is current.
    pub(super) fn handle_key(&mut self, state: FunctionalState, key: Key, ctx: &mut AppContext) {
        use FunctionalState as S;

        trace!(state = state.name(), ?key, "key");
        self.key_side(key);
        self.key_common(key);

        match state {
            S::SituationalAwareness => self.key_sa(key),
            S::Weapon => self.key_weapon(key),
            S::Systems => self.key_systems(key, ctx),
            S::BattlefieldManagement => self.key_bms(key, ctx),
            S::Alarms => self.key_alarms(key),
            S::DefensiveSystems | S::Driver | S::SpecialToRole | S::Communications => {
                if is_side_key(key) {
                    self.screen.message.not_implemented();
                }
            }
            S::Off | S::On => debug!(?key, "key with no active screen"),
        }
    }

    /// Side-panel selection for F1..F12.
    fn key_side(&mut self, key: Key) {
        if let Some(slot) = key.left_slot() {
            self.screen.message.hide();
            self.screen.right.reset_all_enabled();
            self.screen.left.set_enabled(slot);
        } else if let Some(slot) = key.right_slot() {
            self.screen.message.hide();
            self.screen.left.reset_all_enabled();
            self.screen.right.set_enabled(slot);
        }
    }

    /// Bottom bar and blackout, the same on every screen.
    fn key_common(&mut self, key: Key) {
        if key == Key::Blackout {
            let on = self.screen.canvas.toggle_blackout();
            debug!(on, "blackout toggled");
            return;
        }
        let Some(slot) = key.bottom_slot() else {
            return;
        };
        self.screen.bottom.set_enabled_selected(slot);
        self.screen.bottom.reset_all_enabled();

        match key {
            Key::F16 => {
                self.widgets.set_visible(WidgetKind::AlarmIndicator, false);
                self.screen.bottom.set_disabled(ACK_SLOT);
            }
            Key::F19 => {
                self.screen.labels = self.screen.labels.next();
                self.apply_label_mode();
            }
            Key::F20 => self.screen.message.hide(),
            _ => {}
        }
    }

    fn key_sa(&mut self, key: Key) {
        self.screen.right.visible = true;
        self.widgets.set_visible(WidgetKind::ObjectLocalisation, false);
        if let Some(compass) = self.widgets.get_mut::<CompassWidget>(WidgetKind::Compass) {
            compass.set_mode(PpiMode::default());
        }

        let stream = match key {
            Key::F4 => Some("day1"),
            Key::F6 => Some("day3"),
            Key::F10 => Some("day4"),
            Key::F11 => Some("day5"),
            Key::F12 => Some("day6"),
            _ => None,
        };
        if let Some(stream) = stream {
            if let Some(video) = self.widgets.get_mut::<VideoWidget>(WidgetKind::Video) {
                stream.clone_into(&mut video.stream);
            }
            self.widgets.set_visible(WidgetKind::Video, true);
            self.sa_selection = key;
            return;
        }

        match key {
            Key::F2 => {
                self.screen.set_canvas_file("Quad.png");
                self.widgets.set_visible(WidgetKind::Video, false);
                if let Some(compass) = self.widgets.get_mut::<CompassWidget>(WidgetKind::Compass) {
                    compass.set_mode(PpiMode::default().without_sight());
                }
                self.sa_selection = key;
            }
            Key::F5 => {
                self.widgets.set_visible(WidgetKind::ObjectLocalisation, true);
                self.screen.set_canvas_file("Soldiers01.png");
                self.widgets.set_visible(WidgetKind::Video, false);
                self.sa_selection = key;
            }
            Key::F19 => {
                let boxes = self.sa_selection == Key::F5;
                self.widgets.set_visible(WidgetKind::ObjectLocalisation, boxes);
            }
            Key::F1 | Key::F3 | Key::F7 | Key::F8 | Key::F9 => self.screen.message.not_implemented(),
            _ => {}
        }
    }

    fn key_weapon(&mut self, key: Key) {
        match key {
            Key::F1 | Key::F7 | Key::F8 => self.screen.message.hide(),
            _ if is_side_key(key) => self.screen.message.not_implemented(),
            _ => {}
        }
    }

    fn key_systems(&mut self, key: Key, ctx: &AppContext) {
        match key {
            Key::F1 => {
                if let Some(table) = self.widgets.get_mut::<Table>(WidgetKind::Table) {
                    tables::system(table, ctx);
                }
                self.widgets.set_visible(WidgetKind::Table, true);
            }
            Key::F5 => {
                if let Some(table) = self.widgets.get_mut::<Table>(WidgetKind::Table) {
                    tables::licences(table, ctx);
                }
                self.widgets.set_visible(WidgetKind::Table, true);
            }
            Key::F11 => {
                let blackout = self.screen.mode != ScreenMode::Blackout;
                self.screen.mode = if blackout { ScreenMode::Blackout } else { ScreenMode::Operational };
                self.screen.canvas.set_blackout(blackout);
            }
            Key::F12 => {
                debug!("exit requested");
                self.quit = true;
            }
            _ if is_side_key(key) => self.screen.message.not_implemented(),
            _ => {}
        }
    }

    /// Pan and zoom the map; inert without map data.
    fn key_bms(&mut self, key: Key, ctx: &mut AppContext) {
        if !ctx.map_enabled() {
            return;
        }
        let step = map_step(ctx.test.zoom);
        let test = &mut ctx.test;
        match key {
            Key::F3 => test.lat += step,
            Key::F4 => test.lat -= step,
            Key::F5 => test.zoom = test.zoom.saturating_mul(2),
            Key::F9 => test.lon -= step,
            Key::F10 => test.lon += step,
            Key::F11 => test.zoom = (test.zoom / 2).max(1),
            Key::F1 | Key::F2 | Key::F6 | Key::F7 | Key::F8 | Key::F12 => {
                self.screen.message.show(MessageIcon::Info, "Function key", "Operation not implemented!");
                return;
            }
            _ => return,
        }
        debug!(zoom = test.zoom, lat = test.lat, lon = test.lon, "map moved");
        self.screen.canvas.set_map(MapView { zoom: test.zoom, lat: test.lat, lon: test.lon });
    }

    fn key_alarms(&mut self, key: Key) {
        let Some(table) = self.widgets.get_mut::<AlarmsTable>(WidgetKind::TableDynamic) else {
            return;
        };
        match key {
            Key::F1 => {
                let (sort, text) = if table.sort() == SortOrder::Descending {
                    (SortOrder::Ascending, "Sort.Ascending")
                } else {
                    (SortOrder::Descending, "Sort.Descending")
                };
                table.set_sort(sort);
                self.screen.left.set_text(0, text);
            }
            Key::F2 => table.set_sort(SortOrder::Unsorted),
            Key::F3 => {
                let hide = !table.hide_override();
                table.set_hide_override(hide);
                self.screen.left.set_text(2, if hide { "Show.Overridden" } else { "Hide.Overridden" });
            }
            Key::F4 => {
                let highlight = !table.highlight_all();
                table.set_highlight_all(highlight);
            }
            Key::F17 => table.prev_row(),
            Key::F18 => table.next_row(),
            _ => {}
        }
    }
}

/// F1 to F12.
fn is_side_key(key: Key) -> bool {
    key.left_slot().is_some() || key.right_slot().is_some()
}
