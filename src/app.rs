//! Tick driver.
//!
//! [`App`] ties the pieces together: translated input goes into the
//! [`EventQueue`], [`App::tick`] takes one event per call, turns it into
//! [`HmiEvent`]s for the controller, and recomposes the frame when anything
//! changed. The caller owns the timer and the drawing surface.
//!
//! # Key Release Routing
//!
//! | Key | Action |
//! |-----|--------|
//! | Escape | quit |
//! | Power | power on when off, otherwise power off |
//! | SA..BMS | select the area |
//! | F1..F12 | handled only when the side label is active |
//! | F13 | nothing |
//! | F14 | alarms screen, then the key |
//! | F17, F18 | keyboard mode, then the key |
//! | Fullscreen, Keyboard, +/-, </>, arrows | display controls, no dispatch |
//! | anything else | clear pressed labels, then the key |

use std::time::Instant;

use tracing::{debug, info, trace, warn};

use crate::{
    compositor::ScreenRenderer,
    config::BEARING_STEP,
    context::AppContext,
    events::{EventQueue, QueuedEvent},
    hmi::{Hmi, HmiEvent},
    keys::Key,
    profiling::FrameMetrics,
    render::Surface,
    screen::FunctionalState,
    status::StatusSampler,
    widgets::{CompassWidget, KeyboardMode, KeyboardWidget, WidgetKind},
};

/// Sight bearing change per key press, in degrees.
const SIGHT_STEP: i32 = 2;

pub struct App {
    ctx: AppContext,
    hmi: Hmi,
    renderer: ScreenRenderer,
    queue: EventQueue,
    status: Option<StatusSampler>,
    metrics: FrameMetrics,
    dirty: bool,
    quit: bool,
}

impl App {
    /// Powered-off application. Queue [`Key::Power`] or call
    /// [`App::power_on`] to bring the screen up.
    pub fn new(ctx: AppContext) -> Self {
        let mut renderer = ScreenRenderer::new(&ctx);
        let (width, height) = ctx.resolution();
        renderer.set_resolution(width, height);
        Self {
            hmi: Hmi::new(&ctx),
            renderer,
            ctx,
            queue: EventQueue::new(),
            status: None,
            metrics: FrameMetrics::new(),
            dirty: true,
            quit: false,
        }
    }

    /// Feed the status bar from `sampler`.
    #[must_use]
    pub fn with_status(mut self, sampler: StatusSampler) -> Self {
        self.status = Some(sampler);
        self
    }

    pub fn power_on(&mut self) {
        self.dispatch(HmiEvent::PowerOn);
    }

    /// Queue a translated input event.
    pub fn push(&mut self, event: QueuedEvent) {
        self.queue.push(event);
    }

    pub const fn ctx(&self) -> &AppContext {
        &self.ctx
    }

    pub const fn hmi(&self) -> &Hmi {
        &self.hmi
    }

    pub const fn hmi_mut(&mut self) -> &mut Hmi {
        &mut self.hmi
    }

    pub const fn renderer(&self) -> &ScreenRenderer {
        &self.renderer
    }

    pub const fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Run one cycle: status refresh, one queued event, then a redraw if
    /// anything changed. Returns false once the application should exit.
    pub fn tick(&mut self, surface: &mut dyn Surface) -> bool {
        if let Some(snapshot) = self.status.as_ref().and_then(StatusSampler::latest) {
            trace!(clock = %snapshot.clock, "status snapshot");
            snapshot.apply(&mut self.hmi.screen.status);
            self.dirty = true;
        }

        if let Some(event) = self.queue.pop() {
            self.dirty |= self.process(event);
        }

        if self.hmi.quit_requested() {
            self.quit = true;
        }
        if self.quit {
            info!("exit requested, stopping");
            return false;
        }

        if self.dirty {
            let started = Instant::now();
            let composed = self.renderer.compose(&self.hmi.screen, &mut self.hmi.widgets, &self.ctx);
            let executed = self.renderer.present(surface);
            self.metrics.record_frame(started.elapsed(), executed, composed.hotspots);
            self.dirty = false;
        } else {
            self.metrics.record_idle();
        }
        true
    }

    /// Apply one event. Returns true when the screen needs redrawing.
    fn process(&mut self, event: QueuedEvent) -> bool {
        trace!(?event, "event");
        match event {
            QueuedEvent::KeyPressed(key) => self.key_pressed(key),
            QueuedEvent::KeyReleased(key) => self.key_released(key),
            QueuedEvent::PointerPressed { x, y } => {
                if let Some((group, key)) = self.renderer.hit(x, y) {
                    debug!(?group, ?key, x, y, "touch pressed");
                    self.queue.push(QueuedEvent::KeyPressed(key));
                }
                return false;
            }
            QueuedEvent::PointerReleased { x, y } => {
                let key = self.renderer.hit(x, y).map_or(Key::Unknown, |(_, key)| key);
                debug!(?key, x, y, "touch released");
                self.queue.push(QueuedEvent::KeyReleased(key));
                return false;
            }
            QueuedEvent::Resize { width, height } => self.renderer.set_resolution(width, height),
            QueuedEvent::Redraw | QueuedEvent::WidgetUpdate => {}
            QueuedEvent::Idle => return false,
        }
        true
    }

    fn dispatch(&mut self, event: HmiEvent) {
        self.hmi.dispatch(event, &mut self.ctx);
    }

    // =========================================================================
    // Keys
    // =========================================================================

    /// Show the pressed label while the key is held.
    fn key_pressed(&mut self, key: Key) {
        let screen = &mut self.hmi.screen;
        if let Some(slot) = key.area_index() {
            screen.top.set_enabled_changing(slot);
        } else if let Some(slot) = key.left_slot() {
            screen.left.set_enabled_changing(slot);
        } else if let Some(slot) = key.right_slot() {
            screen.right.set_enabled_changing(slot);
        } else if let Some(slot) = key.bottom_slot() {
            screen.bottom.set_enabled_changing_exclusive(slot);
        }
    }

    fn key_released(&mut self, key: Key) {
        if let Some(event) = HmiEvent::area(key) {
            self.dispatch(event);
            return;
        }

        match key {
            Key::Escape => self.quit = true,
            Key::Power => {
                let event = if self.hmi.current() == FunctionalState::Off { HmiEvent::PowerOn } else { HmiEvent::PowerOff };
                self.dispatch(event);
            }
            Key::Blackout => self.dispatch(HmiEvent::Key(key)),
            _ if key.left_slot().is_some() || key.right_slot().is_some() => self.side_key(key),
            Key::F13 => {}
            Key::F14 => {
                self.dispatch(HmiEvent::Alarms);
                self.dispatch(HmiEvent::Key(key));
            }
            Key::F17 => {
                self.cycle_keyboard(|mode| if mode == KeyboardMode::Lower { KeyboardMode::Upper } else { KeyboardMode::Lower });
                self.dispatch(HmiEvent::Key(key));
            }
            Key::F18 => {
                self.cycle_keyboard(
                    |mode| if mode == KeyboardMode::Numbers { KeyboardMode::Upper } else { KeyboardMode::Numbers },
                );
                self.dispatch(HmiEvent::Key(key));
            }
            Key::F15 | Key::F16 | Key::F19 | Key::F20 | Key::NextLabel | Key::PreviousLabel => {
                self.dispatch(HmiEvent::Key(key));
            }
            Key::Fullscreen => {
                let (width, height) = self.ctx.toggle_fullscreen();
                info!(width, height, fullscreen = self.ctx.test.fullscreen, "fullscreen toggled");
                self.renderer.set_resolution(width, height);
            }
            Key::Keyboard => {
                let visible = !self.hmi.widgets.visible(WidgetKind::Keyboard);
                self.hmi.widgets.set_visible(WidgetKind::Keyboard, visible);
            }
            Key::Plus => self.turn_compass(|c| c.add_bearing(BEARING_STEP)),
            Key::Minus => self.turn_compass(|c| c.add_bearing(-BEARING_STEP)),
            Key::GreaterThan => self.turn_compass(|c| c.add_bearing_sight(SIGHT_STEP)),
            Key::LessThan => self.turn_compass(|c| c.add_bearing_sight(-SIGHT_STEP)),
            Key::LeftArrow | Key::BrightnessUp => {
                let brightness = self.ctx.step_brightness(true);
                debug!(brightness, "brightness");
            }
            Key::RightArrow | Key::BrightnessDown => {
                let brightness = self.ctx.step_brightness(false);
                debug!(brightness, "brightness");
            }
            _ => {
                if key == Key::Unknown {
                    debug!("release with no key");
                }
                self.clear_changing();
                self.dispatch(HmiEvent::Key(key));
            }
        }
    }

    /// F1..F12 only act when their label is active.
    fn side_key(&mut self, key: Key) {
        let screen = &self.hmi.screen;
        let active = match (key.left_slot(), key.right_slot()) {
            (Some(slot), _) => screen.left.active(slot),
            (_, Some(slot)) => screen.right.active(slot),
            _ => false,
        };
        if active {
            self.dispatch(HmiEvent::Key(key));
        } else {
            debug!(?key, "side label inactive, key ignored");
        }
    }

    fn clear_changing(&mut self) {
        let screen = &mut self.hmi.screen;
        screen.top.reset_all_enabled_selected_changing();
        screen.bottom.reset_all_enabled_selected_changing();
        screen.left.reset_all_enabled_selected_changing();
        screen.right.reset_all_enabled_selected_changing();
    }

    fn cycle_keyboard(&mut self, next: impl Fn(KeyboardMode) -> KeyboardMode) {
        match self.hmi.widgets.get_mut::<KeyboardWidget>(WidgetKind::Keyboard) {
            Some(keyboard) => keyboard.set_mode(next(keyboard.mode())),
            None => warn!("keyboard widget missing"),
        }
    }

    fn turn_compass(&mut self, turn: impl FnOnce(&mut CompassWidget)) {
        match self.hmi.widgets.get_mut::<CompassWidget>(WidgetKind::Compass) {
            Some(compass) => turn(compass),
            None => warn!("compass widget missing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        config::{FULLSCREEN_HEIGHT, FULLSCREEN_WIDTH},
        labels::LabelState,
        render::surface::recording::RecordingSurface,
        status::{Fix, FixedLocation},
    };

    fn powered() -> (App, RecordingSurface) {
        let mut app = App::new(AppContext::default());
        app.power_on();
        (app, RecordingSurface::new(640, 480))
    }

    fn release(app: &mut App, surface: &mut RecordingSurface, key: Key) {
        app.push(QueuedEvent::KeyReleased(key));
        assert!(app.tick(surface), "still running after {key:?}");
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    #[test]
    fn test_first_tick_draws_then_idles() {
        let (mut app, mut surface) = powered();
        assert!(app.tick(&mut surface));
        assert_eq!(app.metrics().total_frames, 1);
        assert!(!surface.ops.is_empty(), "frame drawn");

        assert!(app.tick(&mut surface));
        assert_eq!(app.metrics().total_frames, 1, "nothing changed");
        assert_eq!(app.metrics().idle_ticks, 1);
    }

    #[test]
    fn test_one_event_per_tick() {
        let (mut app, mut surface) = powered();
        app.push(QueuedEvent::Redraw);
        app.push(QueuedEvent::Redraw);
        app.tick(&mut surface);
        assert_eq!(app.pending(), 1);
        app.tick(&mut surface);
        assert_eq!(app.pending(), 0);
    }

    #[test]
    fn test_escape_stops_the_loop() {
        let (mut app, mut surface) = powered();
        app.push(QueuedEvent::KeyReleased(Key::Escape));
        assert!(!app.tick(&mut surface));
    }

    #[test]
    fn test_systems_exit_key_stops_the_loop() {
        let (mut app, mut surface) = powered();
        assert_eq!(app.hmi().current(), FunctionalState::Systems);
        app.push(QueuedEvent::KeyReleased(Key::F12));
        assert!(!app.tick(&mut surface), "F12 on systems exits");
    }

    #[test]
    fn test_status_snapshot_reaches_status_bar() {
        let sampler = StatusSampler::spawn(Box::new(FixedLocation(Fix { lat: 10.0, lon: 20.0 })), Duration::from_millis(5))
            .expect("spawn sampler");
        let (app, mut surface) = powered();
        let mut app = app.with_status(sampler);

        let deadline = Instant::now() + Duration::from_secs(2);
        while app.hmi().screen.status.location != "Lat:10.000000 Lon:20.000000" && Instant::now() < deadline {
            app.tick(&mut surface);
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(app.hmi().screen.status.location, "Lat:10.000000 Lon:20.000000");
    }

    // -------------------------------------------------------------------------
    // Keys
    // -------------------------------------------------------------------------

    #[test]
    fn test_power_key_toggles() {
        let mut app = App::new(AppContext::default());
        let mut surface = RecordingSurface::new(640, 480);
        release(&mut app, &mut surface, Key::Power);
        assert_eq!(app.hmi().current(), FunctionalState::Systems);
        release(&mut app, &mut surface, Key::Power);
        assert_eq!(app.hmi().current(), FunctionalState::Off);
    }

    #[test]
    fn test_press_marks_label_changing() {
        let (mut app, mut surface) = powered();
        app.push(QueuedEvent::KeyPressed(Key::Sa));
        app.tick(&mut surface);
        assert_eq!(app.hmi().screen.top.state(0), Some(LabelState::EnabledSelectedChanging));

        release(&mut app, &mut surface, Key::Sa);
        assert_eq!(app.hmi().current(), FunctionalState::SituationalAwareness);
        assert_eq!(app.hmi().screen.top.state(0), Some(LabelState::EnabledSelected));
    }

    #[test]
    fn test_inactive_side_key_is_ignored() {
        let (mut app, mut surface) = powered();
        release(&mut app, &mut surface, Key::Sa);
        // SA left slot 0 is disabled
        let before = app.hmi().screen.left.state(0);
        assert_eq!(before, Some(LabelState::Disabled));
        release(&mut app, &mut surface, Key::F1);
        assert!(!app.hmi().screen.message.visible, "no not-implemented message");
        assert_eq!(app.hmi().screen.left.state(0), before);
    }

    #[test]
    fn test_alarms_key_opens_alarms() {
        let (mut app, mut surface) = powered();
        release(&mut app, &mut surface, Key::F14);
        assert_eq!(app.hmi().current(), FunctionalState::Alarms);
        release(&mut app, &mut surface, Key::F14);
        assert_eq!(app.hmi().current(), FunctionalState::Systems, "second press returns");
    }

    #[test]
    fn test_keyboard_controls() {
        let (mut app, mut surface) = powered();
        release(&mut app, &mut surface, Key::Keyboard);
        assert!(app.hmi().widgets.visible(WidgetKind::Keyboard));

        release(&mut app, &mut surface, Key::F17);
        let mode = |app: &App| app.hmi().widgets.get::<KeyboardWidget>(WidgetKind::Keyboard).map(KeyboardWidget::mode);
        assert_eq!(mode(&app), Some(KeyboardMode::Lower));
        release(&mut app, &mut surface, Key::F18);
        assert_eq!(mode(&app), Some(KeyboardMode::Numbers));
        release(&mut app, &mut surface, Key::F18);
        assert_eq!(mode(&app), Some(KeyboardMode::Upper));
    }

    #[test]
    fn test_compass_and_brightness_controls() {
        let (mut app, mut surface) = powered();
        let bearing = |app: &App| app.hmi().widgets.get::<CompassWidget>(WidgetKind::Compass).map(CompassWidget::bearing);
        let start = bearing(&app).unwrap_or_default();
        release(&mut app, &mut surface, Key::Plus);
        release(&mut app, &mut surface, Key::Plus);
        release(&mut app, &mut surface, Key::Minus);
        assert_eq!(bearing(&app), Some((start + BEARING_STEP).rem_euclid(360)));

        release(&mut app, &mut surface, Key::RightArrow);
        assert!(app.ctx().test.brightness < 1.0, "dimmed");
        release(&mut app, &mut surface, Key::LeftArrow);
        assert!((app.ctx().test.brightness - 1.0).abs() < 1e-6, "back to full");
    }

    #[test]
    fn test_fullscreen_updates_touch_resolution() {
        let (mut app, mut surface) = powered();
        release(&mut app, &mut surface, Key::Fullscreen);
        assert_eq!(app.renderer().touch().resolution(), (FULLSCREEN_WIDTH, FULLSCREEN_HEIGHT));
    }

    // -------------------------------------------------------------------------
    // Pointer
    // -------------------------------------------------------------------------

    #[test]
    fn test_touch_on_top_label_selects_area() {
        let (mut app, mut surface) = powered();
        app.tick(&mut surface);
        app.push(QueuedEvent::PointerPressed { x: 20, y: 10 });
        app.push(QueuedEvent::PointerReleased { x: 20, y: 10 });
        for _ in 0..4 {
            app.tick(&mut surface);
        }
        assert_eq!(app.hmi().current(), FunctionalState::SituationalAwareness);
    }

    #[test]
    fn test_touch_off_hotspot_releases_unknown() {
        let (mut app, mut surface) = powered();
        app.tick(&mut surface);
        app.push(QueuedEvent::PointerReleased { x: 320, y: 240 });
        app.tick(&mut surface);
        assert_eq!(app.pending(), 1, "unknown release queued");
        app.tick(&mut surface);
        assert_eq!(app.hmi().current(), FunctionalState::Systems, "no state change");
    }

    #[test]
    fn test_touch_on_alarm_indicator_acknowledges() {
        let (mut app, mut surface) = powered();
        app.tick(&mut surface);
        assert!(app.hmi().widgets.visible(WidgetKind::AlarmIndicator));
        app.push(QueuedEvent::PointerReleased { x: 300, y: 440 });
        app.tick(&mut surface);
        app.tick(&mut surface);
        assert!(!app.hmi().widgets.visible(WidgetKind::AlarmIndicator), "acknowledged");
    }

    #[test]
    fn test_resize_scales_touch() {
        let (mut app, mut surface) = powered();
        app.push(QueuedEvent::Resize { width: 1280, height: 960 });
        app.tick(&mut surface);
        assert_eq!(app.renderer().touch().resolution(), (1280, 960));
        // Same label at twice the window size
        app.push(QueuedEvent::PointerReleased { x: 40, y: 20 });
        app.tick(&mut surface);
        app.tick(&mut surface);
        assert_eq!(app.hmi().current(), FunctionalState::SituationalAwareness);
    }
}
