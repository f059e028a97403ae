#![allow(clippy::cast_possible_wrap)] // Window sizes are far below i32::MAX

//! GVA operator console simulator.
//!
//! Opens a 640x480 `embedded-graphics-simulator` window, translates SDL
//! keyboard and mouse input into queued events and ticks the [`App`] every
//! [`TICK`].
//!
//! # Controls
//!
//! | Key | Action |
//! |-----|--------|
//! | `1`..`8` | SA, WPN, DEF, SYS, DRV, STR, COM, BMS |
//! | `F1`..`F12` | side panel keys |
//! | `A` | alarms |
//! | `L` | cycle label mode |
//! | `B` | blackout |
//! | `K` | on-screen keyboard |
//! | `N` / `P` | next / previous area |
//! | `+` / `-` | vehicle bearing |
//! | `<` / `>` | sight bearing |
//! | Left / Right | brightness up / down |
//! | Escape | quit |
//!
//! Bindings can be changed in the `[keys]` table of the config file. Mouse
//! clicks on labels behave like the bezel keys.
//!
//! # Environment
//!
//! - `GVA_HMI_CONFIG`: config file path (default `hmi.toml`)
//! - `RUST_LOG`: log filter (default `info`)

use std::thread;
use std::time::Instant;

use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use gva_hmi::{
    app::App,
    config::{HmiConfig, MINIMUM_HEIGHT, MINIMUM_WIDTH, SCREEN_NAME, STATUS_PERIOD, TICK},
    context::AppContext,
    events::QueuedEvent,
    keys::Key,
    render::EgSurface,
    status::{Fix, FixedLocation, StatusSampler},
};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = HmiConfig::load().unwrap_or_else(|err| {
        error!(%err, "config rejected, using defaults");
        HmiConfig::default()
    });
    let ctx = AppContext::new(config);
    info!(name = SCREEN_NAME, maps = ctx.map_enabled(), "starting");

    // Initialize display and window (simulator mode)
    let mut display: SimulatorDisplay<Rgb888> = SimulatorDisplay::new(Size::new(MINIMUM_WIDTH, MINIMUM_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(ctx.window.scale).build();
    let mut window = Window::new(SCREEN_NAME, &output_settings);

    let mut app = App::new(ctx);
    let test = &app.ctx().test;
    let location = FixedLocation(Fix { lat: test.lat, lon: test.lon });
    match StatusSampler::spawn(Box::new(location), STATUS_PERIOD) {
        Ok(sampler) => app = app.with_status(sampler),
        Err(err) => warn!(%err, "status sampler not started, status bar will not update"),
    }
    app.power_on();

    // ==========================================================================
    // Main Loop
    // ==========================================================================

    loop {
        let tick_start = Instant::now();

        let running = {
            let brightness = app.ctx().test.brightness;
            let mut surface = EgSurface::new(&mut display).with_brightness(brightness);
            app.tick(&mut surface)
        };
        if !running {
            break;
        }
        window.update(&display);

        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    if let Some(key) = translate(&app, &keycode.name()) {
                        app.push(QueuedEvent::KeyPressed(key));
                    }
                }
                SimulatorEvent::KeyUp { keycode, .. } => {
                    if let Some(key) = translate(&app, &keycode.name()) {
                        app.push(QueuedEvent::KeyReleased(key));
                    }
                }
                SimulatorEvent::MouseButtonDown { point, .. } => {
                    let (x, y) = window_position(&app, point);
                    app.push(QueuedEvent::PointerPressed { x, y });
                }
                SimulatorEvent::MouseButtonUp { point, .. } => {
                    let (x, y) = window_position(&app, point);
                    app.push(QueuedEvent::PointerReleased { x, y });
                }
                _ => {}
            }
        }

        // Sleep to hold the tick rate
        let elapsed = tick_start.elapsed();
        if let Some(remaining) = TICK.checked_sub(elapsed) {
            thread::sleep(remaining);
        } else {
            debug!(?elapsed, "tick overran");
        }
    }
    info!(frames = app.metrics().total_frames, "stopped");
}

/// Bound logical key for an SDL key name; unbound keys are dropped.
fn translate(app: &App, name: &str) -> Option<Key> {
    let key = app.ctx().bindings.translate(name);
    (key != Key::Unknown).then_some(key)
}

/// Display point scaled to the logical window resolution.
///
/// The simulator window keeps its size when fullscreen is toggled, so points
/// are stretched to match what the hotspot registry expects.
fn window_position(app: &App, point: Point) -> (i32, i32) {
    let (width, height) = app.ctx().resolution();
    let x = point.x * width as i32 / MINIMUM_WIDTH as i32;
    let y = point.y * height as i32 / MINIMUM_HEIGHT as i32;
    (x, y)
}
