//! Shared application context.
//!
//! One [`AppContext`] is built at start-up from the loaded [`HmiConfig`] and
//! passed by reference to whatever needs theme colours, paths or the mutable
//! test values (map zoom, position, brightness, fullscreen).

use crate::config::{
    BRIGHTNESS_STEP,
    FULLSCREEN_HEIGHT,
    FULLSCREEN_WIDTH,
    HmiConfig,
    MINIMUM_HEIGHT,
    MINIMUM_WIDTH,
    Paths,
    TestValues,
    Theme,
    WindowSettings,
};
use crate::keys::KeyBindings;

/// Runtime configuration plus state that outlives any single screen.
#[derive(Clone, Debug)]
pub struct AppContext {
    pub theme: Theme,
    pub paths: Paths,
    pub test: TestValues,
    pub window: WindowSettings,
    pub bindings: KeyBindings,
    map_enabled: bool,
}

impl AppContext {
    pub fn new(config: HmiConfig) -> Self {
        let map_enabled = config.map_enabled();
        let bindings = KeyBindings::with_overrides(&config.keys);
        Self { theme: config.theme, paths: config.paths, test: config.test, window: config.window, bindings, map_enabled }
    }

    /// Map surface available on the BMS screen.
    #[inline]
    pub const fn map_enabled(&self) -> bool {
        self.map_enabled
    }

    /// Current window resolution.
    pub const fn resolution(&self) -> (u32, u32) {
        if self.test.fullscreen { (FULLSCREEN_WIDTH, FULLSCREEN_HEIGHT) } else { (MINIMUM_WIDTH, MINIMUM_HEIGHT) }
    }

    /// Flip fullscreen and return the new resolution.
    pub const fn toggle_fullscreen(&mut self) -> (u32, u32) {
        self.test.fullscreen = !self.test.fullscreen;
        self.resolution()
    }

    /// Step brightness up (`up = true`) or down, clamped to 0.0..=1.0.
    pub fn step_brightness(&mut self, up: bool) -> f32 {
        let delta = if up { BRIGHTNESS_STEP } else { -BRIGHTNESS_STEP };
        self.test.brightness = (self.test.brightness + delta).clamp(0.0, 1.0);
        self.test.brightness
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new(HmiConfig::default())
    }
}
