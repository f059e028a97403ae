//! Application configuration.
//!
//! Two layers live here:
//!
//! - Compile-time layout and timing constants (`const`), shared by the widgets,
//!   the hotspot registry and the tick loop. Widget geometry is expressed in
//!   design-resolution coordinates (640x480, bottom-left origin).
//! - [`HmiConfig`], the runtime theme/paths/test-value settings loaded from a
//!   TOML file. Every field has a default, so a missing file or a partial file
//!   is fine.
//!
//! # Config file
//!
//! The path comes from `GVA_HMI_CONFIG`, falling back to `hmi.toml` in the
//! working directory:
//!
//! ```toml
//! [theme]
//! background = 0x556B2F
//! label_style = "Rounded"
//!
//! [paths]
//! images = "images"
//!
//! [test]
//! zoom = 10000
//! lat = 51.500
//! lon = -2.000
//!
//! [keys]
//! z = "Power"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::colors::{
    BLACK,
    DARK_BLUE,
    DARK_GREEN,
    DARK_GREY,
    DARK_OLIVE_GREEN,
    GREY,
    OLIVE,
    WHITE,
    YELLOW,
};
use crate::error::ConfigError;
use crate::keys::Key;
use crate::labels::LabelState;

// =============================================================================
// Display Configuration
// =============================================================================

/// Design width. All layout is expressed at this resolution.
pub const MINIMUM_WIDTH: u32 = 640;

/// Design height.
pub const MINIMUM_HEIGHT: u32 = 480;

/// Window size when fullscreen is toggled on in the simulator.
pub const FULLSCREEN_WIDTH: u32 = 1280;

/// Window height when fullscreen is toggled on.
pub const FULLSCREEN_HEIGHT: u32 = 960;

/// Name of the console shown in logs and the window title.
pub const SCREEN_NAME: &str = "Commanders Display";

/// Version string shown in the system table.
pub const HMI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "GVA_HMI_CONFIG";

/// Config file used when the environment variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "hmi.toml";

// =============================================================================
// Timing Configuration
// =============================================================================

/// Main loop tick (25 Hz).
pub const TICK: Duration = Duration::from_millis(40);

/// Status sampler refresh period.
pub const STATUS_PERIOD: Duration = Duration::from_secs(1);

/// Granularity of the sampler's interruptible sleep.
pub const STATUS_SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Frames between frame-metric log lines.
pub const METRICS_LOG_INTERVAL: u64 = 250;

// =============================================================================
// Widget Layout (design coordinates, measured from the top-left)
// =============================================================================

/// Status bar Y with all labels shown.
pub const STATUS_BAR_Y: i32 = 15;

/// Status bar Y when labels are hidden.
pub const STATUS_BAR_Y_LOW: i32 = 2;

/// Compass position in most areas.
pub const COMPASS_X: i32 = 330;

/// Compass position on the driver's display.
pub const COMPASS_X_DRIVER: i32 = 120;

/// Compass Y with labels shown.
pub const COMPASS_Y: i32 = 190;

/// Compass Y when labels are hidden.
pub const COMPASS_Y_LOW: i32 = 160;

/// Speedometer dial centre in the driver view.
pub const SPEEDOMETER_CENTRE: (i32, i32) = (160, 375);

/// RPM and fuel dial centre in the driver view.
pub const RPM_FUEL_CENTRE: (i32, i32) = (475, 375);

/// Table X and width with side labels shown.
pub const TABLE_X: i32 = 110;
pub const TABLE_WIDTH: i32 = 420;

/// Table X and width when side labels are hidden.
pub const TABLE_X_WIDE: i32 = 20;
pub const TABLE_WIDTH_WIDE: i32 = 600;

/// Top of the system and licence tables.
pub const TABLE_Y: i32 = 71;

/// Alarm indicator top edge, just above the bottom labels.
pub const ALARM_INDICATOR_Y: i32 = 429;

/// Bottom label bar Y.
pub const BOTTOM_LABELS_Y: i32 = 460;

/// Message box Y.
pub const MESSAGE_BOX_Y: i32 = 220;

/// Message box width.
pub const MESSAGE_BOX_WIDTH: i32 = 300;

/// Compass bearing step for the +/- keys, degrees.
pub const BEARING_STEP: i32 = 2;

/// Brightness step for the arrow keys.
pub const BRIGHTNESS_STEP: f32 = 0.05;

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Label corner style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
pub enum LabelStyle {
    #[default]
    Rounded,
    Square,
}

/// Colours for one label state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct LabelColours {
    pub background: u32,
    pub text: u32,
    pub border: u32,
}

/// Theme colours and label styling.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: u32,
    pub table_background: u32,
    pub label_style: LabelStyle,
    pub label_border_thickness: f32,
    pub font: String,
    pub label_enabled_selected_changing: LabelColours,
    pub label_enabled_selected: LabelColours,
    pub label_enabled: LabelColours,
    pub label_disabled: LabelColours,
}

impl Theme {
    /// Colours for drawing a label in `state`. Hidden labels use the disabled set.
    pub const fn label_colours(&self, state: LabelState) -> LabelColours {
        match state {
            LabelState::EnabledSelectedChanging => self.label_enabled_selected_changing,
            LabelState::EnabledSelected => self.label_enabled_selected,
            LabelState::Enabled => self.label_enabled,
            LabelState::Disabled | LabelState::Hidden => self.label_disabled,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: DARK_OLIVE_GREEN,
            table_background: DARK_BLUE,
            label_style: LabelStyle::Rounded,
            label_border_thickness: 2.0,
            font: "ProFont".to_string(),
            label_enabled_selected_changing: LabelColours { background: YELLOW, text: BLACK, border: WHITE },
            label_enabled_selected: LabelColours { background: OLIVE, text: WHITE, border: YELLOW },
            label_enabled: LabelColours { background: DARK_GREEN, text: WHITE, border: WHITE },
            label_disabled: LabelColours { background: DARK_GREY, text: GREY, border: GREY },
        }
    }
}

/// Filesystem locations.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Paths {
    /// Canvas images.
    pub images: PathBuf,
    /// Map tiles. An empty string disables the map.
    pub maps: PathBuf,
    /// Location source device (e.g. a serial GPS).
    pub gps_device: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self { images: PathBuf::from("images"), maps: PathBuf::new(), gps_device: PathBuf::from("/dev/ttyUSB0") }
    }
}

/// Mutable test values (map zoom, fixed position, display settings).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TestValues {
    pub zoom: u32,
    pub lat: f64,
    pub lon: f64,
    pub fullscreen: bool,
    pub brightness: f32,
}

impl Default for TestValues {
    fn default() -> Self {
        Self { zoom: 10_000, lat: 51.500_000, lon: -2.000_000, fullscreen: false, brightness: 1.0 }
    }
}

/// Simulator window settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Integer pixel scale of the simulator window.
    pub scale: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self { scale: 1 }
    }
}

/// Everything read from the config file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HmiConfig {
    pub theme: Theme,
    pub paths: Paths,
    pub test: TestValues,
    pub window: WindowSettings,
    /// Extra keyboard bindings layered over the defaults.
    pub keys: BTreeMap<String, Key>,
}

impl HmiConfig {
    /// Load from `$GVA_HMI_CONFIG` or `hmi.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV).map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from);
        Self::load_from(&path)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Io { path: path.to_path_buf(), source }),
        };
        let config = Self::parse(&raw).map_err(|err| match err {
            ParseFailure::Toml(source) => ConfigError::Parse { path: path.to_path_buf(), source },
            ParseFailure::Invalid(err) => err,
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate TOML text.
    fn parse(raw: &str) -> Result<Self, ParseFailure> {
        let config: Self = toml::from_str(raw).map_err(ParseFailure::Toml)?;
        config.validate().map_err(ParseFailure::Invalid)?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let test = &self.test;
        if !(0.0..=1.0).contains(&test.brightness) {
            return Err(ConfigError::Invalid { field: "test.brightness", reason: "must be within 0.0..=1.0".into() });
        }
        if test.zoom == 0 {
            return Err(ConfigError::Invalid { field: "test.zoom", reason: "must be greater than zero".into() });
        }
        if !(-90.0..=90.0).contains(&test.lat) {
            return Err(ConfigError::Invalid { field: "test.lat", reason: "must be within -90..=90".into() });
        }
        if !(-180.0..=180.0).contains(&test.lon) {
            return Err(ConfigError::Invalid { field: "test.lon", reason: "must be within -180..=180".into() });
        }
        if self.window.scale == 0 {
            return Err(ConfigError::Invalid { field: "window.scale", reason: "must be at least 1".into() });
        }
        Ok(())
    }

    /// The map is enabled when a map directory is configured.
    pub fn map_enabled(&self) -> bool {
        !self.paths.maps.as_os_str().is_empty()
    }
}

enum ParseFailure {
    Toml(toml::de::Error),
    Invalid(ConfigError),
}
