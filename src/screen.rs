//! The screen configuration the state machine mutates and the widgets read.
//!
//! A [`ScreenConfiguration`] is the single aggregate describing what is on the
//! display right now: the four label banks, the canvas, the status line, the
//! pop-up message and the label visibility mode. Only the active state's entry
//! and key handlers write to it; the compositor reads it once per frame.

use std::sync::Arc;

use crate::{
    config::SCREEN_NAME,
    labels::{CommonTaskKeys, FunctionKeys, FunctionSelect, LabelMode},
    render::Image,
};

// =============================================================================
// Functional State
// =============================================================================

/// Functional area currently driving the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FunctionalState {
    SituationalAwareness,
    Weapon,
    DefensiveSystems,
    Systems,
    Driver,
    SpecialToRole,
    Communications,
    BattlefieldManagement,
    Alarms,
    Off,
    /// Bootstrap state, left as soon as it is entered.
    On,
}

impl FunctionalState {
    /// The eight areas in top-bar order.
    pub const AREAS: [Self; 8] = [
        Self::SituationalAwareness,
        Self::Weapon,
        Self::DefensiveSystems,
        Self::Systems,
        Self::Driver,
        Self::SpecialToRole,
        Self::Communications,
        Self::BattlefieldManagement,
    ];

    /// Top-bar slot of an area state.
    #[inline]
    pub const fn top_slot(self) -> Option<usize> {
        match self {
            Self::SituationalAwareness => Some(0),
            Self::Weapon => Some(1),
            Self::DefensiveSystems => Some(2),
            Self::Systems => Some(3),
            Self::Driver => Some(4),
            Self::SpecialToRole => Some(5),
            Self::Communications => Some(6),
            Self::BattlefieldManagement => Some(7),
            Self::Alarms | Self::Off | Self::On => None,
        }
    }

    /// Area for a top-bar slot.
    #[inline]
    pub const fn from_slot(slot: usize) -> Option<Self> {
        if slot < Self::AREAS.len() { Some(Self::AREAS[slot]) } else { None }
    }

    /// Next area to the right, `None` past BMS or outside the area ring.
    pub const fn next_area(self) -> Option<Self> {
        match self.top_slot() {
            Some(slot) => Self::from_slot(slot + 1),
            None => None,
        }
    }

    /// Next area to the left, `None` before SA or outside the area ring.
    pub const fn previous_area(self) -> Option<Self> {
        match self.top_slot() {
            Some(0) | None => None,
            Some(slot) => Self::from_slot(slot - 1),
        }
    }

    /// Short name used in logs and the top bar.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SituationalAwareness => "SA",
            Self::Weapon => "WPN",
            Self::DefensiveSystems => "DEF",
            Self::Systems => "SYS",
            Self::Driver => "DRV",
            Self::SpecialToRole => "STR",
            Self::Communications => "COM",
            Self::BattlefieldManagement => "BMS",
            Self::Alarms => "ALARMS",
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }
}

/// Operating mode shown in the mode banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScreenMode {
    #[default]
    Operational,
    Training,
    Maintenance,
    Blackout,
}

impl ScreenMode {
    /// Banner text, `None` when no banner is shown.
    pub const fn banner(self) -> Option<&'static str> {
        match self {
            Self::Training => Some("Training Mode"),
            Self::Maintenance => Some("Maintenance Mode"),
            Self::Operational | Self::Blackout => None,
        }
    }
}

// =============================================================================
// Canvas
// =============================================================================

/// Map placement handed to the external map renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapView {
    pub zoom: u32,
    pub lat: f64,
    pub lon: f64,
}

/// What the canvas shows underneath everything else.
#[derive(Clone, Debug, Default)]
pub enum CanvasContent {
    #[default]
    None,
    /// Image file name, resolved against the image directory.
    File(String),
    /// Pre-decoded pixel buffer.
    Buffer(Arc<Image>),
    /// Vector surface produced by the map renderer.
    Map(MapView),
    Blackout,
}

/// Full-screen background layer.
#[derive(Clone, Debug, Default)]
pub struct Canvas {
    pub visible: bool,
    pub content: CanvasContent,
    /// Content hidden by a blackout, restored when it ends.
    previous: Option<CanvasContent>,
}

impl Canvas {
    /// Show an image file.
    pub fn set_file(&mut self, name: &str) {
        self.content = CanvasContent::File(name.to_owned());
        self.previous = None;
    }

    pub fn set_buffer(&mut self, image: Arc<Image>) {
        self.content = CanvasContent::Buffer(image);
        self.previous = None;
    }

    pub fn set_map(&mut self, view: MapView) {
        self.content = CanvasContent::Map(view);
        self.previous = None;
    }

    pub fn clear(&mut self) {
        self.content = CanvasContent::None;
        self.previous = None;
    }

    /// File name when showing an image file.
    pub fn file(&self) -> Option<&str> {
        match &self.content {
            CanvasContent::File(name) => Some(name),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_blackout(&self) -> bool {
        matches!(self.content, CanvasContent::Blackout)
    }

    /// Enter or leave blackout, keeping the covered content.
    pub fn set_blackout(&mut self, on: bool) {
        if on == self.is_blackout() {
            return;
        }
        if on {
            self.previous = Some(std::mem::replace(&mut self.content, CanvasContent::Blackout));
        } else {
            self.content = self.previous.take().unwrap_or_default();
        }
    }

    /// Flip blackout and return the new setting.
    pub fn toggle_blackout(&mut self) -> bool {
        self.set_blackout(!self.is_blackout());
        self.is_blackout()
    }
}

// =============================================================================
// Status Line and Message Box
// =============================================================================

/// Location display format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LocationFormat {
    #[default]
    LatLon,
    Mgrs,
}

impl LocationFormat {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LatLon => "Norm.",
            Self::Mgrs => "MGRS",
        }
    }
}

/// Text shown in the status bar cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub clock: String,
    pub location: String,
    pub format: LocationFormat,
    pub warnings: u32,
    pub advisories: u32,
    pub cautions: u32,
    pub overrides: u32,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            clock: "00:00:00 01/01/1973".to_owned(),
            location: "Lat:0.000000 Lon:-0.000000".to_owned(),
            format: LocationFormat::LatLon,
            warnings: 0,
            advisories: 0,
            cautions: 0,
            overrides: 0,
        }
    }
}

/// Icon drawn in the message box title.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MessageIcon {
    #[default]
    Info,
    Warning,
    Error,
}

/// Pop-up message box.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Message {
    pub visible: bool,
    pub icon: MessageIcon,
    pub brief: String,
    pub detail: String,
}

impl Message {
    pub fn show(&mut self, icon: MessageIcon, brief: &str, detail: &str) {
        self.visible = true;
        self.icon = icon;
        brief.clone_into(&mut self.brief);
        detail.clone_into(&mut self.detail);
    }

    /// The message every unassigned function key raises.
    pub fn not_implemented(&mut self) {
        self.show(MessageIcon::Error, "Function key", "Operation not implemented!");
    }

    #[inline]
    pub const fn hide(&mut self) {
        self.visible = false;
    }
}

// =============================================================================
// Screen Configuration
// =============================================================================

/// Everything the widgets need to draw one frame.
#[derive(Clone, Debug)]
pub struct ScreenConfiguration {
    pub name: String,
    pub mode: ScreenMode,
    pub current: FunctionalState,
    pub labels: LabelMode,
    pub top: FunctionSelect,
    pub bottom: CommonTaskKeys,
    pub left: FunctionKeys,
    pub right: FunctionKeys,
    pub canvas: Canvas,
    pub status: StatusLine,
    pub message: Message,
}

impl ScreenConfiguration {
    /// A powered-off screen with the given shared banks and empty side panels.
    pub fn new(top: FunctionSelect, bottom: CommonTaskKeys, hidden: FunctionKeys) -> Self {
        Self {
            name: SCREEN_NAME.to_owned(),
            mode: ScreenMode::Operational,
            current: FunctionalState::Off,
            labels: LabelMode::All,
            top,
            bottom,
            left: hidden.clone(),
            right: hidden,
            canvas: Canvas { visible: true, ..Canvas::default() },
            status: StatusLine::default(),
            message: Message::default(),
        }
    }

    /// Show an image file on a visible canvas.
    pub fn set_canvas_file(&mut self, name: &str) {
        self.canvas.visible = true;
        self.canvas.set_file(name);
    }
}
