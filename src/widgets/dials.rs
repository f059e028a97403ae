//! Driver dials.
//!
//! Both dials share one face: a 270 degree sweep starting at the lower left,
//! drawn at half scale in a local frame centred on the widget position.

use std::any::Any;

use super::{Frame, Placement, Widget, WidgetKind, compass::polar};
use crate::{
    colors::{BLACK, CYAN, RED, WHITE},
    config::{RPM_FUEL_CENTRE, SPEEDOMETER_CENTRE},
    render::{FontWeight, LineCap, LineType, RenderPipeline, radians},
    styles::FONT_SIZE_TITLE,
};

const RADIUS: f32 = 100.0;

/// Bearing of the zero mark, clockwise from north.
const SWEEP_START: u32 = 225;
const SWEEP: u32 = 270;

/// Inset of the numeric labels from the ring.
const LABEL_INSET: f32 = 28.0;

/// Open the local frame and draw the ring.
fn begin(p: &mut RenderPipeline, placement: &Placement) {
    p.save();
    p.translate(placement.x as f32, placement.y as f32);
    p.scale(0.5, 0.5);
    p.draw_colour(WHITE);
    p.set_colour_background(BLACK);
    p.set_colour_foreground(WHITE);
    p.set_line_thickness(2.0, LineType::Solid, LineCap::Butt);
    p.draw_circle_raw(0.0, 0.0, RADIUS, true);
}

/// Numbers around the sweep every `step` degrees; `label` maps the index to text.
fn draw_labels(p: &mut RenderPipeline, step: u32, label: impl Fn(u32) -> String) {
    for (i, degrees) in (0..=SWEEP).step_by(step as usize).enumerate() {
        let text = label(i as u32);
        let adjust = if text.len() > 2 { -15.0 } else { -8.0 };
        let (x, y) = polar(RADIUS - LABEL_INSET, (degrees + SWEEP_START) as f32);
        p.draw_text_raw(x + adjust, y + 4.0, &text);
    }
}

/// Needle at `degrees` past the zero mark, then close the local frame.
fn finish(p: &mut RenderPipeline, degrees: f32) {
    p.rotate(radians(45.0 + degrees));
    p.set_colour_background(CYAN);
    p.set_colour_foreground(BLACK);
    p.set_line_thickness(1.0, LineType::Solid, LineCap::Butt);
    p.draw_rectangle_raw(-4.0, 12.0, 4.0, 76.0, true);
    p.restore();
}

// =============================================================================
// Speedometer
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SpeedUnit {
    #[default]
    Kph,
    Mph,
}

impl SpeedUnit {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Kph => "Km/h",
            Self::Mph => "Mph",
        }
    }
}

/// Speed dial, 0 to 120 over the sweep.
#[derive(Debug)]
pub struct SpeedometerDial {
    placement: Placement,
    pub value: u16,
    pub unit: SpeedUnit,
}

impl SpeedometerDial {
    /// Degrees of sweep per unit of speed.
    const DEGREES_PER_UNIT: f32 = 2.23;

    pub const fn new() -> Self {
        Self {
            placement: Placement::new(false, SPEEDOMETER_CENTRE.0, SPEEDOMETER_CENTRE.1),
            value: 0,
            unit: SpeedUnit::Kph,
        }
    }

    /// Needle position past the zero mark, clamped to the sweep.
    pub fn needle(&self) -> f32 {
        (f32::from(self.value) * Self::DEGREES_PER_UNIT).min(SWEEP as f32)
    }
}

impl Default for SpeedometerDial {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for SpeedometerDial {
    fn kind(&self) -> WidgetKind {
        WidgetKind::DialSpeedometer
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        frame.font(FontWeight::Normal, FONT_SIZE_TITLE);
        let p = &mut *frame.pipeline;
        begin(p, &self.placement);

        draw_labels(p, 360 / 16, |i| (i * 10).to_string());
        p.draw_text_raw(-30.0, 40.0, &format!("{} {}", self.value, self.unit.suffix()));

        p.set_line_thickness(1.0, LineType::Solid, LineCap::Butt);
        for (i, degrees) in (0..=SWEEP).step_by(360 / 64).enumerate() {
            let inset = if i % 4 == 0 { 15.0 } else { 10.0 };
            let bearing = (degrees + SWEEP_START) as f32;
            let (x1, y1) = polar(RADIUS - inset, bearing);
            let (x2, y2) = polar(RADIUS, bearing);
            p.draw_line_raw(x1, y1, x2, y2);
        }

        finish(p, self.needle());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// =============================================================================
// RPM and Fuel
// =============================================================================

/// Engine speed dial, 0 to 9000 RPM with the top third in red.
#[derive(Debug)]
pub struct RpmFuelDial {
    placement: Placement,
    pub value: u16,
    pub fuel: u8,
}

impl RpmFuelDial {
    const DEGREES_PER_RPM: f32 = 0.03;

    /// Minor ticks past this index are red.
    const REDLINE_TICK: usize = 69;

    pub const fn new() -> Self {
        Self { placement: Placement::new(false, RPM_FUEL_CENTRE.0, RPM_FUEL_CENTRE.1), value: 0, fuel: 100 }
    }

    pub fn needle(&self) -> f32 {
        (f32::from(self.value) * Self::DEGREES_PER_RPM).min(SWEEP as f32)
    }
}

impl Default for RpmFuelDial {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for RpmFuelDial {
    fn kind(&self) -> WidgetKind {
        WidgetKind::DialRpmFuel
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        frame.font(FontWeight::Normal, FONT_SIZE_TITLE);
        let p = &mut *frame.pipeline;
        begin(p, &self.placement);

        draw_labels(p, 360 / 12, |i| i.to_string());
        p.draw_text_raw(-16.0, 60.0, "RPM");
        p.draw_text_raw(-20.0, 40.0, "Drive");
        p.draw_text_raw(-20.0, -30.0, &format!("Fuel {}%", self.fuel));

        p.set_line_thickness(1.0, LineType::Solid, LineCap::Butt);
        for (i, degrees) in (0..=SWEEP).step_by(360 / 120).enumerate() {
            let major = i % 10 == 0;
            let colour = if i > Self::REDLINE_TICK && !major { RED } else { WHITE };
            p.set_colour_foreground(colour);
            let bearing = (degrees + SWEEP_START) as f32;
            let (x1, y1) = polar(RADIUS - if major { 14.0 } else { 8.0 }, bearing);
            let (x2, y2) = polar(RADIUS, bearing);
            p.draw_line_raw(x1, y1, x2, y2);
        }
        p.set_colour_foreground(WHITE);

        finish(p, self.needle());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
