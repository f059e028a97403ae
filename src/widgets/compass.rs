//! Plan position indicator (compass).
//!
//! Drawn in a local frame centred on the widget position with north up and
//! Y growing downwards, so every shape uses the raw pipeline variants. Bearings
//! are whole degrees clockwise from north and always held in `0..360`.
//!
//! | Mode | Vehicle | Sight lines |
//! |------|---------|-------------|
//! | `ClassicTankWithSight` | Hull outline | Yes |
//! | `ClassicTankWithoutSight` | Hull outline | No |
//! | `ClassicArrowWithSight` | Arrow | Yes |
//! | `ClassicArrowWithoutSight` | Arrow | No |

use std::any::Any;
use std::collections::BTreeMap;

use super::{Frame, Placement, Widget, WidgetKind};
use crate::{
    colors::{BLACK, CYAN, SKY_BLUE, WHITE},
    config::{COMPASS_X, COMPASS_Y},
    render::{FontWeight, LineCap, LineJoin, LineType, RenderPipeline, radians},
    styles::FONT_SIZE_TITLE,
};

/// Outer ring radius.
const RADIUS: f32 = 100.0;

/// Field of view drawn either side of the sight line, in degrees.
const SIGHT_ANGLE: f32 = 45.0;

const POINTS: [&str; 4] = ["N", "E", "S", "W"];

/// Hull outline, nose at -Y.
const HULL: [(f32, f32); 9] = [
    (-30.0, 40.0),
    (30.0, 40.0),
    (30.0, -40.0),
    (10.0, -40.0),
    (10.0, -30.0),
    (-10.0, -30.0),
    (-10.0, -40.0),
    (-30.0, -40.0),
    (-30.0, 40.0),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PpiMode {
    #[default]
    ClassicTankWithSight,
    ClassicTankWithoutSight,
    ClassicArrowWithSight,
    ClassicArrowWithoutSight,
}

impl PpiMode {
    #[inline]
    pub const fn has_sight(self) -> bool {
        matches!(self, Self::ClassicTankWithSight | Self::ClassicArrowWithSight)
    }

    #[inline]
    pub const fn is_arrow(self) -> bool {
        matches!(self, Self::ClassicArrowWithSight | Self::ClassicArrowWithoutSight)
    }

    /// The same vehicle style without sight lines.
    pub const fn without_sight(self) -> Self {
        match self {
            Self::ClassicTankWithSight | Self::ClassicTankWithoutSight => Self::ClassicTankWithoutSight,
            Self::ClassicArrowWithSight | Self::ClassicArrowWithoutSight => Self::ClassicArrowWithoutSight,
        }
    }
}

/// A threat marker on the compass ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Threat {
    pub bearing: i32,
    /// Arc width in degrees.
    pub size: i32,
    pub colour: u32,
}

/// Normalise degrees into `0..360`.
#[inline]
pub const fn wrap_degrees(degrees: i32) -> i32 {
    degrees.rem_euclid(360)
}

/// Point on a circle of `radius` at `degrees` clockwise from north.
pub(super) fn polar(radius: f32, degrees: f32) -> (f32, f32) {
    let r = radians(degrees);
    (radius * r.sin(), -radius * r.cos())
}

#[derive(Debug)]
pub struct CompassWidget {
    placement: Placement,
    mode: PpiMode,
    bearing: i32,
    bearing_sight: i32,
    weapon_azimuth: i32,
    threats: BTreeMap<u16, Threat>,
}

impl CompassWidget {
    pub const fn new() -> Self {
        Self {
            placement: Placement::new(false, COMPASS_X, COMPASS_Y),
            mode: PpiMode::ClassicTankWithSight,
            bearing: 0,
            bearing_sight: 0,
            weapon_azimuth: 0,
            threats: BTreeMap::new(),
        }
    }

    #[inline]
    pub const fn mode(&self) -> PpiMode {
        self.mode
    }

    pub const fn set_mode(&mut self, mode: PpiMode) {
        self.mode = mode;
    }

    /// Vehicle heading.
    #[inline]
    pub const fn bearing(&self) -> i32 {
        self.bearing
    }

    pub const fn set_bearing(&mut self, degrees: i32) {
        self.bearing = wrap_degrees(degrees);
    }

    /// Sight direction relative to the hull.
    #[inline]
    pub const fn bearing_sight(&self) -> i32 {
        self.bearing_sight
    }

    pub const fn set_bearing_sight(&mut self, degrees: i32) {
        self.bearing_sight = wrap_degrees(degrees);
    }

    pub const fn add_bearing(&mut self, delta: i32) {
        self.set_bearing(self.bearing + delta);
    }

    pub const fn add_bearing_sight(&mut self, delta: i32) {
        self.set_bearing_sight(self.bearing_sight + delta);
    }

    pub const fn set_weapon_azimuth(&mut self, degrees: i32) {
        self.weapon_azimuth = wrap_degrees(degrees);
    }

    pub fn add_threat(&mut self, id: u16, threat: Threat) {
        self.threats.insert(id, threat);
    }

    pub fn delete_threat(&mut self, id: u16) {
        self.threats.remove(&id);
    }

    pub fn clear_threats(&mut self) {
        self.threats.clear();
    }

    fn draw_vehicle(&self, p: &mut RenderPipeline) {
        p.save();
        p.set_line_join(LineJoin::Miter);
        p.set_colour_foreground(WHITE);
        if self.mode.is_arrow() {
            p.set_colour_background(WHITE);
            p.set_line_thickness(8.0, LineType::Solid, LineCap::Butt);
            p.move_pen_raw(-22.0, 30.0);
            p.draw_pen_raw(0.0, 10.0);
            p.draw_pen_raw(22.0, 30.0);
            p.draw_pen_raw(0.0, -50.0);
            p.close_path(true);
        } else {
            p.set_colour_background(BLACK);
            p.draw_circle_raw(0.0, 0.0, 16.0, true);
            p.set_line_thickness(3.0, LineType::Solid, LineCap::Butt);
            p.move_pen_raw(HULL[0].0, HULL[0].1);
            for (x, y) in HULL.iter().skip(1) {
                p.draw_pen_raw(*x, *y);
            }
            p.close_path(true);
        }
        p.restore();
    }

    fn draw_ticks(&self, p: &mut RenderPipeline) {
        p.draw_colour(WHITE);
        for (quadrant, label) in POINTS.iter().enumerate() {
            let (x, y) = polar(RADIUS - 12.0, (quadrant as i32 * 90 + self.bearing) as f32);
            p.draw_text_raw(x - 5.0, y + 4.0, label);
        }
        p.set_line_thickness(1.0, LineType::Solid, LineCap::Butt);
        for tick in 0..40 {
            let degrees = (tick * 9 + self.bearing) as f32;
            let inner = if tick % 5 == 0 { 20.0 } else { 28.0 };
            let (x1, y1) = polar(RADIUS - 35.0, degrees);
            let (x2, y2) = polar(RADIUS - inner, degrees);
            p.draw_line_raw(x1, y1, x2, y2);
        }
    }

    fn draw_heading(&self, p: &mut RenderPipeline) {
        p.save();
        p.rotate(radians(self.weapon_azimuth as f32));
        p.set_colour_background(CYAN);
        p.set_line_thickness(1.0, LineType::Solid, LineCap::Butt);
        if self.mode.is_arrow() {
            p.set_colour_foreground(BLACK);
            p.draw_rectangle_raw(-4.0, -73.0, 8.0, 73.0, true);
        } else {
            p.set_colour_foreground(CYAN);
            p.draw_rectangle_raw(-1.0, -73.0, 3.0, 57.0, true);
        }
        p.restore();
    }

    fn draw_sight(&self, p: &mut RenderPipeline) {
        let sight = self.bearing_sight as f32;
        p.set_colour_foreground(WHITE);
        p.set_line_thickness(2.0, LineType::Solid, LineCap::Butt);
        let (x, y) = polar(RADIUS - 10.0, sight);
        p.draw_line_raw(0.0, 0.0, x, y);
        p.set_colour_foreground(SKY_BLUE);
        p.set_line_thickness(1.0, LineType::Dashed, LineCap::Butt);
        for edge in [sight - SIGHT_ANGLE / 2.0, sight + SIGHT_ANGLE / 2.0] {
            let (x, y) = polar(RADIUS - 10.0, edge);
            p.draw_line_raw(0.0, 0.0, x, y);
        }
    }

    fn draw_threats(&self, p: &mut RenderPipeline) {
        p.set_line_thickness(4.0, LineType::Solid, LineCap::Butt);
        for threat in self.threats.values() {
            // Arc angles start at east
            let start = (threat.bearing - threat.size / 2 - 90) as f32;
            let end = (threat.bearing + threat.size / 2 - 90) as f32;
            p.draw_colour(threat.colour);
            p.draw_arc_raw(0.0, 0.0, RADIUS + 3.0, start, end);
        }
    }
}

impl Default for CompassWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for CompassWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Compass
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
        p.save();
        // Layout coordinates are already surface coordinates
        p.translate(self.placement.x as f32, self.placement.y as f32);
        p.set_colour_background(BLACK);
        p.set_colour_foreground(WHITE);
        p.set_line_thickness(2.0, LineType::Solid, LineCap::Butt);
        p.draw_circle_raw(0.0, 0.0, RADIUS, true);

        self.draw_vehicle(p);
        self.draw_ticks(p);
        self.draw_heading(p);
        if self.mode.has_sight() {
            self.draw_sight(p);
        }
        self.draw_threats(p);
        p.restore();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
