//! Vector icons.
//!
//! Icons are drawn in their own coordinate frame: the pipeline is translated
//! to the icon centre, rotated half a turn and scaled so the reference shape
//! (roughly 13x15 units) fills the requested box. Everything inside uses the
//! raw pen commands, so no Y conversion happens between `save` and `restore`.

use std::f32::consts::PI;

use crate::{
    colors::{GREEN, ORANGE, RED, WHITE},
    render::{LineCap, LineType, RenderPipeline},
};

/// Arrow outline, tip at +Y.
const ARROW: [(f32, f32); 7] = [(-4.0, -10.0), (-4.0, 0.0), (-8.0, 0.0), (0.0, 10.0), (8.0, 0.0), (4.0, 0.0), (4.0, -10.0)];

/// Reference icon size the scale factors are computed against.
const UNIT_WIDTH: f32 = 13.0;
const UNIT_HEIGHT: f32 = 15.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Icon {
    UpArrow,
    DownArrow,
    LeftArrow,
    RightArrow,
    PowerOff,
    RotateLeft,
    RotateRight,
    Plus,
    Minus,
    Info,
    Warning,
    Error,
    WaterfallSight,
    CrossSight,
}

impl Icon {
    /// Parse a label of the form `icon:<name>`.
    pub fn from_label(text: &str) -> Option<Self> {
        let name = text.strip_prefix("icon:")?;
        Some(match name {
            "uparrow" => Self::UpArrow,
            "downarrow" => Self::DownArrow,
            "leftarrow" => Self::LeftArrow,
            "rightarrow" => Self::RightArrow,
            "exit" => Self::PowerOff,
            "rotateleft" => Self::RotateLeft,
            "rotateright" => Self::RotateRight,
            "plus" => Self::Plus,
            "minus" => Self::Minus,
            "waterfall" => Self::WaterfallSight,
            "cross" => Self::CrossSight,
            _ => return None,
        })
    }
}

fn arrow(pipeline: &mut RenderPipeline) {
    pipeline.move_pen_raw(ARROW[0].0, ARROW[0].1);
    for (x, y) in ARROW.iter().skip(1) {
        pipeline.draw_pen_raw(*x, *y);
    }
    pipeline.close_path(true);
}

fn segment(pipeline: &mut RenderPipeline, from: (f32, f32), to: (f32, f32)) {
    pipeline.move_pen_raw(from.0, from.1);
    pipeline.draw_pen_raw(to.0, to.1);
}

fn round_pen(pipeline: &mut RenderPipeline) {
    pipeline.set_line_thickness(2.0, LineType::Solid, LineCap::Round);
}

/// Draw `icon` centred on (`x`, `y`) in bottom-left coordinates.
pub fn draw(pipeline: &mut RenderPipeline, icon: Icon, x: f32, y: f32, width: f32, height: f32) {
    let (sx, sy) = (width / UNIT_WIDTH, height / UNIT_HEIGHT);

    pipeline.save();
    pipeline.set_colour(WHITE);
    pipeline.set_line_thickness(1.0, LineType::Solid, LineCap::Butt);
    let y = pipeline.flip_y(y);
    pipeline.translate(x, y);
    pipeline.rotate(PI);

    match icon {
        Icon::UpArrow | Icon::DownArrow => {
            if icon == Icon::DownArrow {
                pipeline.rotate(PI);
            }
            pipeline.scale(sx, sy);
            arrow(pipeline);
        }
        Icon::LeftArrow | Icon::RightArrow => {
            if icon == Icon::RightArrow {
                pipeline.rotate(PI);
            }
            pipeline.rotate(PI * 1.5);
            pipeline.scale(sx, sy);
            arrow(pipeline);
        }
        Icon::PowerOff => {
            round_pen(pipeline);
            pipeline.scale(sx, sy);
            pipeline.draw_arc_raw(0.0, 0.0, 8.0, 290.0, 250.0);
            segment(pipeline, (0.0, -4.0), (0.0, -10.0));
            pipeline.close_path(true);
        }
        Icon::RotateLeft | Icon::RotateRight => {
            let side = if icon == Icon::RotateLeft { 5.0 } else { -5.0 };
            round_pen(pipeline);
            pipeline.scale(sx, sy);
            pipeline.draw_arc_raw(0.0, 0.0, 8.0, 315.0, 225.0);
            segment(pipeline, (side, -6.0), (side, -1.0));
            segment(pipeline, (side, -6.0), (side * 1.8, -6.0));
            pipeline.close_path(true);
        }
        Icon::Plus => {
            round_pen(pipeline);
            pipeline.scale(sx, sy);
            segment(pipeline, (-10.0, 0.0), (10.0, 0.0));
            segment(pipeline, (0.0, -10.0), (0.0, 10.0));
            pipeline.close_path(true);
        }
        Icon::Minus => {
            round_pen(pipeline);
            pipeline.scale(sx, sy);
            segment(pipeline, (-10.0, 0.0), (10.0, 0.0));
            pipeline.close_path(true);
        }
        Icon::Info | Icon::Warning | Icon::Error => {
            pipeline.rotate(PI);
            pipeline.set_line_thickness(2.0, LineType::Solid, LineCap::Butt);
            let fill = match icon {
                Icon::Error => RED,
                Icon::Warning => ORANGE,
                _ => GREEN,
            };
            pipeline.set_colour_background(fill);
            pipeline.scale(sx, sy);
            pipeline.move_pen_raw(-10.0, 10.0);
            pipeline.draw_pen_raw(0.0, -10.0);
            pipeline.draw_pen_raw(10.0, 10.0);
            pipeline.draw_pen_raw(-10.0, 10.0);
            pipeline.close_path(true);
            segment(pipeline, (0.0, -3.0), (0.0, 3.0));
            pipeline.close_path(false);
            segment(pipeline, (0.0, 6.0), (0.0, 7.0));
            pipeline.close_path(true);
        }
        Icon::WaterfallSight => {
            pipeline.set_line_thickness(1.0, LineType::Solid, LineCap::Square);
            let mut drop = 0.0;
            for row in 0..4 {
                drop += (10 * row) as f32 * 0.5;
                for column in 0..4 {
                    let step = (column * 10 + if column >= 2 { 5 } else { 0 }) as f32;
                    segment(pipeline, (-20.0 + step, 15.0 - drop), (-15.0 + step, 15.0 - drop));
                }
            }
            pipeline.close_path(true);
            pipeline.set_line_thickness(1.0, LineType::DashedMedium, LineCap::Square);
            segment(pipeline, (0.0, -15.0), (0.0, 23.0));
            pipeline.close_path(false);
            pipeline.move_pen_raw(20.0, 15.0);
            pipeline.curve_to(0.0, 15.0, 4.0, 0.0, 2.0, -20.0);
            pipeline.move_pen_raw(-20.0, 15.0);
            pipeline.curve_to(0.0, 15.0, -4.0, 0.0, -2.0, -20.0);
        }
        Icon::CrossSight => {
            pipeline.set_line_thickness(3.0, LineType::Solid, LineCap::Square);
            pipeline.scale(0.4, 0.4);
            for sign in [1.0, -1.0] {
                segment(pipeline, (0.0, -10.0 * sign), (0.0, -15.0 * sign));
                segment(pipeline, (0.0, -25.0 * sign), (0.0, -35.0 * sign));
                segment(pipeline, (-10.0 * sign, 0.0), (-30.0 * sign, 0.0));
                segment(pipeline, (-30.0 * sign, -10.0), (-50.0 * sign, -10.0));
                segment(pipeline, (-30.0 * sign, 10.0), (-50.0 * sign, 10.0));
                segment(pipeline, (-70.0 * sign, 0.0), (-90.0 * sign, 0.0));
            }
            pipeline.close_path(true);
        }
    }
    pipeline.restore();
}
