//! Two-dimensional drawing capability consumed by the render pipeline.
//!
//! [`Surface`] is a small path-based API: build a path with `move_to`,
//! `line_to`, `arc` and friends, then `stroke` or `fill_preserve` it with the
//! current source colour. Transforms and graphics state are saved and restored
//! as a stack. The simulator implements it over an embedded-graphics draw
//! target (see [`super::backend`]).

use super::command::{LineCap, LineJoin, TextFont};
use super::image::Image;

/// Path-based drawing surface.
pub trait Surface {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, x: f32, y: f32);

    /// Set the source colour (`0xRRGGBB`) for strokes, fills, and text.
    fn set_source(&mut self, rgb: u32);
    fn set_line_width(&mut self, width: f32);
    /// On/off dash length, `None` for continuous lines.
    fn set_dash(&mut self, dash: Option<f32>);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);

    fn new_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32);
    /// Clockwise arc (in surface space) from `angle1` to `angle2`, radians.
    fn arc(&mut self, xc: f32, yc: f32, radius: f32, angle1: f32, angle2: f32);
    fn close_path(&mut self);

    /// Fill the current path and keep it for a following stroke.
    fn fill_preserve(&mut self);
    /// Stroke the current path and clear it.
    fn stroke(&mut self);

    fn select_font(&mut self, font: &TextFont);
    /// Draw text with its baseline starting at the current point.
    fn show_text(&mut self, text: &str);

    /// Paint an image with its top-left corner at (`x`, `y`).
    fn paint_image(&mut self, image: &Image, x: f32, y: f32);

    /// Begin an offscreen group. Surfaces without group support draw directly.
    fn push_group(&mut self) {}

    /// Composite the last group.
    fn pop_group(&mut self) {}

    /// Closed rectangular sub-path.
    fn rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.move_to(x, y);
        self.line_to(x + width, y);
        self.line_to(x + width, y + height);
        self.line_to(x, y + height);
        self.close_path();
    }
}

// =============================================================================
// Recording Surface (tests)
// =============================================================================

#[cfg(test)]
pub mod recording {
    //! Surface double that records every call in order.

    use super::*;

    /// One recorded surface call.
    #[derive(Clone, Debug, PartialEq)]
    pub enum Op {
        Save,
        Restore,
        Translate(f32, f32),
        Rotate(f32),
        Scale(f32, f32),
        Source(u32),
        LineWidth(f32),
        Dash(Option<f32>),
        Cap(LineCap),
        Join(LineJoin),
        NewPath,
        MoveTo(f32, f32),
        LineTo(f32, f32),
        CurveTo,
        Arc { xc: f32, yc: f32, radius: f32, angle1: f32, angle2: f32 },
        ClosePath,
        Fill,
        Stroke,
        Font(TextFont),
        Text(String),
        Image { width: u32, height: u32, x: f32, y: f32 },
        PushGroup,
        PopGroup,
    }

    /// Records calls; reports a fixed size.
    pub struct RecordingSurface {
        pub width: u32,
        pub height: u32,
        pub ops: Vec<Op>,
    }

    impl RecordingSurface {
        pub const fn new(width: u32, height: u32) -> Self {
            Self { width, height, ops: Vec::new() }
        }

        /// Source colours in the order they were set.
        pub fn sources(&self) -> Vec<u32> {
            self.ops
                .iter()
                .filter_map(|op| if let Op::Source(c) = op { Some(*c) } else { None })
                .collect()
        }

        pub fn texts(&self) -> Vec<String> {
            self.ops.iter().filter_map(|op| if let Op::Text(t) = op { Some(t.clone()) } else { None }).collect()
        }

        pub fn count(&self, wanted: &Op) -> usize {
            self.ops.iter().filter(|op| *op == wanted).count()
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn save(&mut self) {
            self.ops.push(Op::Save);
        }

        fn restore(&mut self) {
            self.ops.push(Op::Restore);
        }

        fn translate(&mut self, x: f32, y: f32) {
            self.ops.push(Op::Translate(x, y));
        }

        fn rotate(&mut self, radians: f32) {
            self.ops.push(Op::Rotate(radians));
        }

        fn scale(&mut self, x: f32, y: f32) {
            self.ops.push(Op::Scale(x, y));
        }

        fn set_source(&mut self, rgb: u32) {
            self.ops.push(Op::Source(rgb));
        }

        fn set_line_width(&mut self, width: f32) {
            self.ops.push(Op::LineWidth(width));
        }

        fn set_dash(&mut self, dash: Option<f32>) {
            self.ops.push(Op::Dash(dash));
        }

        fn set_line_cap(&mut self, cap: LineCap) {
            self.ops.push(Op::Cap(cap));
        }

        fn set_line_join(&mut self, join: LineJoin) {
            self.ops.push(Op::Join(join));
        }

        fn new_path(&mut self) {
            self.ops.push(Op::NewPath);
        }

        fn move_to(&mut self, x: f32, y: f32) {
            self.ops.push(Op::MoveTo(x, y));
        }

        fn line_to(&mut self, x: f32, y: f32) {
            self.ops.push(Op::LineTo(x, y));
        }

        fn curve_to(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32, _x3: f32, _y3: f32) {
            self.ops.push(Op::CurveTo);
        }

        fn arc(&mut self, xc: f32, yc: f32, radius: f32, angle1: f32, angle2: f32) {
            self.ops.push(Op::Arc { xc, yc, radius, angle1, angle2 });
        }

        fn close_path(&mut self) {
            self.ops.push(Op::ClosePath);
        }

        fn fill_preserve(&mut self) {
            self.ops.push(Op::Fill);
        }

        fn stroke(&mut self) {
            self.ops.push(Op::Stroke);
        }

        fn select_font(&mut self, font: &TextFont) {
            self.ops.push(Op::Font(font.clone()));
        }

        fn show_text(&mut self, text: &str) {
            self.ops.push(Op::Text(text.to_string()));
        }

        fn paint_image(&mut self, image: &Image, x: f32, y: f32) {
            self.ops.push(Op::Image { width: image.width(), height: image.height(), x, y });
        }

        fn push_group(&mut self) {
            self.ops.push(Op::PushGroup);
        }

        fn pop_group(&mut self) {
            self.ops.push(Op::PopGroup);
        }
    }
}
