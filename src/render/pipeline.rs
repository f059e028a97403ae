//! Deferred render command pipeline.
//!
//! Widgets never touch the display directly. They call the emit methods on
//! [`RenderPipeline`], which append [`DrawCommand`]s to a per-frame list, and
//! the compositor replays the whole list against a [`Surface`] once per frame.
//!
//! # Frame lifecycle
//!
//! ```text
//! reset() ──▶ widgets emit commands ──▶ draw(surface) ──▶ reset() ...
//! ```
//!
//! # Coordinates
//!
//! Callers use a bottom-left origin. Most emit methods convert Y to the
//! surface's top-left origin as they record (`y' = height - y`). The `*_raw`
//! variants and the transform commands (`translate`, `rotate`, `scale`) record
//! their operands untouched so that icons can draw in a local frame.
//!
//! # Order dependence
//!
//! Colour, thickness and font commands change executor state that later shape
//! commands read. Filled shapes paint with the background colour and then
//! stroke their outline with the foreground colour.

use std::f32::consts::PI;
use std::sync::Arc;

use tracing::warn;

use super::command::{DrawCommand, FontSlant, FontWeight, LineCap, LineJoin, LineType, TextFont};
use super::image::{Image, ImageCache};
use super::surface::Surface;
use crate::colors::{BLACK, WHITE};
use crate::config::{MINIMUM_HEIGHT, MINIMUM_WIDTH};

/// Degrees to radians.
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * (PI / 180.0)
}

/// Per-frame command list plus the session image cache.
pub struct RenderPipeline {
    width: u32,
    height: u32,
    theme_background: u32,
    commands: Vec<DrawCommand>,
    frame_images: Vec<Arc<Image>>,
    cache: ImageCache,
}

impl RenderPipeline {
    /// Pipeline at design resolution resolving images against `image_dir`.
    pub fn new(image_dir: &str, theme_background: u32) -> Self {
        Self {
            width: MINIMUM_WIDTH,
            height: MINIMUM_HEIGHT,
            theme_background,
            commands: Vec::with_capacity(512),
            frame_images: Vec::new(),
            cache: ImageCache::new(image_dir, (MINIMUM_WIDTH, MINIMUM_HEIGHT)),
        }
    }

    // =========================================================================
    // Frame Management
    // =========================================================================

    /// Discard the command list and the per-frame image list.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.frame_images.clear();
    }

    /// Recorded commands, in order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Recording resolution (width, height).
    #[inline]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Convert a bottom-left Y into surface space.
    #[inline]
    pub fn flip_y(&self, y: f32) -> f32 {
        self.height as f32 - y
    }

    pub fn image_cache(&mut self) -> &mut ImageCache {
        &mut self.cache
    }

    /// Replay every recorded command against `surface`, then drop the list.
    ///
    /// The surface is scaled from design resolution to its own size. Invalid
    /// commands are logged and skipped. Returns the number executed.
    pub fn draw(&mut self, surface: &mut dyn Surface) -> usize {
        if self.commands.is_empty() {
            return 0;
        }
        let commands = std::mem::take(&mut self.commands);

        let (sw, sh) = surface.size();
        let scaled = (sw, sh) != (self.width, self.height);
        if scaled {
            surface.save();
            surface.scale(sw as f32 / self.width as f32, sh as f32 / self.height as f32);
        }

        let mut executor = Executor::new();
        let mut executed = 0;
        for command in &commands {
            if executor.run(command, surface, &self.frame_images) {
                executed += 1;
            }
        }
        executor.unwind(surface);

        if scaled {
            surface.restore();
        }

        // Hand the allocation back for the next frame
        self.commands = commands;
        self.commands.clear();
        executed
    }

    #[inline]
    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    // =========================================================================
    // State Commands
    // =========================================================================

    /// Set both foreground and background colour.
    pub fn set_colour(&mut self, rgb: u32) {
        self.set_colour_foreground(rgb);
        self.set_colour_background(rgb);
    }

    pub fn set_colour_foreground(&mut self, rgb: u32) {
        self.push(DrawCommand::ColourForeground(rgb));
    }

    pub fn set_colour_background(&mut self, rgb: u32) {
        self.push(DrawCommand::ColourBackground(rgb));
    }

    /// Set the pen colour without changing foreground or background.
    pub fn draw_colour(&mut self, rgb: u32) {
        self.push(DrawCommand::PenColour(rgb));
    }

    pub fn set_line_thickness(&mut self, width: f32, line: LineType, cap: LineCap) {
        self.push(DrawCommand::PenThickness { width, line, cap });
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.push(DrawCommand::LineJoin(join));
    }

    pub fn set_text_font(&mut self, slant: FontSlant, weight: FontWeight, name: &str, size: f32) {
        self.push(DrawCommand::TextFont(TextFont { name: name.to_string(), slant, weight, size }));
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    pub fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    pub fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    /// Translate by surface-space offsets (no Y conversion).
    pub fn translate(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::Translate { x, y });
    }

    pub fn rotate(&mut self, radians: f32) {
        self.push(DrawCommand::Rotate(radians));
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::Scale { x, y });
    }

    pub fn push_group(&mut self) {
        self.push(DrawCommand::Push);
    }

    pub fn pop_group(&mut self) {
        self.push(DrawCommand::Pop);
    }

    // =========================================================================
    // Paths
    // =========================================================================

    /// Start a new path at (`x`, `y`).
    pub fn move_pen(&mut self, x: f32, y: f32) {
        let y = self.flip_y(y);
        self.push(DrawCommand::PenMove { x, y, new_path: true });
    }

    /// Move within the current path using local coordinates.
    pub fn move_pen_raw(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::PenMove { x, y, new_path: false });
    }

    /// Line to (`x`, `y`); `close` closes and strokes the path.
    pub fn draw_pen(&mut self, x: f32, y: f32, close: bool) {
        let y = self.flip_y(y);
        self.push(DrawCommand::PenDraw { x, y, close });
    }

    /// Line to a point in local coordinates.
    pub fn draw_pen_raw(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::PenDraw { x, y, close: false });
    }

    /// Cubic curve in local coordinates, stroked immediately.
    pub fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        self.push(DrawCommand::PenCurve { x1, y1, x2, y2, x3, y3 });
    }

    /// Close the current path; `fill` paints and outlines it.
    pub fn close_path(&mut self, fill: bool) {
        self.push(DrawCommand::ClosePath { fill });
    }

    // =========================================================================
    // Shapes
    // =========================================================================

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let (y1, y2) = (self.flip_y(y1), self.flip_y(y2));
        self.draw_line_raw(x1, y1, x2, y2);
    }

    /// Stroked line between two local points.
    pub fn draw_line_raw(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.push(DrawCommand::PenLine { x1, y1, x2, y2 });
    }

    /// Rectangle with its bottom-left corner at (`x`, `y`).
    pub fn draw_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32, fill: bool) {
        let y = self.flip_y(y) - height;
        self.draw_rectangle_raw(x, y, width, height, fill);
    }

    /// Rectangle with its top-left corner at the local point (`x`, `y`).
    pub fn draw_rectangle_raw(&mut self, x: f32, y: f32, width: f32, height: f32, fill: bool) {
        self.push(DrawCommand::Rectangle { x, y, width, height, fill });
    }

    /// Rounded rectangle with its bottom-left corner at (`x`, `y`).
    pub fn draw_rounded_rectangle(&mut self, x: f32, y: f32, width: f32, height: f32, corner: f32, fill: bool) {
        let y = self.flip_y(y) - height;
        self.push(DrawCommand::RoundedRectangle { x, y, width, height, corner, fill });
    }

    pub fn draw_circle(&mut self, x: f32, y: f32, radius: f32, fill: bool) {
        let y = self.flip_y(y);
        self.draw_circle_raw(x, y, radius, fill);
    }

    pub fn draw_circle_raw(&mut self, x: f32, y: f32, radius: f32, fill: bool) {
        self.push(DrawCommand::Circle { x, y, radius, fill });
    }

    /// Arc around (`x`, `y`) between two angles in degrees.
    pub fn draw_arc(&mut self, x: f32, y: f32, radius: f32, angle1: f32, angle2: f32) {
        let y = self.flip_y(y);
        self.draw_arc_raw(x, y, radius, angle1, angle2);
    }

    /// Arc in local coordinates, angles in degrees.
    pub fn draw_arc_raw(&mut self, x: f32, y: f32, radius: f32, angle1: f32, angle2: f32) {
        self.push(DrawCommand::Arc { x, y, radius, angle1: radians(angle1), angle2: radians(angle2) });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_triangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32, fill: bool) {
        let points = [(x1, self.flip_y(y1)), (x2, self.flip_y(y2)), (x3, self.flip_y(y3))];
        self.push(DrawCommand::Triangle { points, fill });
    }

    pub fn draw_triangle_raw(&mut self, points: [(f32, f32); 3], fill: bool) {
        self.push(DrawCommand::Triangle { points, fill });
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// Text with its baseline starting at (`x`, `y`).
    pub fn draw_text(&mut self, x: f32, y: f32, text: &str) {
        let y = self.flip_y(y);
        self.draw_text_raw(x, y, text);
    }

    /// Text at a local/surface-space position.
    pub fn draw_text_raw(&mut self, x: f32, y: f32, text: &str) {
        self.push(DrawCommand::Text { x, y, text: text.to_string() });
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// Paint a cached image file at the surface-space point (`x`, `y`).
    ///
    /// The theme background is painted first, so a file that cannot be loaded
    /// leaves a plain background. Returns false when the load failed.
    pub fn texture_file(&mut self, x: f32, y: f32, name: &str) -> bool {
        self.paint_background();
        match self.cache.get_or_load(name) {
            Ok(image) => {
                self.texture_image(image, x, y);
                true
            }
            Err(err) => {
                warn!(name, %err, "could not load image");
                false
            }
        }
    }

    /// Paint an already decoded image for this frame only.
    pub fn texture_image(&mut self, image: Arc<Image>, x: f32, y: f32) {
        self.frame_images.push(image);
        let index = self.frame_images.len() - 1;
        self.push(DrawCommand::ImageTexture { index, x, y });
    }

    /// Full-screen rectangle in the theme background colour.
    pub fn paint_background(&mut self) {
        self.set_colour(self.theme_background);
        self.draw_rectangle(0.0, 0.0, self.width as f32, self.height as f32, true);
    }
}

// =============================================================================
// Executor
// =============================================================================

/// Replay state: foreground/background colours and stack depths.
struct Executor {
    foreground: u32,
    background: u32,
    saves: usize,
    groups: usize,
}

impl Executor {
    const fn new() -> Self {
        Self { foreground: WHITE, background: BLACK, saves: 0, groups: 0 }
    }

    /// Fill with the background colour then stroke with the foreground.
    fn fill_then_stroke(&self, surface: &mut dyn Surface, fill: bool) {
        if fill {
            surface.set_source(self.background);
            surface.fill_preserve();
        }
        surface.set_source(self.foreground);
        surface.stroke();
    }

    /// Execute one command. Returns false when it was skipped.
    fn run(&mut self, command: &DrawCommand, surface: &mut dyn Surface, images: &[Arc<Image>]) -> bool {
        match command {
            DrawCommand::Circle { x, y, radius, fill } => {
                surface.save();
                surface.new_path();
                surface.translate(*x, *y);
                surface.arc(0.0, 0.0, *radius, 0.0, 2.0 * PI);
                surface.close_path();
                self.fill_then_stroke(surface, *fill);
                surface.restore();
            }
            DrawCommand::Arc { x, y, radius, angle1, angle2 } => {
                surface.new_path();
                surface.arc(*x, *y, *radius, *angle1, *angle2);
                surface.stroke();
            }
            DrawCommand::ColourBackground(rgb) => self.background = *rgb,
            DrawCommand::ColourForeground(rgb) => {
                self.foreground = *rgb;
                surface.set_source(*rgb);
            }
            DrawCommand::PenColour(rgb) => surface.set_source(*rgb),
            DrawCommand::ImageTexture { index, x, y } => {
                let Some(image) = images.get(*index) else {
                    warn!(index, available = images.len(), "image texture without a frame image, skipped");
                    return false;
                };
                surface.paint_image(image, *x, *y);
            }
            DrawCommand::LineJoin(join) => surface.set_line_join(*join),
            DrawCommand::PenThickness { width, line, cap } => {
                surface.set_line_width(*width);
                surface.set_line_cap(*cap);
                surface.set_dash(line.dash());
            }
            DrawCommand::PenCurve { x1, y1, x2, y2, x3, y3 } => {
                surface.curve_to(*x1, *y1, *x2, *y2, *x3, *y3);
                surface.stroke();
            }
            DrawCommand::PenLine { x1, y1, x2, y2 } => {
                surface.move_to(*x1, *y1);
                surface.line_to(*x2, *y2);
                surface.stroke();
            }
            DrawCommand::PenDraw { x, y, close } => {
                surface.line_to(*x, *y);
                if *close {
                    surface.close_path();
                    surface.stroke();
                }
            }
            DrawCommand::PenMove { x, y, new_path } => {
                if *new_path {
                    surface.new_path();
                }
                surface.move_to(*x, *y);
            }
            DrawCommand::Rectangle { x, y, width, height, fill } => {
                surface.new_path();
                surface.rectangle(*x, *y, *width, *height);
                self.fill_then_stroke(surface, *fill);
            }
            DrawCommand::RoundedRectangle { x, y, width, height, corner, fill } => {
                let r = corner.min(width / 2.0).min(height / 2.0).max(0.0);
                surface.new_path();
                surface.arc(x + r, y + r, r, radians(180.0), radians(270.0));
                surface.arc(x + width - r, y + r, r, radians(270.0), 0.0);
                surface.arc(x + width - r, y + height - r, r, 0.0, radians(90.0));
                surface.arc(x + r, y + height - r, r, radians(90.0), radians(180.0));
                surface.close_path();
                self.fill_then_stroke(surface, *fill);
            }
            DrawCommand::Triangle { points, fill } => {
                surface.new_path();
                surface.move_to(points[0].0, points[0].1);
                surface.line_to(points[1].0, points[1].1);
                surface.line_to(points[2].0, points[2].1);
                surface.close_path();
                self.fill_then_stroke(surface, *fill);
            }
            DrawCommand::Save => {
                self.saves += 1;
                surface.save();
            }
            DrawCommand::Restore => {
                if self.saves == 0 {
                    warn!("restore without a matching save, skipped");
                    return false;
                }
                self.saves -= 1;
                surface.restore();
            }
            DrawCommand::Scale { x, y } => surface.scale(*x, *y),
            DrawCommand::Translate { x, y } => surface.translate(*x, *y),
            DrawCommand::Rotate(radians) => surface.rotate(*radians),
            DrawCommand::ClosePath { fill } => {
                surface.close_path();
                if *fill {
                    self.fill_then_stroke(surface, true);
                }
            }
            DrawCommand::TextFont(font) => surface.select_font(font),
            DrawCommand::Push => {
                self.groups += 1;
                surface.push_group();
            }
            DrawCommand::Pop => {
                if self.groups == 0 {
                    warn!("pop without a matching push, skipped");
                    return false;
                }
                self.groups -= 1;
                surface.pop_group();
            }
            DrawCommand::Text { x, y, text } => {
                surface.move_to(*x, *y);
                surface.show_text(text);
            }
        }
        true
    }

    /// Balance any saves or groups a widget left open.
    fn unwind(&mut self, surface: &mut dyn Surface) {
        if self.saves > 0 || self.groups > 0 {
            warn!(saves = self.saves, groups = self.groups, "unbalanced save/push at end of frame");
        }
        for _ in 0..self.groups {
            surface.pop_group();
        }
        for _ in 0..self.saves {
            surface.restore();
        }
        self.groups = 0;
        self.saves = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::super::surface::recording::{Op, RecordingSurface};
    use super::*;
    use crate::colors::{RED, YELLOW};

    fn pipeline() -> RenderPipeline {
        RenderPipeline::new("/nonexistent-image-dir", 0x55_6B2F)
    }

    // -------------------------------------------------------------------------
    // Frame lifecycle
    // -------------------------------------------------------------------------

    #[test]
    fn test_empty_draw_is_noop() {
        let mut p = pipeline();
        p.reset();
        let mut s = RecordingSurface::new(640, 480);
        assert_eq!(p.draw(&mut s), 0, "nothing executed");
        assert!(s.ops.is_empty(), "surface untouched");
    }

    #[test]
    fn test_commands_execute_in_order_then_clear() {
        let mut p = pipeline();
        p.set_colour_foreground(RED);
        p.draw_line(0.0, 0.0, 10.0, 10.0);
        p.set_colour_foreground(YELLOW);
        assert_eq!(p.len(), 3);

        let mut s = RecordingSurface::new(640, 480);
        assert_eq!(p.draw(&mut s), 3, "all three commands executed");
        assert_eq!(
            s.ops,
            vec![
                Op::Source(RED),
                Op::MoveTo(0.0, 480.0),
                Op::LineTo(10.0, 470.0),
                Op::Stroke,
                Op::Source(YELLOW),
            ],
            "surface calls follow command order"
        );
        assert!(p.is_empty(), "list discarded after draw");
        assert_eq!(p.draw(&mut s), 0, "second draw has nothing to do");
    }

    #[test]
    fn test_reset_empties_list() {
        let mut p = pipeline();
        p.draw_circle(10.0, 10.0, 5.0, false);
        p.reset();
        assert!(p.is_empty());
    }

    #[test]
    fn test_draw_scales_to_surface() {
        let mut p = pipeline();
        p.save();
        p.restore();
        let mut s = RecordingSurface::new(1280, 960);
        p.draw(&mut s);
        assert_eq!(s.ops.first(), Some(&Op::Save));
        assert_eq!(s.ops.get(1), Some(&Op::Scale(2.0, 2.0)), "design resolution scaled to surface");
        assert_eq!(s.ops.last(), Some(&Op::Restore));
    }

    // -------------------------------------------------------------------------
    // Coordinate conversion
    // -------------------------------------------------------------------------

    #[test]
    fn test_rectangle_flips_to_top_left() {
        let mut p = pipeline();
        p.draw_rectangle(10.0, 20.0, 100.0, 50.0, false);
        assert_eq!(
            p.commands(),
            &[DrawCommand::Rectangle { x: 10.0, y: 410.0, width: 100.0, height: 50.0, fill: false }],
            "top-left y = 480 - 20 - 50"
        );
    }

    #[test]
    fn test_pen_path_closes_and_strokes() {
        let mut p = pipeline();
        p.move_pen(0.0, 0.0);
        p.draw_pen(10.0, 0.0, false);
        p.draw_pen(10.0, 10.0, true);
        let mut s = RecordingSurface::new(640, 480);
        p.draw(&mut s);
        assert_eq!(
            s.ops,
            vec![
                Op::NewPath,
                Op::MoveTo(0.0, 480.0),
                Op::LineTo(10.0, 480.0),
                Op::LineTo(10.0, 470.0),
                Op::ClosePath,
                Op::Stroke,
            ]
        );
    }

    #[test]
    fn test_triangle_flips_each_vertex() {
        let mut p = pipeline();
        p.draw_triangle(0.0, 0.0, 20.0, 0.0, 10.0, 30.0, false);
        assert_eq!(
            p.commands(),
            &[DrawCommand::Triangle { points: [(0.0, 480.0), (20.0, 480.0), (10.0, 450.0)], fill: false }]
        );
    }

    #[test]
    fn test_raw_variants_not_flipped() {
        let mut p = pipeline();
        p.move_pen_raw(-4.0, -10.0);
        p.draw_pen_raw(8.0, 0.0);
        p.translate(100.0, 200.0);
        assert_eq!(
            p.commands(),
            &[
                DrawCommand::PenMove { x: -4.0, y: -10.0, new_path: false },
                DrawCommand::PenDraw { x: 8.0, y: 0.0, close: false },
                DrawCommand::Translate { x: 100.0, y: 200.0 },
            ]
        );
    }

    #[test]
    fn test_arc_converts_degrees() {
        let mut p = pipeline();
        p.draw_arc(0.0, 0.0, 10.0, 0.0, 180.0);
        let DrawCommand::Arc { angle2, y, .. } = p.commands()[0] else {
            panic!("expected an arc");
        };
        assert!((angle2 - PI).abs() < 1e-6, "180 degrees is pi radians");
        assert_eq!(y, 480.0, "centre flipped");
    }

    // -------------------------------------------------------------------------
    // Executor semantics
    // -------------------------------------------------------------------------

    #[test]
    fn test_fill_uses_background_then_foreground() {
        let mut p = pipeline();
        p.set_colour_background(RED);
        p.set_colour_foreground(YELLOW);
        p.draw_rectangle(0.0, 0.0, 10.0, 10.0, true);
        let mut s = RecordingSurface::new(640, 480);
        p.draw(&mut s);
        let fill_at = s.ops.iter().position(|op| *op == Op::Fill).unwrap();
        assert_eq!(s.ops[fill_at - 1], Op::Source(RED), "fill painted with background");
        assert_eq!(s.ops[fill_at + 1], Op::Source(YELLOW), "outline in foreground");
        assert_eq!(s.ops[fill_at + 2], Op::Stroke);
    }

    #[test]
    fn test_rounded_rectangle_is_four_arcs() {
        let mut p = pipeline();
        p.draw_rounded_rectangle(0.0, 0.0, 100.0, 50.0, 6.0, false);
        let mut s = RecordingSurface::new(640, 480);
        p.draw(&mut s);
        let arcs = s.ops.iter().filter(|op| matches!(op, Op::Arc { .. })).count();
        assert_eq!(arcs, 4, "one quarter arc per corner");
    }

    #[test]
    fn test_unbalanced_restore_skipped() {
        let mut p = pipeline();
        p.restore();
        p.pop_group();
        p.draw_line(0.0, 0.0, 1.0, 1.0);
        let mut s = RecordingSurface::new(640, 480);
        assert_eq!(p.draw(&mut s), 1, "only the line executes");
        assert_eq!(s.count(&Op::Restore), 0, "no restore reaches the surface");
    }

    #[test]
    fn test_unclosed_save_is_unwound() {
        let mut p = pipeline();
        p.save();
        p.translate(5.0, 5.0);
        let mut s = RecordingSurface::new(640, 480);
        p.draw(&mut s);
        assert_eq!(s.count(&Op::Save), s.count(&Op::Restore), "every save balanced");
    }

    #[test]
    fn test_thickness_sets_dash() {
        let mut p = pipeline();
        p.set_line_thickness(2.0, LineType::DashedMedium, LineCap::Round);
        let mut s = RecordingSurface::new(640, 480);
        p.draw(&mut s);
        assert_eq!(s.ops, vec![Op::LineWidth(2.0), Op::Cap(LineCap::Round), Op::Dash(Some(4.0))]);
    }

    // -------------------------------------------------------------------------
    // Images
    // -------------------------------------------------------------------------

    #[test]
    fn test_missing_image_leaves_background() {
        let mut p = pipeline();
        assert!(!p.texture_file(0.0, 0.0, "missing.png"), "load failure reported");
        assert!(
            !p.commands().iter().any(|c| matches!(c, DrawCommand::ImageTexture { .. })),
            "no texture command recorded"
        );
        assert!(
            p.commands().iter().any(|c| matches!(c, DrawCommand::Rectangle { fill: true, .. })),
            "background rectangle recorded"
        );
    }

    #[test]
    fn test_cached_image_painted() {
        let mut p = pipeline();
        p.image_cache().insert("logo", Image::filled(640, 480, RED));
        assert!(p.texture_file(0.0, 0.0, "logo"));
        let mut s = RecordingSurface::new(640, 480);
        p.draw(&mut s);
        assert!(s.ops.contains(&Op::Image { width: 640, height: 480, x: 0.0, y: 0.0 }));
        p.reset();
        assert!(p.image_cache().contains("logo"), "cache survives reset");
    }
}
