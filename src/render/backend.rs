//! [`Surface`] implementation over an embedded-graphics draw target.
//!
//! embedded-graphics draws integer primitives; it has no notion of paths,
//! transforms or dashes. `EgSurface` layers those on top:
//!
//! - An affine matrix (saved/restored with the rest of the graphics state)
//!   maps user coordinates to device pixels as points are added to the path.
//! - Arcs and cubic curves are flattened into polylines.
//! - Strokes are drawn segment by segment with `Line`, splitting segments into
//!   on/off runs for dashed lines.
//! - Fills use an even-odd scanline fill written as 1-pixel-high spans.
//! - Text uses `ProFont` faces picked by size. Glyphs are placed at the
//!   transformed baseline origin but are not rotated or scaled.
//!
//! Colours pass through a brightness factor before they reach the target.

use std::f32::consts::PI;

use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle, Rectangle},
    mono_font::MonoTextStyle,
    text::Text,
};

use super::command::{LineCap, LineJoin, TextFont};
use super::image::Image;
use super::surface::Surface;
use crate::colors::{WHITE, dim, to_rgb888};
use crate::styles::{BASELINE_LEFT, FONT_SIZE_LABEL, font_for_size};

/// Segments per cubic curve.
const CURVE_SEGMENTS: usize = 16;

// =============================================================================
// Affine Matrix
// =============================================================================

/// Affine transform: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    #[inline]
    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (self.a.mul_add(x, self.c * y) + self.e, self.b.mul_add(x, self.d * y) + self.f)
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += self.a.mul_add(tx, self.c * ty);
        self.f += self.b.mul_add(tx, self.d * ty);
    }

    fn rotate(&mut self, radians: f32) {
        let (s, c) = radians.sin_cos();
        let Self { a, b, c: m_c, d, .. } = *self;
        self.a = a.mul_add(c, m_c * s);
        self.b = b.mul_add(c, d * s);
        self.c = m_c.mul_add(c, -a * s);
        self.d = d.mul_add(c, -b * s);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.a *= sx;
        self.b *= sx;
        self.c *= sy;
        self.d *= sy;
    }

    /// Average linear scale, used for line widths and dash lengths.
    fn scale_factor(&self) -> f32 {
        self.a.mul_add(self.d, -(self.b * self.c)).abs().sqrt()
    }

    /// Scale along each device axis.
    fn axis_scale(&self) -> (f32, f32) {
        (self.a.hypot(self.b), self.c.hypot(self.d))
    }
}

// =============================================================================
// Graphics State
// =============================================================================

#[derive(Clone, Copy, Debug)]
struct GraphicsState {
    matrix: Matrix,
    source: u32,
    line_width: f32,
    dash: Option<f32>,
    cap: LineCap,
    font_size: f32,
}

impl GraphicsState {
    const fn new() -> Self {
        Self {
            matrix: Matrix::IDENTITY,
            source: WHITE,
            line_width: 1.0,
            dash: None,
            cap: LineCap::Butt,
            font_size: FONT_SIZE_LABEL,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct SubPath {
    points: Vec<(f32, f32)>,
    closed: bool,
}

// =============================================================================
// Surface
// =============================================================================

/// Path-drawing surface over any `Rgb888` draw target.
pub struct EgSurface<'a, D> {
    target: &'a mut D,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    path: Vec<SubPath>,
    /// Current point in device space.
    current: Option<(f32, f32)>,
    brightness: f32,
}

impl<'a, D> EgSurface<'a, D>
where
    D: DrawTarget<Color = Rgb888>,
{
    pub fn new(target: &'a mut D) -> Self {
        Self {
            target,
            state: GraphicsState::new(),
            stack: Vec::new(),
            path: Vec::new(),
            current: None,
            brightness: 1.0,
        }
    }

    /// Brightness factor applied to every colour (0.0..=1.0).
    #[must_use]
    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness.clamp(0.0, 1.0);
        self
    }

    fn colour(&self) -> Rgb888 {
        to_rgb888(dim(self.state.source, self.brightness))
    }

    fn device(&self, x: f32, y: f32) -> (f32, f32) {
        self.state.matrix.apply(x, y)
    }

    fn begin_subpath(&mut self, p: (f32, f32)) {
        self.path.push(SubPath { points: vec![p], closed: false });
        self.current = Some(p);
    }

    fn push_point(&mut self, p: (f32, f32)) {
        let reopen = self.path.last().is_none_or(|s| s.closed);
        if reopen {
            let start = self.current.unwrap_or(p);
            self.begin_subpath(start);
        }
        if let Some(sub) = self.path.last_mut() {
            sub.points.push(p);
        }
        self.current = Some(p);
    }

    fn draw_segment(&mut self, from: (f32, f32), to: (f32, f32), style: PrimitiveStyle<Rgb888>) {
        Line::new(to_point(from), to_point(to)).into_styled(style).draw(self.target).ok();
    }

    /// Stroke one polyline, splitting it into dashes when a dash is set.
    fn stroke_polyline(&mut self, points: &[(f32, f32)], style: PrimitiveStyle<Rgb888>, dash: Option<f32>) {
        let Some(dash) = dash.filter(|d| *d > 0.0) else {
            for pair in points.windows(2) {
                self.draw_segment(pair[0], pair[1], style);
            }
            return;
        };

        let mut on = true;
        let mut left = dash;
        for pair in points.windows(2) {
            let (mut from, to) = (pair[0], pair[1]);
            let mut remaining = distance(from, to);
            while remaining > 0.0 {
                let step = remaining.min(left);
                let t = step / remaining;
                let next = (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
                if on {
                    self.draw_segment(from, next, style);
                }
                from = next;
                remaining -= step;
                left -= step;
                if left <= 0.0 {
                    on = !on;
                    left = dash;
                }
            }
        }
    }

    /// Even-odd fill of every sub-path, each implicitly closed.
    fn fill_path(&mut self) {
        let mut edges: Vec<((f32, f32), (f32, f32))> = Vec::new();
        for sub in &self.path {
            let n = sub.points.len();
            if n < 3 {
                continue;
            }
            for i in 0..n {
                edges.push((sub.points[i], sub.points[(i + 1) % n]));
            }
        }
        if edges.is_empty() {
            return;
        }

        let bounds = self.target.bounding_box();
        let top = bounds.top_left.y;
        let bottom = top + bounds.size.height as i32;
        let (min_y, max_y) = edges.iter().fold((f32::MAX, f32::MIN), |(lo, hi), (p, q)| {
            (lo.min(p.1).min(q.1), hi.max(p.1).max(q.1))
        });
        let y_start = (min_y.floor() as i32).max(top);
        let y_end = (max_y.ceil() as i32).min(bottom);

        let colour = self.colour();
        let mut crossings: Vec<f32> = Vec::with_capacity(8);
        for y in y_start..y_end {
            let yc = y as f32 + 0.5;
            crossings.clear();
            for (p, q) in &edges {
                let (lo, hi) = if p.1 <= q.1 { (p, q) } else { (q, p) };
                if yc >= lo.1 && yc < hi.1 {
                    let t = (yc - lo.1) / (hi.1 - lo.1);
                    crossings.push((hi.0 - lo.0).mul_add(t, lo.0));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for span in crossings.chunks_exact(2) {
                let x0 = (span[0] - 0.5).ceil() as i32;
                let x1 = (span[1] - 0.5).floor() as i32;
                if x1 >= x0 {
                    let area = Rectangle::new(Point::new(x0, y), Size::new((x1 - x0 + 1) as u32, 1));
                    self.target.fill_solid(&area, colour).ok();
                }
            }
        }
    }
}

impl<D> Surface for EgSurface<'_, D>
where
    D: DrawTarget<Color = Rgb888>,
{
    fn size(&self) -> (u32, u32) {
        let size = self.target.bounding_box().size;
        (size.width, size.height)
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.matrix.translate(x, y);
    }

    fn rotate(&mut self, radians: f32) {
        self.state.matrix.rotate(radians);
    }

    fn scale(&mut self, x: f32, y: f32) {
        self.state.matrix.scale(x, y);
    }

    fn set_source(&mut self, rgb: u32) {
        self.state.source = rgb;
    }

    fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width.max(0.0);
    }

    fn set_dash(&mut self, dash: Option<f32>) {
        self.state.dash = dash;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.cap = cap;
    }

    // Segments are drawn independently, so there is no join to configure.
    fn set_line_join(&mut self, _join: LineJoin) {}

    fn new_path(&mut self) {
        self.path.clear();
        self.current = None;
    }

    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.device(x, y);
        self.begin_subpath(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.device(x, y);
        if self.current.is_none() {
            self.begin_subpath(p);
        } else {
            self.push_point(p);
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        let (c1, c2, end) = (self.device(x1, y1), self.device(x2, y2), self.device(x3, y3));
        let start = self.current.unwrap_or(c1);
        if self.current.is_none() {
            self.begin_subpath(start);
        }
        for i in 1..=CURVE_SEGMENTS {
            let t = i as f32 / CURVE_SEGMENTS as f32;
            self.push_point(cubic(start, c1, c2, end, t));
        }
    }

    fn arc(&mut self, xc: f32, yc: f32, radius: f32, angle1: f32, mut angle2: f32) {
        while angle2 < angle1 {
            angle2 += 2.0 * PI;
        }
        let sweep = angle2 - angle1;
        let pixels = radius * sweep * self.state.matrix.scale_factor();
        let segments = ((pixels / 3.0).ceil() as usize).clamp(4, 256);

        for i in 0..=segments {
            let t = (sweep * i as f32).mul_add(1.0 / segments as f32, angle1);
            let p = self.device(radius.mul_add(t.cos(), xc), radius.mul_add(t.sin(), yc));
            if i == 0 && self.current.is_none() {
                self.begin_subpath(p);
            } else {
                self.push_point(p);
            }
        }
    }

    fn close_path(&mut self) {
        if let Some(sub) = self.path.last_mut()
            && !sub.closed
        {
            sub.closed = true;
            self.current = sub.points.first().copied();
        }
    }

    fn fill_preserve(&mut self) {
        self.fill_path();
    }

    fn stroke(&mut self) {
        let scale = self.state.matrix.scale_factor();
        let width = (self.state.line_width * scale).round().max(1.0) as u32;
        let style = PrimitiveStyle::with_stroke(self.colour(), width);
        let dash = self.state.dash.map(|d| d * scale);

        let path = std::mem::take(&mut self.path);
        for sub in &path {
            let mut points = sub.points.clone();
            if sub.closed && let Some(first) = sub.points.first() {
                points.push(*first);
            }
            self.stroke_polyline(&points, style, dash);
            if self.state.cap == LineCap::Round && width > 2 && !sub.closed {
                let dot = PrimitiveStyle::with_fill(self.colour());
                for end in [points.first(), points.last()].into_iter().flatten() {
                    Circle::with_center(to_point(*end), width).into_styled(dot).draw(self.target).ok();
                }
            }
        }
        self.current = None;
    }

    fn select_font(&mut self, font: &TextFont) {
        self.state.font_size = font.size;
    }

    fn show_text(&mut self, text: &str) {
        let Some(origin) = self.current else {
            return;
        };
        let style = MonoTextStyle::new(font_for_size(self.state.font_size), self.colour());
        let next = Text::with_text_style(text, to_point(origin), style, BASELINE_LEFT).draw(self.target);
        if let Ok(next) = next {
            self.current = Some((next.x as f32, next.y as f32));
        }
    }

    fn paint_image(&mut self, image: &Image, x: f32, y: f32) {
        let (ox, oy) = self.device(x, y);
        let (sx, sy) = self.state.matrix.axis_scale();
        if sx <= 0.0 || sy <= 0.0 {
            return;
        }
        let dest_w = (image.width() as f32 * sx).round() as i32;
        let dest_h = (image.height() as f32 * sy).round() as i32;
        let bounds = self.target.bounding_box();
        let brightness = self.brightness;

        let pixels = (0..dest_h).flat_map(|dy| (0..dest_w).map(move |dx| (dx, dy))).filter_map(|(dx, dy)| {
            let point = Point::new(ox as i32 + dx, oy as i32 + dy);
            if !bounds.contains(point) {
                return None;
            }
            let src_x = (dx as f32 / sx) as u32;
            let src_y = (dy as f32 / sy) as u32;
            image.pixel(src_x, src_y).map(|rgb| Pixel(point, to_rgb888(dim(rgb, brightness))))
        });
        self.target.draw_iter(pixels).ok();
    }
}

// =============================================================================
// Helpers
// =============================================================================

#[inline]
fn to_point(p: (f32, f32)) -> Point {
    Point::new(p.0.round() as i32, p.1.round() as i32)
}

#[inline]
fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

/// Point on a cubic Bezier at `t`.
fn cubic(p0: (f32, f32), p1: (f32, f32), p2: (f32, f32), p3: (f32, f32), t: f32) -> (f32, f32) {
    let u = 1.0 - t;
    let (b0, b1, b2, b3) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    (
        b0 * p0.0 + b1 * p1.0 + b2 * p2.0 + b3 * p3.0,
        b0 * p0.1 + b1 * p1.1 + b2 * p2.1 + b3 * p3.1,
    )
}
