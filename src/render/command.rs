//! Recorded drawing commands.
//!
//! A [`DrawCommand`] is one entry on the per-frame command "tape". Coordinates
//! stored here are already in surface space (top-left origin, design
//! resolution); the Y conversion happens when the pipeline records them.

/// Stroke dash pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineType {
    #[default]
    Solid,
    Dotted,
    Dashed,
    DashedMedium,
    DashedLarge,
}

impl LineType {
    /// On/off dash length in pixels, `None` for a continuous line.
    pub const fn dash(self) -> Option<f32> {
        match self {
            Self::Solid | Self::Dotted => None,
            Self::Dashed => Some(1.0),
            Self::DashedMedium => Some(4.0),
            Self::DashedLarge => Some(8.0),
        }
    }
}

/// Line end style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Line join style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Font slant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Font weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Text font selection.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TextFont {
    pub name: String,
    pub slant: FontSlant,
    pub weight: FontWeight,
    /// Nominal size in pixels.
    pub size: f32,
}

/// One recorded rendering primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Circle { x: f32, y: f32, radius: f32, fill: bool },
    /// Angles in radians.
    Arc { x: f32, y: f32, radius: f32, angle1: f32, angle2: f32 },
    ColourBackground(u32),
    ColourForeground(u32),
    /// Set the pen source colour directly.
    PenColour(u32),
    /// Blit image `index` of the frame image list.
    ImageTexture { index: usize, x: f32, y: f32 },
    LineJoin(LineJoin),
    PenThickness { width: f32, line: LineType, cap: LineCap },
    PenCurve { x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32 },
    PenLine { x1: f32, y1: f32, x2: f32, y2: f32 },
    /// Line to the point; when `close` is set the path is closed and stroked.
    PenDraw { x: f32, y: f32, close: bool },
    /// Move to the point; `new_path` discards the current path first.
    PenMove { x: f32, y: f32, new_path: bool },
    /// `x`, `y` is the top-left corner.
    Rectangle { x: f32, y: f32, width: f32, height: f32, fill: bool },
    RoundedRectangle { x: f32, y: f32, width: f32, height: f32, corner: f32, fill: bool },
    Triangle { points: [(f32, f32); 3], fill: bool },
    Save,
    Restore,
    Scale { x: f32, y: f32 },
    Translate { x: f32, y: f32 },
    Rotate(f32),
    ClosePath { fill: bool },
    TextFont(TextFont),
    Push,
    Pop,
    Text { x: f32, y: f32, text: String },
}
