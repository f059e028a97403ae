//! Canvas and video layers.

use std::any::Any;

use super::{Frame, Placement, Widget, WidgetKind};
use crate::{
    colors::{BLACK, DARK_GREY, GREY, WHITE},
    config::{MINIMUM_HEIGHT, MINIMUM_WIDTH},
    render::FontWeight,
    screen::CanvasContent,
    styles::{FONT_SIZE_LABEL, FONT_SIZE_TITLE},
};

// =============================================================================
// Canvas
// =============================================================================

/// Full-screen background drawn from the screen's canvas descriptor.
#[derive(Debug)]
pub struct CanvasWidget {
    placement: Placement,
}

impl CanvasWidget {
    pub const fn new() -> Self {
        Self { placement: Placement::new(true, 0, 0) }
    }
}

impl Default for CanvasWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for CanvasWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Canvas
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let canvas = &frame.screen.canvas;
        if !canvas.visible {
            return;
        }
        match &canvas.content {
            CanvasContent::None => frame.pipeline.paint_background(),
            // A failed load is logged by the pipeline and leaves the background
            CanvasContent::File(name) => {
                frame.pipeline.texture_file(0.0, 0.0, name);
            }
            CanvasContent::Buffer(image) => {
                frame.pipeline.paint_background();
                frame.pipeline.texture_image(image.clone(), 0.0, 0.0);
            }
            CanvasContent::Map(view) => {
                frame.pipeline.paint_background();
                let (w, h) = (MINIMUM_WIDTH as i32, MINIMUM_HEIGHT as i32);
                frame.pipeline.set_colour_foreground(GREY);
                frame.line_width(1.0);
                for x in (0..w).step_by(80) {
                    frame.pipeline.draw_line(x as f32, 0.0, x as f32, h as f32);
                }
                for y in (0..h).step_by(80) {
                    frame.pipeline.draw_line(0.0, y as f32, w as f32, y as f32);
                }
                frame.font(FontWeight::Normal, FONT_SIZE_LABEL);
                frame.pipeline.draw_colour(WHITE);
                let caption = format!("Zoom {} Lat:{:.6} Lon:{:.6}", view.zoom, view.lat, view.lon);
                frame.text_centred(0, h / 2, w, &caption, FONT_SIZE_LABEL);
            }
            CanvasContent::Blackout => {
                frame.pipeline.set_colour(BLACK);
                frame.rect(0, 0, MINIMUM_WIDTH as i32, MINIMUM_HEIGHT as i32, true);
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// =============================================================================
// Video
// =============================================================================

/// Placeholder frame for an external video stream.
///
/// Decoding is handled outside the HMI; this only reserves and names the area.
#[derive(Debug)]
pub struct VideoWidget {
    placement: Placement,
    pub stream: String,
    pub width: i32,
    pub height: i32,
}

impl VideoWidget {
    pub fn new(stream: &str) -> Self {
        Self {
            placement: Placement::new(false, 0, 0),
            stream: stream.to_owned(),
            width: MINIMUM_WIDTH as i32,
            height: MINIMUM_HEIGHT as i32,
        }
    }
}

impl Widget for VideoWidget {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Video
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let (x, y) = (self.placement.x, self.placement.y);
        frame.pipeline.set_colour_foreground(GREY);
        frame.pipeline.set_colour_background(DARK_GREY);
        frame.line_width(1.0);
        frame.rect(x, y, self.width, self.height, true);
        frame.font(FontWeight::Bold, FONT_SIZE_TITLE);
        frame.pipeline.draw_colour(WHITE);
        let caption = format!("No signal: {}", self.stream);
        frame.text_centred(x, y + self.height / 2, self.width, &caption, FONT_SIZE_TITLE);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
