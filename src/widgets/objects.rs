//! Object localisation overlay: labelled bounding boxes from a detector.

use std::any::Any;
use std::collections::BTreeMap;

use super::{Frame, Placement, Widget, WidgetKind};
use crate::{
    colors::BLACK,
    render::{FontWeight, LineCap, LineType},
    styles::text_width,
};

const LABEL_FONT_SIZE: f32 = 8.0;

/// One detected object, positioned in layout coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedObject {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub colour: u32,
    pub label: String,
    /// Dashed outline, used for low-confidence detections.
    pub dotted: bool,
}

impl TrackedObject {
    pub fn new(x: i32, y: i32, width: i32, height: i32, colour: u32, label: &str) -> Self {
        Self { x, y, width, height, colour, label: label.to_owned(), dotted: false }
    }

    fn caption(&self) -> &str {
        if self.label.is_empty() { "Unknown" } else { &self.label }
    }
}

#[derive(Debug)]
pub struct ObjectLocalisation {
    placement: Placement,
    objects: BTreeMap<i16, TrackedObject>,
}

impl ObjectLocalisation {
    pub const fn new() -> Self {
        Self { placement: Placement::new(false, 0, 0), objects: BTreeMap::new() }
    }

    /// Add or replace the object with `id`.
    pub fn add(&mut self, id: i16, object: TrackedObject) {
        self.objects.insert(id, object);
    }

    pub fn delete(&mut self, id: i16) -> Option<TrackedObject> {
        self.objects.remove(&id)
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for ObjectLocalisation {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for ObjectLocalisation {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ObjectLocalisation
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        for object in self.objects.values() {
            let line = if object.dotted { LineType::DashedMedium } else { LineType::Solid };
            frame.pipeline.set_colour(object.colour);
            frame.pipeline.set_line_thickness(1.0, line, LineCap::Butt);
            frame.rounded_rect(object.x, object.y, object.width, object.height, 10.0, false);

            // Label tab straddling the top edge
            let caption = object.caption();
            frame.line_width(2.0);
            frame.font(FontWeight::Normal, LABEL_FONT_SIZE);
            let width = text_width(caption, LABEL_FONT_SIZE) as i32 + 6;
            frame.rounded_rect(object.x + 10, object.y - 5, width, 8, 5.0, true);
            frame.pipeline.draw_colour(BLACK);
            frame.text(object.x + 13, object.y + 2, caption);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Rig;
    use super::*;
    use crate::{colors::RED, render::DrawCommand};

    #[test]
    fn test_boxes_keyed_by_id() {
        let mut objects = ObjectLocalisation::new();
        objects.add(3, TrackedObject::new(10, 10, 50, 50, RED, "Tank"));
        objects.add(3, TrackedObject::new(20, 20, 50, 50, RED, "Truck"));
        objects.add(1, TrackedObject::new(100, 100, 40, 40, RED, ""));
        assert_eq!(objects.len(), 2, "same id replaces");
        assert_eq!(objects.delete(3).map(|o| o.label), Some("Truck".to_owned()));
        assert_eq!(objects.delete(3), None);
        objects.clear();
        assert!(objects.is_empty());
    }

    #[test]
    fn test_unlabelled_object_reads_unknown() {
        let mut rig = Rig::new();
        let mut objects = ObjectLocalisation::new();
        objects.add(0, TrackedObject::new(100, 100, 40, 40, RED, ""));
        rig.draw(&mut objects);
        assert!(rig.pipeline.commands().iter().any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "Unknown")));
    }

    #[test]
    fn test_dotted_outline_is_dashed() {
        let mut rig = Rig::new();
        let mut objects = ObjectLocalisation::new();
        let mut object = TrackedObject::new(100, 100, 40, 40, RED, "Person");
        object.dotted = true;
        objects.add(0, object);
        rig.draw(&mut objects);
        let first_pen = rig.pipeline.commands().iter().find_map(|c| match c {
            DrawCommand::PenThickness { line, .. } => Some(*line),
            _ => None,
        });
        assert_eq!(first_pen, Some(LineType::DashedMedium));
        // Outline is not filled; the label tab is
        let fills: Vec<bool> = rig
            .pipeline
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::RoundedRectangle { fill, .. } => Some(*fill),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![false, true]);
    }
}
