//! On-screen widgets.
//!
//! Every widget implements [`Widget`] and is owned by a [`WidgetSet`] keyed by
//! [`WidgetKind`]. Each frame the compositor hands visible widgets a [`Frame`]
//! holding the render pipeline, the hotspot registry and read-only views of the
//! screen configuration and application context.
//!
//! # Coordinates
//!
//! Widget positions are layout positions measured from the top-left corner of
//! the 640x480 design space. The [`Frame`] helpers convert them into the
//! pipeline's bottom-left convention and register hotspots in the same space,
//! so what is drawn and what is touchable always line up.
//!
//! # Draw Order
//!
//! Widgets are drawn in [`WidgetKind`] order: canvas first, overlays last.
//!
//! | Module | Widgets |
//! |--------|---------|
//! | [`canvas`] | Canvas, Video |
//! | [`labels`] | Top, bottom and side label banks |
//! | [`table`] | Table, alarms table, status bar, message box |
//! | [`compass`] | Plan position indicator |
//! | [`keyboard`] | On-screen keyboard |
//! | [`indicators`] | Alarm indicator, mode banner |
//! | [`dials`] | Driver speedometer and RPM/fuel dials |
//! | [`objects`] | Object localisation boxes |
//! | [`icons`] | Vector icons shared by the above |

use std::any::Any;
use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{
    config::{LabelStyle, MINIMUM_HEIGHT},
    context::AppContext,
    keys::Key,
    labels::LabelState,
    render::{FontSlant, FontWeight, LineCap, LineType, RenderPipeline},
    screen::ScreenConfiguration,
    styles::text_width,
    touch::{FunctionGroup, TouchRegistry},
};

pub mod canvas;
pub mod compass;
pub mod dials;
pub mod icons;
pub mod indicators;
pub mod keyboard;
pub mod labels;
pub mod objects;
pub mod table;

pub use canvas::{CanvasWidget, VideoWidget};
pub use compass::{CompassWidget, PpiMode, Threat};
pub use dials::{RpmFuelDial, SpeedUnit, SpeedometerDial};
pub use icons::Icon;
pub use indicators::{AlarmIndicator, AlarmType, ModeBanner};
pub use keyboard::{KeyboardMode, KeyboardWidget};
pub use labels::{BottomLabels, SideLabels, TopLabels};
pub use objects::{ObjectLocalisation, TrackedObject};
pub use table::{Align, AlarmsTable, Cell, MessageBox, Row, SortOrder, StatusBar, Table};

// =============================================================================
// Widget Trait
// =============================================================================

/// Widget identity, also the draw order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WidgetKind {
    Canvas,
    Video,
    ObjectLocalisation,
    Compass,
    DialSpeedometer,
    DialRpmFuel,
    Table,
    TableDynamic,
    TopLabels,
    BottomLabels,
    LeftLabels,
    RightLabels,
    StatusBar,
    AlarmIndicator,
    Mode,
    MessageBox,
    Keyboard,
}

/// Position and visibility shared by every widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Placement {
    pub visible: bool,
    pub x: i32,
    pub y: i32,
}

impl Placement {
    pub const fn new(visible: bool, x: i32, y: i32) -> Self {
        Self { visible, x, y }
    }
}

/// A drawable screen element.
pub trait Widget {
    fn kind(&self) -> WidgetKind;
    fn placement(&self) -> &Placement;
    fn placement_mut(&mut self) -> &mut Placement;

    /// Record this widget's commands and hotspots for one frame.
    fn draw(&mut self, frame: &mut Frame<'_>);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    #[inline]
    fn visible(&self) -> bool {
        self.placement().visible
    }

    #[inline]
    fn set_visible(&mut self, visible: bool) {
        self.placement_mut().visible = visible;
    }

    #[inline]
    fn x(&self) -> i32 {
        self.placement().x
    }

    #[inline]
    fn y(&self) -> i32 {
        self.placement().y
    }

    #[inline]
    fn set_x(&mut self, x: i32) {
        self.placement_mut().x = x;
    }

    #[inline]
    fn set_y(&mut self, y: i32) {
        self.placement_mut().y = y;
    }
}

// =============================================================================
// Widget Set
// =============================================================================

/// Owned widgets keyed by kind.
#[derive(Default)]
pub struct WidgetSet {
    widgets: BTreeMap<WidgetKind, Box<dyn Widget>>,
}

impl WidgetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every widget the HMI uses, in its power-on placement.
    pub fn standard(ctx: &AppContext) -> Self {
        let mut set = Self::new();
        set.insert(Box::new(CanvasWidget::new()));
        set.insert(Box::new(VideoWidget::new("rtp://239.192.1.1:5004")));
        set.insert(Box::new(ObjectLocalisation::new()));
        set.insert(Box::new(CompassWidget::new()));
        set.insert(Box::new(SpeedometerDial::new()));
        set.insert(Box::new(RpmFuelDial::new()));
        set.insert(Box::new(Table::new(WidgetKind::Table, ctx.theme.table_background)));
        set.insert(Box::new(AlarmsTable::new(ctx.theme.table_background)));
        set.insert(Box::new(TopLabels::new()));
        set.insert(Box::new(BottomLabels::new()));
        set.insert(Box::new(SideLabels::left()));
        set.insert(Box::new(SideLabels::right()));
        set.insert(Box::new(StatusBar::new()));
        set.insert(Box::new(AlarmIndicator::new()));
        set.insert(Box::new(ModeBanner::new()));
        set.insert(Box::new(MessageBox::new()));
        set.insert(Box::new(KeyboardWidget::new()));
        for (kind, widget) in &set.widgets {
            debug!(?kind, visible = widget.visible(), "widget created");
        }
        set
    }

    /// Add or replace the widget of its kind.
    pub fn insert(&mut self, widget: Box<dyn Widget>) {
        let kind = widget.kind();
        if self.widgets.insert(kind, widget).is_some() {
            warn!(?kind, "widget replaced");
        }
    }

    pub fn widget(&self, kind: WidgetKind) -> Option<&dyn Widget> {
        self.widgets.get(&kind).map(|w| &**w)
    }

    pub fn widget_mut(&mut self, kind: WidgetKind) -> Option<&mut (dyn Widget + 'static)> {
        self.widgets.get_mut(&kind).map(|w| &mut **w)
    }

    /// Concrete widget of `kind`, if present and of type `T`.
    pub fn get<T: Widget + 'static>(&self, kind: WidgetKind) -> Option<&T> {
        self.widgets.get(&kind)?.as_any().downcast_ref::<T>()
    }

    pub fn get_mut<T: Widget + 'static>(&mut self, kind: WidgetKind) -> Option<&mut T> {
        self.widgets.get_mut(&kind)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn set_visible(&mut self, kind: WidgetKind, visible: bool) {
        match self.widget_mut(kind) {
            Some(widget) => widget.set_visible(visible),
            None => warn!(?kind, "no such widget"),
        }
    }

    pub fn visible(&self, kind: WidgetKind) -> bool {
        self.widget(kind).is_some_and(|w| w.visible())
    }

    pub fn set_position(&mut self, kind: WidgetKind, x: i32, y: i32) {
        match self.widget_mut(kind) {
            Some(widget) => {
                widget.set_x(x);
                widget.set_y(y);
            }
            None => warn!(?kind, "no such widget"),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Widgets in draw order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&WidgetKind, &mut Box<dyn Widget>)> {
        self.widgets.iter_mut()
    }
}

// =============================================================================
// Frame
// =============================================================================

/// Everything a widget needs while drawing one frame.
pub struct Frame<'a> {
    pub pipeline: &'a mut RenderPipeline,
    pub touch: &'a mut TouchRegistry,
    pub screen: &'a ScreenConfiguration,
    pub ctx: &'a AppContext,
}

impl Frame<'_> {
    /// Bottom-left Y of a box whose top edge is `top` pixels down.
    #[inline]
    pub fn bottom_of(top: i32, height: i32) -> f32 {
        (MINIMUM_HEIGHT as i32 - top - height) as f32
    }

    /// Pipeline Y for a point `top` pixels down.
    #[inline]
    pub fn row(top: i32) -> f32 {
        (MINIMUM_HEIGHT as i32 - top) as f32
    }

    /// Rectangle with its top-left corner at (`x`, `top`).
    pub fn rect(&mut self, x: i32, top: i32, width: i32, height: i32, fill: bool) {
        self.pipeline.draw_rectangle(x as f32, Self::bottom_of(top, height), width as f32, height as f32, fill);
    }

    pub fn rounded_rect(&mut self, x: i32, top: i32, width: i32, height: i32, corner: f32, fill: bool) {
        let y = Self::bottom_of(top, height);
        self.pipeline.draw_rounded_rectangle(x as f32, y, width as f32, height as f32, corner, fill);
    }

    /// Label-shaped box honouring the theme's corner style.
    pub fn label_box(&mut self, x: i32, top: i32, width: i32, height: i32, corner: f32) {
        match self.ctx.theme.label_style {
            LabelStyle::Rounded => self.rounded_rect(x, top, width, height, corner, true),
            LabelStyle::Square => self.rect(x, top, width, height, true),
        }
    }

    /// Text with its baseline `top` pixels down.
    pub fn text(&mut self, x: i32, top: i32, text: &str) {
        self.pipeline.draw_text(x as f32, Self::row(top), text);
    }

    /// Text centred horizontally in `width` starting at `x`.
    pub fn text_centred(&mut self, x: i32, top: i32, width: i32, text: &str, size: f32) {
        let offset = ((width as f32 - text_width(text, size)) / 2.0).max(0.0);
        self.pipeline.draw_text(x as f32 + offset, Self::row(top), text);
    }

    pub fn font(&mut self, weight: FontWeight, size: f32) {
        self.pipeline.set_text_font(FontSlant::Normal, weight, &self.ctx.theme.font, size);
    }

    pub fn line_width(&mut self, width: f32) {
        self.pipeline.set_line_thickness(width, LineType::Solid, LineCap::Butt);
    }

    /// Set border and fill from the theme colours for `state`.
    pub fn label_colours(&mut self, state: LabelState) -> u32 {
        let colours = self.ctx.theme.label_colours(state);
        self.pipeline.set_colour_foreground(colours.border);
        self.pipeline.set_colour_background(colours.background);
        colours.text
    }

    /// Register a touch area with its top-left corner at (`x`, `top`).
    pub fn hotspot(&mut self, group: FunctionGroup, key: Key, x: i32, top: i32, width: i32, height: i32) {
        self.touch.add(group, key, x, Self::bottom_of(top, height) as i32, width, height);
    }
}
