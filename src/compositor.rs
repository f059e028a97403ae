//! Frame composition: widgets record, the pipeline replays.
//!
//! [`ScreenRenderer`] owns the per-frame command list and hotspot registry.
//! [`ScreenRenderer::compose`] clears both and lets every visible widget draw;
//! [`ScreenRenderer::present`] replays the recorded commands on a [`Surface`].

use tracing::{debug, trace};

use crate::{
    context::AppContext,
    keys::Key,
    render::{RenderPipeline, Surface},
    screen::ScreenConfiguration,
    touch::{FunctionGroup, TouchRegistry},
    widgets::{Frame, Widget, WidgetKind, WidgetSet},
};

/// Order in which pointer positions are resolved against hotspot groups.
///
/// The alarm indicator comes last; touching it acknowledges the alarm.
pub const PROBE_ORDER: [FunctionGroup; 5] = [
    FunctionGroup::Top,
    FunctionGroup::Bottom,
    FunctionGroup::Right,
    FunctionGroup::Left,
    FunctionGroup::AlarmsIndicator,
];

/// Result of one composition pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Composed {
    pub widgets: usize,
    pub commands: usize,
    pub hotspots: usize,
}

pub struct ScreenRenderer {
    pipeline: RenderPipeline,
    touch: TouchRegistry,
}

impl ScreenRenderer {
    pub fn new(ctx: &AppContext) -> Self {
        let images = ctx.paths.images.to_string_lossy();
        Self { pipeline: RenderPipeline::new(&images, ctx.theme.background), touch: TouchRegistry::new() }
    }

    pub const fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub const fn touch(&self) -> &TouchRegistry {
        &self.touch
    }

    /// Window resolution used to rescale pointer positions.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        debug!(width, height, "resolution changed");
        self.touch.set_resolution(width, height);
    }

    /// Record one frame.
    ///
    /// A blacked-out canvas covers everything, so only the canvas draws.
    pub fn compose(&mut self, screen: &ScreenConfiguration, widgets: &mut WidgetSet, ctx: &AppContext) -> Composed {
        self.pipeline.reset();
        self.touch.reset();
        let blackout = screen.canvas.is_blackout();

        let mut drawn = 0;
        let mut frame = Frame { pipeline: &mut self.pipeline, touch: &mut self.touch, screen, ctx };
        for (kind, widget) in widgets.iter_mut() {
            if !widget.visible() || (blackout && *kind != WidgetKind::Canvas) {
                continue;
            }
            trace!(?kind, "drawing widget");
            widget.draw(&mut frame);
            drawn += 1;
        }

        Composed { widgets: drawn, commands: self.pipeline.len(), hotspots: self.touch.len() }
    }

    /// Replay the recorded frame. Returns the number of commands executed.
    pub fn present(&mut self, surface: &mut dyn Surface) -> usize {
        self.pipeline.draw(surface)
    }

    /// Resolve a raw pointer position, probing groups in [`PROBE_ORDER`].
    pub fn hit(&self, raw_x: i32, raw_y: i32) -> Option<(FunctionGroup, Key)> {
        PROBE_ORDER
            .iter()
            .find_map(|group| self.touch.check_pointer(*group, raw_x, raw_y).map(|key| (*group, key)))
    }
}
