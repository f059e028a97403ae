//! Touch hotspot registry.
//!
//! Interactive widgets register a [`Hotspot`] for every region that should react
//! to a pointer while they draw. The registry is cleared at the start of each
//! frame, so hotspots always match what is currently on screen.
//!
//! # Coordinates
//!
//! Hotspots are stored in design-resolution coordinates (640x480) with the
//! origin at the bottom-left, the same convention widgets draw with. Raw
//! pointer positions arrive in window pixels with the origin at the top-left;
//! [`TouchRegistry::check_pointer`] rescales and flips them before the lookup.

use crate::config::{MINIMUM_HEIGHT, MINIMUM_WIDTH};
use crate::keys::Key;

/// Group a hotspot belongs to. Callers query one group at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionGroup {
    Top,
    Bottom,
    Left,
    Right,
    AlarmsIndicator,
}

/// One touch-sensitive rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hotspot {
    pub group: FunctionGroup,
    pub binding: Key,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Hotspot {
    /// Point strictly inside the rectangle. Edges do not count.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x > self.x && x < self.x + self.width && y > self.y && y < self.y + self.height
    }
}

/// Per-frame hotspot list plus the current window resolution.
#[derive(Clone, Debug)]
pub struct TouchRegistry {
    width: u32,
    height: u32,
    hotspots: Vec<Hotspot>,
}

impl TouchRegistry {
    pub fn new() -> Self {
        Self { width: MINIMUM_WIDTH, height: MINIMUM_HEIGHT, hotspots: Vec::with_capacity(64) }
    }

    /// Register a hotspot by origin and size.
    pub fn add(&mut self, group: FunctionGroup, binding: Key, x: i32, y: i32, width: i32, height: i32) {
        self.hotspots.push(Hotspot { group, binding, x, y, width, height });
    }

    /// Register a hotspot by two opposite corners.
    pub fn add_absolute(&mut self, group: FunctionGroup, binding: Key, x: i32, y: i32, xx: i32, yy: i32) {
        self.add(group, binding, x, y, xx - x, yy - y);
    }

    /// Window resolution used to rescale raw pointer positions.
    pub const fn set_resolution(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    #[inline]
    pub const fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Drop every hotspot. Called once per frame before widgets draw.
    pub fn reset(&mut self) {
        self.hotspots.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hotspots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hotspots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Hotspot> {
        self.hotspots.iter()
    }

    /// First hotspot in `group` containing the design-space point (`x`, `y`).
    pub fn check(&self, group: FunctionGroup, x: i32, y: i32) -> Option<Key> {
        self.hotspots.iter().find(|h| h.group == group && h.contains(x, y)).map(|h| h.binding)
    }

    /// Look up a raw top-left window position in `group`.
    pub fn check_pointer(&self, group: FunctionGroup, raw_x: i32, raw_y: i32) -> Option<Key> {
        let (x, y) = self.to_design(raw_x, raw_y);
        self.check(group, x, y)
    }

    /// Rescale a raw window position to design resolution and flip Y.
    pub fn to_design(&self, raw_x: i32, raw_y: i32) -> (i32, i32) {
        let sx = self.width.max(1) as f32 / MINIMUM_WIDTH as f32;
        let sy = self.height.max(1) as f32 / MINIMUM_HEIGHT as f32;
        let x = (raw_x as f32 / sx) as i32;
        let y = (raw_y as f32 / sy) as i32;
        (x, MINIMUM_HEIGHT as i32 - y)
    }
}

impl Default for TouchRegistry {
    fn default() -> Self {
        Self::new()
    }
}
