//! GVA operator console core.
//!
//! Everything except the simulator window lives here so it can be tested on the
//! host. The binary (`main.rs`) only translates window input and owns the timer.
//!
//! # Layers
//!
//! | Layer | Modules |
//! |-------|---------|
//! | State machine | [`hmi`] |
//! | Screen model | [`screen`], [`labels`], [`view`], [`defaults`] |
//! | Widgets and hit testing | [`widgets`], [`touch`] |
//! | Deferred rendering | [`render`], [`compositor`] |
//! | Input and timing | [`events`], [`keys`], [`app`], [`status`], [`profiling`] |
//! | Configuration | [`config`], [`context`], [`colors`], [`styles`], [`error`] |

// Crate-level lints
#![allow(clippy::cast_possible_truncation)] // f32->i32 pixel math
#![allow(clippy::cast_precision_loss)] // i32/u32->f32 in graphics calculations
#![allow(clippy::cast_possible_wrap)] // u32->i32 for design-resolution sizes
#![allow(clippy::cast_sign_loss)] // f32->u32 where the value is known positive
#![allow(clippy::module_name_repetitions)] // WidgetKind, WidgetSet read better in call sites

// === Model ===

pub mod colors;
pub mod config;
pub mod context;
pub mod defaults;
pub mod error;
pub mod keys;
pub mod labels;
pub mod screen;
pub mod view;

// === Rendering ===

pub mod compositor;
pub mod render;
pub mod styles;
pub mod touch;
pub mod widgets;

// === Control ===

pub mod app;
pub mod events;
pub mod hmi;
pub mod profiling;
pub mod status;
