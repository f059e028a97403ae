//! Deferred rendering.
//!
//! Widgets never draw directly. They append [`DrawCommand`]s to the
//! [`RenderPipeline`], which replays them once per frame against a
//! [`Surface`]. The only concrete surface is [`EgSurface`], which renders onto
//! any `embedded-graphics` draw target.
//!
//! | Module | Role |
//! |--------|------|
//! | [`command`] | Command vocabulary and style enums |
//! | [`pipeline`] | Recording, coordinate flip and replay |
//! | [`surface`] | The 2D drawing capability the replay needs |
//! | [`backend`] | `embedded-graphics` implementation of [`Surface`] |
//! | [`image`] | Decoded images and the name-keyed cache |

pub mod backend;
pub mod command;
pub mod image;
pub mod pipeline;
pub mod surface;

pub use backend::EgSurface;
pub use command::{DrawCommand, FontSlant, FontWeight, LineCap, LineJoin, LineType, TextFont};
pub use image::{Image, ImageCache};
pub use pipeline::{RenderPipeline, radians};
pub use surface::Surface;
