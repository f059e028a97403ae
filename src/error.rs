//! Error types for configuration loading and canvas images.
//!
//! The display loop never aborts on these: callers log the error at the point
//! where it happens and carry on with defaults or an empty canvas.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading the TOML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failure while loading an image for the canvas or the render pipeline.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(PathBuf),

    #[error("could not decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {name} has no pixels")]
    Empty { name: String },
}
