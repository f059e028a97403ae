//! Raster images for the canvas and the render pipeline.
//!
//! PNG files are decoded once with the `image` crate, scaled to the design
//! resolution when they do not match it, and kept in a name-keyed cache for the
//! rest of the session. A failed load is not cached, so the next request tries
//! the file again.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbImage;
use image::imageops::{self, FilterType};
use tracing::debug;

use crate::colors::pack;
use crate::error::ImageError;

/// Decoded RGB image with packed `0xRRGGBB` pixels, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Image {
    /// Wrap a raw pixel buffer. `pixels.len()` must equal `width * height`.
    pub fn from_pixels(name: &str, width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 || pixels.len() != (width as usize) * (height as usize) {
            return Err(ImageError::Empty { name: name.to_string() });
        }
        Ok(Self { width, height, pixels })
    }

    /// Solid colour image.
    pub fn filled(width: u32, height: u32, rgb: u32) -> Self {
        Self { width, height, pixels: vec![rgb; (width as usize) * (height as usize)] }
    }

    fn from_rgb(img: &RgbImage) -> Self {
        let pixels = img.pixels().map(|p| pack(p[0], p[1], p[2])).collect();
        Self { width: img.width(), height: img.height(), pixels }
    }

    /// Decode a PNG and scale it to `target` if its size differs.
    pub fn load(path: &Path, target: (u32, u32)) -> Result<Self, ImageError> {
        if !path.exists() {
            return Err(ImageError::NotFound(path.to_path_buf()));
        }
        let decoded = image::open(path)
            .map_err(|source| ImageError::Decode { path: path.to_path_buf(), source })?
            .to_rgb8();
        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(ImageError::Empty { name: path.display().to_string() });
        }
        if (decoded.width(), decoded.height()) == target {
            return Ok(Self::from_rgb(&decoded));
        }
        debug!(
            path = %path.display(),
            from = ?(decoded.width(), decoded.height()),
            to = ?target,
            "scaling image to design resolution"
        );
        let scaled = imageops::resize(&decoded, target.0, target.1, FilterType::Triangle);
        Ok(Self::from_rgb(&scaled))
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (`x`, `y`), `None` outside the image.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y as usize) * (self.width as usize) + x as usize).copied()
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }
}

// =============================================================================
// Image Cache
// =============================================================================

/// Session-long image cache keyed by name.
#[derive(Debug, Default)]
pub struct ImageCache {
    directory: PathBuf,
    target: (u32, u32),
    images: HashMap<String, Arc<Image>>,
}

impl ImageCache {
    /// Cache resolving relative names against `directory`, scaling to `target`.
    pub fn new(directory: impl Into<PathBuf>, target: (u32, u32)) -> Self {
        Self { directory: directory.into(), target, images: HashMap::new() }
    }

    /// Path a name resolves to.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() { path.to_path_buf() } else { self.directory.join(path) }
    }

    /// Cached image, loading it on first use.
    pub fn get_or_load(&mut self, name: &str) -> Result<Arc<Image>, ImageError> {
        if let Some(image) = self.images.get(name) {
            return Ok(Arc::clone(image));
        }
        let image = Arc::new(Image::load(&self.resolve(name), self.target)?);
        self.images.insert(name.to_string(), Arc::clone(&image));
        Ok(image)
    }

    /// Insert an already decoded image under `name`.
    pub fn insert(&mut self, name: &str, image: Image) -> Arc<Image> {
        let image = Arc::new(image);
        self.images.insert(name.to_string(), Arc::clone(&image));
        image
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
