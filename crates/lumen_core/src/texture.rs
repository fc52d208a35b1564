//! Image loading and caching for image textures.
//!
//! Images are decoded once, converted from sRGB to linear and stored as
//! 8-bit RGB so the renderer can sample them without further conversion.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during image loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Linear 8-bit RGB pixel data.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// Row-major, top row first, three bytes per pixel
    pub bytes: Vec<u8>,
}

impl ImageData {
    /// Wrap raw RGB bytes. Returns `None` if the buffer does not match the
    /// dimensions.
    pub fn from_rgb8(width: u32, height: u32, bytes: Vec<u8>) -> Option<Self> {
        if bytes.len() != (width as usize) * (height as usize) * 3 {
            return None;
        }
        Some(Self {
            width,
            height,
            bytes,
        })
    }

    /// Pixel at integer coordinates, clamped to the image.
    ///
    /// An image with no pixels, or a buffer too short for its dimensions,
    /// yields magenta.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        const MISSING: [u8; 3] = [255, 0, 255];

        if self.width == 0 || self.height == 0 {
            return MISSING;
        }
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = (y * self.width as usize + x) * 3;
        match self.bytes.get(idx..idx + 3) {
            Some(&[r, g, b]) => [r, g, b],
            _ => MISSING,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Cache for loaded images, keyed by resolved path.
///
/// Scenes often reference one image from several textures.
pub struct ImageCache {
    images: HashMap<PathBuf, Arc<ImageData>>,
    base_dir: Option<PathBuf>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            base_dir: None,
        }
    }

    /// Create a cache that resolves relative paths against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            images: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load an image, using the cache if available.
    pub fn load(&mut self, path: impl AsRef<Path>) -> TextureResult<Arc<ImageData>> {
        let full_path = self.resolve_path(path.as_ref());

        if let Some(image) = self.images.get(&full_path) {
            return Ok(image.clone());
        }

        let image = Arc::new(load_image(&full_path)?);
        self.images.insert(full_path.clone(), image.clone());

        log::debug!(
            "Loaded image: {} ({}x{})",
            full_path.display(),
            image.width,
            image.height
        );

        Ok(image)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Load an image file and convert it to linear 8-bit RGB.
pub fn load_image(path: &Path) -> TextureResult<ImageData> {
    let img = image::open(path).map_err(|e| {
        TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let bytes = rgb.into_raw().into_iter().map(srgb_to_linear_byte).collect();

    Ok(ImageData {
        width,
        height,
        bytes,
    })
}

/// Convert an sRGB byte value to a linear byte value.
fn srgb_to_linear_byte(value: u8) -> u8 {
    let v = value as f32 / 255.0;
    let linear = if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    };
    (linear * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_lookup_clamps() {
        let bytes = vec![
            10, 20, 30, 40, 50, 60, //
            70, 80, 90, 100, 110, 120,
        ];
        let image = ImageData::from_rgb8(2, 2, bytes).unwrap();

        assert_eq!(image.pixel(0, 0), [10, 20, 30]);
        assert_eq!(image.pixel(1, 1), [100, 110, 120]);
        assert_eq!(image.pixel(5, 0), [40, 50, 60]);
        assert_eq!(image.pixel(0, 9), [70, 80, 90]);
    }

    #[test]
    fn test_from_rgb8_rejects_bad_length() {
        assert!(ImageData::from_rgb8(2, 2, vec![0; 11]).is_none());
    }

    #[test]
    fn test_srgb_to_linear() {
        assert_eq!(srgb_to_linear_byte(0), 0);
        assert_eq!(srgb_to_linear_byte(255), 255);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear_byte(128);
        assert!(mid < 128);
        assert!(mid > 25);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut cache = ImageCache::with_base_dir("/nonexistent-lumen-dir");
        assert!(cache.load("missing.png").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_reuses_loaded_image() {
        let dir = std::env::temp_dir().join(format!("lumen-core-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tiny.png");
        image::RgbImage::from_pixel(3, 2, image::Rgb([255, 0, 0]))
            .save(&path)
            .unwrap();

        let mut cache = ImageCache::with_base_dir(&dir);
        let a = cache.load("tiny.png").unwrap();
        let b = cache.load(&path).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
        assert_eq!((a.width, a.height), (3, 2));
        assert_eq!(a.pixel(2, 1), [255, 0, 0]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_short_buffer_pixel_is_magenta() {
        let image = ImageData {
            width: 2,
            height: 2,
            bytes: vec![10, 20, 30],
        };
        assert_eq!(image.pixel(0, 0), [10, 20, 30]);
        assert_eq!(image.pixel(1, 1), [255, 0, 255]);
    }
}
