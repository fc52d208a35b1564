//! Camera configuration.
//!
//! `CameraConfig` holds the user-facing camera and image settings. The
//! renderer derives its viewport geometry from it once per render.

use lumen_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

use crate::scene::{SceneError, SceneResult};

/// What a ray sees when it leaves the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// A constant color
    Solid(Color),
    /// Vertical white-to-blue gradient based on ray direction
    Sky,
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::new(0.70, 0.80, 1.00))
    }
}

/// Camera and image settings.
///
/// Every field has a default, so scene files only need to list what they
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Ratio of image width over height
    pub aspect_ratio: f32,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Random samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,
    pub background: Background,

    /// Vertical field of view in degrees
    pub vfov: f32,
    pub look_from: Vec3,
    pub look_at: Vec3,
    /// Camera-relative up direction
    pub vup: Vec3,

    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f32,
    /// Distance from `look_from` to the plane of perfect focus
    pub focus_dist: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            background: Background::default(),
            vfov: 90.0,
            look_from: Vec3::new(0.0, 0.0, -1.0),
            look_at: Vec3::ZERO,
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
        }
    }
}

impl CameraConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set image width and aspect ratio.
    pub fn with_image(mut self, image_width: u32, aspect_ratio: f32) -> Self {
        self.image_width = image_width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    /// Image height in pixels, never less than one.
    ///
    /// A non-positive or non-finite aspect ratio is treated as 1.
    pub fn image_height(&self) -> u32 {
        let aspect_ratio = if self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0 {
            self.aspect_ratio
        } else {
            1.0
        };
        let height = (self.image_width as f32 / aspect_ratio) as u32;
        height.max(1)
    }

    /// Reject settings the camera cannot derive a viewport from.
    pub fn validate(&self) -> SceneResult<()> {
        if self.image_width == 0 {
            return Err(SceneError::InvalidValue("image_width must be at least 1".into()));
        }
        if !(self.aspect_ratio > 0.0) {
            return Err(SceneError::InvalidValue(format!(
                "aspect_ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(SceneError::InvalidValue(
                "samples_per_pixel must be at least 1".into(),
            ));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(SceneError::InvalidValue(format!(
                "vfov must be in (0, 180), got {}",
                self.vfov
            )));
        }
        if !(self.focus_dist > 0.0) {
            return Err(SceneError::InvalidValue(format!(
                "focus_dist must be positive, got {}",
                self.focus_dist
            )));
        }
        let view = self.look_from - self.look_at;
        if view.length_squared() == 0.0 {
            return Err(SceneError::InvalidValue(
                "look_from and look_at must differ".into(),
            ));
        }
        if !(self.vup.cross(view).length_squared() > 0.0) {
            return Err(SceneError::InvalidValue(format!(
                "vup {} is parallel to the view direction",
                self.vup
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_camera() {
        let config = CameraConfig::default();
        assert_eq!(config.image_width, 100);
        assert_eq!(config.image_height(), 100);
        assert_eq!(config.focus_dist, 10.0);
        assert_eq!(config.background, Background::Solid(Color::new(0.7, 0.8, 1.0)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_image_height() {
        let config = CameraConfig::new().with_image(400, 16.0 / 9.0);
        assert_eq!(config.image_height(), 225);

        // Very wide images still get one row
        let config = CameraConfig::new().with_image(10, 100.0);
        assert_eq!(config.image_height(), 1);

        // Degenerate aspect ratios fall back to square
        for aspect in [0.0, -2.0, f32::NAN, f32::INFINITY] {
            let config = CameraConfig::new().with_image(100, aspect);
            assert_eq!(config.image_height(), 100);
        }
    }

    #[test]
    fn test_validate_rejects_degenerate_settings() {
        assert!(CameraConfig::new().with_image(0, 1.0).validate().is_err());
        assert!(CameraConfig::new().with_quality(0, 10).validate().is_err());
        assert!(CameraConfig::new().with_lens(180.0, 0.0, 1.0).validate().is_err());
        assert!(CameraConfig::new()
            .with_position(Vec3::ONE, Vec3::ONE, Vec3::Y)
            .validate()
            .is_err());
        // Looking straight down with Y up leaves no horizontal axis
        assert!(CameraConfig::new()
            .with_position(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::Y)
            .validate()
            .is_err());
        assert!(CameraConfig::new()
            .with_position(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::Z)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CameraConfig =
            serde_json::from_str(r#"{ "image_width": 320, "background": "sky" }"#).unwrap();
        assert_eq!(config.image_width, 320);
        assert_eq!(config.background, Background::Sky);
        assert_eq!(config.vfov, 90.0);

        let config: CameraConfig =
            serde_json::from_str(r#"{ "background": { "solid": [0.0, 0.0, 0.0] } }"#).unwrap();
        assert_eq!(config.background, Background::Solid(Color::ZERO));
    }
}
