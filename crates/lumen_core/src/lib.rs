//! Lumen Core - renderer-agnostic scene description.
//!
//! This crate provides:
//!
//! - **Camera configuration**: `CameraConfig`, `Background`
//! - **Scene files**: JSON scene descriptions (`SceneDescription`) with validation
//! - **Images**: loading 8-bit RGB images for image textures
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::load_scene;
//!
//! let scene = load_scene("scenes/three_spheres.json")?;
//! println!("{} objects, {} materials", scene.objects.len(), scene.materials.len());
//! ```

pub mod camera;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use camera::{Background, CameraConfig};
pub use scene::{
    load_scene, MaterialDesc, ObjectDesc, SceneDescription, SceneError, SceneResult, TextureDesc,
    TextureRef,
};
pub use texture::{load_image, ImageCache, ImageData, TextureError, TextureResult};
