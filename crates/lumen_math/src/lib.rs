//! Math types shared by the Lumen crates.
//!
//! Vectors come straight from glam; this crate adds the ray, interval and
//! bounding-box types the renderer is built on.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Color type alias (linear RGB, typically 0-1 per channel)
pub type Color = Vec3;
