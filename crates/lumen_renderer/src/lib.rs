//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based rendering of spheres and
//! quads with diffuse, metal, glass and emissive materials.
//!
//! # Example
//!
//! ```ignore
//! use lumen_renderer::{Camera, CameraConfig, HittableList, Material, Sphere, Vec3, Color};
//!
//! let mut world = HittableList::new();
//! world.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Material::lambertian(Color::splat(0.5))));
//!
//! let camera = Camera::new(&CameraConfig::default());
//! let image = lumen_renderer::render_parallel(&camera, &world, 42);
//! lumen_renderer::save_image(&image, "image.ppm")?;
//! ```

mod camera;
mod hittable;
mod material;
mod output;
mod perlin;
mod primitive;
mod quad;
mod renderer;
mod sampling;
mod sphere;
mod texture;
mod world;

pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    reflect, refract, Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult,
};
pub use output::{save_image, to_rgb_image, write_ppm};
pub use perlin::Perlin;
pub use primitive::Primitive;
pub use quad::{make_box, Quad};
pub use renderer::{
    background_color, clamp_01, color_to_rgb, linear_to_gamma, ray_color, render,
    render_parallel, render_pixel, ImageBuffer,
};
pub use sampling::{gen_f32, pixel_rng};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, Texture, MISSING_IMAGE_COLOR};
pub use world::build_world;

/// Re-export scene settings from lumen_core
pub use lumen_core::{Background, CameraConfig};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Color, Interval, Ray, Vec3};
