//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Gamma correction
//! - Anti-aliasing via multi-sampling
//! - Per-pixel random streams, so parallel and sequential renders agree

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use crate::sampling::pixel_rng;
use crate::{Camera, Color, Hittable, Ray};
use lumen_core::Background;
use lumen_math::Interval;
use rand::RngCore;
use rayon::prelude::*;

/// Rays start this far along their direction to avoid self-intersection.
const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY)) else {
        return background_color(background, ray);
    };

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = ray_color(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        // Absorbed, or a light
        None => emission,
    }
}

/// Color for a ray that left the scene.
pub fn background_color(background: &Background, ray: &Ray) -> Color {
    match background {
        Background::Solid(color) => *color,
        Background::Sky => sky_gradient(ray),
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let r = (255.0 * clamp_01(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * clamp_01(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * clamp_01(linear_to_gamma(color.z))) as u8;
    [r, g, b]
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth, &camera.background, rng);
    }

    pixel_color * camera.samples_scale()
}

/// Linear-color image, stored row-major from the top row down.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width as usize) * (height as usize)],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Convert to gamma-corrected RGB bytes (for saving).
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color));
        }
        bytes
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[inline]
fn pixel_index(camera: &Camera, x: u32, y: u32) -> u64 {
    y as u64 * camera.image_width as u64 + x as u64
}

/// Render the entire scene to an image buffer, one pixel at a time.
///
/// The same `seed` always produces the same image.
pub fn render(camera: &Camera, world: &dyn Hittable, seed: u64) -> ImageBuffer {
    log::info!(
        "Rendering {}x{} @ {} spp, depth {}",
        camera.image_width,
        camera.image_height,
        camera.samples_per_pixel,
        camera.max_depth
    );
    let start = Instant::now();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    for y in 0..camera.image_height {
        log::debug!("Scanlines remaining: {}", camera.image_height - y);
        for x in 0..camera.image_width {
            let mut rng = pixel_rng(seed, pixel_index(camera, x, y));
            let color = render_pixel(camera, world, x, y, &mut rng);
            image.set(x, y, color);
        }
    }

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}

/// Render the scene across the rayon thread pool, one task per scanline.
///
/// Produces exactly the image [`render`] produces for the same seed.
pub fn render_parallel(camera: &Camera, world: &dyn Hittable, seed: u64) -> ImageBuffer {
    log::info!(
        "Rendering {}x{} @ {} spp, depth {} on {} threads",
        camera.image_width,
        camera.image_height,
        camera.samples_per_pixel,
        camera.max_depth,
        rayon::current_num_threads()
    );
    let start = Instant::now();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    let width = camera.image_width as usize;
    let finished = AtomicU32::new(0);

    image
        .pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            for (x, pixel) in row.iter_mut().enumerate() {
                let x = x as u32;
                let mut rng = pixel_rng(seed, pixel_index(camera, x, y));
                *pixel = render_pixel(camera, world, x, y, &mut rng);
            }

            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Scanlines remaining: {}", camera.image_height - done);
        });

    log::info!("Render finished in {:.2?}", start.elapsed());
    image
}
