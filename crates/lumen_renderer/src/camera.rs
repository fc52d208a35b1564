//! Camera for ray generation.

use crate::sampling::{gen_f32, random_in_unit_disk, sample_square};
use crate::Ray;
use lumen_core::{Background, CameraConfig};
use lumen_math::Vec3;
use rand::RngCore;

/// Camera for generating rays into the scene.
///
/// Built once from a [`CameraConfig`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub background: Background,

    defocus_angle: f32,

    // Derived viewport geometry
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        let image_width = config.image_width.max(1);
        let image_height = config.image_height();
        let samples_per_pixel = config.samples_per_pixel.max(1);
        let center = config.look_from;

        // Calculate viewport dimensions
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * config.focus_dist;
        let viewport_width = viewport_height * (image_width as f32 / image_height as f32);

        // Calculate camera basis vectors
        let w = (config.look_from - config.look_at).normalize();
        let u = config.vup.cross(w).normalize();
        let v = w.cross(u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        let pixel_delta_u = viewport_u / image_width as f32;
        let pixel_delta_v = viewport_v / image_height as f32;

        let viewport_upper_left =
            center - config.focus_dist * w - viewport_u / 2.0 - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        let defocus_radius = config.focus_dist * (config.defocus_angle / 2.0).to_radians().tan();

        Self {
            image_width,
            image_height,
            samples_per_pixel,
            max_depth: config.max_depth,
            background: config.background,
            defocus_angle: config.defocus_angle,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            u,
            v,
            w,
            defocus_disk_u: u * defocus_radius,
            defocus_disk_v: v * defocus_radius,
            samples_scale: 1.0 / samples_per_pixel as f32,
        }
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f32 {
        self.samples_scale
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Orthonormal camera frame (right, up, backward).
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn forward_config() -> CameraConfig {
        CameraConfig::new()
            .with_image(100, 1.0)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
    }

    #[test]
    fn test_camera_basis() {
        let camera = Camera::new(&forward_config());

        assert_eq!(camera.center(), Vec3::ZERO);
        let (u, v, w) = camera.basis();
        assert!((u - Vec3::X).length() < 0.001);
        assert!((v - Vec3::Y).length() < 0.001);
        assert!((w - Vec3::Z).length() < 0.001);
    }

    #[test]
    fn test_camera_image_size() {
        let camera = Camera::new(&CameraConfig::new().with_image(400, 16.0 / 9.0));
        assert_eq!(camera.image_width, 400);
        assert_eq!(camera.image_height, 225);

        let camera = Camera::new(&CameraConfig::new().with_image(100, 0.0));
        assert_eq!(camera.image_height, 100);

        let camera = Camera::new(&CameraConfig::new().with_quality(4, 3));
        assert_eq!(camera.samples_scale(), 0.25);
        assert_eq!(camera.max_depth, 3);
    }

    #[test]
    fn test_camera_ray_direction() {
        let camera = Camera::new(&forward_config());
        let mut rng = StdRng::seed_from_u64(42);

        // Center ray should point roughly towards -Z
        let ray = camera.get_ray(50, 50, &mut rng);
        assert!(ray.direction().z < 0.0);
        assert!(ray.direction().x.abs() < 0.02);
        assert!(ray.direction().y.abs() < 0.02);
        assert!(ray.time() >= 0.0 && ray.time() < 1.0);
    }

    #[test]
    fn test_corner_rays_span_field_of_view() {
        let camera = Camera::new(&forward_config());
        let mut rng = StdRng::seed_from_u64(1);

        // 90 degree fov at focus distance 1 spans [-1, 1] on both axes
        let top_left = camera.get_ray(0, 0, &mut rng).direction();
        assert!(top_left.x < -0.97 && top_left.x > -1.001);
        assert!(top_left.y > 0.97 && top_left.y < 1.001);

        let bottom_right = camera.get_ray(99, 99, &mut rng).direction();
        assert!(bottom_right.x > 0.97 && bottom_right.x < 1.001);
        assert!(bottom_right.y < -0.97 && bottom_right.y > -1.001);
    }

    #[test]
    fn test_pinhole_rays_start_at_center() {
        let config = forward_config().with_position(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);
        let camera = Camera::new(&config);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..20 {
            assert_eq!(camera.get_ray(10, 10, &mut rng).origin(), Vec3::new(1.0, 2.0, 3.0));
        }
    }

    #[test]
    fn test_defocus_rays_start_on_disk() {
        let config = forward_config().with_lens(90.0, 10.0, 2.0);
        let camera = Camera::new(&config);
        let radius = 2.0 * (5.0f32).to_radians().tan();
        let mut rng = StdRng::seed_from_u64(6);

        let mut moved = false;
        for _ in 0..50 {
            let origin = camera.get_ray(50, 50, &mut rng).origin();
            assert!(origin.z.abs() < 1e-6);
            assert!(origin.length() <= radius + 1e-5);
            moved |= origin.length() > 0.0;
        }
        assert!(moved);
    }
}
