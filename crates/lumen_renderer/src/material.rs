//! Surface materials: how light scatters off and is emitted by surfaces.

use lumen_math::{Color, Vec3};
use rand::RngCore;

use crate::sampling::{gen_f32, random_unit_vector};
use crate::{hittable::HitRecord, Ray, Texture};

/// Result of scattering a ray off a surface.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel fraction of the scattered ray's light that survives
    pub attenuation: Color,
    pub scattered: Ray,
}

/// A surface material.
///
/// Materials are immutable once built and shared between primitives behind
/// an `Arc`.
#[derive(Debug, Clone)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
    DiffuseLight(DiffuseLight),
}

impl Material {
    /// Diffuse material with a constant albedo.
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian(Lambertian::new(albedo.into()))
    }

    pub fn lambertian_texture(texture: Texture) -> Self {
        Material::Lambertian(Lambertian::new(texture))
    }

    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material::Metal(Metal::new(albedo, fuzz))
    }

    pub fn dielectric(refraction_index: f32) -> Self {
        Material::Dielectric(Dielectric::new(refraction_index))
    }

    pub fn diffuse_light(emit: Color) -> Self {
        Material::DiffuseLight(DiffuseLight::new(emit.into()))
    }

    pub fn diffuse_light_texture(texture: Texture) -> Self {
        Material::DiffuseLight(DiffuseLight::new(texture))
    }

    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed or the material is a pure emitter.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Lambertian(m) => m.scatter(ray_in, rec, rng),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(ray_in, rec, rng),
            Material::DiffuseLight(_) => None,
        }
    }

    /// Light emitted at the given UV coordinates and point.
    ///
    /// Black for everything except lights.
    pub fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Material::DiffuseLight(light) => light.emit.value(u, v, p),
            _ => Color::ZERO,
        }
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    texture: Texture,
}

impl Lambertian {
    pub fn new(texture: Texture) -> Self {
        Self { texture }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        // Cosine-weighted direction around the normal
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scattered_dir = reflect(ray_in.direction().normalize(), rec.normal);
        if self.fuzz > 0.0 {
            scattered_dir += self.fuzz * random_unit_vector(rng);
        }

        // Fuzzed rays that end up below the surface are absorbed
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material. Never absorbs.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction relative to the surrounding medium
    refraction_index: f32,
}

impl Dielectric {
    /// - `refraction_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn new(refraction_index: f32) -> Self {
        Self { refraction_index }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
        let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }

    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Diffuse light emitter.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: Texture,
}

impl DiffuseLight {
    pub fn new(emit: Texture) -> Self {
        Self { emit }
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with unit normal `n`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record<'a>(ray: &Ray, p: Vec3, outward_normal: Vec3, material: &'a Material) -> HitRecord<'a> {
        HitRecord::new(ray, p, outward_normal, 1.0, (0.25, 0.75), material)
    }

    #[test]
    fn test_lambertian_scatter() {
        let material = Material::lambertian(Color::new(0.8, 0.3, 0.3));
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y, 0.4);
        let rec = record(&ray, Vec3::ZERO, Vec3::Y, &material);
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.8, 0.3, 0.3));
            assert_eq!(result.scattered.origin(), Vec3::ZERO);
            assert_eq!(result.scattered.time(), 0.4);
            // normal + unit vector never points below the surface
            assert!(result.scattered.direction().dot(Vec3::Y) >= 0.0);
            assert!(result.scattered.direction().length_squared() > 0.0);
        }
        assert_eq!(material.emitted(0.0, 0.0, Vec3::ZERO), Color::ZERO);
    }

    #[test]
    fn test_lambertian_samples_texture_at_hit() {
        let texture = Texture::checker(1.0, Color::ONE, Color::ZERO);
        let material = Material::lambertian_texture(texture);
        let ray = Ray::new_simple(Vec3::new(1.5, 1.0, 0.5), Vec3::NEG_Y);
        let rec = record(&ray, Vec3::new(1.5, 0.0, 0.5), Vec3::Y, &material);

        let result = material.scatter(&ray, &rec, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(result.attenuation, Color::ZERO);
    }

    #[test]
    fn test_perfect_metal_is_exact_mirror() {
        let albedo = Color::new(0.8, 0.6, 0.2);
        let material = Material::metal(albedo, 0.0);
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let ray = Ray::new_simple(Vec3::new(-1.0, 1.0, 0.0), d);
        let rec = record(&ray, Vec3::ZERO, Vec3::Y, &material);
        let mut rng = StdRng::seed_from_u64(3);

        let result = material.scatter(&ray, &rec, &mut rng).unwrap();
        let n = rec.normal;
        let expected = d - 2.0 * d.dot(n) * n;

        assert!((result.scattered.direction() - expected).length() < 1e-6);
        assert_eq!(result.attenuation, albedo);

        // No randomness: a second scatter gives the same ray
        let again = material.scatter(&ray, &rec, &mut rng).unwrap();
        assert_eq!(again.scattered, result.scattered);
    }

    #[test]
    fn test_fuzzy_metal_never_scatters_below_surface() {
        let material = Material::metal(Color::ONE, 1.0);
        // Grazing ray so many fuzzed reflections dip under the surface
        let d = Vec3::new(1.0, -0.05, 0.0).normalize();
        let ray = Ray::new_simple(Vec3::new(-1.0, 0.05, 0.0), d);
        let rec = record(&ray, Vec3::ZERO, Vec3::Y, &material);
        let mut rng = StdRng::seed_from_u64(8);

        let mut absorbed = 0;
        for _ in 0..500 {
            match material.scatter(&ray, &rec, &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(Vec3::Y) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        let Material::Metal(metal) = Material::metal(Color::ONE, 3.0) else {
            panic!("expected metal");
        };
        assert_eq!(metal.fuzz, 1.0);
    }

    #[test]
    fn test_dielectric_normal_incidence_refracts() {
        let material = Material::dielectric(1.5);
        let ray = Ray::new_simple(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y);
        let rec = record(&ray, Vec3::ZERO, Vec3::Y, &material);
        assert!(rec.front_face);

        // Schlick reflectance at normal incidence is 0.04; most samples refract
        let mut rng = StdRng::seed_from_u64(12);
        let mut refracted = 0;
        for _ in 0..1000 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);

            let dir = result.scattered.direction();
            if dir.y < 0.0 {
                // Snell's law at ratio 1/1.5 leaves a normal ray undeviated
                let expected = refract(Vec3::NEG_Y, Vec3::Y, 1.0 / 1.5);
                assert!((dir - expected).length() < 1e-6);
                assert!((dir - Vec3::NEG_Y).length() < 1e-6);
                refracted += 1;
            } else {
                assert!((dir - Vec3::Y).length() < 1e-6);
            }
        }
        assert!(refracted > 900, "refracted {} of 1000", refracted);
    }

    #[test]
    fn test_dielectric_oblique_refraction_follows_snell() {
        let ratio = 1.0 / 1.5;
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let out = refract(d, Vec3::Y, ratio);

        let sin_in = d.x.abs();
        let sin_out = out.normalize().x.abs();
        assert!((sin_out - ratio * sin_in).abs() < 1e-5);
        assert!(out.y < 0.0);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let material = Material::dielectric(1.5);
        // Leaving the glass at a steep angle: ratio 1.5, sin 0.8 -> 1.2 > 1
        let d = Vec3::new(0.8, 0.6, 0.0);
        let ray = Ray::new_simple(Vec3::new(-0.8, -0.6, 0.0), d);
        let rec = record(&ray, Vec3::ZERO, Vec3::Y, &material);
        assert!(!rec.front_face);

        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            let result = material.scatter(&ray, &rec, &mut rng).unwrap();
            let expected = reflect(d, rec.normal);
            assert!((result.scattered.direction() - expected).length() < 1e-5);
        }
    }

    #[test]
    fn test_light_emits_and_does_not_scatter() {
        let material = Material::diffuse_light(Color::new(4.0, 4.0, 4.0));
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let rec = record(&ray, Vec3::ZERO, Vec3::Y, &material);

        assert!(material
            .scatter(&ray, &rec, &mut StdRng::seed_from_u64(0))
            .is_none());
        assert_eq!(material.emitted(0.3, 0.3, Vec3::ZERO), Color::new(4.0, 4.0, 4.0));
    }
}
