//! Quadrilateral (parallelogram) primitive.
//!
//! A quad is a corner `q` plus two edge vectors `u` and `v`. Hits are found
//! against the containing plane and then tested against the unit square in
//! the plane's (u, v) basis.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    HittableList, Material, Ray,
};
use lumen_math::{Aabb, Interval, Vec3};

/// Rays whose direction is this close to the plane are treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-8;

#[derive(Clone)]
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// n / (n · n), used to project hit points onto the (u, v) basis
    w: Vec3,
    /// Unit plane normal
    normal: Vec3,
    /// Plane offset: normal · p = d
    d: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: impl Into<Arc<Material>>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        let bbox_diagonal1 = Aabb::from_points(q, q + u + v);
        let bbox_diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            material: material.into(),
            bbox: Aabb::surrounding(&bbox_diagonal1, &bbox_diagonal2),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Planar coordinates fall inside the quad when both lie in [0, 1].
    fn is_interior(alpha: f32, beta: f32) -> bool {
        Interval::UNIT.contains(alpha) && Interval::UNIT.contains(beta)
    }
}

impl Hittable for Quad {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        let intersection = ray.at(t);
        let planar = intersection - self.q;
        let alpha = self.w.dot(planar.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar));
        if !Self::is_interior(alpha, beta) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            intersection,
            self.normal,
            t,
            (alpha, beta),
            &self.material,
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// The six faces of the axis-aligned box with opposite corners `a` and `b`.
pub fn make_box(a: Vec3, b: Vec3, material: impl Into<Arc<Material>>) -> HittableList {
    let material = material.into();
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    // front, right, back, left, top, bottom
    sides.add(Quad::new(Vec3::new(min.x, min.y, max.z), dx, dy, material.clone()));
    sides.add(Quad::new(Vec3::new(max.x, min.y, max.z), -dz, dy, material.clone()));
    sides.add(Quad::new(Vec3::new(max.x, min.y, min.z), -dx, dy, material.clone()));
    sides.add(Quad::new(Vec3::new(min.x, min.y, min.z), dz, dy, material.clone()));
    sides.add(Quad::new(Vec3::new(min.x, max.y, max.z), dx, -dz, material.clone()));
    sides.add(Quad::new(Vec3::new(min.x, min.y, min.z), dx, dz, material));

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn unit_quad() -> Quad {
        Quad::new(
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Material::lambertian(Color::new(0.5, 0.5, 0.5)),
        )
    }

    fn forward() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_quad_center_hit() {
        let quad = unit_quad();
        let origin = Vec3::new(0.5, 0.5, 1.0);
        let ray = Ray::new_simple(origin, Vec3::new(0.0, 0.0, -1.0));

        let rec = quad.hit(&ray, forward()).unwrap();
        assert!((rec.t - 1.0).abs() < 1e-6);
        assert!((rec.p - Vec3::new(0.5, 0.5, 0.0)).length() < 1e-6);
        assert!((rec.u - 0.5).abs() < 1e-6);
        assert!((rec.v - 0.5).abs() < 1e-6);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_quad_outside_misses() {
        let quad = unit_quad();
        let origin = Vec3::new(0.5, 0.5, 1.0);
        let target = Vec3::new(2.0, 0.5, -1.0);
        let ray = Ray::new_simple(origin, target - origin);

        assert!(quad.hit(&ray, forward()).is_none());
    }

    #[test]
    fn test_quad_parallel_ray_misses() {
        let quad = unit_quad();
        let ray = Ray::new_simple(Vec3::new(-1.0, 0.5, 0.0), Vec3::X);

        assert!(quad.hit(&ray, forward()).is_none());
    }

    #[test]
    fn test_quad_back_face() {
        let quad = unit_quad();
        let ray = Ray::new_simple(Vec3::new(0.25, 0.75, -2.0), Vec3::Z);

        let rec = quad.hit(&ray, forward()).unwrap();
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::NEG_Z);
        assert!((rec.u - 0.25).abs() < 1e-6);
        assert!((rec.v - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_quad_behind_origin_misses() {
        let quad = unit_quad();
        let ray = Ray::new_simple(Vec3::new(0.5, 0.5, 1.0), Vec3::Z);

        assert!(quad.hit(&ray, forward()).is_none());
    }

    #[test]
    fn test_quad_bounding_box_is_padded() {
        let bbox = unit_quad().bounding_box();
        assert_eq!(bbox.x, Interval::new(0.0, 1.0));
        assert!(bbox.z.size() > 0.0);
    }

    #[test]
    fn test_make_box_faces() {
        let sides = make_box(
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, -1.0, -1.0),
            Material::dielectric(1.5),
        );
        assert_eq!(sides.len(), 6);

        // Rays from each axis direction hit the matching face at distance 4
        for dir in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
            let ray = Ray::new_simple(-5.0 * dir, dir);
            let rec = sides.hit(&ray, forward()).unwrap();
            assert!((rec.t - 4.0).abs() < 1e-5);
            assert!(rec.front_face);
            assert!((rec.normal + dir).length() < 1e-6);
        }
    }
}
