//! Closed set of scene primitives.

use crate::{HitRecord, Hittable, Quad, Ray, Sphere};
use lumen_math::{Aabb, Interval};

/// Any primitive that can live in a [`crate::HittableList`].
///
/// An enum rather than boxed trait objects: the set of shapes is fixed and
/// dispatching on it keeps primitives stored inline.
#[derive(Clone)]
pub enum Primitive {
    Sphere(Sphere),
    Quad(Quad),
}

impl Hittable for Primitive {
    #[inline]
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        match self {
            Primitive::Sphere(sphere) => sphere.hit(ray, ray_t),
            Primitive::Quad(quad) => quad.hit(ray, ray_t),
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            Primitive::Sphere(sphere) => sphere.bounding_box(),
            Primitive::Quad(quad) => quad.bounding_box(),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Primitive::Sphere(sphere)
    }
}

impl From<Quad> for Primitive {
    fn from(quad: Quad) -> Self {
        Primitive::Quad(quad)
    }
}
