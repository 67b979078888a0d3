//! Infinite plane primitive.

use std::sync::Arc;

use lux_core::Material;
use lux_math::{Aabb, DVec3, Ray};

use crate::object::{valid_distance, Intersection, Object};

/// Rays closer to parallel than this never hit.
const PARALLEL_EPSILON: f64 = 1e-3;

/// An infinite plane through `point` with unit `normal`.
pub struct Plane {
    normal: DVec3,
    point: DVec3,
    material: Arc<Material>,
}

impl Plane {
    /// Create a new plane. The normal is normalized.
    pub fn new(normal: DVec3, point: DVec3, material: Arc<Material>) -> Self {
        Self {
            normal: normal.normalize(),
            point,
            material,
        }
    }
}

impl Object for Plane {
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let denominator = ray.direction().dot(self.normal);
        if denominator.abs() < PARALLEL_EPSILON {
            return None;
        }

        let d = self.point.dot(-self.normal);
        let t = -(d + ray.origin().dot(self.normal)) / denominator;
        if !valid_distance(t) {
            return None;
        }

        Some(Intersection::new(ray.at(t), self.normal, t, &self.material))
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::UNIVERSE
    }
}
