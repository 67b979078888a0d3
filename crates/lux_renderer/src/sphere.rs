//! Sphere primitive for ray tracing.

use std::sync::Arc;

use lux_core::Material;
use lux_math::{solve_quadratic, Aabb, DVec3, Ray};

use crate::object::{valid_distance, Intersection, Object};

/// A sphere primitive.
pub struct Sphere {
    center: DVec3,
    radius: f64,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: DVec3, radius: f64, material: Arc<Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = DVec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }
}

impl Object for Sphere {
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let l = ray.origin() - self.center;
        let a = ray.direction().length_squared();
        let b = 2.0 * ray.direction().dot(l);
        let c = l.length_squared() - self.radius * self.radius;

        let (t0, t1) = solve_quadratic(a, b, c)?;

        // Nearest root in front of the origin; the far one when starting inside
        let t = if valid_distance(t0) {
            t0
        } else if valid_distance(t1) {
            t1
        } else {
            return None;
        };

        let point = ray.at(t);
        Some(Intersection::new(
            point,
            (point - self.center).normalize(),
            t,
            &self.material,
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
