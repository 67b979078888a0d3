//! Object trait and Intersection for ray-object queries.

use lux_core::Material;
use lux_math::{Aabb, DVec3, Ray};

/// Nearest hit of a ray against an object.
///
/// Transient: produced per query and consumed immediately by the integrator.
#[derive(Debug, Clone, Copy)]
pub struct Intersection<'a> {
    /// Point of intersection
    pub point: DVec3,
    /// Surface normal at the intersection (outward facing, unit length)
    pub normal: DVec3,
    /// Ray parameter of the hit, never negative
    pub distance: f64,
    /// Material of the hit object
    pub material: &'a Material,
}

impl<'a> Intersection<'a> {
    pub fn new(point: DVec3, normal: DVec3, distance: f64, material: &'a Material) -> Self {
        Self {
            point,
            normal,
            distance,
            material,
        }
    }

    /// Pick whichever of two optional hits is closer.
    pub fn closest(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(if b.distance < a.distance { b } else { a }),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

/// Anything a ray can hit.
///
/// Implementations return the nearest hit with a non-negative, finite
/// distance. A ray with a zero direction must never produce a hit.
pub trait Object: Send + Sync {
    /// Find the nearest intersection of `ray` with this object.
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection<'_>>;

    /// Get the axis-aligned bounding box of this object.
    ///
    /// Unbounded objects return [`Aabb::UNIVERSE`].
    fn bounding_box(&self) -> Aabb;
}

/// Accept a ray parameter as a hit distance.
#[inline]
pub(crate) fn valid_distance(t: f64) -> bool {
    t >= 0.0 && t.is_finite()
}
