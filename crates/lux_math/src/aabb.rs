use crate::{DVec3, Ray};

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// Defined by its `min` and `max` corners. Boxes with zero extent on an axis
/// are legal (a triangle lying in a coordinate plane has one), so no padding
/// is applied.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Create an AABB from its minimum and maximum corners.
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from two arbitrary corner points.
    pub fn from_points(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create the smallest AABB containing all given points.
    pub fn from_iter_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        points
            .into_iter()
            .fold(Aabb::EMPTY, |acc, p| Aabb::union(&acc, &Aabb::new(p, p)))
    }

    /// Create an AABB that surrounds two other AABBs.
    ///
    /// Commutative, associative and idempotent, with [`Aabb::EMPTY`] as the
    /// identity element.
    pub fn union(a: &Aabb, b: &Aabb) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// True when no point is contained (the identity box, or anything
    /// inverted on some axis).
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Extent along each axis.
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Returns the center point of the bounding box.
    pub fn center(&self) -> DVec3 {
        0.5 * (self.max + self.min)
    }

    /// The eight corners, `min` first and `max` last, x varying fastest.
    pub fn corners(&self) -> [DVec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            lo,
            DVec3::new(hi.x, lo.y, lo.z),
            DVec3::new(lo.x, hi.y, lo.z),
            DVec3::new(hi.x, hi.y, lo.z),
            DVec3::new(lo.x, lo.y, hi.z),
            DVec3::new(hi.x, lo.y, hi.z),
            DVec3::new(lo.x, hi.y, hi.z),
            hi,
        ]
    }

    /// Returns true if `p` lies inside or on the boundary.
    pub fn contains(&self, p: DVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Test if a ray intersects this AABB.
    ///
    /// Uses the slab method with the reciprocal of the direction, so a zero
    /// direction component becomes ±∞ and the slab for that axis spans
    /// either everything or nothing. An origin lying exactly on a slab plane
    /// with a zero component produces `0 · ∞ = NaN`; every comparison with NaN
    /// is false, so such an axis never rejects.
    ///
    /// The parametric interval may start behind the origin: a ray that begins
    /// inside the box intersects it as long as the exit lies ahead.
    pub fn intersects(&self, r: &Ray) -> bool {
        let inv = r.direction.recip();
        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;

        for axis in 0..3 {
            let mut t0 = (self.min[axis] - r.origin[axis]) * inv[axis];
            let mut t1 = (self.max[axis] - r.origin[axis]) * inv[axis];
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            if t0 > t_max || t1 < t_min {
                return false;
            }

            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
        }

        t_max > 0.0
    }

    /// Static constants
    pub const EMPTY: Aabb = Aabb {
        min: DVec3::INFINITY,
        max: DVec3::NEG_INFINITY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        min: DVec3::NEG_INFINITY,
        max: DVec3::INFINITY,
    };
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
