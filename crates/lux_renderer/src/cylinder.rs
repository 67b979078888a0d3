//! Capped cylinder primitive aligned with the +Y axis.

use std::sync::Arc;

use lux_core::Material;
use lux_math::{solve_quadratic, Aabb, DVec3, Ray};

use crate::object::{valid_distance, Intersection, Object};

/// A closed cylinder standing on `base`, extending `height` along +Y.
pub struct Cylinder {
    base: DVec3,
    radius: f64,
    height: f64,
    material: Arc<Material>,
}

impl Cylinder {
    pub fn new(base: DVec3, radius: f64, height: f64, material: Arc<Material>) -> Self {
        Self {
            base,
            radius: radius.max(0.0),
            height: height.max(0.0),
            material,
        }
    }

    /// Nearest hit on the curved side, within the height range.
    fn side(&self, origin: DVec3, direction: DVec3) -> Option<(f64, DVec3)> {
        let a = direction.x * direction.x + direction.z * direction.z;
        let b = 2.0 * (origin.x * direction.x + origin.z * direction.z);
        let c = origin.x * origin.x + origin.z * origin.z - self.radius * self.radius;

        let (t0, t1) = solve_quadratic(a, b, c)?;
        [t0, t1].into_iter().find_map(|t| {
            let y = origin.y + t * direction.y;
            (valid_distance(t) && (0.0..=self.height).contains(&y)).then(|| {
                let p = origin + t * direction;
                (t, DVec3::new(p.x, 0.0, p.z) / self.radius)
            })
        })
    }

    /// Nearest hit on either end cap.
    fn caps(&self, origin: DVec3, direction: DVec3) -> Option<(f64, DVec3)> {
        if direction.y == 0.0 {
            return None;
        }

        [(0.0, -DVec3::Y), (self.height, DVec3::Y)]
            .into_iter()
            .filter_map(|(y, normal)| {
                let t = (y - origin.y) / direction.y;
                let p = origin + t * direction;
                (valid_distance(t) && p.x * p.x + p.z * p.z <= self.radius * self.radius)
                    .then_some((t, normal))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
    }
}

impl Object for Cylinder {
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection<'_>> {
        // Work in a frame with the base at the origin
        let origin = ray.origin() - self.base;
        let direction = ray.direction();

        let (t, normal) = match (self.side(origin, direction), self.caps(origin, direction)) {
            (Some(s), Some(c)) => {
                if c.0 < s.0 {
                    c
                } else {
                    s
                }
            }
            (Some(s), None) => s,
            (None, Some(c)) => c,
            (None, None) => return None,
        };

        Some(Intersection::new(ray.at(t), normal, t, &self.material))
    }

    fn bounding_box(&self) -> Aabb {
        let r = DVec3::new(self.radius, 0.0, self.radius);
        Aabb::from_points(
            self.base - r,
            self.base + r + DVec3::new(0.0, self.height, 0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cylinder() -> Cylinder {
        Cylinder::new(
            DVec3::new(0.0, -1.0, -5.0),
            1.0,
            2.0,
            Arc::new(Material::rubber()),
        )
    }

    #[test]
    fn test_cylinder_side_hit() {
        let cylinder = cylinder();
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        let hit = cylinder.find_intersection(&ray).unwrap();

        assert!((hit.distance - 4.0).abs() < 1e-9);
        assert!((hit.normal - DVec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_cylinder_cap_hit() {
        let cylinder = cylinder();
        let ray = Ray::new(DVec3::new(0.0, 5.0, -5.0), DVec3::new(0.0, -1.0, 0.0));
        let hit = cylinder.find_intersection(&ray).unwrap();

        assert!((hit.distance - 4.0).abs() < 1e-9);
        assert_eq!(hit.normal, DVec3::Y);

        let ray = Ray::new(DVec3::new(0.2, -5.0, -5.0), DVec3::Y);
        let hit = cylinder.find_intersection(&ray).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-9);
        assert_eq!(hit.normal, -DVec3::Y);
    }

    #[test]
    fn test_cylinder_misses() {
        // Passes above the top
        let ray = Ray::new(DVec3::new(0.0, 3.0, 0.0), DVec3::new(0.0, 0.0, -1.0));
        assert!(cylinder().find_intersection(&ray).is_none());

        // Passes beside
        let ray = Ray::new(DVec3::new(2.0, 0.0, 0.0), DVec3::new(0.0, 0.0, -1.0));
        assert!(cylinder().find_intersection(&ray).is_none());

        let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::ZERO);
        assert!(cylinder().find_intersection(&ray).is_none());
    }

    #[test]
    fn test_cylinder_from_inside() {
        let cylinder = cylinder();
        let ray = Ray::new(DVec3::new(0.0, 0.0, -5.0), DVec3::X);
        let hit = cylinder.find_intersection(&ray).unwrap();
        assert!((hit.distance - 1.0).abs() < 1e-9);
        assert!((hit.normal - DVec3::X).length() < 1e-9);
    }

    #[test]
    fn test_cylinder_bounding_box() {
        let bbox = cylinder().bounding_box();
        assert_eq!(bbox.min, DVec3::new(-1.0, -1.0, -6.0));
        assert_eq!(bbox.max, DVec3::new(1.0, 1.0, -4.0));
    }
}
