//! Geometry primitives shared by the scene description and the renderer.
//!
//! glam's double-precision types are re-exported so downstream crates use
//! one vector type throughout.

pub use glam::*;

mod aabb;
mod morton;
mod ray;
mod solver;

pub use aabb::Aabb;
pub use morton::{morton, morton_box, morton_point};
pub use ray::Ray;
pub use solver::solve_quadratic;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glam_reexport_is_double_precision() {
        let v = DVec3::new(1.0, 2.0, 3.0) + DVec3::splat(1e-12);
        assert!(v.x > 1.0);
        assert_eq!(DVec3::X.cross(DVec3::Y), DVec3::Z);
    }
}
