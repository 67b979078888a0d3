//! Triangle mesh object with its own BVH.
//!
//! Triangles use the Möller-Trumbore intersection test and interpolate the
//! mesh's vertex normals for smooth shading.

use std::sync::Arc;

use lux_core::{Material, Mesh};
use lux_math::{Aabb, DVec3, Ray};

use crate::bvh::{Bvh, DEFAULT_LEAF_DELTA};
use crate::object::{valid_distance, Intersection, Object};

/// Determinants below this are treated as parallel rays.
const DETERMINANT_EPSILON: f64 = 1e-12;

/// A single triangle with per-vertex normals.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [DVec3; 3],
    pub normals: [DVec3; 3],
}

impl Triangle {
    pub fn new(vertices: [DVec3; 3], normals: [DVec3; 3]) -> Self {
        Self { vertices, normals }
    }

    /// Triangle with the face normal at every vertex (counter-clockwise front).
    pub fn flat(vertices: [DVec3; 3]) -> Self {
        let [v0, v1, v2] = vertices;
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        Self::new(vertices, [normal; 3])
    }

    /// Tight box around the three vertices; may be flat on an axis.
    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_iter_points(self.vertices)
    }

    /// Möller-Trumbore ray-triangle intersection.
    ///
    /// Returns the ray parameter and the interpolated normal.
    pub fn hit(&self, ray: &Ray) -> Option<(f64, DVec3)> {
        let [v0, v1, v2] = self.vertices;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = ray.direction().cross(edge2);
        let det = edge1.dot(h);

        // Ray is parallel to triangle (or has no direction)
        if det.abs() < DETERMINANT_EPSILON {
            return None;
        }

        let f = 1.0 / det;
        let s = ray.origin() - v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if !valid_distance(t) {
            return None;
        }

        let [n0, n1, n2] = self.normals;
        let normal = ((1.0 - u - v) * n0 + u * n1 + v * n2).normalize_or_zero();
        Some((t, normal))
    }
}

/// An intersectable triangle mesh.
pub struct TriangleMesh {
    triangles: Vec<Triangle>,
    bvh: Bvh,
    material: Arc<Material>,
}

impl TriangleMesh {
    /// Build from a scene mesh with the default BVH leaf size.
    pub fn new(mesh: &Mesh, material: Arc<Material>) -> Self {
        Self::with_delta(mesh, material, DEFAULT_LEAF_DELTA)
    }

    /// Build from a scene mesh with a custom BVH leaf size.
    pub fn with_delta(mesh: &Mesh, material: Arc<Material>, delta: usize) -> Self {
        let vertex_count = mesh.vertex_count();
        let triangles: Vec<Triangle> = mesh
            .triangles()
            .filter(|t| t.iter().all(|&i| (i as usize) < vertex_count))
            .map(|[i0, i1, i2]| {
                let vertices = [
                    mesh.positions[i0 as usize],
                    mesh.positions[i1 as usize],
                    mesh.positions[i2 as usize],
                ];
                match &mesh.normals {
                    Some(normals) if normals.len() == vertex_count => Triangle::new(
                        vertices,
                        [
                            normals[i0 as usize],
                            normals[i1 as usize],
                            normals[i2 as usize],
                        ],
                    ),
                    _ => Triangle::flat(vertices),
                }
            })
            .collect();

        Self::from_triangles(triangles, material, delta)
    }

    /// Build from loose triangles.
    pub fn from_triangles(triangles: Vec<Triangle>, material: Arc<Material>, delta: usize) -> Self {
        let bvh = Bvh::construct(&triangles, delta, Triangle::bounding_box);
        log::debug!(
            "Mesh BVH: {} triangles, {} nodes, depth {}",
            triangles.len(),
            bvh.node_count(),
            bvh.depth()
        );

        Self {
            triangles,
            bvh,
            material,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }
}

impl Object for TriangleMesh {
    fn find_intersection(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let mut closest: Option<(f64, DVec3)> = None;

        self.bvh.search(ray, |i| {
            if let Some((t, normal)) = self.triangles[i].hit(ray) {
                if closest.map_or(true, |(best, _)| t < best) {
                    closest = Some((t, normal));
                }
            }
        });

        closest.map(|(t, normal)| Intersection::new(ray.at(t), normal, t, &self.material))
    }

    fn bounding_box(&self) -> Aabb {
        self.bvh.bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_core::builtin::uv_sphere;

    fn quad_mesh() -> Mesh {
        let positions = vec![
            DVec3::new(-1.0, -1.0, -3.0),
            DVec3::new(1.0, -1.0, -3.0),
            DVec3::new(1.0, 1.0, -3.0),
            DVec3::new(-1.0, 1.0, -3.0),
        ];
        let mut mesh = Mesh::new(positions, vec![0, 1, 2, 0, 2, 3], None);
        mesh.ensure_normals();
        mesh
    }

    #[test]
    fn test_triangle_hit() {
        let triangle = Triangle::flat([
            DVec3::new(-1.0, -1.0, -2.0),
            DVec3::new(1.0, -1.0, -2.0),
            DVec3::new(0.0, 1.0, -2.0),
        ]);
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));

        let (t, normal) = triangle.hit(&ray).unwrap();
        assert!((t - 2.0).abs() < 1e-9);
        assert!((normal - DVec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_triangle_miss() {
        let triangle = Triangle::flat([
            DVec3::new(-1.0, -1.0, -2.0),
            DVec3::new(1.0, -1.0, -2.0),
            DVec3::new(0.0, 1.0, -2.0),
        ]);

        // Outside the edges
        let ray = Ray::new(DVec3::new(5.0, 0.0, 0.0), DVec3::new(0.0, 0.0, -1.0));
        assert!(triangle.hit(&ray).is_none());

        // Parallel
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        assert!(triangle.hit(&ray).is_none());

        // Zero direction
        let ray = Ray::new(DVec3::new(0.0, 0.0, -2.0), DVec3::ZERO);
        assert!(triangle.hit(&ray).is_none());
    }

    #[test]
    fn test_mesh_closest_hit() {
        let mut mesh = quad_mesh();
        // Second copy of the quad further away
        let far: Vec<DVec3> = mesh.positions.iter().map(|p| *p - DVec3::Z * 2.0).collect();
        mesh.positions.extend(far);
        mesh.indices.extend([4, 5, 6, 4, 6, 7]);
        mesh.compute_normals();

        let object = TriangleMesh::new(&mesh, Arc::new(Material::ivory()));
        assert_eq!(object.triangle_count(), 4);

        let ray = Ray::new(DVec3::new(0.1, 0.2, 0.0), DVec3::new(0.0, 0.0, -1.0));
        let hit = object.find_intersection(&ray).unwrap();
        assert!((hit.distance - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_mesh_matches_brute_force() {
        let mesh = uv_sphere(12, 24).transformed(DVec3::new(0.0, 0.0, -5.0), 2.0);
        let object = TriangleMesh::with_delta(&mesh, Arc::new(Material::glass()), 2);

        for (x, y) in [(0.0, 0.0), (0.5, 0.3), (-0.9, 1.2), (1.9, 0.0), (3.0, 3.0)] {
            let ray = Ray::new(DVec3::ZERO, DVec3::new(x, y, -5.0).normalize());
            let expected = object
                .triangles
                .iter()
                .filter_map(|t| t.hit(&ray))
                .map(|(t, _)| t)
                .min_by(f64::total_cmp);

            let found = object.find_intersection(&ray).map(|hit| hit.distance);
            assert_eq!(found, expected, "ray towards ({x}, {y})");
        }
    }

    #[test]
    fn test_mesh_bounding_box() {
        let object = TriangleMesh::new(&quad_mesh(), Arc::new(Material::ivory()));
        let bbox = object.bounding_box();
        assert_eq!(bbox.min, DVec3::new(-1.0, -1.0, -3.0));
        assert_eq!(bbox.max, DVec3::new(1.0, 1.0, -3.0));
    }
}
