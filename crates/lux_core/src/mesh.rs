//! Indexed triangle meshes.
//!
//! A [`Mesh`] is plain data: it is filled from an OBJ file or a generator
//! and handed to the renderer, which builds its own acceleration structure.

use lux_math::{Aabb, DVec3};

/// Indexed triangle list with optional per-vertex normals.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub positions: Vec<DVec3>,
    /// One entry per position when present.
    pub normals: Option<Vec<DVec3>>,
    /// Flat list, three entries per triangle.
    pub indices: Vec<u32>,
    pub bounds: Aabb,
}

impl Mesh {
    /// Build a mesh. Normals are taken as given; see [`Mesh::ensure_normals`].
    pub fn new(positions: Vec<DVec3>, indices: Vec<u32>, normals: Option<Vec<DVec3>>) -> Self {
        let bounds = Aabb::from_iter_points(positions.iter().copied());
        Self {
            positions,
            normals,
            indices,
            bounds,
        }
    }

    /// Replace the normals with area-weighted smooth normals.
    ///
    /// Each triangle adds its unnormalized cross product to its three
    /// corners, assuming counter-clockwise front faces. Triangles with an
    /// index out of range contribute nothing, and a vertex that ends up with
    /// no usable normal gets +Y.
    pub fn compute_normals(&mut self) {
        let mut sums = vec![DVec3::ZERO; self.positions.len()];

        let corners = |tri: [u32; 3]| -> Option<[usize; 3]> {
            let tri = tri.map(|i| i as usize);
            tri.iter().all(|&i| i < sums.len()).then_some(tri)
        };
        let faces: Vec<[usize; 3]> = self.triangles().filter_map(corners).collect();

        for [a, b, c] in faces {
            let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
            let weighted = (pb - pa).cross(pc - pa);
            for i in [a, b, c] {
                sums[i] += weighted;
            }
        }

        self.normals = Some(
            sums.into_iter()
                .map(|n| n.try_normalize().unwrap_or(DVec3::Y))
                .collect(),
        );
    }

    /// Compute normals unless there is already exactly one per vertex.
    pub fn ensure_normals(&mut self) {
        match &self.normals {
            Some(normals) if normals.len() == self.positions.len() => {}
            Some(normals) => {
                log::debug!(
                    "Discarding {} normals for {} vertices",
                    normals.len(),
                    self.positions.len()
                );
                self.compute_normals();
            }
            None => self.compute_normals(),
        }
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// A copy scaled uniformly about the origin and then moved by `offset`.
    ///
    /// A negative scale mirrors the mesh, so normals are flipped with it.
    pub fn transformed(&self, offset: DVec3, scale: f64) -> Mesh {
        let flip = if scale < 0.0 { -1.0 } else { 1.0 };
        Mesh::new(
            self.positions.iter().map(|&p| offset + scale * p).collect(),
            self.indices.clone(),
            self.normals
                .as_ref()
                .map(|normals| normals.iter().map(|&n| flip * n).collect()),
        )
    }

    /// Index triplets, one per triangle. A trailing partial triplet is ignored.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]])
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right_triangle() -> Mesh {
        Mesh::new(vec![DVec3::ZERO, DVec3::X, DVec3::Y], vec![0, 1, 2], None)
    }

    #[test]
    fn test_counts_and_bounds() {
        let mesh = Mesh::new(
            vec![DVec3::new(-1.0, -2.0, -3.0), DVec3::new(4.0, 5.0, 6.0), DVec3::ZERO],
            vec![0, 1, 2, 2, 1],
            None,
        );

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles().count(), 1);
        assert!(!mesh.has_normals());
        assert_eq!(mesh.bounds.min, DVec3::new(-1.0, -2.0, -3.0));
        assert_eq!(mesh.bounds.max, DVec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_counter_clockwise_face_points_up_z() {
        let mut mesh = right_triangle();
        mesh.compute_normals();

        let normals = mesh.normals.as_ref().unwrap();
        assert_eq!(normals.len(), 3);
        assert!(normals.iter().all(|n| (*n - DVec3::Z).length() < 1e-12));
    }

    #[test]
    fn test_shared_vertex_normal_is_averaged() {
        // Two faces meeting at a right angle along the x axis
        let positions = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::NEG_Z];
        let mut mesh = Mesh::new(positions, vec![0, 1, 2, 0, 1, 3], None);
        mesh.compute_normals();

        let shared = mesh.normals.as_ref().unwrap()[0];
        let expected = DVec3::new(0.0, 1.0, 1.0).normalize();
        assert!((shared - expected).length() < 1e-12);
    }

    #[test]
    fn test_unreferenced_vertex_defaults_to_y() {
        let mut mesh = Mesh::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::ONE],
            vec![0, 1, 2, 0, 1, 7],
            None,
        );
        mesh.compute_normals();
        assert_eq!(mesh.normals.as_ref().unwrap()[3], DVec3::Y);
    }

    #[test]
    fn test_ensure_normals() {
        let mut keep = Mesh::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            vec![0, 1, 2],
            Some(vec![DVec3::X; 3]),
        );
        keep.ensure_normals();
        assert_eq!(keep.normals.as_ref().unwrap()[0], DVec3::X);

        let mut short = Mesh::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::Y],
            vec![0, 1, 2],
            Some(vec![DVec3::X]),
        );
        short.ensure_normals();
        assert_eq!(short.normals.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_transformed_scales_then_offsets() {
        let moved = right_triangle().transformed(DVec3::new(0.0, 0.0, -5.0), 2.0);
        assert_eq!(moved.positions[1], DVec3::new(2.0, 0.0, -5.0));
        assert_eq!(moved.bounds.max, DVec3::new(2.0, 2.0, -5.0));
    }

    #[test]
    fn test_mirrored_normals_flip() {
        let mut mesh = right_triangle();
        mesh.compute_normals();
        let mirrored = mesh.transformed(DVec3::ZERO, -1.0);
        assert_eq!(mirrored.normals.as_ref().unwrap()[0], DVec3::NEG_Z);
    }
}
