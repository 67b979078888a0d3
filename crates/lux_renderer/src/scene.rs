//! Renderable scene: intersectable objects plus point lights.

use std::path::PathBuf;
use std::sync::Arc;

use lux_core::{Geometry, Material, PointLight, SceneDescription};
use lux_math::Ray;
use thiserror::Error;

use crate::cylinder::Cylinder;
use crate::mesh::TriangleMesh;
use crate::object::{Intersection, Object};
use crate::plane::Plane;
use crate::sphere::Sphere;

/// Errors that can occur while building a scene from a description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Shape {shape} references missing material {material}")]
    InvalidMaterial { shape: usize, material: usize },

    #[error("Mesh {0:?} was not loaded")]
    UnresolvedMesh(PathBuf),
}

/// A collection of objects and lights.
///
/// Objects are tested linearly; meshes carry their own BVH.
#[derive(Default)]
pub struct Scene {
    objects: Vec<Box<dyn Object>>,
    lights: Vec<PointLight>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the scene.
    pub fn add<O: Object + 'static>(&mut self, object: O) {
        self.objects.push(Box::new(object));
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn objects(&self) -> &[Box<dyn Object>] {
        &self.objects
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Nearest intersection over all objects.
    pub fn find_intersection(&self, ray: &Ray) -> Option<Intersection<'_>> {
        self.objects
            .iter()
            .fold(None, |closest, object| {
                Intersection::closest(closest, object.find_intersection(ray))
            })
    }

    /// Build intersectable objects for every shape in `description`.
    ///
    /// Mesh BVHs are constructed here. File-referenced meshes must already
    /// be resolved by the loader.
    pub fn from_description(description: &SceneDescription) -> Result<Self, SceneError> {
        let materials: Vec<Arc<Material>> = description
            .materials
            .iter()
            .cloned()
            .map(Arc::new)
            .collect();

        let mut scene = Scene::new();

        for (index, shape) in description.shapes.iter().enumerate() {
            let material = materials
                .get(shape.material)
                .cloned()
                .ok_or(SceneError::InvalidMaterial {
                    shape: index,
                    material: shape.material,
                })?;

            match &shape.geometry {
                Geometry::Sphere { center, radius } => {
                    scene.add(Sphere::new(*center, *radius, material))
                }
                Geometry::Plane { normal, point } => {
                    scene.add(Plane::new(*normal, *point, material))
                }
                Geometry::Cylinder {
                    base,
                    radius,
                    height,
                } => scene.add(Cylinder::new(*base, *radius, *height, material)),
                Geometry::InlineMesh(mesh) => {
                    let object = TriangleMesh::new(mesh, material);
                    log::info!(
                        "Built BVH for shape {}: {} triangles, {} nodes, {} leaves, depth {}",
                        index,
                        object.triangle_count(),
                        object.bvh().node_count(),
                        object.bvh().leaf_count(),
                        object.bvh().depth()
                    );
                    scene.add(object);
                }
                Geometry::Mesh { path, .. } => {
                    return Err(SceneError::UnresolvedMesh(path.clone()));
                }
            }
        }

        for light in &description.lights {
            scene.add_light(*light);
        }

        log::info!(
            "Scene '{}' ready: {} objects, {} lights",
            description.name,
            scene.objects.len(),
            scene.lights.len()
        );

        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_core::load_builtin;
    use lux_math::DVec3;

    #[test]
    fn test_scene_closest_object() {
        let mut scene = Scene::new();
        let material = Arc::new(Material::ivory());
        scene.add(Sphere::new(DVec3::new(0.0, 0.0, -10.0), 1.0, material.clone()));
        scene.add(Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0, material));

        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        let hit = scene.find_intersection(&ray).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_scene_misses() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        assert!(scene
            .find_intersection(&Ray::new(DVec3::ZERO, DVec3::Z))
            .is_none());
    }

    #[test]
    fn test_from_builtin_descriptions() {
        for number in lux_core::builtin::SCENE_NUMBERS {
            let description = load_builtin(number).unwrap();
            let scene = Scene::from_description(&description).unwrap();
            assert_eq!(scene.objects().len(), description.shapes.len());
            assert_eq!(scene.lights().len(), description.lights.len());
        }
    }

    #[test]
    fn test_from_description_errors() {
        let mut description = SceneDescription::new("broken");
        description.add_shape(
            Geometry::Sphere {
                center: DVec3::ZERO,
                radius: 1.0,
            },
            2,
        );
        assert!(matches!(
            Scene::from_description(&description),
            Err(SceneError::InvalidMaterial {
                shape: 0,
                material: 2
            })
        ));

        let mut description = SceneDescription::new("unresolved");
        let material = description.add_material(Material::ivory());
        description.add_shape(
            Geometry::Mesh {
                path: PathBuf::from("bunny.obj"),
                offset: DVec3::ZERO,
                scale: 1.0,
            },
            material,
        );
        assert!(matches!(
            Scene::from_description(&description),
            Err(SceneError::UnresolvedMesh(_))
        ));
    }
}
