//! Scene description types for lux.
//!
//! A `SceneDescription` is plain data: materials in a table, shapes that
//! reference materials by index, and point lights. The renderer turns it
//! into intersectable objects.

use std::path::PathBuf;
use std::sync::Arc;

use lux_math::{DVec3, DVec4};
use serde::{Deserialize, Serialize};

use crate::mesh::Mesh;

/// How a surface scatters light in the path tracer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    #[default]
    Diffuse,
    Specular,
    Refractive,
}

/// A Phong/Fresnel material.
///
/// The `albedo` channels weight the Whitted terms linearly:
/// x = diffuse, y = specular highlight, z = reflection, w = refraction.
/// They are not required to sum to one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Material name (for logs and scene files)
    pub name: String,

    /// Scattering model used by the path tracer
    pub kind: MaterialKind,

    /// Diffuse color (RGB, 0-1)
    pub diffuse_color: DVec3,

    /// Emitted radiance (RGB, unbounded)
    pub emission: DVec3,

    /// Weights of diffuse, specular, reflection and refraction terms
    pub albedo: DVec4,

    /// Phong exponent of the specular highlight
    pub specular_exponent: f64,

    /// Index of refraction (1.0 = air, 1.5 = glass)
    pub refractive_index: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: MaterialKind::Diffuse,
            diffuse_color: DVec3::splat(0.5),
            emission: DVec3::ZERO,
            albedo: DVec4::new(1.0, 0.0, 0.0, 0.0),
            specular_exponent: 1.0,
            refractive_index: 1.0,
        }
    }
}

impl Material {
    /// Create a new diffuse material with just a name and diffuse color.
    pub fn new(name: impl Into<String>, diffuse_color: DVec3) -> Self {
        Self {
            name: name.into(),
            diffuse_color,
            ..Default::default()
        }
    }

    /// Set the scattering model.
    pub fn with_kind(mut self, kind: MaterialKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the emitted radiance.
    pub fn with_emission(mut self, emission: DVec3) -> Self {
        self.emission = emission;
        self
    }

    /// Set the Whitted term weights.
    pub fn with_albedo(mut self, albedo: DVec4) -> Self {
        self.albedo = albedo;
        self
    }

    /// Set the Phong exponent.
    pub fn with_specular_exponent(mut self, exponent: f64) -> Self {
        self.specular_exponent = exponent;
        self
    }

    /// Set the index of refraction.
    pub fn with_refractive_index(mut self, index: f64) -> Self {
        self.refractive_index = index;
        self
    }

    /// Check if this material emits light.
    pub fn is_emissive(&self) -> bool {
        self.emission.length_squared() > 0.0
    }

    pub fn ivory() -> Self {
        Self::new("ivory", DVec3::new(0.4, 0.4, 0.3))
            .with_albedo(DVec4::new(0.6, 0.3, 0.1, 0.0))
            .with_specular_exponent(50.0)
    }

    pub fn rubber() -> Self {
        Self::new("rubber", DVec3::new(0.3, 0.1, 0.1))
            .with_albedo(DVec4::new(0.9, 0.1, 0.0, 0.0))
            .with_specular_exponent(10.0)
    }

    pub fn mirror() -> Self {
        Self::new("mirror", DVec3::ONE)
            .with_kind(MaterialKind::Specular)
            .with_albedo(DVec4::new(0.0, 10.0, 0.8, 0.0))
            .with_specular_exponent(1425.0)
    }

    pub fn glass() -> Self {
        Self::new("glass", DVec3::new(0.6, 0.7, 0.8))
            .with_kind(MaterialKind::Refractive)
            .with_albedo(DVec4::new(0.0, 0.5, 0.1, 0.8))
            .with_specular_exponent(125.0)
            .with_refractive_index(1.5)
    }

    /// Diffuse emitter for path-traced scenes.
    pub fn light(radiance: f64) -> Self {
        Self::new("light", DVec3::splat(0.9))
            .with_emission(DVec3::splat(radiance))
            .with_albedo(DVec4::new(0.9, 0.1, 0.0, 0.0))
            .with_specular_exponent(10.0)
    }
}

/// A point light with scalar intensity (Whitted mode only).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: DVec3,
    pub intensity: f64,
}

impl PointLight {
    pub fn new(position: DVec3, intensity: f64) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

fn default_scale() -> f64 {
    1.0
}

/// Geometry of a shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Sphere {
        center: DVec3,
        radius: f64,
    },

    /// Infinite plane through `point`.
    Plane {
        normal: DVec3,
        point: DVec3,
    },

    /// Capped cylinder standing on `base`, axis along +Y.
    Cylinder {
        base: DVec3,
        radius: f64,
        height: f64,
    },

    /// Reference to a Wavefront OBJ file, placed with a uniform scale
    /// followed by a translation.
    Mesh {
        path: PathBuf,
        #[serde(default)]
        offset: DVec3,
        #[serde(default = "default_scale")]
        scale: f64,
    },

    /// Already-loaded mesh geometry (file references are resolved into this).
    #[serde(skip)]
    InlineMesh(Arc<Mesh>),
}

/// A piece of geometry with a material from the scene's table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Shape {
    pub geometry: Geometry,
    /// Index into `SceneDescription::materials`
    pub material: usize,
}

impl Shape {
    pub fn new(geometry: Geometry, material: usize) -> Self {
        Self { geometry, material }
    }
}

/// Everything needed to build a renderable scene.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    /// Scene name
    pub name: String,

    /// Material table
    pub materials: Vec<Material>,

    /// Shapes, in intersection order
    pub shapes: Vec<Shape>,

    /// Point lights
    pub lights: Vec<PointLight>,

    /// Preferred camera position, if the scene defines one
    pub camera_origin: Option<DVec3>,
}

impl SceneDescription {
    /// Create an empty scene description.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a material and return its index.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Add a shape referencing a material index.
    pub fn add_shape(&mut self, geometry: Geometry, material: usize) {
        self.shapes.push(Shape::new(geometry, material));
    }

    /// Add a point light.
    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    /// Index of the first shape whose material index is out of range.
    pub fn first_invalid_material(&self) -> Option<(usize, usize)> {
        self.shapes
            .iter()
            .enumerate()
            .find(|(_, shape)| shape.material >= self.materials.len())
            .map(|(i, shape)| (i, shape.material))
    }

    /// Total triangle count across inline meshes.
    pub fn total_triangle_count(&self) -> usize {
        self.shapes
            .iter()
            .map(|shape| match &shape.geometry {
                Geometry::InlineMesh(mesh) => mesh.triangle_count(),
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_materials() {
        assert_eq!(Material::ivory().kind, MaterialKind::Diffuse);
        assert_eq!(Material::mirror().kind, MaterialKind::Specular);
        assert_eq!(Material::glass().kind, MaterialKind::Refractive);
        assert_eq!(Material::glass().refractive_index, 1.5);
        assert!(Material::light(2.0).is_emissive());
        assert!(!Material::rubber().is_emissive());
    }

    #[test]
    fn test_invalid_material_detection() {
        let mut scene = SceneDescription::new("test");
        let ivory = scene.add_material(Material::ivory());
        scene.add_shape(
            Geometry::Sphere {
                center: DVec3::ZERO,
                radius: 1.0,
            },
            ivory,
        );
        assert!(scene.first_invalid_material().is_none());

        scene.add_shape(
            Geometry::Sphere {
                center: DVec3::ONE,
                radius: 1.0,
            },
            7,
        );
        assert_eq!(scene.first_invalid_material(), Some((1, 7)));
    }

    #[test]
    fn test_geometry_json_tagging() {
        let json = r#"{ "type": "sphere", "center": [0.0, 0.0, -5.0], "radius": 2.0 }"#;
        let geometry: Geometry = serde_json::from_str(json).unwrap();
        match geometry {
            Geometry::Sphere { center, radius } => {
                assert_eq!(center, DVec3::new(0.0, 0.0, -5.0));
                assert_eq!(radius, 2.0);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_material_json_defaults() {
        let json = r#"{ "name": "chrome", "kind": "specular", "diffuse_color": [0.9, 0.9, 0.9] }"#;
        let material: Material = serde_json::from_str(json).unwrap();
        assert_eq!(material.kind, MaterialKind::Specular);
        assert_eq!(material.refractive_index, 1.0);
        assert_eq!(material.emission, DVec3::ZERO);
    }
}
