//! Built-in scene tables.
//!
//! - 1: four spheres of different materials over an ivory floor, three lights
//! - 2: closed room of six huge walls with a mirror and a glass sphere and
//!   an emissive ceiling; intended for path tracing
//! - 3: empty
//! - 4: a tessellated glass ball, a rubber cylinder and a mirror sphere on a
//!   floor; exercises the mesh BVH

use std::f64::consts::PI;
use std::sync::Arc;

use lux_math::DVec3;

use crate::loader::{LoadError, LoadResult};
use crate::mesh::Mesh;
use crate::scene::{Geometry, Material, PointLight, SceneDescription};

/// Numbers accepted by [`scene`].
pub const SCENE_NUMBERS: [u32; 4] = [1, 2, 3, 4];

/// Build one of the built-in scenes.
pub fn scene(number: u32) -> LoadResult<SceneDescription> {
    match number {
        1 => Ok(scene_1()),
        2 => Ok(scene_2()),
        3 => Ok(SceneDescription::new("empty")),
        4 => Ok(scene_4()),
        _ => Err(LoadError::UnknownScene(number)),
    }
}

fn sphere(center: DVec3, radius: f64) -> Geometry {
    Geometry::Sphere { center, radius }
}

fn scene_1() -> SceneDescription {
    let mut scene = SceneDescription::new("spheres");
    let ivory = scene.add_material(Material::ivory());
    let glass = scene.add_material(Material::glass());
    let rubber = scene.add_material(Material::rubber());
    let mirror = scene.add_material(Material::mirror());

    scene.add_shape(sphere(DVec3::new(-3.0, 0.0, -16.0), 2.0), ivory);
    scene.add_shape(sphere(DVec3::new(-1.0, -1.5, -12.0), 2.0), glass);
    scene.add_shape(sphere(DVec3::new(1.5, -0.5, -18.0), 3.0), rubber);
    scene.add_shape(sphere(DVec3::new(7.0, 5.0, -18.0), 4.0), mirror);
    scene.add_shape(
        Geometry::Plane {
            normal: DVec3::Y,
            point: DVec3::new(0.0, -3.5, 0.0),
        },
        ivory,
    );

    scene.add_light(PointLight::new(DVec3::new(-20.0, 20.0, 20.0), 1.5));
    scene.add_light(PointLight::new(DVec3::new(30.0, 50.0, -25.0), 1.8));
    scene.add_light(PointLight::new(DVec3::new(30.0, 20.0, 30.0), 1.7));

    scene
}

fn scene_2() -> SceneDescription {
    let mut scene = SceneDescription::new("room");
    let ivory = scene.add_material(Material::ivory());
    let mirror = scene.add_material(Material::mirror());
    let glass = scene.add_material(Material::glass());
    let light = scene.add_material(Material::light(4.0));

    // Walls are spheres so large they are locally flat
    let r = 1e5;
    scene.add_shape(sphere(DVec3::new(r + 20.0, 0.0, -20.0), r), ivory);
    scene.add_shape(sphere(DVec3::new(-r - 20.0, 0.0, -20.0), r), ivory);
    scene.add_shape(sphere(DVec3::new(0.0, 0.0, r + 40.0), r), ivory);
    scene.add_shape(sphere(DVec3::new(0.0, 0.0, -r - 40.0), r), ivory);
    scene.add_shape(sphere(DVec3::new(0.0, -r - 20.0, -20.0), r), ivory);
    scene.add_shape(sphere(DVec3::new(0.0, r + 20.0, -20.0), r), ivory);

    scene.add_shape(sphere(DVec3::new(8.0, -12.0, -24.0), 8.0), mirror);
    scene.add_shape(sphere(DVec3::new(-10.0, -15.0, -25.0), 5.0), glass);
    scene.add_shape(sphere(DVec3::new(0.0, 619.9, -20.0), 600.0), light);

    scene.add_light(PointLight::new(DVec3::new(0.0, 5.0, -20.0), 1.5));

    scene
}

fn scene_4() -> SceneDescription {
    let mut scene = SceneDescription::new("mesh");
    let ivory = scene.add_material(Material::ivory());
    let glass = scene.add_material(Material::glass());
    let rubber = scene.add_material(Material::rubber());
    let mirror = scene.add_material(Material::mirror());

    let ball = uv_sphere(24, 48).transformed(DVec3::new(-2.5, -1.0, -12.0), 2.0);
    scene.add_shape(Geometry::InlineMesh(Arc::new(ball)), glass);
    scene.add_shape(
        Geometry::Cylinder {
            base: DVec3::new(3.0, -3.0, -15.0),
            radius: 1.5,
            height: 4.0,
        },
        rubber,
    );
    scene.add_shape(sphere(DVec3::new(0.0, 2.0, -22.0), 4.0), mirror);
    scene.add_shape(
        Geometry::Plane {
            normal: DVec3::Y,
            point: DVec3::new(0.0, -3.0, 0.0),
        },
        ivory,
    );

    scene.add_light(PointLight::new(DVec3::new(-20.0, 20.0, 20.0), 1.5));
    scene.add_light(PointLight::new(DVec3::new(30.0, 20.0, 30.0), 1.7));

    scene
}

/// Unit sphere tessellated into `stacks × slices` quads, split into
/// triangles, with analytic normals.
pub fn uv_sphere(stacks: u32, slices: u32) -> Mesh {
    let mut positions = Vec::new();
    for i in 0..=stacks {
        let theta = PI * i as f64 / stacks as f64;
        for j in 0..=slices {
            let phi = 2.0 * PI * j as f64 / slices as f64;
            positions.push(DVec3::new(
                theta.sin() * phi.cos(),
                theta.cos(),
                -theta.sin() * phi.sin(),
            ));
        }
    }

    let row = slices + 1;
    let mut indices = Vec::new();
    for i in 0..stacks {
        for j in 0..slices {
            let a = i * row + j;
            let b = a + row;
            if i != 0 {
                indices.extend_from_slice(&[a, b, a + 1]);
            }
            if i != stacks - 1 {
                indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }

    let normals = positions.clone();
    Mesh::new(positions, indices, Some(normals))
}
