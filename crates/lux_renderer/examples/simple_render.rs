//! Build a scene in code and path trace it.
//!
//! Writes `simple_render.png` to the working directory.

use std::sync::Arc;

use lux_core::builtin::uv_sphere;
use lux_renderer::{
    render, Cylinder, DVec3, Material, Plane, PointLight, RenderOptions, Scene, Sphere,
    TriangleMesh,
};

fn main() {
    println!("lux - Simple Example");
    println!("====================");

    let start = std::time::Instant::now();
    let scene = build_scene();
    println!("Scene built in {:?}", start.elapsed());

    let options = RenderOptions::default()
        .with_size(400, 300)
        .with_paths(8)
        .with_supersampling(2)
        .with_camera_origin(DVec3::new(0.0, 0.5, 0.0));

    println!(
        "Rendering {}x{} @ {} paths x {} sub-pixel rays...",
        options.size.x,
        options.size.y,
        options.paths_per_pixel,
        options.supersampling_rays * options.supersampling_rays
    );

    let start = std::time::Instant::now();
    let image = render(&scene, &options);
    println!("Rendered in {:?}", start.elapsed());

    let filename = "simple_render.png";
    image.save(filename).expect("Failed to save image");
    println!("Saved to {}", filename);
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    scene.add(Plane::new(
        DVec3::Y,
        DVec3::new(0.0, -2.0, 0.0),
        Arc::new(Material::ivory()),
    ));
    scene.add(Sphere::new(
        DVec3::new(-3.0, 0.0, -10.0),
        2.0,
        Arc::new(Material::mirror()),
    ));
    scene.add(Cylinder::new(
        DVec3::new(3.0, -2.0, -11.0),
        1.2,
        3.0,
        Arc::new(Material::rubber()),
    ));

    let ball = uv_sphere(16, 32).transformed(DVec3::new(0.0, -0.5, -7.0), 1.5);
    scene.add(TriangleMesh::new(&ball, Arc::new(Material::glass())));

    // Overhead area light for the path tracer, point light for Whitted mode
    scene.add(Sphere::new(
        DVec3::new(0.0, 60.0, -10.0),
        50.0,
        Arc::new(Material::light(3.0)),
    ));
    scene.add_light(PointLight::new(DVec3::new(-10.0, 8.0, 5.0), 1.5));

    scene
}
