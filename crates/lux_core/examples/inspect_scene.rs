//! Print a summary of a scene without rendering it.
//!
//! ```text
//! cargo run -p lux_core --example inspect_scene -- 3
//! cargo run -p lux_core --example inspect_scene -- scenes/bunny.json
//! ```

use lux_core::{load_builtin, load_scene_file, Geometry, SceneDescription};

fn describe(geometry: &Geometry) -> String {
    match geometry {
        Geometry::Sphere { center, radius } => format!("sphere at {center} r={radius}"),
        Geometry::Plane { normal, point } => format!("plane through {point} n={normal}"),
        Geometry::Cylinder {
            base,
            radius,
            height,
        } => format!("cylinder at {base} r={radius} h={height}"),
        Geometry::Mesh { path, .. } => format!("unresolved mesh {}", path.display()),
        Geometry::InlineMesh(mesh) => format!(
            "mesh with {} triangles, bounds {} .. {}",
            mesh.triangle_count(),
            mesh.bounds.min,
            mesh.bounds.max
        ),
    }
}

fn print_summary(scene: &SceneDescription) {
    println!(
        "{}: {} materials, {} shapes ({} triangles), {} lights",
        scene.name,
        scene.materials.len(),
        scene.shapes.len(),
        scene.total_triangle_count(),
        scene.lights.len()
    );
    for (i, shape) in scene.shapes.iter().enumerate() {
        let material = scene
            .materials
            .get(shape.material)
            .map_or("<missing>", |m| m.name.as_str());
        println!("{i:>4}  {:<12} {}", material, describe(&shape.geometry));
    }
    for light in &scene.lights {
        println!("      light at {} intensity {}", light.position, light.intensity);
    }
}

fn main() {
    env_logger::init();

    let Some(arg) = std::env::args().nth(1) else {
        eprintln!("usage: inspect_scene <scene-number | scene.json>");
        std::process::exit(2);
    };

    let loaded = match arg.parse::<u32>() {
        Ok(number) => load_builtin(number),
        Err(_) => load_scene_file(&arg),
    };

    match loaded {
        Ok(scene) => print_summary(&scene),
        Err(e) => {
            eprintln!("Failed to load {arg}: {e}");
            std::process::exit(1);
        }
    }
}
