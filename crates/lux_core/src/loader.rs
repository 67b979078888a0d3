//! High-level scene loading.
//!
//! Scenes come either from the built-in tables or from JSON files. Mesh
//! references in a JSON file are resolved relative to the file and loaded
//! eagerly, so the returned description is self-contained.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::builtin;
use crate::mesh::Mesh;
use crate::obj::{load_obj, ParseError};
use crate::scene::{Geometry, SceneDescription};

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("OBJ error in {path:?}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Unknown built-in scene: {0}")]
    UnknownScene(u32),

    #[error("Shape {shape} references missing material {material}")]
    InvalidMaterial { shape: usize, material: usize },
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Load one of the built-in scenes by number.
pub fn load_builtin(number: u32) -> LoadResult<SceneDescription> {
    let scene = builtin::scene(number)?;
    log::info!(
        "Built-in scene {} '{}': {} shapes, {} lights",
        number,
        scene.name,
        scene.shapes.len(),
        scene.lights.len()
    );
    Ok(scene)
}

/// Load a JSON scene file.
///
/// # Example
///
/// ```ignore
/// use lux_core::load_scene_file;
///
/// let scene = load_scene_file("scenes/bunny.json")?;
/// println!("{} triangles", scene.total_triangle_count());
/// ```
pub fn load_scene_file<P: AsRef<Path>>(path: P) -> LoadResult<SceneDescription> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut scene = parse_scene(&content, base_dir)?;
    if scene.name.is_empty() {
        scene.name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unnamed")
            .to_string();
    }

    log::info!(
        "Loaded scene '{}' from {:?}: {} shapes, {} triangles, {} lights",
        scene.name,
        path,
        scene.shapes.len(),
        scene.total_triangle_count(),
        scene.lights.len()
    );

    Ok(scene)
}

/// Parse JSON scene text, resolving mesh paths against `base_dir`.
pub fn parse_scene(content: &str, base_dir: &Path) -> LoadResult<SceneDescription> {
    let mut scene: SceneDescription = serde_json::from_str(content)?;

    if let Some((shape, material)) = scene.first_invalid_material() {
        return Err(LoadError::InvalidMaterial { shape, material });
    }

    // The same file may be placed several times; parse it once.
    let mut cache: HashMap<PathBuf, Arc<Mesh>> = HashMap::new();

    for shape in &mut scene.shapes {
        if let Geometry::Mesh {
            path,
            offset,
            scale,
        } = &shape.geometry
        {
            let full_path = base_dir.join(path);
            let mesh = match cache.get(&full_path) {
                Some(mesh) => mesh.clone(),
                None => {
                    let mesh = Arc::new(load_obj(&full_path).map_err(|source| LoadError::Obj {
                        path: full_path.clone(),
                        source,
                    })?);
                    cache.insert(full_path, mesh.clone());
                    mesh
                }
            };
            shape.geometry = Geometry::InlineMesh(Arc::new(mesh.transformed(*offset, *scale)));
        }
    }

    Ok(scene)
}
