//! Scene description for the lux ray tracer.
//!
//! Nothing here knows how to intersect a ray. Scenes are plain data built
//! from the numbered [`builtin`] tables or read from JSON with OBJ meshes,
//! then handed to `lux_renderer`.
//!
//! ```ignore
//! let scene = lux_core::load_builtin(1)?;
//! assert!(scene.first_invalid_material().is_none());
//! ```

pub mod builtin;
pub mod loader;
pub mod mesh;
pub mod obj;
pub mod scene;

pub use loader::{load_builtin, load_scene_file, LoadError, LoadResult};
pub use mesh::Mesh;
pub use scene::{Geometry, Material, MaterialKind, PointLight, SceneDescription, Shape};
