//! lux renderer - CPU ray tracing
//!
//! A Whitted ray tracer and a Monte Carlo path tracer over spheres, planes,
//! cylinders and triangle meshes. Meshes are accelerated with a Morton-code
//! BVH; images are rendered in parallel buckets.

mod bucket;
mod bvh;
mod camera;
mod cylinder;
mod integrator;
mod mesh;
mod object;
mod plane;
mod renderer;
mod scene;
mod sphere;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::{Bvh, BvhNode, DEFAULT_LEAF_DELTA};
pub use camera::Camera;
pub use cylinder::Cylinder;
pub use integrator::{
    fresnel, reflect, refract, render_path, render_ray, russian_roulette, Fresnel, BACKGROUND,
    ROULETTE_DEPTH,
};
pub use mesh::{Triangle, TriangleMesh};
pub use object::{Intersection, Object};
pub use plane::Plane;
pub use renderer::{color_to_rgb8, render, render_pixel, ImageBuffer, RenderOptions};
pub use scene::{Scene, SceneError};
pub use sphere::Sphere;

/// Scene data types used by the renderer
pub use lux_core::{Material, MaterialKind, PointLight};
pub use lux_math::{Aabb, DVec3, Ray};
