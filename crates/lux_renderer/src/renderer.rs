//! Image rendering driver.
//!
//! Implements:
//! - Whitted ray tracing or path tracing per pixel, selected by `paths_per_pixel`
//! - Stratified supersampling on an `s × s` sub-pixel grid
//! - Parallel bucket rendering on the rayon pool with per-bucket RNG streams
//! - Gamma correction for path-traced output

use std::f64::consts::FRAC_PI_2;
use std::path::Path;

use lux_math::{DVec2, DVec3, UVec2};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::Camera;
use crate::integrator::{render_path, render_ray};
use crate::scene::Scene;

/// Display gamma applied to path-traced images.
const GAMMA: f64 = 2.2;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Image size in pixels
    pub size: UVec2,
    /// Vertical field of view in radians
    pub fov: f64,
    /// Recursion depth: hard limit for Whitted, roulette threshold for paths
    pub max_recursion: u32,
    /// Sub-pixel grid resolution per axis (0 behaves as 1)
    pub supersampling_rays: u32,
    /// Paths per sub-pixel ray; 0 selects Whitted ray tracing
    pub paths_per_pixel: u32,
    pub camera_origin: DVec3,
    /// Base seed of the per-bucket RNG streams
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: UVec2::new(1024, 768),
            fov: FRAC_PI_2,
            max_recursion: 5,
            supersampling_rays: 1,
            paths_per_pixel: 0,
            camera_origin: DVec3::ZERO,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderOptions {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = UVec2::new(width, height);
        self
    }

    pub fn with_fov(mut self, fov: f64) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_max_recursion(mut self, max_recursion: u32) -> Self {
        self.max_recursion = max_recursion;
        self
    }

    pub fn with_supersampling(mut self, rays: u32) -> Self {
        self.supersampling_rays = rays;
        self
    }

    pub fn with_paths(mut self, paths_per_pixel: u32) -> Self {
        self.paths_per_pixel = paths_per_pixel;
        self
    }

    pub fn with_camera_origin(mut self, origin: DVec3) -> Self {
        self.camera_origin = origin;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = bucket_size;
        self
    }

    /// True when pixels are path traced rather than Whitted traced.
    pub fn is_path_tracing(&self) -> bool {
        self.paths_per_pixel > 0
    }

    /// Only path-traced output is gamma corrected.
    pub fn applies_gamma(&self) -> bool {
        self.is_path_tracing()
    }
}

/// Render a single pixel.
///
/// Averages an `s × s` grid of stratified sub-pixel rays, each either Whitted
/// traced or averaged over `paths_per_pixel` paths.
pub fn render_pixel(
    scene: &Scene,
    camera: &Camera,
    x: u32,
    y: u32,
    options: &RenderOptions,
    rng: &mut dyn RngCore,
) -> DVec3 {
    let s = options.supersampling_rays.max(1);
    let mut pixel_color = DVec3::ZERO;

    for sy in 0..s {
        for sx in 0..s {
            let offset = DVec2::new(
                (sx as f64 + 0.5) / s as f64,
                (sy as f64 + 0.5) / s as f64,
            );
            let ray = camera.ray(x, y, offset);

            pixel_color += if options.is_path_tracing() {
                let paths = options.paths_per_pixel;
                let sum: DVec3 = (0..paths)
                    .map(|_| render_path(scene, &ray, 0, options.max_recursion, rng))
                    .sum();
                sum / paths as f64
            } else {
                render_ray(scene, &ray, 0, options.max_recursion)
            };
        }
    }

    pixel_color /= (s * s) as f64;

    if options.applies_gamma() {
        pixel_color = pixel_color.powf(1.0 / GAMMA);
    }
    pixel_color
}

/// Render the entire scene in parallel buckets.
///
/// Output is deterministic for a given seed and bucket size.
pub fn render(scene: &Scene, options: &RenderOptions) -> ImageBuffer {
    let (width, height) = (options.size.x, options.size.y);
    let camera = Camera::from_options(options);
    let buckets = generate_buckets(width, height, options.bucket_size);

    log::info!(
        "Rendering {}x{} ({} mode, {}x{} supersampling) in {} buckets on {} threads",
        width,
        height,
        if options.is_path_tracing() { "path" } else { "whitted" },
        options.supersampling_rays.max(1),
        options.supersampling_rays.max(1),
        buckets.len(),
        rayon::current_num_threads()
    );

    let results: Vec<BucketResult> = buckets
        .into_par_iter()
        .map(|bucket| {
            let mut rng = SmallRng::seed_from_u64(bucket.seed(options.seed));
            let pixels = render_bucket(&bucket, &camera, scene, options, &mut rng);
            log::debug!(
                "Bucket {} at ({}, {}) done",
                bucket.index,
                bucket.x,
                bucket.y
            );
            BucketResult::new(bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(width, height);
    for result in &results {
        image.write_bucket(result);
    }
    image
}

/// Convert a linear color component to 8 bits: clamp to [0, 1], then round.
#[inline]
fn to_u8(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert a color to 8-bit RGB.
pub fn color_to_rgb8(color: DVec3) -> [u8; 3] {
    [to_u8(color.x), to_u8(color.y), to_u8(color.z)]
}

/// Row-major buffer of linear colors.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<DVec3>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![DVec3::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> DVec3 {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: DVec3) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Convert to packed RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgb8(*c)).collect()
    }

    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(color_to_rgb8(self.get(x, y)))
        })
    }

    /// Save to disk; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> image::ImageResult<()> {
        let path = path.as_ref();
        self.to_image().save(path)?;
        log::info!("Saved {}x{} image to {:?}", self.width, self.height, path);
        Ok(())
    }
}
