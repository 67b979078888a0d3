//! Image tiling for parallel rendering.
//!
//! The image is cut into square buckets, ordered centre-out so the middle
//! of the frame finishes first. Each bucket is an independent unit of work
//! with its own RNG stream.

use lux_math::DVec3;
use rand::RngCore;

use crate::camera::Camera;
use crate::renderer::{render_pixel, RenderOptions};
use crate::scene::Scene;

/// Default bucket edge length in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// A rectangular tile of the image, clipped at the right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Left column
    pub x: u32,
    /// Top row
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Image coordinates covered by this bucket, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let Bucket {
            x, y, width, height, ..
        } = *self;
        (y..y + height).flat_map(move |py| (x..x + width).map(move |px| (px, py)))
    }

    /// Seed for this bucket's RNG stream.
    ///
    /// Depends only on the render seed and the bucket's position, so the
    /// image does not change with thread count or scheduling.
    pub fn seed(&self, base: u64) -> u64 {
        let position = (u64::from(self.y) << 32) | u64::from(self.x);
        base ^ position.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    /// Squared distance from the bucket's center to `(cx, cy)`.
    fn distance_squared(&self, cx: f64, cy: f64) -> f64 {
        let bx = self.x as f64 + self.width as f64 / 2.0;
        let by = self.y as f64 + self.height as f64 / 2.0;
        (bx - cx).powi(2) + (by - cy).powi(2)
    }
}

/// Tile a `width × height` image, nearest-to-center buckets first.
///
/// A `bucket_size` of zero is treated as one.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = bucket_size.max(1);

    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(size as usize)
        .flat_map(|y| {
            (0..width).step_by(size as usize).map(move |x| {
                Bucket::new(x, y, size.min(width - x), size.min(height - y), 0)
            })
        })
        .collect();

    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
    buckets.sort_by(|a, b| {
        a.distance_squared(cx, cy)
            .total_cmp(&b.distance_squared(cx, cy))
    });

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }
    buckets
}

/// Render every pixel of `bucket`, in the order of [`Bucket::pixels`].
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    scene: &Scene,
    options: &RenderOptions,
    rng: &mut dyn RngCore,
) -> Vec<DVec3> {
    bucket
        .pixels()
        .map(|(x, y)| render_pixel(scene, camera, x, y, options, &mut *rng))
        .collect()
}

/// A finished bucket waiting to be copied into the image.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub pixels: Vec<DVec3>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<DVec3>) -> Self {
        Self { bucket, pixels }
    }
}
