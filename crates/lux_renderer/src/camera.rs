//! Pinhole camera for primary ray generation.

use std::f64::consts::FRAC_PI_2;

use lux_math::{DVec2, DVec3, Ray};

use crate::renderer::RenderOptions;

/// Pinhole camera looking down -Z with +Y up.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Image width in pixels
    pub image_width: u32,
    /// Image height in pixels
    pub image_height: u32,
    origin: DVec3,
    /// Vertical field of view in radians
    fov: f64,
}

impl Camera {
    /// Create a camera at the origin with a 90° field of view.
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            origin: DVec3::ZERO,
            fov: FRAC_PI_2,
        }
    }

    /// Camera matching the resolution, position and fov of `options`.
    pub fn from_options(options: &RenderOptions) -> Self {
        Self::new(options.size.x, options.size.y)
            .with_position(options.camera_origin)
            .with_fov(options.fov)
    }

    /// Set camera position.
    pub fn with_position(mut self, origin: DVec3) -> Self {
        self.origin = origin;
        self
    }

    /// Set vertical field of view (radians).
    pub fn with_fov(mut self, fov: f64) -> Self {
        self.fov = fov;
        self
    }

    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Ray through pixel `(x, y)` at sub-pixel `offset` in [0, 1)².
    ///
    /// Pixel rows count down from the top of the image.
    pub fn ray(&self, x: u32, y: u32, offset: DVec2) -> Ray {
        let width = self.image_width.max(1) as f64;
        let height = self.image_height.max(1) as f64;
        let scale = (self.fov / 2.0).tan();
        let aspect = width / height;

        let px = (2.0 * (x as f64 + offset.x) / width - 1.0) * scale * aspect;
        let py = -(2.0 * (y as f64 + offset.y) / height - 1.0) * scale;

        Ray::new(self.origin, DVec3::new(px, py, -1.0).normalize())
    }
}
