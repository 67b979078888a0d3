//! lux - offline Whitted and path tracing renderer.
//!
//! Renders one of the built-in scenes or a JSON scene file to an image.
//! Without `--paths` the image is Whitted ray traced with point lights;
//! with `--paths N` every sub-pixel ray averages N Monte Carlo paths.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lux_core::{load_builtin, load_scene_file, SceneDescription};
use lux_math::DVec3;
use lux_renderer::{render, RenderOptions, Scene};

/// lux - render a scene to an image file
#[derive(Parser, Debug)]
#[command(
    name = "lux",
    version,
    about = "Offline Whitted / path tracing renderer",
    after_help = "EXAMPLES:\n  \
                  lux --scene 1 --output spheres.png\n  \
                  lux --scene 2 --paths 16 --supersampling 2 --output room.png\n  \
                  lux --scene-file scenes/bunny.json --width 640 --height 480"
)]
struct Cli {
    /// Built-in scene number (1-4)
    #[arg(short, long, default_value_t = 1, conflicts_with = "scene_file")]
    scene: u32,

    /// JSON scene file; OBJ paths inside are relative to it
    #[arg(long)]
    scene_file: Option<PathBuf>,

    /// Image width in pixels
    #[arg(short = 'W', long, default_value_t = 1024)]
    width: u32,

    /// Image height in pixels
    #[arg(short = 'H', long, default_value_t = 768)]
    height: u32,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 90.0)]
    fov: f64,

    /// Recursion limit (Whitted) or Russian roulette threshold (paths)
    #[arg(long, default_value_t = 5)]
    max_recursion: u32,

    /// Sub-pixel grid resolution per axis (N gives N×N rays per pixel)
    #[arg(long, default_value_t = 1)]
    supersampling: u32,

    /// Paths per sub-pixel ray; 0 renders with the Whitted tracer
    #[arg(long, default_value_t = 0)]
    paths: u32,

    /// Camera position as x,y,z; overrides the scene's own
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_vec3, allow_hyphen_values = true)]
    camera: Option<DVec3>,

    /// Seed for path sampling
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Worker threads (defaults to one per core)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Output image; format follows the extension
    #[arg(short, long, default_value = "out.bmp")]
    output: PathBuf,
}

fn parse_vec3(value: &str) -> std::result::Result<DVec3, String> {
    let components = value
        .split(',')
        .map(|c| c.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{value}': {e}"))?;

    match components[..] {
        [x, y, z] => Ok(DVec3::new(x, y, z)),
        _ => Err(format!(
            "expected 3 comma-separated values, got {}",
            components.len()
        )),
    }
}

impl Cli {
    fn load_description(&self) -> Result<SceneDescription> {
        match &self.scene_file {
            Some(path) => load_scene_file(path)
                .with_context(|| format!("Failed to load scene file {}", path.display())),
            None => load_builtin(self.scene)
                .with_context(|| format!("Failed to load built-in scene {}", self.scene)),
        }
    }

    fn render_options(&self, description: &SceneDescription) -> RenderOptions {
        let camera_origin = self
            .camera
            .or(description.camera_origin)
            .unwrap_or(DVec3::ZERO);

        RenderOptions::default()
            .with_size(self.width, self.height)
            .with_fov(self.fov.to_radians())
            .with_max_recursion(self.max_recursion)
            .with_supersampling(self.supersampling)
            .with_paths(self.paths)
            .with_camera_origin(camera_origin)
            .with_seed(self.seed)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the thread pool")?;
    }

    let start = Instant::now();
    let description = cli.load_description()?;
    let scene = Scene::from_description(&description).context("Failed to build scene")?;
    log::info!("Scene built in {:.2?}", start.elapsed());

    let options = cli.render_options(&description);

    let start = Instant::now();
    let image = render(&scene, &options);
    log::info!("Render finished in {:.2?}", start.elapsed());

    image
        .save(&cli.output)
        .with_context(|| format!("Failed to save image to {}", cli.output.display()))?;

    Ok(())
}
