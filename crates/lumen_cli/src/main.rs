//! `lumen`: render a scene file (or the built-in demo scene) to an image.

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::{
    load_scene, Background, CameraConfig, MaterialDesc, ObjectDesc, SceneDescription, TextureRef,
};
use lumen_math::{Color, Vec3};
use lumen_renderer::{build_world, render, render_parallel, save_image, write_ppm, Camera};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

#[derive(Parser, Debug)]
#[command(name = "lumen", version, about = "Offline Monte Carlo path tracer")]
struct Args {
    /// JSON scene file; renders the built-in three-sphere scene when omitted
    scene: Option<PathBuf>,

    /// Output image; `.ppm` is written as text PPM, other extensions through
    /// the image encoders, `-` writes PPM to stdout
    #[arg(short, long, default_value = "image.ppm")]
    output: PathBuf,

    /// Seed for sampling and procedural textures
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Override the image width
    #[arg(long)]
    width: Option<u32>,

    /// Override samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Override the maximum bounce depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Render scanlines across all cores
    #[arg(long)]
    parallel: bool,
}

impl Args {
    fn apply_overrides(&self, camera: &mut CameraConfig) {
        if let Some(width) = self.width {
            camera.image_width = width;
        }
        if let Some(samples) = self.samples {
            camera.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            camera.max_depth = max_depth;
        }
    }

    fn writes_to_stdout(&self) -> bool {
        self.output.as_os_str() == "-"
    }
}

/// Ground, two glass spheres and a fuzzy gold sphere.
fn three_spheres() -> SceneDescription {
    let mut scene = SceneDescription {
        camera: CameraConfig::new()
            .with_image(400, 16.0 / 9.0)
            .with_quality(50, 10)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
            .with_background(Background::Solid(Color::new(0.70, 0.80, 1.00))),
        ..Default::default()
    };

    scene.materials.insert(
        "ground".into(),
        MaterialDesc::Lambertian {
            albedo: TextureRef::Color(Color::new(0.8, 0.8, 0.0)),
        },
    );
    scene.materials.insert(
        "glass".into(),
        MaterialDesc::Dielectric {
            refraction_index: 1.5,
        },
    );
    scene.materials.insert(
        "gold".into(),
        MaterialDesc::Metal {
            albedo: Color::new(0.8, 0.6, 0.2),
            fuzz: 1.0,
        },
    );

    let sphere = |center: Vec3, radius: f32, material: &str| ObjectDesc::Sphere {
        center,
        center_end: None,
        radius,
        material: material.into(),
    };
    scene.objects = vec![
        sphere(Vec3::new(0.0, -100.5, -1.0), 100.0, "ground"),
        sphere(Vec3::new(0.0, 0.0, -1.0), 0.5, "glass"),
        sphere(Vec3::new(-1.0, 0.0, -1.0), 0.5, "glass"),
        sphere(Vec3::new(1.0, 0.0, -1.0), 0.5, "gold"),
    ];

    scene
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut scene = match &args.scene {
        Some(path) => load_scene(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            log::info!("No scene given, rendering the built-in three-sphere scene");
            three_spheres()
        }
    };

    args.apply_overrides(&mut scene.camera);
    scene.validate().context("Invalid scene settings")?;

    let start = Instant::now();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(args.seed);
    let world = build_world(&scene, &mut rng).context("Failed to build world")?;
    log::info!("World built in {:.2?} ({} primitives)", start.elapsed(), world.len());

    let camera = Camera::new(&scene.camera);
    let image = if args.parallel {
        render_parallel(&camera, &world, args.seed)
    } else {
        render(&camera, &world, args.seed)
    };

    if args.writes_to_stdout() {
        let stdout = io::stdout();
        write_ppm(&image, BufWriter::new(stdout.lock())).context("Failed to write image to stdout")?;
    } else {
        save_image(&image, &args.output)
            .with_context(|| format!("Failed to save image {}", args.output.display()))?;
    }

    Ok(())
}
