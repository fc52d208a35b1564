//! Example: Load and inspect a scene file.
//!
//! Run with: cargo run --example inspect_scene -- scenes/cornell_box.json

use std::env;

use lumen_core::{load_scene, ObjectDesc};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_scene <path-to-scene.json>");
        println!("\nExamples:");
        println!("  cargo run --example inspect_scene -- scenes/three_spheres.json");
        println!("  cargo run --example inspect_scene -- scenes/cornell_box.json");
        return;
    }

    let path = &args[1];
    println!("Loading scene file: {}", path);

    match load_scene(path) {
        Ok(scene) => {
            let camera = &scene.camera;
            println!(
                "\n=== Camera: {}x{} @ {} spp, depth {} ===",
                camera.image_width,
                camera.image_height(),
                camera.samples_per_pixel,
                camera.max_depth
            );
            println!("Textures: {}", scene.textures.len());
            for name in scene.textures.keys() {
                println!("  {}", name);
            }
            println!("Materials: {}", scene.materials.len());
            for (name, material) in &scene.materials {
                println!("  {}: {:?}", name, material);
            }
            println!("Objects: {}", scene.objects.len());
            for object in &scene.objects {
                let kind = match object {
                    ObjectDesc::Sphere { .. } => "sphere",
                    ObjectDesc::Quad { .. } => "quad",
                    ObjectDesc::Cuboid { .. } => "box",
                };
                println!("  {} ({})", kind, object.material());
            }
        }
        Err(e) => {
            eprintln!("Failed to load scene: {}", e);
            std::process::exit(1);
        }
    }
}
