//! Three-sphere path tracer example.
//!
//! Renders a ground plane with glass and metal spheres plus a checkered
//! emissive panel and saves the result as PPM.

use lumen_renderer::{
    render_parallel, save_image, Background, Camera, CameraConfig, Color, HittableList, Material,
    Quad, Sphere, Texture, Vec3,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Lumen Path Tracer - Three Spheres");
    println!("=================================");

    let start = std::time::Instant::now();
    let world = build_scene();
    println!("Scene built in {:?} ({} primitives)", start.elapsed(), world.len());

    let config = CameraConfig::new()
        .with_image(400, 16.0 / 9.0)
        .with_quality(50, 10)
        .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(90.0, 0.0, 1.0)
        .with_background(Background::Sky);
    let camera = Camera::new(&config);

    println!(
        "Rendering {}x{} @ {} spp...",
        camera.image_width, camera.image_height, camera.samples_per_pixel
    );

    let start = std::time::Instant::now();
    let image = render_parallel(&camera, &world, 42);
    println!("Rendered in {:?}", start.elapsed());

    let filename = "three_spheres.ppm";
    if let Err(e) = save_image(&image, filename) {
        eprintln!("Failed to save {}: {}", filename, e);
        std::process::exit(1);
    }
    println!("Saved to {}", filename);
}

fn build_scene() -> HittableList {
    let mut world = HittableList::new();

    // Ground
    world.add(Sphere::new(
        Vec3::new(0.0, -100.5, -1.0),
        100.0,
        Material::lambertian(Color::new(0.8, 0.8, 0.0)),
    ));

    // Glass spheres in the middle and on the left
    world.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Material::dielectric(1.5)));
    world.add(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, Material::dielectric(1.5)));

    // Fuzzy gold on the right
    world.add(Sphere::new(
        Vec3::new(1.0, 0.0, -1.0),
        0.5,
        Material::metal(Color::new(0.8, 0.6, 0.2), 1.0),
    ));

    // Dim checkered panel behind everything
    let checks = Texture::checker(0.25, Color::splat(0.6), Color::splat(0.1));
    world.add(Quad::new(
        Vec3::new(-2.0, -0.5, -3.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        Material::diffuse_light_texture(checks),
    ));

    world
}
