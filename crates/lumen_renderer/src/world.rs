//! Building renderable worlds from scene descriptions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use lumen_core::{
    ImageCache, MaterialDesc, ObjectDesc, SceneDescription, SceneError, SceneResult, TextureDesc,
    TextureRef,
};
use rand::RngCore;

use crate::{make_box, HittableList, Material, Quad, Sphere, Texture};

/// Turns a [`SceneDescription`] into primitives, sharing textures, images
/// and materials by name.
struct WorldBuilder<'s> {
    scene: &'s SceneDescription,
    images: ImageCache,
    textures: HashMap<&'s str, Texture>,
    /// Named textures currently being resolved
    resolving: HashSet<&'s str>,
}

impl<'s> WorldBuilder<'s> {
    fn new(scene: &'s SceneDescription) -> Self {
        let images = match &scene.base_dir {
            Some(dir) => ImageCache::with_base_dir(dir),
            None => ImageCache::new(),
        };

        Self {
            scene,
            images,
            textures: HashMap::new(),
            resolving: HashSet::new(),
        }
    }

    fn texture_ref(&mut self, texture: &'s TextureRef, rng: &mut dyn RngCore) -> SceneResult<Texture> {
        match texture {
            TextureRef::Color(color) => Ok(Texture::solid(*color)),
            TextureRef::Named(name) => self.named_texture(name, rng),
        }
    }

    fn named_texture(&mut self, name: &'s str, rng: &mut dyn RngCore) -> SceneResult<Texture> {
        if let Some(texture) = self.textures.get(name) {
            return Ok(texture.clone());
        }

        let scene = self.scene;
        let desc = scene
            .textures
            .get(name)
            .ok_or_else(|| SceneError::UnknownTexture(name.to_string()))?;

        let texture = match desc {
            TextureDesc::Solid { color } => Texture::solid(*color),
            TextureDesc::Checker { scale, even, odd } => {
                if !self.resolving.insert(name) {
                    return Err(SceneError::TextureCycle(name.to_string()));
                }
                let children = self
                    .texture_ref(even, rng)
                    .and_then(|even| Ok((even, self.texture_ref(odd, rng)?)));
                self.resolving.remove(name);

                let (even, odd) = children?;
                Texture::checker_textures(*scale, even, odd)
            }
            TextureDesc::Image { path } => match self.images.load(path) {
                Ok(image) => Texture::image(image),
                Err(e) => {
                    log::warn!(
                        "Texture '{}': could not load {}: {}",
                        name,
                        scene.resolve_path(path).display(),
                        e
                    );
                    Texture::missing_image()
                }
            },
            TextureDesc::Noise { scale } => Texture::noise(*scale, rng),
        };

        self.textures.insert(name, texture.clone());
        Ok(texture)
    }

    fn material(&mut self, desc: &'s MaterialDesc, rng: &mut dyn RngCore) -> SceneResult<Material> {
        Ok(match desc {
            MaterialDesc::Lambertian { albedo } => {
                Material::lambertian_texture(self.texture_ref(albedo, rng)?)
            }
            MaterialDesc::Metal { albedo, fuzz } => Material::metal(*albedo, *fuzz),
            MaterialDesc::Dielectric { refraction_index } => Material::dielectric(*refraction_index),
            MaterialDesc::DiffuseLight { emit } => {
                Material::diffuse_light_texture(self.texture_ref(emit, rng)?)
            }
        })
    }
}

/// Build the world described by `scene`.
///
/// `rng` seeds procedural textures. Image textures that fail to load fall
/// back to the missing-image color with a warning.
pub fn build_world(scene: &SceneDescription, rng: &mut dyn RngCore) -> SceneResult<HittableList> {
    let mut builder = WorldBuilder::new(scene);

    let mut materials: HashMap<&str, Arc<Material>> = HashMap::new();
    for (name, desc) in &scene.materials {
        let material = builder.material(desc, rng)?;
        materials.insert(name.as_str(), Arc::new(material));
    }

    let mut world = HittableList::new();
    for object in &scene.objects {
        let material = materials
            .get(object.material())
            .cloned()
            .ok_or_else(|| SceneError::UnknownMaterial(object.material().to_string()))?;

        match object {
            ObjectDesc::Sphere {
                center,
                center_end: Some(center_end),
                radius,
                ..
            } => world.add(Sphere::moving(*center, *center_end, *radius, material)),
            ObjectDesc::Sphere { center, radius, .. } => {
                world.add(Sphere::new(*center, *radius, material))
            }
            ObjectDesc::Quad { q, u, v, .. } => world.add(Quad::new(*q, *u, *v, material)),
            ObjectDesc::Cuboid { a, b, .. } => world.append(make_box(*a, *b, material)),
        }
    }

    log::debug!(
        "Built world: {} primitives, {} materials, {} images",
        world.len(),
        materials.len(),
        builder.images.len()
    );

    Ok(world)
}
