//! JSON scene descriptions.
//!
//! A scene file names its textures and materials and lists the objects that
//! use them. Descriptions are plain data; the renderer turns them into
//! primitives.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use lumen_math::{Color, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::CameraConfig;

/// Errors that can occur while loading a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown material '{0}'")]
    UnknownMaterial(String),

    #[error("Unknown texture '{0}'")]
    UnknownTexture(String),

    #[error("Texture '{0}' refers back to itself")]
    TextureCycle(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Either an inline color or the name of a texture defined in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextureRef {
    Color(Color),
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextureDesc {
    Solid {
        color: Color,
    },
    /// 3D checker lattice; `scale` is the cell size in world units
    Checker {
        scale: f32,
        even: TextureRef,
        odd: TextureRef,
    },
    /// Image file, relative paths resolve against the scene file's directory
    Image {
        path: PathBuf,
    },
    /// Perlin marble pattern
    Noise {
        scale: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDesc {
    Lambertian {
        albedo: TextureRef,
    },
    Metal {
        albedo: Color,
        #[serde(default)]
        fuzz: f32,
    },
    Dielectric {
        refraction_index: f32,
    },
    DiffuseLight {
        emit: TextureRef,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDesc {
    Sphere {
        center: Vec3,
        /// Center at time 1 for a linearly moving sphere
        #[serde(default)]
        center_end: Option<Vec3>,
        radius: f32,
        material: String,
    },
    Quad {
        q: Vec3,
        u: Vec3,
        v: Vec3,
        material: String,
    },
    /// Axis-aligned box spanning two opposite corners
    #[serde(rename = "box")]
    Cuboid {
        a: Vec3,
        b: Vec3,
        material: String,
    },
}

impl ObjectDesc {
    pub fn material(&self) -> &str {
        match self {
            ObjectDesc::Sphere { material, .. }
            | ObjectDesc::Quad { material, .. }
            | ObjectDesc::Cuboid { material, .. } => material,
        }
    }
}

/// A complete scene: camera, named textures and materials, and objects.
///
/// Textures and materials live in ordered maps so that building a world
/// from the same file always happens in the same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub textures: BTreeMap<String, TextureDesc>,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDesc>,
    #[serde(default)]
    pub objects: Vec<ObjectDesc>,
    /// Directory of the file this scene came from
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl SceneDescription {
    /// Parse and validate a scene from JSON text.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let scene: SceneDescription = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Resolve a path referenced by the scene against its base directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Check that every reference resolves and every value is usable.
    pub fn validate(&self) -> SceneResult<()> {
        self.camera.validate()?;

        for (name, texture) in &self.textures {
            match texture {
                TextureDesc::Checker { scale, even, odd } => {
                    if *scale == 0.0 || !scale.is_finite() {
                        return Err(SceneError::InvalidValue(format!(
                            "checker texture '{}' needs a non-zero scale",
                            name
                        )));
                    }
                    self.check_texture_ref(even)?;
                    self.check_texture_ref(odd)?;
                }
                TextureDesc::Noise { scale } if !scale.is_finite() => {
                    return Err(SceneError::InvalidValue(format!(
                        "noise texture '{}' has a non-finite scale",
                        name
                    )));
                }
                _ => {}
            }
            self.check_texture_acyclic(name)?;
        }

        for material in self.materials.values() {
            match material {
                MaterialDesc::Lambertian { albedo } => self.check_texture_ref(albedo)?,
                MaterialDesc::DiffuseLight { emit } => self.check_texture_ref(emit)?,
                MaterialDesc::Dielectric { refraction_index } if !(*refraction_index > 0.0) => {
                    return Err(SceneError::InvalidValue(format!(
                        "refraction_index must be positive, got {}",
                        refraction_index
                    )));
                }
                _ => {}
            }
        }

        for object in &self.objects {
            if !self.materials.contains_key(object.material()) {
                return Err(SceneError::UnknownMaterial(object.material().to_string()));
            }
        }

        Ok(())
    }

    fn check_texture_ref(&self, texture: &TextureRef) -> SceneResult<()> {
        match texture {
            TextureRef::Named(name) if !self.textures.contains_key(name) => {
                Err(SceneError::UnknownTexture(name.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Walk checker children from `start` and fail if `start` is reachable.
    fn check_texture_acyclic(&self, start: &str) -> SceneResult<()> {
        let mut stack = vec![start];
        let mut seen = HashSet::new();

        while let Some(name) = stack.pop() {
            if let Some(TextureDesc::Checker { even, odd, .. }) = self.textures.get(name) {
                for child in [even, odd] {
                    if let TextureRef::Named(child) = child {
                        if child == start {
                            return Err(SceneError::TextureCycle(start.to_string()));
                        }
                        if seen.insert(child.as_str()) {
                            stack.push(child);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// Load and validate a scene file.
pub fn load_scene(path: impl AsRef<Path>) -> SceneResult<SceneDescription> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;

    let mut scene = SceneDescription::from_json_str(&json)?;
    scene.base_dir = path.parent().map(Path::to_path_buf);

    log::info!(
        "Loaded scene {}: {} objects, {} materials, {} textures",
        path.display(),
        scene.objects.len(),
        scene.materials.len(),
        scene.textures.len()
    );

    Ok(scene)
}
