//! Textures: spatially varying colors sampled at hit points.

use std::sync::Arc;

use lumen_core::ImageData;
use lumen_math::{Color, Interval, Vec3};
use rand::RngCore;

use crate::perlin::Perlin;

/// Returned by image textures that have no usable pixel data.
pub const MISSING_IMAGE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

/// A texture maps surface coordinates and a point to a color.
#[derive(Debug, Clone)]
pub enum Texture {
    SolidColor(Color),
    Checker(CheckerTexture),
    Image(ImageTexture),
    Noise(NoiseTexture),
}

impl Texture {
    pub fn solid(color: Color) -> Self {
        Texture::SolidColor(color)
    }

    /// Checker of two solid colors with cells `scale` units wide.
    pub fn checker(scale: f32, even: Color, odd: Color) -> Self {
        Self::checker_textures(scale, Texture::SolidColor(even), Texture::SolidColor(odd))
    }

    pub fn checker_textures(scale: f32, even: Texture, odd: Texture) -> Self {
        Texture::Checker(CheckerTexture {
            inv_scale: 1.0 / scale,
            even: Arc::new(even),
            odd: Arc::new(odd),
        })
    }

    pub fn image(image: Arc<ImageData>) -> Self {
        Texture::Image(ImageTexture { image: Some(image) })
    }

    /// Image texture with no data; renders as [`MISSING_IMAGE_COLOR`].
    pub fn missing_image() -> Self {
        Texture::Image(ImageTexture { image: None })
    }

    pub fn noise(scale: f32, rng: &mut dyn RngCore) -> Self {
        Texture::Noise(NoiseTexture {
            noise: Arc::new(Perlin::new(rng)),
            scale,
        })
    }

    /// Color at surface coordinates (u, v) and world point p.
    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::SolidColor(color) => *color,
            Texture::Checker(checker) => checker.value(u, v, p),
            Texture::Image(image) => image.value(u, v),
            Texture::Noise(noise) => noise.value(p),
        }
    }
}

impl From<Color> for Texture {
    fn from(color: Color) -> Self {
        Texture::SolidColor(color)
    }
}

/// 3D checker lattice: the parity of the cell a point falls in picks the
/// texture.
#[derive(Debug, Clone)]
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<Texture>,
    odd: Arc<Texture>,
}

impl CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let parity = (cell.x as i64 + cell.y as i64 + cell.z as i64).rem_euclid(2);

        if parity == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageTexture {
    image: Option<Arc<ImageData>>,
}

impl ImageTexture {
    fn value(&self, u: f32, v: f32) -> Color {
        let image = match &self.image {
            Some(image) if !image.is_empty() => image,
            _ => return MISSING_IMAGE_COLOR,
        };

        // Clamp to [0,1] x [1,0]; image rows run top to bottom
        let u = Interval::UNIT.clamp(u);
        let v = 1.0 - Interval::UNIT.clamp(v);

        let i = (u * image.width as f32) as u32;
        let j = (v * image.height as f32) as u32;
        let [r, g, b] = image.pixel(i, j);

        Color::new(r as f32, g as f32, b as f32) / 255.0
    }
}

/// Marble-like pattern built from Perlin turbulence.
#[derive(Debug, Clone)]
pub struct NoiseTexture {
    noise: Arc<Perlin>,
    scale: f32,
}

impl NoiseTexture {
    fn value(&self, p: Vec3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turbulence(p, 7);
        Color::splat(0.5) * (1.0 + phase.sin())
    }
}
