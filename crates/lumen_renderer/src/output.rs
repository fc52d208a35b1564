//! Writing rendered images to disk.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use image::error::{ImageError, ImageResult, ParameterError, ParameterErrorKind};
use image::RgbImage;

use crate::renderer::{color_to_rgb, ImageBuffer};

/// Write an image as plain-text PPM (`P3`), one pixel per line.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut writer: W) -> io::Result<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for color in &image.pixels {
        let [r, g, b] = color_to_rgb(*color);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    writer.flush()
}

/// Convert to an 8-bit RGB image for the `image` crate encoders.
pub fn to_rgb_image(image: &ImageBuffer) -> Option<RgbImage> {
    RgbImage::from_raw(image.width, image.height, image.to_rgb8())
}

/// Save an image, picking the format from the file extension.
///
/// `.ppm` files are written as text PPM; anything else goes through the
/// `image` crate (PNG, JPEG, ...).
pub fn save_image(image: &ImageBuffer, path: impl AsRef<Path>) -> ImageResult<()> {
    let path = path.as_ref();
    let is_ppm = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("ppm"))
        .unwrap_or(false);

    if is_ppm {
        let file = File::create(path).map_err(ImageError::IoError)?;
        write_ppm(image, BufWriter::new(file)).map_err(ImageError::IoError)?;
    } else {
        let rgb = to_rgb_image(image).ok_or_else(|| {
            ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            ))
        })?;
        rgb.save(path)?;
    }

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}
