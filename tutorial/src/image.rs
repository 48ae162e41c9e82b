//! Raster images read and written through the `image` crate.

use crate::error::{GeometryError, Result};
use ::image::{DynamicImage, ImageError};
use camino::Utf8Path;
use log::debug;
use std::fmt;

/// A decoded raster image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pixels: DynamicImage,
}

impl Image {
    /// Wraps decoded pixels.
    #[must_use]
    pub fn new(pixels: DynamicImage) -> Self {
        Self { pixels }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Number of colour channels per pixel.
    #[must_use]
    pub fn channels(&self) -> u8 {
        self.pixels.color().channel_count()
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Image of size {}x{}, with {} channels.",
            self.width(),
            self.height(),
            self.channels()
        )
    }
}

fn image_error(path: &Utf8Path) -> impl FnOnce(ImageError) -> GeometryError + '_ {
    move |source| GeometryError::Image {
        path: path.to_owned(),
        source,
    }
}

/// Decodes the image at `path`; the format follows the file extension.
///
/// # Errors
///
/// Returns [`GeometryError::Image`] when the file cannot be opened or
/// decoded.
pub fn read_image(path: &Utf8Path) -> Result<Image> {
    let pixels = ::image::open(path).map_err(image_error(path))?;
    let image = Image::new(pixels);
    debug!("{path}: {image}");
    Ok(image)
}

/// Encodes `image` to `path` in the format named by its extension.
///
/// # Errors
///
/// Returns [`GeometryError::Image`] when the format is unknown or the file
/// cannot be written.
pub fn write_image(path: &Utf8Path, image: &Image) -> Result<()> {
    image.pixels.save(path).map_err(image_error(path))?;
    debug!("wrote {path}");
    Ok(())
}
