use std::path::PathBuf;

use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

use crate::error::{Error, Result};
use crate::pixels::PixelBuffer;

#[derive(Debug, Clone)]
pub enum Source {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub enum Fit {
    /// Keep the image's natural size.
    #[default]
    Natural,
    /// Shrink to fit within the box, preserving aspect ratio. Never enlarges.
    Within { max_width: u32, max_height: u32 },
}

impl Fit {
    /// Output dimensions for an image of the given natural size.
    pub fn dimensions(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Fit::Natural => (width, height),
            Fit::Within {
                max_width,
                max_height,
            } => {
                if width <= max_width && height <= max_height {
                    return (width, height);
                }
                let scale = f64::min(
                    f64::from(max_width) / f64::from(width),
                    f64::from(max_height) / f64::from(height),
                );
                let w = (f64::from(width) * scale).round() as u32;
                let h = (f64::from(height) * scale).round() as u32;
                (w.clamp(1, max_width.max(1)), h.clamp(1, max_height.max(1)))
            }
        }
    }
}

/// Decodes `source` into an RGBA pixel buffer, resized according to `fit`.
///
/// Anything whose leading bytes are not a recognized image format is rejected with
/// [`Error::NotAnImage`] before decoding is attempted.
pub fn acquire(source: Source, fit: Fit) -> Result<PixelBuffer> {
    let bytes = match source {
        Source::Path(path) => std::fs::read(path)?,
        Source::Bytes(bytes) => bytes,
    };
    let format = image::guess_format(&bytes).map_err(|_| Error::NotAnImage)?;
    let image = image::load_from_memory_with_format(&bytes, format)?;
    debug!(
        ?format,
        width = image.width(),
        height = image.height(),
        "decoded image"
    );
    into_pixel_buffer(image, fit)
}

fn into_pixel_buffer(image: DynamicImage, fit: Fit) -> Result<PixelBuffer> {
    let (width, height) = fit.dimensions(image.width(), image.height());
    let image = if (width, height) == (image.width(), image.height()) {
        image
    } else {
        debug!(width, height, "resizing to fit");
        image.resize_exact(width, height, FilterType::Triangle)
    };
    let rgba = image.into_rgba8();
    PixelBuffer::new(rgba.width(), rgba.height(), rgba.into_raw())
}
