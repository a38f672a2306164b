//! PNG/JPEG adapter over the `image` crate
//!
//! Decoding drops any alpha channel; encoding always writes 8-bit RGB.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use crate::canvas::{Pixel, PixelGrid};
use crate::error::{Result, StrataError};

/// Compressed raster formats handled by the codec crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Jpeg,
}

impl From<RasterFormat> for ImageFormat {
    fn from(format: RasterFormat) -> Self {
        match format {
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Decode PNG/JPEG bytes into a grid
pub fn decode_image(bytes: &[u8]) -> Result<PixelGrid> {
    let decoded = image::load_from_memory(bytes).map_err(|e| StrataError::InvalidImage {
        reason: format!("Failed to decode image: {}", e),
        source: Some(Box::new(e)),
    })?;
    grid_from_rgb(&decoded.to_rgb8())
}

/// Encode a grid as PNG or JPEG bytes
///
/// # Errors
/// * `InvalidState` - if the grid is empty
/// * `InvalidImage` - if the encoder fails
pub fn encode_image(grid: &PixelGrid, format: RasterFormat) -> Result<Vec<u8>> {
    if grid.is_empty() {
        return Err(StrataError::invalid_state("There is no image to encode"));
    }

    let rgb = rgb_from_grid(grid)?;
    let mut out = Cursor::new(Vec::new());
    rgb.write_to(&mut out, format.into())
        .map_err(|e| StrataError::InvalidImage {
            reason: format!("Failed to encode image: {}", e),
            source: Some(Box::new(e)),
        })?;
    Ok(out.into_inner())
}

fn grid_from_rgb(rgb: &RgbImage) -> Result<PixelGrid> {
    let (width, height) = rgb.dimensions();
    let pixels = rgb.pixels().map(|p| Pixel::from(p.0)).collect();
    PixelGrid::from_pixels(height as usize, width as usize, pixels)
}

fn rgb_from_grid(grid: &PixelGrid) -> Result<RgbImage> {
    let width = u32::try_from(grid.width())
        .map_err(|_| StrataError::invalid_argument("Image is too wide to encode"))?;
    let height = u32::try_from(grid.height())
        .map_err(|_| StrataError::invalid_argument("Image is too tall to encode"))?;

    Ok(RgbImage::from_fn(width, height, |x, y| {
        Rgb(grid.pixel_at(y as isize, x as isize).channels())
    }))
}
