//! Extension-based image file loading and saving

use std::fs;
use std::path::Path;

use log::info;

use super::ppm::{read_ppm, save_ppm};
use super::raster::{decode_image, encode_image, RasterFormat};
use crate::canvas::PixelGrid;
use crate::error::{Result, StrataError};

/// Image file formats recognized by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFileFormat {
    Ppm,
    Png,
    Jpeg,
}

impl ImageFileFormat {
    /// Detect the format from a path's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "ppm" => Ok(ImageFileFormat::Ppm),
            "png" => Ok(ImageFileFormat::Png),
            "jpg" | "jpeg" => Ok(ImageFileFormat::Jpeg),
            "" => Err(StrataError::UnsupportedFormat {
                format: format!("{} (no extension)", path.display()),
            }),
            other => Err(StrataError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }

    fn raster(self) -> Option<RasterFormat> {
        match self {
            ImageFileFormat::Ppm => None,
            ImageFileFormat::Png => Some(RasterFormat::Png),
            ImageFileFormat::Jpeg => Some(RasterFormat::Jpeg),
        }
    }
}

/// Load an image file into a grid, choosing the codec by extension
pub fn load_image(path: &Path) -> Result<PixelGrid> {
    let format = ImageFileFormat::from_path(path)?;
    match format.raster() {
        None => read_ppm(path),
        Some(_) => {
            if !path.exists() {
                return Err(StrataError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            let grid = decode_image(&fs::read(path)?)?;
            info!(
                "Loaded {}x{} image from {}",
                grid.height(),
                grid.width(),
                path.display()
            );
            Ok(grid)
        }
    }
}

/// Save a grid to a file, choosing the codec by extension
pub fn save_image(grid: &PixelGrid, path: &Path) -> Result<()> {
    let format = ImageFileFormat::from_path(path)?;
    match format.raster() {
        None => save_ppm(grid, path),
        Some(raster) => {
            let bytes = encode_image(grid, raster)?;
            fs::write(path, bytes)?;
            info!("Saved {:?} image to {}", format, path.display());
            Ok(())
        }
    }
}
