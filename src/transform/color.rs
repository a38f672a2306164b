//! Per-pixel color matrices

use log::debug;

use super::{ensure_image, map_pixels, Transform};
use crate::canvas::{Pixel, PixelGrid};
use crate::error::{Result, StrataError};

/// Luminance weights (Rec. 709)
const LUMA: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// 3x3 matrix mapping input (R, G, B) to output (R, G, B)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    rows: [[f64; 3]; 3],
}

impl ColorMatrix {
    /// Build a matrix from rows, which must form exactly 3x3
    pub fn new<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        if rows.len() != 3 || rows.iter().any(|row| row.as_ref().len() != 3) {
            return Err(StrataError::invalid_argument(
                "Color matrix must be exactly 3x3",
            ));
        }

        let mut matrix = [[0.0; 3]; 3];
        for (dst, src) in matrix.iter_mut().zip(rows) {
            dst.copy_from_slice(src.as_ref());
        }
        Ok(Self { rows: matrix })
    }

    pub const fn from_array(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Luminance replicated across all three channels
    pub const fn greyscale() -> Self {
        Self::from_array([LUMA, LUMA, LUMA])
    }

    /// Classic sepia tone
    pub const fn sepia() -> Self {
        Self::from_array([
            [0.393, 0.769, 0.189],
            [0.349, 0.686, 0.168],
            [0.272, 0.534, 0.131],
        ])
    }

    pub fn rows(&self) -> &[[f64; 3]; 3] {
        &self.rows
    }

    /// Apply the matrix to a single pixel
    pub fn apply_pixel(&self, pixel: Pixel) -> Pixel {
        let input = pixel.to_real();
        let mut out = [0.0f64; 3];
        for (k, row) in self.rows.iter().enumerate() {
            out[k] = row.iter().zip(input.iter()).map(|(m, c)| m * c).sum();
        }
        Pixel::from_real(out)
    }
}

impl Transform for ColorMatrix {
    fn apply(&self, grid: &PixelGrid) -> Result<PixelGrid> {
        ensure_image(grid, "color")?;
        debug!(
            "[TRANSFORM] Applying color matrix to {}x{} grid",
            grid.height(),
            grid.width()
        );
        map_pixels(grid, |row, col| {
            self.apply_pixel(grid.pixel_at(row as isize, col as isize))
        })
    }

    fn name(&self) -> &'static str {
        "color-matrix"
    }
}

/// Apply a color matrix given as rows of coefficients
pub fn color_transform<R: AsRef<[f64]>>(grid: &PixelGrid, matrix: &[R]) -> Result<PixelGrid> {
    ColorMatrix::new(matrix)?.apply(grid)
}
