//! Spatial convolution

use log::debug;

use super::{ensure_image, map_pixels, Transform};
use crate::canvas::{Pixel, PixelGrid};
use crate::error::{Result, StrataError};

/// Square convolution kernel with an odd side length
///
/// Weights are stored row-major. Row offsets index image rows and column
/// offsets index image columns, both centered on the middle cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Vec<f64>,
    side: usize,
}

impl Kernel {
    /// Build a kernel from rows of weights
    ///
    /// # Errors
    /// * `InvalidArgument` - if the kernel is empty, not square, or has an even side
    pub fn new<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let side = rows.len();
        if side == 0 {
            return Err(StrataError::invalid_argument("Kernel is empty"));
        }
        if rows.iter().any(|row| row.as_ref().len() != side) {
            return Err(StrataError::invalid_argument("Kernel is not square"));
        }
        if side % 2 == 0 {
            return Err(StrataError::invalid_argument(format!(
                "Kernel side {} is even; a center cell is required",
                side
            )));
        }

        let weights = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        Ok(Self { weights, side })
    }

    /// 3x3 Gaussian-like blur; weights sum to 1
    #[rustfmt::skip]
    pub fn blur() -> Self {
        Self {
            weights: vec![
                1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0,
                1.0 / 8.0, 1.0 / 4.0, 1.0 / 8.0,
                1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0,
            ],
            side: 3,
        }
    }

    /// 5x5 sharpen; negative outer ring, weights sum to 1
    #[rustfmt::skip]
    pub fn sharpen() -> Self {
        const E: f64 = -1.0 / 8.0;
        const Q: f64 = 1.0 / 4.0;
        Self {
            weights: vec![
                E, E, E, E, E,
                E, Q, Q, Q, E,
                E, Q, 1.0, Q, E,
                E, Q, Q, Q, E,
                E, E, E, E, E,
            ],
            side: 5,
        }
    }

    /// Side length
    pub fn side(&self) -> usize {
        self.side
    }

    /// Distance from the center cell to an edge
    pub fn radius(&self) -> usize {
        (self.side - 1) / 2
    }

    /// Weight at kernel row `i`, column `j`
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights[i * self.side + j]
    }

    /// Sum of all weights (1.0 for brightness-preserving kernels)
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Weighted sum of the neighborhood around (`row`, `col`)
    fn convolve_at(&self, source: &PixelGrid, row: usize, col: usize) -> Pixel {
        let r = self.radius() as isize;
        let mut acc = [0.0f64; 3];

        for i in 0..self.side {
            let src_row = row as isize + i as isize - r;
            for j in 0..self.side {
                let src_col = col as isize + j as isize - r;
                let w = self.weight(i, j);
                let px = source.pixel_at(src_row, src_col).to_real();
                acc[0] += w * px[0];
                acc[1] += w * px[1];
                acc[2] += w * px[2];
            }
        }

        Pixel::from_real(acc)
    }
}

impl Transform for Kernel {
    fn apply(&self, grid: &PixelGrid) -> Result<PixelGrid> {
        ensure_image(grid, "filter")?;
        debug!(
            "[TRANSFORM] Convolving {}x{} grid with {}x{} kernel",
            grid.height(),
            grid.width(),
            self.side,
            self.side
        );
        map_pixels(grid, |row, col| self.convolve_at(grid, row, col))
    }

    fn name(&self) -> &'static str {
        "convolution"
    }
}

/// Convolve `grid` with a kernel given as rows of weights
///
/// The kernel shape is validated before the grid is looked at.
pub fn filter<R: AsRef<[f64]>>(grid: &PixelGrid, kernel: &[R]) -> Result<PixelGrid> {
    Kernel::new(kernel)?.apply(grid)
}
