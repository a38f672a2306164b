//! Transform Engine
//!
//! Pure functions that turn one `PixelGrid` into a new one:
//! - Convolution with an odd, square kernel (blur, sharpen)
//! - Per-pixel 3x3 color matrices (greyscale, sepia)
//!
//! Transforms never write into their input. Output rows are computed in
//! parallel, each from the untouched source grid.

mod color;
mod kernel;

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::canvas::{Pixel, PixelGrid};
use crate::error::{Result, StrataError};

pub use color::{color_transform, ColorMatrix};
pub use kernel::{filter, Kernel};

/// A pure grid-to-grid transform
pub trait Transform: Send + Sync {
    /// Produce a new grid from `grid`, leaving `grid` untouched
    fn apply(&self, grid: &PixelGrid) -> Result<PixelGrid>;

    /// Short identifier used in logs
    fn name(&self) -> &'static str;
}

/// The built-in adjustments exposed by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjustment {
    Blur,
    Sharpen,
    Greyscale,
    Sepia,
}

impl Adjustment {
    /// Every adjustment, in menu order
    pub const ALL: [Adjustment; 4] = [
        Adjustment::Blur,
        Adjustment::Sharpen,
        Adjustment::Greyscale,
        Adjustment::Sepia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Adjustment::Blur => "blur",
            Adjustment::Sharpen => "sharpen",
            Adjustment::Greyscale => "greyscale",
            Adjustment::Sepia => "sepia",
        }
    }

    /// The transform that implements this adjustment
    pub fn transform(&self) -> Box<dyn Transform> {
        match self {
            Adjustment::Blur => Box::new(Kernel::blur()),
            Adjustment::Sharpen => Box::new(Kernel::sharpen()),
            Adjustment::Greyscale => Box::new(ColorMatrix::greyscale()),
            Adjustment::Sepia => Box::new(ColorMatrix::sepia()),
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Adjustment {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "blur" => Ok(Adjustment::Blur),
            "sharpen" => Ok(Adjustment::Sharpen),
            "greyscale" | "grayscale" => Ok(Adjustment::Greyscale),
            "sepia" => Ok(Adjustment::Sepia),
            other => Err(StrataError::invalid_argument(format!(
                "Unknown adjustment '{}' (expected blur, sharpen, greyscale or sepia)",
                other
            ))),
        }
    }
}

/// Fail with `InvalidState` when there is no image to work on
fn ensure_image(grid: &PixelGrid, operation: &str) -> Result<()> {
    if grid.is_empty() {
        return Err(StrataError::invalid_state(format!(
            "no image to {}",
            operation
        )));
    }
    Ok(())
}

/// Build a new grid of the same size, computing each pixel from its coordinate
///
/// Rows are filled in parallel; `compute` must only read shared state.
fn map_pixels<F>(grid: &PixelGrid, compute: F) -> Result<PixelGrid>
where
    F: Fn(usize, usize) -> Pixel + Sync,
{
    let (height, width) = grid.dimensions();
    let mut out = vec![Pixel::BLACK; height * width];

    out.par_chunks_mut(width.max(1))
        .enumerate()
        .for_each(|(row, out_row)| {
            for (col, pixel) in out_row.iter_mut().enumerate() {
                *pixel = compute(row, col);
            }
        });

    PixelGrid::from_pixels(height, width, out)
}
