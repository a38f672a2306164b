//! Rectangular pixel container

use crate::canvas::pixel::Pixel;
use crate::error::{Result, StrataError};

/// Row-major grid of pixels
///
/// A grid with zero height or zero width is the "empty" sentinel carried by
/// layers that have not received an image yet. Reads outside the grid are
/// not errors: they return [`Pixel::BLACK`], which gives convolution its
/// zero-padding at the edges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelGrid {
    /// Pixel data, row after row
    pixels: Vec<Pixel>,
    /// Number of rows
    height: usize,
    /// Number of columns
    width: usize,
}

impl PixelGrid {
    /// Create a black grid with the given dimensions
    pub fn new(height: usize, width: usize) -> Self {
        Self::filled(height, width, Pixel::BLACK)
    }

    /// Create a grid where every pixel has the same color
    pub fn filled(height: usize, width: usize, pixel: Pixel) -> Self {
        Self {
            pixels: vec![pixel; height * width],
            height,
            width,
        }
    }

    /// The empty sentinel (0 × 0)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a grid from row-major pixel data
    pub fn from_pixels(height: usize, width: usize, pixels: Vec<Pixel>) -> Result<Self> {
        if pixels.len() != height * width {
            return Err(StrataError::invalid_argument(format!(
                "Pixel count {} does not match {}x{} grid",
                pixels.len(),
                height,
                width
            )));
        }
        Ok(Self {
            pixels,
            height,
            width,
        })
    }

    /// Create a grid from a list of rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<Pixel>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(StrataError::invalid_argument(format!(
                "Row {} has {} pixels, expected {}",
                index,
                row.len(),
                width
            )));
        }

        // A 3 x 0 grid is still empty; normalize so dimensions stay consistent
        let height = if width == 0 { 0 } else { height };
        let pixels = rows.into_iter().flatten().collect();
        Ok(Self {
            pixels,
            height,
            width,
        })
    }

    /// Generate a black-and-white checkerboard
    ///
    /// `num_tiles` must be a perfect square `s * s`; the result is
    /// `(s * tile_side)` pixels on each side. Tile (0, 0) is black.
    pub fn checkerboard(tile_side: usize, num_tiles: usize) -> Result<Self> {
        if tile_side == 0 || num_tiles == 0 {
            return Err(StrataError::invalid_argument(
                "Tile side and tile count must be greater than 0",
            ));
        }

        let tiles_per_side = integer_sqrt(num_tiles);
        if tiles_per_side * tiles_per_side != num_tiles {
            return Err(StrataError::invalid_argument(format!(
                "Number of tiles ({}) is not a perfect square",
                num_tiles
            )));
        }

        let side = tiles_per_side
            .checked_mul(tile_side)
            .filter(|&side| side.checked_mul(side).is_some_and(fits_in_memory))
            .ok_or_else(|| {
                StrataError::invalid_argument(format!(
                    "Checkerboard of {} tiles of side {} is too large",
                    num_tiles, tile_side
                ))
            })?;
        let mut grid = Self::new(side, side);
        for row in 0..side {
            for col in 0..side {
                if (row / tile_side + col / tile_side) % 2 == 1 {
                    grid.set(row, col, Pixel::WHITE);
                }
            }
        }
        Ok(grid)
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Check whether this is the empty sentinel
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Read a pixel, returning black for any coordinate outside the grid
    #[inline]
    pub fn pixel_at(&self, row: isize, col: isize) -> Pixel {
        if row < 0 || col < 0 {
            return Pixel::BLACK;
        }
        self.get(row as usize, col as usize).unwrap_or(Pixel::BLACK)
    }

    /// Get a pixel if the coordinate is inside the grid
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Pixel> {
        if row < self.height && col < self.width {
            Some(self.pixels[row * self.width + col])
        } else {
            None
        }
    }

    /// Set a pixel; coordinates outside the grid are ignored
    pub fn set(&mut self, row: usize, col: usize, pixel: Pixel) {
        if row < self.height && col < self.width {
            self.pixels[row * self.width + col] = pixel;
        }
    }

    /// All pixels in row-major order
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
        // chunks() panics on a zero chunk size
        self.pixels.chunks(self.width.max(1))
    }
}

/// Largest `s` with `s * s <= n`
fn integer_sqrt(n: usize) -> usize {
    let square_exceeds = |s: usize| s.checked_mul(s).map_or(true, |sq| sq > n);
    let mut s = (n as f64).sqrt() as usize;
    while square_exceeds(s) {
        s -= 1;
    }
    while !square_exceeds(s + 1) {
        s += 1;
    }
    s
}

/// Whether `count` pixels can be held in one allocation
fn fits_in_memory(count: usize) -> bool {
    count
        .checked_mul(std::mem::size_of::<Pixel>())
        .is_some_and(|bytes| bytes <= isize::MAX as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_black() {
        let grid = PixelGrid::new(2, 3);
        assert_eq!(grid.dimensions(), (2, 3));
        assert!(grid.pixels().iter().all(|&p| p == Pixel::BLACK));
        assert!(!grid.is_empty());
    }

    #[test]
    fn test_empty_sentinel() {
        assert!(PixelGrid::empty().is_empty());
        assert!(PixelGrid::new(0, 5).is_empty());
        assert!(PixelGrid::new(5, 0).is_empty());
        assert_eq!(PixelGrid::empty().rows().count(), 0);
    }

    #[test]
    fn test_out_of_bounds_reads_black() {
        let grid = PixelGrid::filled(2, 2, Pixel::WHITE);
        assert_eq!(grid.pixel_at(0, 0), Pixel::WHITE);
        assert_eq!(grid.pixel_at(-1, 0), Pixel::BLACK);
        assert_eq!(grid.pixel_at(0, -1), Pixel::BLACK);
        assert_eq!(grid.pixel_at(2, 0), Pixel::BLACK);
        assert_eq!(grid.pixel_at(0, 2), Pixel::BLACK);
        assert_eq!(PixelGrid::empty().pixel_at(0, 0), Pixel::BLACK);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![
            vec![Pixel::BLACK, Pixel::WHITE],
            vec![Pixel::WHITE],
        ];
        assert!(matches!(
            PixelGrid::from_rows(rows),
            Err(StrataError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_from_rows_row_major() {
        let red = Pixel::new(255, 0, 0);
        let rows = vec![vec![red, Pixel::BLACK], vec![Pixel::WHITE, red]];
        let grid = PixelGrid::from_rows(rows).unwrap();
        assert_eq!(grid.dimensions(), (2, 2));
        assert_eq!(grid.get(0, 0), Some(red));
        assert_eq!(grid.get(1, 0), Some(Pixel::WHITE));
        assert_eq!(grid.rows().nth(1).unwrap(), &[Pixel::WHITE, red]);
    }

    #[test]
    fn test_from_pixels_length_check() {
        assert!(PixelGrid::from_pixels(2, 2, vec![Pixel::BLACK; 3]).is_err());
        assert!(PixelGrid::from_pixels(2, 2, vec![Pixel::BLACK; 4]).is_ok());
    }

    #[test]
    fn test_checkerboard_pattern() {
        let grid = PixelGrid::checkerboard(2, 4).unwrap();
        assert_eq!(grid.dimensions(), (4, 4));
        assert_eq!(grid.get(0, 0), Some(Pixel::BLACK));
        assert_eq!(grid.get(1, 1), Some(Pixel::BLACK));
        assert_eq!(grid.get(0, 2), Some(Pixel::WHITE));
        assert_eq!(grid.get(2, 0), Some(Pixel::WHITE));
        assert_eq!(grid.get(2, 2), Some(Pixel::BLACK));
        assert_eq!(grid.get(3, 3), Some(Pixel::BLACK));
    }

    #[test]
    fn test_checkerboard_rejects_bad_arguments() {
        for (tile, tiles) in [(2, 3), (0, 4), (2, 0), (3, 8), (1, usize::MAX), (1 << 33, 4)] {
            assert!(
                matches!(
                    PixelGrid::checkerboard(tile, tiles),
                    Err(StrataError::InvalidArgument { .. })
                ),
                "checkerboard({}, {}) should fail",
                tile,
                tiles
            );
        }
    }

    #[test]
    fn test_integer_sqrt() {
        assert_eq!(integer_sqrt(1), 1);
        assert_eq!(integer_sqrt(8), 2);
        assert_eq!(integer_sqrt(9), 3);
        assert_eq!(integer_sqrt(10_000), 100);
        assert_eq!(integer_sqrt(usize::MAX), (1usize << (usize::BITS / 2)) - 1);
    }
}
