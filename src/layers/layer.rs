//! A single named, visibility-flagged image layer

use log::debug;

use crate::canvas::{Pixel, PixelGrid};
use crate::error::Result;
use crate::transform::{ColorMatrix, Kernel, Transform};

/// A layer owns exactly one pixel grid
///
/// The name is the layer's identity inside a stack; uniqueness is the
/// stack's job. Transforms replace the owned grid only when they succeed.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    name: String,
    visible: bool,
    grid: PixelGrid,
}

impl Layer {
    /// Create a visible layer holding the empty grid
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_image(name, PixelGrid::empty())
    }

    /// Create a visible layer seeded with `grid`
    pub fn with_image(name: impl Into<String>, grid: PixelGrid) -> Self {
        Self {
            name: name.into(),
            visible: true,
            grid,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip visibility, returning the new state
    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// The owned grid
    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    /// Replace the owned grid unconditionally
    pub fn add_image(&mut self, grid: PixelGrid) {
        self.grid = grid;
    }

    /// Check whether this layer still holds the empty sentinel
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Apply any transform and keep the result
    pub fn apply(&mut self, transform: &dyn Transform) -> Result<()> {
        self.grid = transform.apply(&self.grid)?;
        debug!("[LAYER] {} applied to '{}'", transform.name(), self.name);
        Ok(())
    }

    /// Convolve the owned grid with `kernel`
    pub fn filter(&mut self, kernel: &Kernel) -> Result<()> {
        self.apply(kernel)
    }

    /// Apply a color matrix to the owned grid
    pub fn color_transform(&mut self, matrix: &ColorMatrix) -> Result<()> {
        self.apply(matrix)
    }

    /// Read a pixel; out-of-range coordinates read as black
    pub fn pixel_at(&self, row: isize, col: isize) -> Pixel {
        self.grid.pixel_at(row, col)
    }

    /// `(height, width)` of the owned grid
    pub fn dimensions(&self) -> (usize, usize) {
        self.grid.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrataError;

    #[test]
    fn test_new_layer_is_empty_and_visible() {
        let layer = Layer::new("background");
        assert_eq!(layer.name(), "background");
        assert!(layer.is_visible());
        assert!(layer.is_empty());
        assert_eq!(layer.dimensions(), (0, 0));
    }

    #[test]
    fn test_toggle_visibility() {
        let mut layer = Layer::new("a");
        assert!(!layer.toggle_visibility());
        assert!(layer.toggle_visibility());
    }

    #[test]
    fn test_filter_replaces_grid() {
        let mut grid = PixelGrid::new(3, 3);
        grid.set(1, 1, Pixel::new(160, 160, 160));
        let mut layer = Layer::with_image("a", grid);

        layer.filter(&Kernel::blur()).unwrap();
        assert_eq!(layer.pixel_at(1, 1), Pixel::new(40, 40, 40));
        assert_eq!(layer.pixel_at(-1, 1), Pixel::BLACK);
    }

    #[test]
    fn test_failed_transform_keeps_grid() {
        let mut layer = Layer::new("a");
        let result = layer.color_transform(&ColorMatrix::greyscale());
        assert!(matches!(result, Err(StrataError::InvalidState { .. })));
        assert!(layer.is_empty());
    }

    #[test]
    fn test_add_image() {
        let mut layer = Layer::new("a");
        layer.add_image(PixelGrid::filled(2, 5, Pixel::WHITE));
        assert_eq!(layer.dimensions(), (2, 5));
        assert_eq!(layer.pixel_at(1, 4), Pixel::WHITE);
    }
}
