//! Layer Stack
//!
//! Ordered layers plus a "current" selection. Index 0 is the top of the
//! stack. The current layer is tracked by name and resolved on every
//! access, so insertions and removals can never leave it dangling.

use std::borrow::Cow;
use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use super::layer::Layer;
use crate::canvas::{Pixel, PixelGrid};
use crate::error::{Result, StrataError};
use crate::transform::Adjustment;

/// Name of the detached layer returned when nothing is visible
pub const PLACEHOLDER_NAME: &str = "duplicate";

/// Ordered collection of uniquely named layers
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    /// Layers, topmost first
    layers: Vec<Layer>,
    /// Name of the current layer; `None` only while the stack is empty
    current: Option<String>,
}

impl LayerStack {
    /// Create an empty stack with no current layer
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Adjustments
    // ------------------------------------------------------------------

    /// Blur the current layer
    pub fn blur(&mut self) -> Result<()> {
        self.apply_adjustment(Adjustment::Blur)
    }

    /// Sharpen the current layer
    pub fn sharpen(&mut self) -> Result<()> {
        self.apply_adjustment(Adjustment::Sharpen)
    }

    /// Convert the current layer to greyscale
    pub fn greyscale(&mut self) -> Result<()> {
        self.apply_adjustment(Adjustment::Greyscale)
    }

    /// Apply a sepia tone to the current layer
    pub fn sepia(&mut self) -> Result<()> {
        self.apply_adjustment(Adjustment::Sepia)
    }

    /// Apply a built-in adjustment to the current layer
    ///
    /// # Errors
    /// * `InvalidState` - if there is no current layer or it has no image
    pub fn apply_adjustment(&mut self, adjustment: Adjustment) -> Result<()> {
        let layer = self.current_with_image_mut()?;
        layer.apply(adjustment.transform().as_ref())?;
        debug!("[STACK] Applied {} to '{}'", adjustment, layer.name());
        Ok(())
    }

    /// Flip the visibility of the current layer, returning the new state
    pub fn toggle_visible(&mut self) -> Result<bool> {
        let layer = self.current_with_image_mut()?;
        let visible = layer.toggle_visibility();
        debug!("[STACK] '{}' visible = {}", layer.name(), visible);
        Ok(visible)
    }

    // ------------------------------------------------------------------
    // Layer lifecycle
    // ------------------------------------------------------------------

    /// Add a new layer and make it current
    ///
    /// The very first layer starts with the empty grid. Later layers are
    /// black, sized like the current layer, and go on top of the stack.
    ///
    /// # Errors
    /// * `InvalidArgument` - if a layer with this name already exists
    pub fn add_layer(&mut self, name: &str) -> Result<()> {
        self.ensure_unique(name)?;

        match self.current_layer().map(Layer::dimensions) {
            None => self.layers.push(Layer::new(name)),
            Some((height, width)) => self
                .layers
                .insert(0, Layer::with_image(name, PixelGrid::new(height, width))),
        }
        self.current = Some(name.to_string());

        debug!("[STACK] Added layer '{}' ({} total)", name, self.layers.len());
        self.check_invariants();
        Ok(())
    }

    /// Add a layer seeded with `image` on top of the stack and make it current
    ///
    /// # Errors
    /// * `InvalidArgument` - if the name is taken or the image size differs
    ///   from the current layer's
    pub fn add_layer_with_image(&mut self, image: PixelGrid, name: &str) -> Result<()> {
        self.ensure_unique(name)?;

        if let Some(current) = self.current_layer() {
            if current.dimensions() != image.dimensions() {
                return Err(StrataError::invalid_argument(format!(
                    "The layers must be the same size: image is {}x{}, current layer is {}x{}",
                    image.height(),
                    image.width(),
                    current.dimensions().0,
                    current.dimensions().1
                )));
            }
        }

        self.layers.insert(0, Layer::with_image(name, image));
        self.current = Some(name.to_string());

        debug!("[STACK] Added image layer '{}' ({} total)", name, self.layers.len());
        self.check_invariants();
        Ok(())
    }

    /// Insert a deep copy of `source_name` right below it, named `new_name`
    ///
    /// The current selection does not change.
    ///
    /// # Errors
    /// * `InvalidArgument` - if `new_name` is taken or `source_name` is missing
    pub fn duplicate_layer(&mut self, new_name: &str, source_name: &str) -> Result<()> {
        self.ensure_unique(new_name)?;
        let index = self.position(source_name).ok_or_else(|| {
            StrataError::invalid_argument(format!("Layer '{}' not found", source_name))
        })?;

        let copy = Layer::with_image(new_name, self.layers[index].grid().clone());
        self.layers.insert(index + 1, copy);

        debug!(
            "[STACK] Duplicated '{}' as '{}' at index {}",
            source_name,
            new_name,
            index + 1
        );
        self.check_invariants();
        Ok(())
    }

    /// Remove a layer
    ///
    /// If it was current, the layer below it becomes current, or the one
    /// above it when the deleted layer was at the bottom.
    ///
    /// # Errors
    /// * `InvalidState` - if only one layer remains or the name is not found
    pub fn delete_layer(&mut self, name: &str) -> Result<()> {
        if self.layers.len() <= 1 {
            return Err(StrataError::invalid_state("Cannot delete the last layer"));
        }
        let index = self
            .position(name)
            .ok_or_else(|| StrataError::invalid_state(format!("Layer '{}' not found", name)))?;

        if self.current.as_deref() == Some(name) {
            let neighbor = if index == self.layers.len() - 1 {
                index - 1
            } else {
                index + 1
            };
            self.current = Some(self.layers[neighbor].name().to_string());
        }
        self.layers.remove(index);

        debug!(
            "[STACK] Deleted '{}', current is now '{}'",
            name,
            self.current.as_deref().unwrap_or_default()
        );
        self.check_invariants();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select the current layer by name
    pub fn set_current(&mut self, name: &str) -> Result<()> {
        if self.position(name).is_none() {
            return Err(StrataError::invalid_argument(format!(
                "Layer '{}' not found",
                name
            )));
        }
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Select the current layer by stack index
    pub fn set_current_from_index(&mut self, index: usize) -> Result<()> {
        let layer = self.layers.get(index).ok_or_else(|| {
            StrataError::invalid_argument(format!(
                "Index {} is out of range for {} layers",
                index,
                self.layers.len()
            ))
        })?;
        self.current = Some(layer.name().to_string());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Images
    // ------------------------------------------------------------------

    /// Replace the current layer's image
    pub fn upload(&mut self, image: PixelGrid) -> Result<()> {
        let layer = self.current_layer_mut().ok_or_else(|| {
            StrataError::invalid_state("Please choose a layer as current to upload to")
        })?;
        debug!(
            "[STACK] Uploaded {}x{} image to '{}'",
            image.height(),
            image.width(),
            layer.name()
        );
        layer.add_image(image);
        Ok(())
    }

    /// Fill the current layer with a checkerboard and return a copy of it
    ///
    /// # Errors
    /// * `InvalidArgument` - non-positive arguments or a non-square tile count
    /// * `InvalidState` - if there is no current layer
    pub fn checkerboard(&mut self, tile_side: usize, num_tiles: usize) -> Result<PixelGrid> {
        let grid = PixelGrid::checkerboard(tile_side, num_tiles)?;
        let layer = self
            .current_layer_mut()
            .ok_or_else(|| StrataError::invalid_state("No current layer for the checkerboard"))?;
        layer.add_image(grid.clone());
        debug!(
            "[STACK] Checkerboard {}x{} written to '{}'",
            grid.height(),
            grid.width(),
            layer.name()
        );
        Ok(grid)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The first visible layer from the top
    ///
    /// When every layer is hidden this returns a detached 1x1 black layer
    /// named [`PLACEHOLDER_NAME`]; it is never part of the stack.
    ///
    /// # Errors
    /// * `InvalidState` - if the stack has no layers
    pub fn top_visible(&self) -> Result<Cow<'_, Layer>> {
        if self.layers.is_empty() {
            return Err(StrataError::invalid_state("There are no layers"));
        }
        Ok(match self.visible_layer() {
            Some(layer) => Cow::Borrowed(layer),
            None => Cow::Owned(Layer::with_image(PLACEHOLDER_NAME, PixelGrid::new(1, 1))),
        })
    }

    /// The first visible layer from the top, or `None` if all are hidden
    pub fn visible_layer(&self) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.is_visible())
    }

    /// Read a pixel of the current layer; outside the image reads black
    pub fn pixel_at(&self, row: isize, col: isize) -> Result<Pixel> {
        let index = self.current_with_image_index()?;
        Ok(self.layers[index].pixel_at(row, col))
    }

    /// `(height, width)` of the current layer, `(0, 0)` if it has no image
    pub fn dimensions(&self) -> Result<(usize, usize)> {
        self.current_layer()
            .map(Layer::dimensions)
            .ok_or_else(|| StrataError::invalid_state("There is no current layer"))
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Name of the layer at `index`
    pub fn layer_name_at(&self, index: usize) -> Result<&str> {
        self.layers.get(index).map(Layer::name).ok_or_else(|| {
            StrataError::invalid_argument(format!(
                "Index {} is out of range for {} layers",
                index,
                self.layers.len()
            ))
        })
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_layer(&self) -> Option<&Layer> {
        self.current_index().map(|i| &self.layers[i])
    }

    /// Look up a layer by name
    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.position(name).map(|i| &self.layers[i])
    }

    /// All layers, topmost first
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Serializable snapshot of the stack
    pub fn summary(&self) -> StackSummary {
        StackSummary {
            current: self.current.clone(),
            layers: self
                .layers
                .iter()
                .map(|layer| {
                    let (height, width) = layer.dimensions();
                    LayerSummary {
                        name: layer.name().to_string(),
                        visible: layer.is_visible(),
                        height,
                        width,
                        is_current: self.current.as_deref() == Some(layer.name()),
                    }
                })
                .collect(),
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn position(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.name() == name)
    }

    fn current_index(&self) -> Option<usize> {
        self.current.as_deref().and_then(|name| self.position(name))
    }

    fn current_layer_mut(&mut self) -> Option<&mut Layer> {
        let index = self.current_index()?;
        Some(&mut self.layers[index])
    }

    /// Index of the current layer, provided it holds an image
    fn current_with_image_index(&self) -> Result<usize> {
        match self.current_index() {
            Some(index) if !self.layers[index].is_empty() => Ok(index),
            _ => Err(StrataError::invalid_state("No image uploaded")),
        }
    }

    fn current_with_image_mut(&mut self) -> Result<&mut Layer> {
        let index = self.current_with_image_index()?;
        Ok(&mut self.layers[index])
    }

    fn ensure_unique(&self, name: &str) -> Result<()> {
        if self.position(name).is_some() {
            return Err(StrataError::invalid_argument(format!(
                "Layer already exists with name '{}'",
                name
            )));
        }
        Ok(())
    }

    fn check_invariants(&self) {
        debug_assert_eq!(
            self.layers.is_empty(),
            self.current.is_none(),
            "current must be set exactly when layers exist"
        );
        debug_assert!(
            self.current.is_none() || self.current_index().is_some(),
            "current must name a live layer"
        );
        debug_assert_eq!(
            self.layers
                .iter()
                .map(Layer::name)
                .collect::<HashSet<_>>()
                .len(),
            self.layers.len(),
            "layer names must be unique"
        );
    }
}

/// Snapshot of one layer for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSummary {
    pub name: String,
    pub visible: bool,
    pub height: usize,
    pub width: usize,
    pub is_current: bool,
}

/// Snapshot of the whole stack for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSummary {
    pub current: Option<String>,
    pub layers: Vec<LayerSummary>,
}
