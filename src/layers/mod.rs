//! Layer Model Module
//!
//! - `Layer`: named, visibility-flagged owner of one pixel grid
//! - `LayerStack`: ordered layers with a current selection

mod layer;
mod stack;

pub use layer::Layer;
pub use stack::{LayerStack, LayerSummary, StackSummary, PLACEHOLDER_NAME};
