//! Strata - Layer-Stack Image Editor Engine
//!
//! Strata edits raster images organized as a stack of named layers, each
//! holding an RGB pixel grid that can be shown or hidden.
//!
//! # Architecture
//!
//! - `canvas`: `Pixel` and `PixelGrid`, with zero-padded out-of-bounds reads
//! - `transform`: convolution kernels and 3x3 color matrices
//! - `layers`: `Layer` and the `LayerStack` with its current selection
//! - `io`: PPM codec, PNG/JPEG adapter, multi-layer archives
//! - `cli`: script-driven session and command-line front end

pub mod canvas;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod layers;
pub mod transform;

pub use canvas::{Pixel, PixelGrid};
pub use config::EditorConfig;
pub use error::{Result, StrataError};
pub use layers::{Layer, LayerStack};
pub use transform::{Adjustment, ColorMatrix, Kernel, Transform};
