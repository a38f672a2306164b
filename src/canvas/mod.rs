//! Pixel Data Model
//!
//! - `Pixel`: immutable 8-bit RGB triple
//! - `PixelGrid`: row-major rectangle of pixels with zero-padded reads

mod grid;
mod pixel;

pub use grid::PixelGrid;
pub use pixel::{clamp_round, Pixel, MAX_CHANNEL};
