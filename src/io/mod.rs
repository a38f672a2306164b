//! Image I/O
//!
//! - Plain PPM (P3) text codec
//! - PNG/JPEG through the `image` crate
//! - Multi-layer archive export/import

pub mod archive;
pub mod file;
pub mod ppm;
pub mod raster;

pub use archive::{export_layers, import_layers};
pub use file::{load_image, save_image, ImageFileFormat};
pub use ppm::{parse_ppm, read_ppm, save_ppm, to_ppm_string, write_ppm};
pub use raster::{decode_image, encode_image, RasterFormat};
