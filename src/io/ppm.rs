//! Plain-text PPM (P3) reading and writing
//!
//! Layout:
//! ```text
//! P3
//! <width> <height>
//! <max color value>
//! r g b r g b ...        (row-major, whitespace separated)
//! ```
//! Lines starting with `#` are comments and dropped before tokenizing.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use log::{info, warn};

use crate::canvas::{Pixel, PixelGrid, MAX_CHANNEL};
use crate::error::{Result, StrataError};

/// Magic token for plain PPM
const PPM_MAGIC: &str = "P3";

/// Parse PPM text into a grid
///
/// # Errors
/// * `InvalidImage` - bad magic, missing or non-numeric tokens, or a
///   channel outside [0, 255]
pub fn parse_ppm(text: &str) -> Result<PixelGrid> {
    let mut tokens = text
        .lines()
        .filter(|line| !line.starts_with('#'))
        .flat_map(str::split_whitespace);

    let magic = tokens
        .next()
        .ok_or_else(|| StrataError::invalid_image("PPM data is empty"))?;
    if magic != PPM_MAGIC {
        return Err(StrataError::invalid_image(format!(
            "plain PPM must begin with {}, found '{}'",
            PPM_MAGIC, magic
        )));
    }

    let width: usize = next_value(&mut tokens, "width")?;
    let height: usize = next_value(&mut tokens, "height")?;
    let max_value: u32 = next_value(&mut tokens, "max color value")?;
    if max_value != MAX_CHANNEL as u32 {
        warn!(
            "PPM max color value is {} (expected {}); values are read unscaled",
            max_value, MAX_CHANNEL
        );
    }

    let count = width
        .checked_mul(height)
        .filter(|count| count.checked_mul(3).is_some())
        .ok_or_else(|| {
            StrataError::invalid_image(format!("PPM dimensions {}x{} overflow", width, height))
        })?;
    // A pixel needs about six bytes of text; cap the header's claim by that
    let mut pixels = Vec::with_capacity(count.min(text.len() / 6));
    for index in 0..count {
        let red: i64 = next_value(&mut tokens, "red")?;
        let green: i64 = next_value(&mut tokens, "green")?;
        let blue: i64 = next_value(&mut tokens, "blue")?;
        let pixel = Pixel::try_new(red, green, blue).map_err(|e| StrataError::InvalidImage {
            reason: format!("pixel {} is out of range", index),
            source: Some(Box::new(e)),
        })?;
        pixels.push(pixel);
    }

    PixelGrid::from_pixels(height, width, pixels)
}

fn next_value<'a, T, I>(tokens: &mut I, what: &str) -> Result<T>
where
    T: FromStr,
    I: Iterator<Item = &'a str>,
{
    let token = tokens
        .next()
        .ok_or_else(|| StrataError::invalid_image(format!("PPM ended before {}", what)))?;
    token.parse().map_err(|_| {
        StrataError::invalid_image(format!("PPM {} '{}' is not a number", what, token))
    })
}

/// Write `grid` as PPM: header, then one channel value per line
///
/// # Errors
/// * `InvalidState` - if the grid is empty
pub fn write_ppm<W: Write>(grid: &PixelGrid, mut out: W) -> Result<()> {
    if grid.is_empty() {
        return Err(StrataError::invalid_state("There is no image to write"));
    }

    write!(
        out,
        "{}\n{} {}\n{}\n",
        PPM_MAGIC,
        grid.width(),
        grid.height(),
        MAX_CHANNEL
    )?;
    for pixel in grid.pixels() {
        write!(out, "{}\n{}\n{}\n", pixel.red(), pixel.green(), pixel.blue())?;
    }
    out.flush()?;
    Ok(())
}

/// Render `grid` as a PPM string
pub fn to_ppm_string(grid: &PixelGrid) -> Result<String> {
    let mut buf = Vec::new();
    write_ppm(grid, &mut buf)?;
    // Only ASCII digits and whitespace are written
    String::from_utf8(buf).map_err(|e| StrataError::InvalidImage {
        reason: "PPM output is not UTF-8".to_string(),
        source: Some(Box::new(e)),
    })
}

/// Read a PPM file
pub fn read_ppm(path: &Path) -> Result<PixelGrid> {
    if !path.exists() {
        return Err(StrataError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let text = fs::read_to_string(path)?;
    let grid = parse_ppm(&text)?;
    info!(
        "Read {}x{} PPM from {}",
        grid.height(),
        grid.width(),
        path.display()
    );
    Ok(grid)
}

/// Write a PPM file, replacing any existing file
pub fn save_ppm(grid: &PixelGrid, path: &Path) -> Result<()> {
    // Check first so a failed save leaves no empty file behind
    if grid.is_empty() {
        return Err(StrataError::invalid_state("There is no image to write"));
    }
    let file = File::create(path)?;
    write_ppm(grid, BufWriter::new(file))?;
    info!("Wrote PPM to {}", path.display());
    Ok(())
}
