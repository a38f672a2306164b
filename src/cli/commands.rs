//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use super::session::Session;
use crate::config::EditorConfig;
use crate::io::{load_image, save_image};
use crate::layers::LayerStack;
use crate::transform::Adjustment;

/// Load an image, apply adjustments in order, and save the result.
pub fn apply(adjustments: &[Adjustment], input: &Path, output: &Path) -> Result<()> {
    info!("Applying {} adjustments to {}", adjustments.len(), input.display());

    let image = load_image(input).with_context(|| format!("loading {}", input.display()))?;
    let mut stack = LayerStack::new();
    stack.add_layer_with_image(image, "image")?;

    for adjustment in adjustments {
        stack
            .apply_adjustment(*adjustment)
            .with_context(|| format!("applying {}", adjustment))?;
    }

    let top = stack.top_visible()?;
    save_image(top.grid(), output).with_context(|| format!("saving {}", output.display()))?;

    println!("Saved: {}", output.display());
    Ok(())
}

/// Write a checkerboard image.
pub fn checkerboard(tile_side: usize, tiles: usize, output: &Path) -> Result<()> {
    info!("Creating checkerboard ({} tiles of {}px)", tiles, tile_side);

    let mut stack = LayerStack::new();
    stack.add_layer("checkerboard")?;
    let grid = stack.checkerboard(tile_side, tiles)?;
    save_image(&grid, output).with_context(|| format!("saving {}", output.display()))?;

    println!(
        "Checkerboard {}x{} saved: {}",
        grid.height(),
        grid.width(),
        output.display()
    );
    Ok(())
}

/// Print an image's dimensions.
pub fn info(path: &Path) -> Result<()> {
    let image = load_image(path).with_context(|| format!("loading {}", path.display()))?;

    println!("File: {}", path.display());
    println!("Height: {}", image.height());
    println!("Width: {}", image.width());
    Ok(())
}

/// Run a session script, stopping at the first failing line.
pub fn run_script(path: &Path, config: &EditorConfig) -> Result<()> {
    info!("Running script: {}", path.display());

    let script =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut session = Session::new(config.clone());

    for (number, line) in script.lines().enumerate() {
        let output = session
            .execute_line(line)
            .with_context(|| format!("line {}: {}", number + 1, line.trim()))?;
        if let Some(text) = output {
            println!("{}", text);
        }
    }

    println!(
        "Script finished with {} layers",
        session.stack().layer_count()
    );
    Ok(())
}

/// Write the default configuration file.
pub fn init_config(path: &Path) -> Result<()> {
    EditorConfig::default()
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;

    println!("Config written: {}", path.display());
    Ok(())
}
