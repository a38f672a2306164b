//! Multi-layer archives
//!
//! An archive is a directory holding one `<name>.ppm` per layer plus a
//! manifest listing the layer names top to bottom, one per line.

use std::collections::HashSet;
use std::fmt::Write;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;

use super::ppm::{read_ppm, save_ppm};
use crate::canvas::PixelGrid;
use crate::config::EditorConfig;
use crate::error::{Result, StrataError};
use crate::layers::LayerStack;

/// Suffixes tried before giving up on a taken archive folder name
const MAX_DIR_ATTEMPTS: usize = 1000;

/// Export every layer into a new timestamped directory under `base_dir`
///
/// Returns the path of the created directory.
///
/// # Errors
/// * `InvalidState` - if the stack is empty or any layer has no image
/// * `InvalidArgument` - if a layer name cannot be used as a file name
pub fn export_layers(stack: &LayerStack, base_dir: &Path, config: &EditorConfig) -> Result<PathBuf> {
    if stack.is_empty() {
        return Err(StrataError::invalid_state("There are no layers to export"));
    }
    for layer in stack.layers() {
        if layer.is_empty() {
            return Err(StrataError::invalid_state(format!(
                "Layer '{}' has no image",
                layer.name()
            )));
        }
        ensure_file_name(layer.name())?;
    }

    let mut folder_name = String::new();
    write!(folder_name, "{}", Local::now().format(&config.archive_dir_format)).map_err(|_| {
        StrataError::invalid_argument(format!(
            "'{}' is not a valid archive directory format",
            config.archive_dir_format
        ))
    })?;
    fs::create_dir_all(base_dir)?;
    let folder = create_fresh_dir(base_dir, &folder_name)?;
    info!("Archive folder created at {}", folder.display());

    let mut manifest = String::new();
    for layer in stack.layers() {
        save_ppm(layer.grid(), &layer_path(&folder, layer.name()))?;
        manifest.push_str(layer.name());
        manifest.push('\n');
    }
    fs::write(folder.join(&config.manifest_file_name), manifest)?;

    info!(
        "Exported {} layers to {}",
        stack.layer_count(),
        folder.display()
    );
    Ok(folder)
}

/// Import an archive directory into `stack`
///
/// Layers are added bottom-up so the manifest's top-to-bottom order is
/// restored. Every file is decoded and every name checked before the stack
/// is touched. Returns the number of layers imported.
///
/// # Errors
/// * `FileNotFound` - missing manifest or layer file
/// * `InvalidArgument` - a name repeats in the manifest or already exists
/// * `InvalidImage` - a layer file is not valid PPM
pub fn import_layers(stack: &mut LayerStack, dir: &Path, config: &EditorConfig) -> Result<usize> {
    let manifest_path = dir.join(&config.manifest_file_name);
    if !manifest_path.exists() {
        return Err(StrataError::FileNotFound {
            path: manifest_path.display().to_string(),
        });
    }

    let manifest = fs::read_to_string(&manifest_path)?;
    let names: Vec<&str> = manifest
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut seen = HashSet::new();
    for name in &names {
        if !seen.insert(*name) || stack.get(name).is_some() {
            return Err(StrataError::invalid_argument(format!(
                "Layer already exists with name '{}'",
                name
            )));
        }
        ensure_file_name(name)?;
    }

    let images = names
        .iter()
        .rev()
        .map(|name| read_ppm(&layer_path(dir, name)).map(|grid| (*name, grid)))
        .collect::<Result<Vec<(&str, PixelGrid)>>>()?;

    for (name, grid) in images {
        stack.add_layer(name)?;
        stack.upload(grid)?;
        info!("Layer {} has been uploaded", name);
    }

    Ok(names.len())
}

/// Create `base_dir/name`, or `name-1`, `name-2`, ... if it is taken
fn create_fresh_dir(base_dir: &Path, name: &str) -> Result<PathBuf> {
    for attempt in 0..MAX_DIR_ATTEMPTS {
        let folder = match attempt {
            0 => base_dir.join(name),
            n => base_dir.join(format!("{}-{}", name, n)),
        };
        match fs::create_dir(&folder) {
            Ok(()) => return Ok(folder),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(StrataError::invalid_state(format!(
        "No free archive folder name for '{}' in {}",
        name,
        base_dir.display()
    )))
}

fn layer_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.ppm", name))
}

pub(crate) fn ensure_file_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(|c: char| c == '/' || c == '\\') || name == "." || name == ".." {
        return Err(StrataError::invalid_argument(format!(
            "Layer name '{}' cannot be used as a file name",
            name
        )));
    }
    Ok(())
}
