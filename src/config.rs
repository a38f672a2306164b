//! Editor configuration
//!
//! Stored as JSON. Missing fields fall back to their defaults, so an empty
//! object `{}` is a valid config file.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrataError};
use crate::io::archive::ensure_file_name;

/// Default name of the layer manifest inside an archive directory
pub const DEFAULT_MANIFEST_FILE: &str = "output.txt";

/// Default `chrono` format for archive directory names
pub const DEFAULT_ARCHIVE_DIR_FORMAT: &str = "%Y.%m.%d.%H.%M.%S";

/// Settings shared by the CLI and the archive functions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// File name of the manifest listing layer names, top to bottom
    pub manifest_file_name: String,
    /// `chrono` strftime pattern for new archive directories
    pub archive_dir_format: String,
    /// `env_logger` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            manifest_file_name: DEFAULT_MANIFEST_FILE.to_string(),
            archive_dir_format: DEFAULT_ARCHIVE_DIR_FORMAT.to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl EditorConfig {
    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StrataError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let reader = BufReader::new(File::open(path)?);
        let config: EditorConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Reject settings that would produce unusable archives
    pub fn validate(&self) -> Result<()> {
        if self.manifest_file_name.trim().is_empty() {
            return Err(StrataError::invalid_argument(
                "manifest_file_name must not be empty",
            ));
        }
        ensure_file_name(&self.manifest_file_name)?;
        if self.archive_dir_format.trim().is_empty() {
            return Err(StrataError::invalid_argument(
                "archive_dir_format must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.manifest_file_name, "output.txt");
        assert_eq!(config.archive_dir_format, "%Y.%m.%d.%H.%M.%S");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{ "manifest_file_name": "layers.txt" }"#).unwrap();
        assert_eq!(config.manifest_file_name, "layers.txt");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("strata.json");
        let config = EditorConfig {
            log_filter: "debug".to_string(),
            ..EditorConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(EditorConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_empty_manifest_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "manifest_file_name": "" }"#).unwrap();
        assert!(matches!(
            EditorConfig::load(&path),
            Err(StrataError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_manifest_name_must_stay_in_archive() {
        for name in ["../x", "a/b", "a\\b", ".."] {
            let config = EditorConfig {
                manifest_file_name: name.to_string(),
                ..EditorConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(StrataError::InvalidArgument { .. })),
                "{:?} should be rejected",
                name
            );
        }
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_missing() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            EditorConfig::load(&dir.path().join("none.json")),
            Err(StrataError::FileNotFound { .. })
        ));
    }
}
