//! Editing session driven by text commands
//!
//! One command per line:
//!
//! ```text
//! new-layer <name>            add an empty layer on top
//! load <path>                 load an image into the current layer
//! load-as <name> <path>       add a layer seeded with an image
//! duplicate <new> [source]    copy a layer (default: current)
//! delete [name]               delete a layer (default: current)
//! select <name>               make a layer current
//! select-index <index>        make the layer at an index current
//! toggle                      flip the current layer's visibility
//! blur | sharpen | greyscale | sepia
//! checkerboard <tile> <tiles> fill the current layer with a checkerboard
//! save <path>                 save the current layer
//! save-top <path>             save the topmost visible layer
//! export-all <dir>            write every layer as an archive
//! import-all <dir>            read an archive back in
//! print-state                 show the stack as JSON
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::path::{Path, PathBuf};

use log::debug;

use crate::config::EditorConfig;
use crate::error::{Result, StrataError};
use crate::io::{export_layers, import_layers, load_image, save_image};
use crate::layers::LayerStack;
use crate::transform::Adjustment;

/// A parsed session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    NewLayer(String),
    Load(PathBuf),
    LoadAs { name: String, path: PathBuf },
    Duplicate { new_name: String, source: Option<String> },
    Delete(Option<String>),
    Select(String),
    SelectIndex(usize),
    Toggle,
    Adjust(Adjustment),
    Checkerboard { tile_side: usize, num_tiles: usize },
    Save(PathBuf),
    SaveTop(PathBuf),
    ExportAll(PathBuf),
    ImportAll(PathBuf),
    PrintState,
}

impl ScriptCommand {
    /// Parse one line; `Ok(None)` for blank and comment lines
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut words = line.split_whitespace();
        let keyword = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        let command = match (keyword, args.as_slice()) {
            ("new-layer", [name]) => ScriptCommand::NewLayer(name.to_string()),
            ("load", [path]) => ScriptCommand::Load(PathBuf::from(path)),
            ("load-as", [name, path]) => ScriptCommand::LoadAs {
                name: name.to_string(),
                path: PathBuf::from(path),
            },
            ("duplicate", [new_name]) => ScriptCommand::Duplicate {
                new_name: new_name.to_string(),
                source: None,
            },
            ("duplicate", [new_name, source]) => ScriptCommand::Duplicate {
                new_name: new_name.to_string(),
                source: Some(source.to_string()),
            },
            ("delete", []) => ScriptCommand::Delete(None),
            ("delete", [name]) => ScriptCommand::Delete(Some(name.to_string())),
            ("select", [name]) => ScriptCommand::Select(name.to_string()),
            ("select-index", [index]) => ScriptCommand::SelectIndex(parse_number(index)?),
            ("toggle", []) => ScriptCommand::Toggle,
            ("checkerboard", [tile_side, num_tiles]) => ScriptCommand::Checkerboard {
                tile_side: parse_number(tile_side)?,
                num_tiles: parse_number(num_tiles)?,
            },
            ("save", [path]) => ScriptCommand::Save(PathBuf::from(path)),
            ("save-top", [path]) => ScriptCommand::SaveTop(PathBuf::from(path)),
            ("export-all", [dir]) => ScriptCommand::ExportAll(PathBuf::from(dir)),
            ("import-all", [dir]) => ScriptCommand::ImportAll(PathBuf::from(dir)),
            ("print-state", []) => ScriptCommand::PrintState,
            (word, []) => match word.parse::<Adjustment>() {
                Ok(adjustment) => ScriptCommand::Adjust(adjustment),
                Err(_) => return Err(unknown_command(line)),
            },
            _ => return Err(unknown_command(line)),
        };
        Ok(Some(command))
    }
}

fn parse_number(token: &str) -> Result<usize> {
    token.parse().map_err(|_| {
        StrataError::invalid_argument(format!("'{}' is not a non-negative number", token))
    })
}

fn unknown_command(line: &str) -> StrataError {
    StrataError::invalid_argument(format!("Unknown command or wrong arguments: '{}'", line))
}

/// A layer stack plus the settings its file commands use
#[derive(Debug, Default)]
pub struct Session {
    stack: LayerStack,
    config: EditorConfig,
}

impl Session {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            stack: LayerStack::new(),
            config,
        }
    }

    pub fn stack(&self) -> &LayerStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut LayerStack {
        &mut self.stack
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Parse and run one line, returning any text it produced
    pub fn execute_line(&mut self, line: &str) -> Result<Option<String>> {
        match ScriptCommand::parse(line)? {
            Some(command) => self.execute(&command),
            None => Ok(None),
        }
    }

    /// Run one command against the stack
    pub fn execute(&mut self, command: &ScriptCommand) -> Result<Option<String>> {
        debug!("[SESSION] {:?}", command);

        match command {
            ScriptCommand::NewLayer(name) => self.stack.add_layer(name)?,
            ScriptCommand::Load(path) => self.stack.upload(load_image(path)?)?,
            ScriptCommand::LoadAs { name, path } => {
                self.stack.add_layer_with_image(load_image(path)?, name)?
            }
            ScriptCommand::Duplicate { new_name, source } => {
                let source = match source {
                    Some(source) => source.clone(),
                    None => self.current_name()?,
                };
                self.stack.duplicate_layer(new_name, &source)?
            }
            ScriptCommand::Delete(name) => {
                let name = match name {
                    Some(name) => name.clone(),
                    None => self.current_name()?,
                };
                self.stack.delete_layer(&name)?
            }
            ScriptCommand::Select(name) => self.stack.set_current(name)?,
            ScriptCommand::SelectIndex(index) => self.stack.set_current_from_index(*index)?,
            ScriptCommand::Toggle => {
                let visible = self.stack.toggle_visible()?;
                return Ok(Some(format!(
                    "{} is now {}",
                    self.current_name()?,
                    if visible { "visible" } else { "hidden" }
                )));
            }
            ScriptCommand::Adjust(adjustment) => self.stack.apply_adjustment(*adjustment)?,
            ScriptCommand::Checkerboard {
                tile_side,
                num_tiles,
            } => {
                self.stack.checkerboard(*tile_side, *num_tiles)?;
            }
            ScriptCommand::Save(path) => self.save_current(path)?,
            ScriptCommand::SaveTop(path) => {
                let top = self.stack.top_visible()?;
                save_image(top.grid(), path)?
            }
            ScriptCommand::ExportAll(dir) => {
                let folder = export_layers(&self.stack, dir, &self.config)?;
                return Ok(Some(format!("Exported to {}", folder.display())));
            }
            ScriptCommand::ImportAll(dir) => {
                let count = import_layers(&mut self.stack, dir, &self.config)?;
                return Ok(Some(format!("Imported {} layers", count)));
            }
            ScriptCommand::PrintState => {
                return Ok(Some(serde_json::to_string_pretty(&self.stack.summary())?));
            }
        }
        Ok(None)
    }

    fn current_name(&self) -> Result<String> {
        self.stack
            .current_name()
            .map(str::to_string)
            .ok_or_else(|| StrataError::invalid_state("There is no current layer"))
    }

    fn save_current(&self, path: &Path) -> Result<()> {
        let layer = self
            .stack
            .current_layer()
            .ok_or_else(|| StrataError::invalid_state("There is no current layer"))?;
        save_image(layer.grid(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Pixel;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;
    use test_case::test_case;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ScriptCommand::parse("  # comment").unwrap(), None);
        assert_eq!(ScriptCommand::parse("").unwrap(), None);
        assert_eq!(
            ScriptCommand::parse("new-layer sky").unwrap(),
            Some(ScriptCommand::NewLayer("sky".to_string()))
        );
        assert_eq!(
            ScriptCommand::parse("duplicate copy").unwrap(),
            Some(ScriptCommand::Duplicate {
                new_name: "copy".to_string(),
                source: None
            })
        );
        assert_eq!(
            ScriptCommand::parse("checkerboard 8 16").unwrap(),
            Some(ScriptCommand::Checkerboard {
                tile_side: 8,
                num_tiles: 16
            })
        );
        assert_eq!(
            ScriptCommand::parse("Sepia").unwrap(),
            Some(ScriptCommand::Adjust(Adjustment::Sepia))
        );
    }

    #[test_case("fly" ; "unknown keyword")]
    #[test_case("new-layer" ; "missing name")]
    #[test_case("new-layer a b" ; "extra argument")]
    #[test_case("select-index -1" ; "negative index")]
    #[test_case("blur now" ; "adjustment with argument")]
    fn test_parse_errors(bad: &str) {
        assert!(matches!(
            ScriptCommand::parse(bad),
            Err(StrataError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_session_edits_stack() {
        let mut session = Session::default();
        for line in [
            "new-layer board",
            "checkerboard 1 4",
            "duplicate copy",
            "greyscale",
            "new-layer top",
            "toggle",
        ] {
            session.execute_line(line).unwrap();
        }

        let stack = session.stack();
        let names: Vec<&str> = stack.layers().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["top", "board", "copy"]);
        assert_eq!(stack.top_visible().unwrap().name(), "board");
        assert_eq!(stack.get("copy").unwrap().pixel_at(0, 1), Pixel::WHITE);
    }

    #[test]
    fn test_delete_defaults_to_current() {
        let mut session = Session::default();
        session.execute_line("new-layer a").unwrap();
        session.execute_line("checkerboard 1 1").unwrap();
        session.execute_line("new-layer b").unwrap();
        session.execute_line("delete").unwrap();
        assert_eq!(session.stack().current_name(), Some("a"));
        assert_eq!(session.stack().layer_count(), 1);
    }

    #[test]
    fn test_failed_command_reports_error() {
        let mut session = Session::default();
        assert!(matches!(
            session.execute_line("blur"),
            Err(StrataError::InvalidState { .. })
        ));
        assert!(matches!(
            session.execute_line("delete"),
            Err(StrataError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_save_and_load_files() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("board.png");
        let mut session = Session::default();

        session.execute_line("new-layer board").unwrap();
        session.execute_line("checkerboard 2 4").unwrap();
        session
            .execute_line(&format!("save {}", png.display()))
            .unwrap();
        session
            .execute_line(&format!("load-as again {}", png.display()))
            .unwrap();

        let stack = session.stack();
        assert_eq!(stack.current_name(), Some("again"));
        assert_eq!(
            stack.get("again").unwrap().grid(),
            stack.get("board").unwrap().grid()
        );
    }

    #[test]
    fn test_print_state_is_json() {
        let mut session = Session::default();
        session.execute_line("new-layer a").unwrap();
        let out = session.execute_line("print-state").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["current"], "a");
    }
}
