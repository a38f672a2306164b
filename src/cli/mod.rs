//! CLI Module
//!
//! Command-line interface for the Strata image editor.

pub mod commands;
pub mod session;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::transform::Adjustment;

pub use session::{ScriptCommand, Session};

/// Strata - layer-stack image editor
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply adjustments to an image, in order
    #[command(name = "apply")]
    Apply {
        /// blur, sharpen, greyscale or sepia
        #[arg(required = true)]
        adjustments: Vec<Adjustment>,

        /// Input image (.ppm, .png, .jpg)
        #[arg(short, long)]
        input: PathBuf,

        /// Output image
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Write a black and white checkerboard
    #[command(name = "checkerboard")]
    Checkerboard {
        /// Side length of one tile in pixels
        #[arg(long)]
        tile_side: usize,

        /// Total number of tiles (a perfect square)
        #[arg(long)]
        tiles: usize,

        /// Output image
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show image dimensions
    #[command(name = "info")]
    Info {
        /// Image to inspect
        path: PathBuf,
    },

    /// Run a session script
    #[command(name = "run")]
    Run {
        /// Script file, one command per line
        script: PathBuf,
    },

    /// Write the default config
    #[command(name = "init-config")]
    InitConfig {
        /// Where to write the config
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from([
            "strata", "apply", "blur", "sepia", "-i", "in.ppm", "-o", "out.png",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Apply {
                adjustments,
                input,
                output,
            }) => {
                assert_eq!(adjustments, vec![Adjustment::Blur, Adjustment::Sepia]);
                assert_eq!(input, PathBuf::from("in.ppm"));
                assert_eq!(output, PathBuf::from("out.png"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_adjustment() {
        assert!(Cli::try_parse_from(["strata", "apply", "emboss", "-i", "a", "-o", "b"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["strata", "info", "a.ppm", "-v", "--config", "s.json"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("s.json")));
    }
}
