//! Strata CLI - Layer-Stack Image Editor
//!
//! Command-line interface for the Strata image editor.

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use strata::cli::{commands, Cli, Commands};
use strata::{EditorConfig, StrataError};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    // Initialize logger
    let filter = if cli.verbose {
        "debug"
    } else {
        config.log_filter.as_str()
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    info!("Strata Image Editor v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Some(cmd) => handle_command(cmd, &config),
        None => {
            println!("Strata Image Editor v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = &result {
        if let Some(cause) = err.downcast_ref::<StrataError>() {
            error!("[{}] {}", cause.error_code(), cause.friendly_message());
            for suggestion in cause.recovery_suggestions() {
                eprintln!("  hint: {}", suggestion);
            }
        }
    }
    result
}

fn handle_command(cmd: Commands, config: &EditorConfig) -> Result<()> {
    match cmd {
        Commands::Apply {
            adjustments,
            input,
            output,
        } => commands::apply(&adjustments, &input, &output),
        Commands::Checkerboard {
            tile_side,
            tiles,
            output,
        } => commands::checkerboard(tile_side, tiles, &output),
        Commands::Info { path } => commands::info(&path),
        Commands::Run { script } => commands::run_script(&script, config),
        Commands::InitConfig { path } => commands::init_config(&path),
    }
}
