//! gridboard - CLI entry point
//!
//! `gbd` lists the layout catalog, runs an interactive workspace session over
//! stdin, renders detached widgets, and manages the configuration file.

mod commands;

#[cfg(test)]
mod cli_tests;

use clap::{Parser, Subcommand};
use gridboard::config::{schema::Config, ConfigError, ConfigLoader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Grid workspace for market widgets
#[derive(Parser)]
#[command(name = "gbd")]
#[command(version, about = "Grid workspace for market widgets")]
pub(crate) struct Cli {
    /// Configuration file (default: $XDG_CONFIG_HOME/gridboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the gbd CLI
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List the layout catalog
    Layouts {
        /// Draw each layout's grid
        #[arg(long)]
        preview: bool,
    },

    /// Run an interactive workspace session (commands on stdin)
    Session {
        /// Layout id or 1-based catalog number (default: from config)
        #[arg(long)]
        layout: Option<String>,
    },

    /// Render one detached widget from its URL
    View {
        /// Detach URL, e.g. http://localhost:3000/widget?type=chart&id=chart-0
        url: String,

        /// Render width in columns
        #[arg(long, default_value_t = 80)]
        width: u16,
    },

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => ConfigLoader::load_from_path(path),
        None => ConfigLoader::load_default(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Config { action } = &cli.command {
        return commands::run_config_command(action, cli.config.as_deref());
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = gridboard::logging::init(&config.logging) {
        eprintln!("Error: cannot open log file '{}': {e}", config.logging.log_file);
        return ExitCode::FAILURE;
    }

    match cli.command {
        Commands::Layouts { preview } => commands::run_layouts_command(preview),
        Commands::Session { layout } => commands::run_session_command(&config, layout.as_deref()),
        Commands::View { url, width } => commands::run_view_command(&config, &url, width),
        Commands::Config { .. } => ExitCode::SUCCESS,
    }
}
