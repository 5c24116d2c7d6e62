//! Configuration file commands.

use crate::ConfigAction;
use gridboard::config::{default, xdg, ConfigLoader};
use std::path::Path;
use std::process::ExitCode;

/// Runs `gbd config <action>`; `path` overrides the default location for
/// `path` and `validate`.
pub(crate) fn run_config_command(action: &ConfigAction, path: Option<&Path>) -> ExitCode {
    let result = match action {
        ConfigAction::Init { force } => default::create_default_config(*force).map(|path| {
            println!("Created configuration at {}", path.display());
        }),
        ConfigAction::Path => {
            match path {
                Some(path) => println!("{}", path.display()),
                None => println!("{}", xdg::config_path().display()),
            }
            Ok(())
        }
        ConfigAction::Validate => {
            let loaded = match path {
                Some(path) => ConfigLoader::load_from_path(path),
                None => ConfigLoader::load_default(),
            };
            loaded.map(|config| {
                println!("Configuration is valid");
                println!("{config:#?}");
            })
        }
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Config error: {e}");
            ExitCode::FAILURE
        }
    }
}
