use crate::{Cli, Commands, ConfigAction};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[test]
fn verify_cli() {
    Cli::command().debug_assert();
}

#[test]
fn test_subcommand_required() {
    assert!(Cli::try_parse_from(["gbd"]).is_err());
}

#[test]
fn test_layouts_preview_flag() {
    let cli = Cli::try_parse_from(["gbd", "layouts"]).unwrap();
    assert!(matches!(cli.command, Commands::Layouts { preview: false }));
    let cli = Cli::try_parse_from(["gbd", "layouts", "--preview"]).unwrap();
    assert!(matches!(cli.command, Commands::Layouts { preview: true }));
}

#[test]
fn test_session_layout_defaults_to_none() {
    let cli = Cli::try_parse_from(["gbd", "session"]).unwrap();
    match cli.command {
        Commands::Session { layout } => assert_eq!(layout, None),
        _ => panic!("unexpected command variant"),
    }
}

#[test]
fn test_session_layout_override() {
    let cli = Cli::try_parse_from(["gbd", "session", "--layout", "3x3-complex"]).unwrap();
    match cli.command {
        Commands::Session { layout } => assert_eq!(layout.as_deref(), Some("3x3-complex")),
        _ => panic!("unexpected command variant"),
    }
}

#[test]
fn test_view_requires_url() {
    assert!(Cli::try_parse_from(["gbd", "view"]).is_err());
    let cli = Cli::try_parse_from(["gbd", "view", "/widget?type=chart"]).unwrap();
    match cli.command {
        Commands::View { url, width } => {
            assert_eq!(url, "/widget?type=chart");
            assert_eq!(width, 80);
        }
        _ => panic!("unexpected command variant"),
    }
}

#[test]
fn test_global_config_flag_after_subcommand() {
    let cli = Cli::try_parse_from(["gbd", "layouts", "--config", "/tmp/gbd.toml"]).unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/gbd.toml")));
}

#[test]
fn test_config_init_force() {
    let cli = Cli::try_parse_from(["gbd", "config", "init", "--force"]).unwrap();
    match cli.command {
        Commands::Config {
            action: ConfigAction::Init { force },
        } => assert!(force),
        _ => panic!("unexpected command variant"),
    }
}

#[test]
fn test_config_without_action_fails() {
    assert!(Cli::try_parse_from(["gbd", "config"]).is_err());
}
