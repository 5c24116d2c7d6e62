//! Default configuration template and file creation utilities.
//!
//! Provides a well-commented TOML template that matches `Config::default()`
//! and functions to write it to the XDG config path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::xdg;

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

/// A well-commented TOML template with all default values.
///
/// Every value here must match `Config::default()` from `schema.rs`.
/// Sections: `[workspace]`, `[storage]`, `[mirror]`, `[detach]`, `[logging]`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# gridboard configuration
#
# This file was auto-generated with default values.
# All values shown below are the built-in defaults.
#
# Location: $XDG_CONFIG_HOME/gridboard/config.toml

# ==============================================================================
# Workspace
# ==============================================================================

[workspace]

# Layout opened by `gbd session` when --layout is not given.
# Run `gbd layouts` for the full list of ids.
# Examples: "1x1", "2x2", "2col-span-right", "3x3-complex"
default_layout = "2x2"

# ==============================================================================
# Storage
# ==============================================================================

[storage]

# Directory holding one file per stored key.
# Empty string means the platform data directory
# ($XDG_DATA_HOME/gridboard or ~/.local/share/gridboard).
# Tilde (~) is expanded to the user's home directory.
dir = ""

# Largest value the store accepts, in bytes. Saves above this fail locally
# and are still sent to the mirror.
capacity_bytes = 4096

# How long saved values stay readable. Empty string disables expiry.
# Examples: "7d", "12h", ""
snapshot_ttl = "7d"

# How often a running session looks for changes made by another process.
# Examples: "1s", "500ms"
poll_interval = "1s"

# ==============================================================================
# Mirror
# ==============================================================================

[mirror]

# Replicate every saved layout to a remote endpoint.
# The local store stays the source of truth; mirror failures are only reported.
enabled = false

# Endpoint receiving the layout as a JSON POST body.
url = "http://localhost:3000/api/save-layout"

# Per-request timeout.
# Examples: "5s", "500ms"
timeout = "5s"

# ==============================================================================
# Detached widgets
# ==============================================================================

[detach]

# Base URL of the standalone widget view. Detached widgets open
# <base_url>/widget?type=<kind>&id=<id>
base_url = "http://localhost:3000"

# Program that opens the URL. Defaults to "xdg-open" ("open" on macOS).
# opener = "xdg-open"

# Requested window size in pixels, passed to the opener as
# GBD_WINDOW_WIDTH and GBD_WINDOW_HEIGHT.
width = 800
height = 600

# ==============================================================================
# Logging
# ==============================================================================

[logging]

# Logging verbosity level, used when GBD_LOG is not set.
# Options: "error", "warn", "info", "debug", "trace"
log_level = "info"

# Path to log file. Empty string means log to stderr.
# Examples: "~/.local/state/gridboard/gbd.log"
log_file = ""
"#;

// ---------------------------------------------------------------------------
// File creation functions
// ---------------------------------------------------------------------------

/// Creates (or force-overwrites) the default config file.
///
/// - If the file exists and `force` is `false`, returns `ConfigError::AlreadyExists`.
/// - If the file exists and `force` is `true`, backs it up to `.toml.backup` first.
/// - Returns the path where the config was written.
pub fn create_default_config(force: bool) -> Result<PathBuf, ConfigError> {
    let path = xdg::config_path();

    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists { path });
        }
        let backup_path = path.with_extension("toml.backup");
        fs::rename(&path, &backup_path).map_err(|e| ConfigError::WriteError {
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!("Backed up existing config to {}", backup_path.display());
    }

    write_default_config(&path)?;
    tracing::info!("Created default configuration at {}", path.display());
    Ok(path)
}

/// Writes the default template to `path`, creating parent dirs and setting 0600 permissions.
fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_error = |source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    xdg::ensure_config_dir().map_err(write_error)?;
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_error)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
