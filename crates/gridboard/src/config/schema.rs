//! TOML configuration schema types for gridboard.
//!
//! All structs derive `Deserialize` and `Serialize` with defaults via
//! `#[serde(default)]`, so a missing file, section or key falls back to the
//! built-in value.
//!
//! Duration fields use human-readable strings (e.g. `"7d"`, `"1s"`, `"250ms"`)
//! parsed by the `humantime` crate. [`Config::validate`] checks all of them
//! up front so the rest of the program can use the typed accessors.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::config::xdg;
use crate::layout::LayoutCatalog;
use crate::widgets::WindowSize;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration encompassing all sections.
///
/// Corresponds to the full TOML file structure:
/// ```toml
/// [workspace]
/// [storage]
/// [mirror]
/// [detach]
/// [logging]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Which layout a new session starts with.
    pub workspace: WorkspaceConfig,
    /// Local key-value store settings.
    pub storage: StorageConfig,
    /// Remote snapshot mirror.
    pub mirror: MirrorConfig,
    /// Standalone widget views.
    pub detach: DetachConfig,
    /// Log output.
    pub logging: LoggingConfig,
}

impl Config {
    /// Checks every value that TOML typing alone cannot.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if LayoutCatalog::builtin()
            .get(&self.workspace.default_layout)
            .is_none()
        {
            return Err(ConfigError::InvalidValue {
                field: "workspace.default_layout",
                message: format!("unknown layout '{}'", self.workspace.default_layout),
            });
        }
        self.storage.snapshot_ttl()?;
        self.storage.poll_interval()?;
        self.mirror.timeout()?;
        if self.mirror.enabled && self.mirror.url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "mirror.url",
                message: "required when the mirror is enabled".to_string(),
            });
        }
        if self.detach.width == 0 || self.detach.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "detach",
                message: "window width and height must be positive".to_string(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

/// Workspace defaults from the `[workspace]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Catalog id of the layout used when none is given on the command line.
    pub default_layout: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            default_layout: "2x2".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Local store settings from the `[storage]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Store directory. Empty string means the platform data directory.
    pub dir: String,
    /// Largest value the store accepts, in bytes.
    pub capacity_bytes: usize,
    /// How long stored values stay readable (e.g. `"7d"`). Empty disables expiry.
    pub snapshot_ttl: String,
    /// How often to look for changes written by other processes.
    pub poll_interval: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            capacity_bytes: kv_store::DEFAULT_CAPACITY_BYTES,
            snapshot_ttl: "7d".to_string(),
            poll_interval: "1s".to_string(),
        }
    }
}

impl StorageConfig {
    /// Resolved store directory, `None` if no platform default exists.
    pub fn resolved_dir(&self) -> Option<PathBuf> {
        if self.dir.trim().is_empty() {
            kv_store::FileStore::default_dir(xdg::APP_NAME)
        } else {
            Some(xdg::expand_tilde(&self.dir))
        }
    }

    /// Expiry of stored values; `None` when disabled.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for an unparseable duration.
    pub fn snapshot_ttl(&self) -> Result<Option<Duration>, ConfigError> {
        if self.snapshot_ttl.trim().is_empty() {
            return Ok(None);
        }
        parse_duration("storage.snapshot_ttl", &self.snapshot_ttl).map(Some)
    }

    /// Interval between change polls.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for an unparseable or zero duration.
    pub fn poll_interval(&self) -> Result<Duration, ConfigError> {
        let interval = parse_duration("storage.poll_interval", &self.poll_interval)?;
        if interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "storage.poll_interval",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(interval)
    }
}

// ---------------------------------------------------------------------------
// Mirror
// ---------------------------------------------------------------------------

/// Remote mirror settings from the `[mirror]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MirrorConfig {
    /// Replicate saved snapshots to `url`.
    pub enabled: bool,
    /// Endpoint receiving `POST` requests with the snapshot body.
    pub url: String,
    /// Per-request timeout.
    pub timeout: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "http://localhost:3000/api/save-layout".to_string(),
            timeout: "5s".to_string(),
        }
    }
}

impl MirrorConfig {
    /// Request timeout.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for an unparseable duration.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        parse_duration("mirror.timeout", &self.timeout)
    }
}

// ---------------------------------------------------------------------------
// Detach
// ---------------------------------------------------------------------------

/// Standalone view settings from the `[detach]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DetachConfig {
    /// Base URL the `/widget` route is appended to.
    pub base_url: String,
    /// Program that opens the URL.
    pub opener: String,
    /// Requested window width in pixels.
    pub width: u32,
    /// Requested window height in pixels.
    pub height: u32,
}

impl Default for DetachConfig {
    fn default() -> Self {
        let size = WindowSize::default();
        Self {
            base_url: "http://localhost:3000".to_string(),
            opener: default_opener().to_string(),
            width: size.width,
            height: size.height,
        }
    }
}

impl DetachConfig {
    /// Requested window size.
    pub fn window_size(&self) -> WindowSize {
        WindowSize {
            width: self.width,
            height: self.height,
        }
    }
}

fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Log settings from the `[logging]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Verbosity when `GBD_LOG` is not set.
    pub log_level: LogLevel,
    /// Path to log file. Empty string means stderr.
    pub log_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_file: String::new(),
        }
    }
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational messages (default).
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Filter directive for this level.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn parse_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|e| ConfigError::InvalidValue {
        field,
        message: format!("'{value}' is not a duration: {e}"),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
