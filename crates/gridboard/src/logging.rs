//! Logging initialization for the `gbd` binary.
//!
//! Configures the `tracing` subscriber with level filtering via the `GBD_LOG`
//! environment variable. Falls back to the `[logging] log_level` setting
//! when the variable is unset or invalid.
//!
//! # Usage
//!
//! ```bash
//! # Level from config.toml (info by default)
//! gbd session
//!
//! # Debug level
//! GBD_LOG=debug gbd session
//!
//! # Module-specific filtering
//! GBD_LOG=gridboard::persistence=trace,warn gbd session
//! ```

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::schema::LoggingConfig;
use crate::config::xdg;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "GBD_LOG";

/// Filter from `GBD_LOG`, or from the configured level.
pub fn filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_directive()))
}

/// Initialize the tracing subscriber.
///
/// Output goes to `config.log_file` when set (appending, no colors),
/// otherwise to stderr so it never mixes with command output on stdout.
/// A second call is a no-op.
///
/// # Errors
///
/// Returns the I/O error if the log file cannot be opened.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    let filter = filter(config);
    let builder = fmt().with_env_filter(filter).with_target(false);

    let result = if config.log_file.trim().is_empty() {
        builder.with_writer(std::io::stderr).try_init()
    } else {
        let path = xdg::expand_tilde(&config.log_file);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn env_filter_parses_valid_directives() {
        for d in ["info", "debug", "warn", "error", "trace"] {
            assert!(EnvFilter::try_new(d).is_ok(), "failed to parse directive: {}", d);
        }
    }

    #[test]
    fn env_filter_parses_module_directive() {
        assert!(EnvFilter::try_new("gridboard::persistence=trace,warn").is_ok());
    }

    #[test]
    fn configured_level_is_a_valid_filter() {
        let config = LoggingConfig::default();
        assert!(EnvFilter::try_new(config.log_level.as_directive()).is_ok());
    }
}
