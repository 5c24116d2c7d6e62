//! Platform-aware path resolution for gridboard.
//!
//! On **Linux**, follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/gridboard` or `~/.config/gridboard`
//!
//! On **macOS**, uses Apple conventions with the XDG env var override:
//! - Config: `$XDG_CONFIG_HOME/gridboard` or `~/Library/Application Support/gridboard`
//!
//! The data directory used by the key-value store is resolved by
//! `kv_store::FileStore::default_dir` with the same [`APP_NAME`].

use std::fs;
use std::path::{Path, PathBuf};

/// Directory name used under every base directory.
pub const APP_NAME: &str = "gridboard";

/// Returns the configuration directory for gridboard.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/gridboard` (if env var set and non-empty, any platform)
/// 2. Platform default:
///    - Linux: `~/.config/gridboard`
///    - macOS: `~/Library/Application Support/gridboard`
pub fn config_dir() -> PathBuf {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg).join(APP_NAME),
        _ => platform_config_dir().join(APP_NAME),
    }
}

/// Platform-native config base directory (without XDG override).
fn platform_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::config_dir().unwrap_or_else(|| home().join("Library/Application Support"))
    }
    #[cfg(not(target_os = "macos"))]
    {
        home().join(".config")
    }
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_default()
}

/// Returns the path to the main configuration file.
///
/// Resolves to `config_dir()/config.toml`.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Expands a leading `~` in a path string to the user's home directory.
///
/// If the path does not start with `~`, it is returned as-is.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home().join(rest)
    } else if path == "~" {
        home()
    } else {
        PathBuf::from(path)
    }
}

/// Creates a directory and all parent directories with mode 0700.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

/// Creates the configuration directory if it does not exist, returning its path.
pub fn ensure_config_dir() -> std::io::Result<PathBuf> {
    let dir = config_dir();
    ensure_dir(&dir)?;
    Ok(dir)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper: run a closure with env vars temporarily set, then restore.
    pub(crate) fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let originals: Vec<_> = vars
            .iter()
            .map(|(k, _)| (*k, std::env::var(k).ok()))
            .collect();

        for (k, v) in vars {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        f();

        for (k, original) in &originals {
            match original {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_path_with_xdg_override() {
        with_env(&[("XDG_CONFIG_HOME", Some("/custom/config"))], || {
            assert_eq!(
                config_path(),
                PathBuf::from("/custom/config/gridboard/config.toml")
            );
        });
    }

    #[test]
    #[serial]
    fn test_empty_xdg_value_is_ignored() {
        with_env(&[("XDG_CONFIG_HOME", Some(""))], || {
            assert_eq!(config_dir(), platform_config_dir().join(APP_NAME));
        });
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    #[serial]
    fn test_linux_config_default_is_dot_config() {
        with_env(&[("XDG_CONFIG_HOME", None)], || {
            let home = dirs::home_dir().expect("could not determine home directory");
            assert_eq!(config_dir(), home.join(".config/gridboard"));
        });
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().expect("could not determine home directory");
        assert_eq!(expand_tilde("~/foo"), home.join("foo"));
        assert_eq!(expand_tilde("~"), home);
        assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
        assert_eq!(expand_tilde("relative/path"), PathBuf::from("relative/path"));
    }

    #[test]
    fn test_ensure_dir_creates_directory() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let nested = tmp.path().join("a/b/c");
        ensure_dir(&nested).expect("ensure_dir failed");
        assert!(nested.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_dir_sets_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let dir = tmp.path().join("secure");
        ensure_dir(&dir).expect("ensure_dir failed");
        let mode = fs::metadata(&dir)
            .expect("failed to read metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    #[serial]
    fn test_ensure_config_dir_creates_at_xdg_path() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        with_env(
            &[(
                "XDG_CONFIG_HOME",
                Some(tmp.path().to_str().expect("non-utf8 tmpdir")),
            )],
            || {
                let result = ensure_config_dir().expect("ensure_config_dir failed");
                assert_eq!(result, tmp.path().join("gridboard"));
                assert!(result.is_dir());
            },
        );
    }
}
