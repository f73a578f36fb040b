//! Path utilities for per-user data and configuration locations.
//!
//! Platform directories come from [`dirs`]: on Linux that is
//! `$XDG_DATA_HOME` and `$XDG_CONFIG_HOME`, falling back to `~/.local/share`
//! and `~/.config`. When no home directory can be determined the current
//! directory is used.

use std::path::PathBuf;

const APP_DIR: &str = "cryptodash";

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

/// Returns the data directory, where the log file lives.
///
/// Usually `~/.local/share/cryptodash`.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    app_dir(dirs::data_dir())
}

/// Returns the configuration directory, usually `~/.config/cryptodash`.
#[must_use]
pub fn get_config_dir() -> PathBuf {
    app_dir(dirs::config_dir())
}

/// Config file read when `--config` is not given and the file exists.
#[must_use]
pub fn default_config_file() -> PathBuf {
    get_config_dir().join("config.toml")
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when no home directory is
/// known, are returned unchanged.
///
/// # Examples
///
/// ```
/// use cryptodash::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = dirs::home_dir() else {
        return path.to_string();
    };
    if path == "~" {
        home.to_string_lossy().into_owned()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest).to_string_lossy().into_owned()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_only_expands_at_start() {
        assert_eq!(expand_tilde("/tmp/~/x"), "/tmp/~/x");
        assert_eq!(expand_tilde("relative/path"), "relative/path");
    }

    #[test]
    fn tilde_prefix_uses_home() {
        if let Some(home) = dirs::home_dir() {
            let expanded = expand_tilde("~/logs/app.log");
            assert_eq!(PathBuf::from(expanded), home.join("logs/app.log"));
        }
    }

    #[test]
    fn missing_platform_dir_falls_back_to_current() {
        assert_eq!(app_dir(None), PathBuf::from("./cryptodash"));
        assert_eq!(
            app_dir(Some(PathBuf::from("/data"))),
            PathBuf::from("/data/cryptodash")
        );
    }

    #[test]
    fn dirs_end_with_app_name() {
        assert!(get_data_dir().ends_with(APP_DIR));
        assert!(default_config_file().ends_with("cryptodash/config.toml"));
    }
}
