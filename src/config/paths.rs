//! Where `settings.toml` lives.
//!
//! By default: `dirs::config_dir()/code-timer/settings.toml`
//! (`~/.config/code-timer` on Linux, `~/Library/Application Support/code-timer`
//! on macOS, `%APPDATA%\code-timer` on Windows).
//!
//! The panel host is usually spawned by the editor extension, which may point
//! it at a workspace-specific file through `CODE_TIMER_CONFIG`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "CODE_TIMER_CONFIG";

const APP_DIR: &str = "code-timer";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Directory holding the settings file; created on save.
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
}

impl AppPaths {
    /// Resolve from `CODE_TIMER_CONFIG`, else the platform config dir.
    pub fn new() -> Self {
        Self::with_override(std::env::var_os(CONFIG_ENV))
    }

    /// A blank override is ignored.  Without a platform config dir the
    /// current directory is used.
    pub fn with_override(settings_file: Option<OsString>) -> Self {
        match settings_file.filter(|s| !s.is_empty()) {
            Some(file) => {
                let settings_file = PathBuf::from(file);
                let config_dir = settings_file
                    .parent()
                    .filter(|dir| !dir.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                log::debug!("config: using {} from ${CONFIG_ENV}", settings_file.display());
                Self {
                    config_dir,
                    settings_file,
                }
            }
            None => Self::in_dir(
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(APP_DIR),
            ),
        }
    }

    /// `settings.toml` inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let config_dir = dir.into();
        Self {
            settings_file: config_dir.join(SETTINGS_FILE),
            config_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_location_is_namespaced_settings_toml() {
        let paths = AppPaths::with_override(None);
        assert!(paths.config_dir.ends_with(APP_DIR));
        assert_eq!(paths.settings_file, paths.config_dir.join("settings.toml"));
    }

    #[test]
    fn override_names_the_file_directly() {
        let paths = AppPaths::with_override(Some("/work/proj/.timer.toml".into()));
        assert_eq!(paths.settings_file, PathBuf::from("/work/proj/.timer.toml"));
        assert_eq!(paths.config_dir, PathBuf::from("/work/proj"));
    }

    #[test]
    fn bare_file_name_override_lives_in_current_dir() {
        let paths = AppPaths::with_override(Some("timer.toml".into()));
        assert_eq!(paths.config_dir, PathBuf::from("."));
        assert_eq!(paths.settings_file, PathBuf::from("timer.toml"));
    }

    #[test]
    fn blank_override_falls_back_to_default() {
        assert_eq!(
            AppPaths::with_override(Some(OsString::new())),
            AppPaths::with_override(None)
        );
    }

    #[test]
    fn in_dir_joins_file_name() {
        let paths = AppPaths::in_dir("/tmp/ct");
        assert_eq!(paths.settings_file, PathBuf::from("/tmp/ct/settings.toml"));
    }
}
