//! XDG Base Directory and Application-Specific Path Resolution.
//!
//! Resolves the standard base directories through `directories-next` and derives the
//! TaskView-specific directories from them:
//!
//! - [`get_app_config_dir()`]: e.g. `~/.config/taskview` (holds `config.toml`).
//! - [`get_app_data_dir()`]: e.g. `~/.local/share/taskview` (holds the credential file).
//! - [`get_app_state_dir()`]: e.g. `~/.local/state/TaskView/taskview` (holds log files).
//!
//! [`get_user_config_path()`] and [`get_system_config_path()`] honour the
//! `TASKVIEW_CONFIG` and `TASKVIEW_SYSTEM_CONFIG` environment overrides.
//!
//! All functions return [`CoreError::Config`] with
//! [`ConfigError::DirectoryUnavailable`] when a directory cannot be determined,
//! for example when `HOME` is unset.

use crate::error::{ConfigError, CoreError};
use directories_next::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "TaskView";
const APPLICATION: &str = "taskview";

/// Name of the configuration file inside the config directories.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable that replaces the user configuration file path.
pub const USER_CONFIG_ENV: &str = "TASKVIEW_CONFIG";

/// Environment variable that replaces the system-wide configuration file path.
pub const SYSTEM_CONFIG_ENV: &str = "TASKVIEW_SYSTEM_CONFIG";

const DEFAULT_SYSTEM_CONFIG_PATH: &str = "/etc/taskview/config.toml";

fn unavailable(dir_type: &str) -> CoreError {
    CoreError::Config(ConfigError::DirectoryUnavailable { dir_type: dir_type.to_string() })
}

fn project_dirs() -> Result<ProjectDirs, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| unavailable("Project"))
}

/// Returns the base directory for user-specific state files.
///
/// On Linux this is `$XDG_STATE_HOME`, falling back to `$HOME/.local/state`.
/// Elsewhere `directories-next` has no state directory, so the local data
/// directory is used.
pub fn get_state_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| {
            #[cfg(target_os = "linux")]
            {
                match std::env::var("XDG_STATE_HOME") {
                    Ok(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
                    _ => dirs.home_dir().join(".local/state"),
                }
            }
            #[cfg(not(target_os = "linux"))]
            {
                dirs.data_local_dir().to_path_buf()
            }
        })
        .ok_or_else(|| unavailable("State Base"))
}

/// Returns the TaskView configuration directory.
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Returns the TaskView data directory.
pub fn get_app_data_dir() -> Result<PathBuf, CoreError> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Returns the TaskView state directory (`<state base>/TaskView/taskview`).
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    get_state_base_dir().map(|base| base.join(ORGANIZATION).join(APPLICATION))
}

/// Path of the user configuration file.
///
/// `TASKVIEW_CONFIG` wins when set and non-empty; otherwise `config.toml` inside
/// [`get_app_config_dir()`].
pub fn get_user_config_path() -> Result<PathBuf, CoreError> {
    match std::env::var(USER_CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => get_app_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME)),
    }
}

/// Path of the system-wide configuration file.
///
/// `TASKVIEW_SYSTEM_CONFIG` wins when set and non-empty; otherwise
/// `/etc/taskview/config.toml`.
pub fn get_system_config_path() -> PathBuf {
    match std::env::var(SYSTEM_CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_SYSTEM_CONFIG_PATH),
    }
}
