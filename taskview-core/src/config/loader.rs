//! Configuration Loading for TaskView.
//!
//! [`ConfigLoader`] locates, parses, merges and validates the [`TaskViewConfig`].
//!
//! ## Sources
//!
//! 1. The system file (`/etc/taskview/config.toml`, or `$TASKVIEW_SYSTEM_CONFIG`).
//! 2. The user file (`config.toml` in the application config directory, or
//!    `$TASKVIEW_CONFIG`).
//!
//! Both are optional. Tables are merged key by key with the user file taking
//! precedence; when neither exists the defaults are used. Finally
//! `$TASKVIEW_STORE_URL`, when set, replaces `store.base_url`.
//!
//! ## Validation
//!
//! - Log level and format are normalized to lower case and checked.
//! - `store.base_url` must be an `http://` or `https://` URL; a trailing `/` is dropped.
//! - Timeouts must be non-zero and the credential key non-empty.
//! - Relative log paths resolve against the state directory, relative credential
//!   paths against the data directory.

use std::env;
use std::fs;
use std::path::Path;
use toml::Value;
use tracing::debug;

use crate::config::TaskViewConfig;
use crate::error::{ConfigError, CoreError};
use crate::utils::fs as tv_fs;
use crate::utils::paths::{
    get_app_data_dir, get_app_state_dir, get_system_config_path, get_user_config_path,
};

/// Environment variable that replaces `store.base_url`.
pub const STORE_URL_ENV: &str = "TASKVIEW_STORE_URL";

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const VALID_FORMATS: [&str; 2] = ["text", "json"];

/// Namespace for configuration loading; see the module docs.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the system and user files from their standard (or overridden) locations,
    /// applies environment overrides and validates the result.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ReadError`] when a file exists but cannot be read.
    /// - [`ConfigError::ParseError`] for invalid TOML or unknown fields.
    /// - [`ConfigError::ValidationError`] for out-of-range values.
    /// - [`ConfigError::DirectoryUnavailable`] when a base directory cannot be determined.
    pub fn load() -> Result<TaskViewConfig, CoreError> {
        let system_path = get_system_config_path();
        let user_path = get_user_config_path()?;
        let mut config = Self::merge_sources(Some(&system_path), Some(&user_path))?;
        Self::apply_store_url_override(&mut config, env::var(STORE_URL_ENV).ok());
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    /// Loads a single explicit file (e.g. a `--config` argument), ignoring the
    /// system file. A missing file is an error here, unlike in [`Self::load`].
    pub fn load_from_file(path: &Path) -> Result<TaskViewConfig, CoreError> {
        if !path.exists() {
            return Err(CoreError::Config(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "configuration file does not exist",
                ),
            }));
        }
        let mut config = Self::merge_sources(None, Some(path))?;
        Self::apply_store_url_override(&mut config, env::var(STORE_URL_ENV).ok());
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    /// Reads and merges the two optional sources without validating.
    pub fn merge_sources(
        system_path: Option<&Path>,
        user_path: Option<&Path>,
    ) -> Result<TaskViewConfig, CoreError> {
        let system_value = match system_path {
            Some(path) => Self::read_toml_value(path)?,
            None => None,
        };
        let user_value = match user_path {
            Some(path) => Self::read_toml_value(path)?,
            None => None,
        };

        match Self::merge_toml_values(system_value, user_value) {
            Some(value) => value
                .try_into::<TaskViewConfig>()
                .map_err(|e| CoreError::Config(ConfigError::ParseError(e))),
            None => {
                debug!("No configuration files found, using defaults");
                Ok(TaskViewConfig::default())
            }
        }
    }

    /// Parses a TOML document and validates it; no files are touched except for
    /// creating the log directory.
    pub fn from_toml_str(content: &str) -> Result<TaskViewConfig, CoreError> {
        let mut config: TaskViewConfig =
            toml::from_str(content).map_err(|e| CoreError::Config(ConfigError::ParseError(e)))?;
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    fn read_toml_value(path: &Path) -> Result<Option<Value>, CoreError> {
        match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => {
                debug!(path = %path.display(), "Reading configuration file");
                content
                    .parse::<Value>()
                    .map(Some)
                    .map_err(|e| CoreError::Config(ConfigError::ParseError(e)))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::Config(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })),
        }
    }

    /// Merges two optional TOML values. `override_val` takes precedence.
    fn merge_toml_values(base: Option<Value>, override_val: Option<Value>) -> Option<Value> {
        match (base, override_val) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(Value::Table(mut base_table)), Some(Value::Table(override_table))) => {
                Self::merge_toml_tables(&mut base_table, &override_table);
                Some(Value::Table(base_table))
            }
            (_, Some(o)) => Some(o),
        }
    }

    /// Recursively merges `override_table` into `base_table`.
    fn merge_toml_tables(
        base_table: &mut toml::map::Map<String, Value>,
        override_table: &toml::map::Map<String, Value>,
    ) {
        for (key, override_item) in override_table {
            match base_table.get_mut(key) {
                Some(base_item) => {
                    if let (Value::Table(bt), Value::Table(ot)) = (&mut *base_item, override_item) {
                        Self::merge_toml_tables(bt, ot);
                    } else {
                        *base_item = override_item.clone();
                    }
                }
                None => {
                    base_table.insert(key.clone(), override_item.clone());
                }
            }
        }
    }

    fn apply_store_url_override(config: &mut TaskViewConfig, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            debug!(base_url = %url, "Store URL overridden from environment");
            config.store.base_url = url.trim().to_string();
        }
    }

    /// Validates `config` in place, normalizing values and resolving relative paths.
    pub fn validate_config(config: &mut TaskViewConfig) -> Result<(), CoreError> {
        let level = config.logging.level.to_lowercase();
        if !VALID_LEVELS.contains(&level.as_str()) {
            return Err(validation(format!(
                "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                config.logging.level
            )));
        }
        config.logging.level = level;

        let format = config.logging.format.to_lowercase();
        if !VALID_FORMATS.contains(&format.as_str()) {
            return Err(validation(format!(
                "Invalid log format: '{}'. Must be one of text, json.",
                config.logging.format
            )));
        }
        config.logging.format = format;

        if let Some(path) = &config.logging.file_path {
            let absolute = if path.is_absolute() {
                path.clone()
            } else {
                get_app_state_dir()?.join(path)
            };
            if let Some(parent) = absolute.parent() {
                if !parent.exists() {
                    tv_fs::ensure_dir_exists(parent)?;
                }
            }
            config.logging.file_path = Some(absolute);
        }

        let base_url = config.store.base_url.trim().trim_end_matches('/').to_string();
        let has_scheme = base_url.starts_with("http://") || base_url.starts_with("https://");
        let host_part = base_url.splitn(2, "://").nth(1).unwrap_or("");
        if !has_scheme || host_part.is_empty() {
            return Err(validation(format!(
                "Invalid store base_url: '{}'. Must be an http:// or https:// URL.",
                config.store.base_url
            )));
        }
        config.store.base_url = base_url;

        if config.store.connect_timeout_secs == 0 || config.store.request_timeout_secs == 0 {
            return Err(validation("Store timeouts must be greater than zero.".to_string()));
        }

        let key = config.credentials.key.trim();
        if key.is_empty() {
            return Err(validation("Credential key must not be empty.".to_string()));
        }
        config.credentials.key = key.to_string();

        if let Some(path) = &config.credentials.file_path {
            if !path.is_absolute() {
                config.credentials.file_path = Some(get_app_data_dir()?.join(path));
            }
        }

        Ok(())
    }
}

fn validation(message: String) -> CoreError {
    CoreError::Config(ConfigError::ValidationError(message))
}
