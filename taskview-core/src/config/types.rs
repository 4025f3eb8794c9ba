//! Configuration data structures for TaskView.
//!
//! - [`TaskViewConfig`]: the root structure, one field per TOML section.
//! - [`LoggingConfig`]: `[logging]`, consumed by [`crate::logging`].
//! - [`StoreConfig`]: `[store]`, the remote task store endpoint and its timeouts.
//! - [`CredentialsConfig`]: `[credentials]`, where the bearer credential is kept.
//!
//! Every struct rejects unknown fields and fills missing ones from [`super::defaults`].

use super::defaults;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration settings for the logging subsystem.
///
/// ```
/// use taskview_core::config::LoggingConfig;
///
/// let log_config: LoggingConfig = toml::from_str(r#"
/// level = "debug"
/// format = "json"
/// "#).unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.file_path, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level: "trace", "debug", "info", "warn" or "error" (case-insensitive).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the application's
    /// state directory during validation.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::default_log_level(),
            file_path: defaults::default_log_file_path(),
            format: defaults::default_log_format(),
        }
    }
}

/// Remote task store endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Base URL; `/tasks` is appended for every request. Stored without a trailing slash.
    #[serde(default = "defaults::default_store_base_url")]
    pub base_url: String,
    #[serde(default = "defaults::default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Upper bound for a whole request, response body included.
    #[serde(default = "defaults::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl StoreConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::default_store_base_url(),
            connect_timeout_secs: defaults::default_connect_timeout_secs(),
            request_timeout_secs: defaults::default_request_timeout_secs(),
        }
    }
}

/// Location of the persisted bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    /// Key inside the credential file.
    #[serde(default = "defaults::default_credential_key")]
    pub key: String,
    /// JSON key/value file. Relative paths are resolved against the application's
    /// data directory during validation.
    #[serde(default = "defaults::default_credential_file_path")]
    pub file_path: Option<PathBuf>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            key: defaults::default_credential_key(),
            file_path: defaults::default_credential_file_path(),
        }
    }
}

/// Root configuration structure.
///
/// ```
/// use taskview_core::config::TaskViewConfig;
///
/// let config: TaskViewConfig = toml::from_str(r#"
/// [store]
/// base_url = "https://tasks.example.com/api"
/// "#).unwrap();
/// assert_eq!(config.store.base_url, "https://tasks.example.com/api");
/// assert_eq!(config.logging.level, "info");
/// assert_eq!(config.credentials.key, "accessToken");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskViewConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_store_config")]
    pub store: StoreConfig,
    #[serde(default = "defaults::default_credentials_config")]
    pub credentials: CredentialsConfig,
}

impl Default for TaskViewConfig {
    fn default() -> Self {
        Self {
            logging: defaults::default_logging_config(),
            store: defaults::default_store_config(),
            credentials: defaults::default_credentials_config(),
        }
    }
}
