//! Default configuration values for TaskView.
//!
//! These functions back the `#[serde(default = "...")]` attributes in [`super::types`],
//! so a missing section or field falls back to the same value that `Default` produces.

use super::types::{CredentialsConfig, LoggingConfig, StoreConfig};
use std::path::PathBuf;

pub(crate) fn default_logging_config() -> LoggingConfig {
    LoggingConfig::default()
}

pub(crate) fn default_store_config() -> StoreConfig {
    StoreConfig::default()
}

pub(crate) fn default_credentials_config() -> CredentialsConfig {
    CredentialsConfig::default()
}

/// `"info"`
pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

/// No log file by default.
pub(crate) fn default_log_file_path() -> Option<PathBuf> {
    None
}

/// `"text"`
pub(crate) fn default_log_format() -> String {
    "text".to_string()
}

/// Local development task store.
pub(crate) fn default_store_base_url() -> String {
    "http://localhost:3005/auth".to_string()
}

pub(crate) fn default_connect_timeout_secs() -> u64 {
    10
}

pub(crate) fn default_request_timeout_secs() -> u64 {
    30
}

/// Key the login flow stores the bearer credential under.
pub(crate) fn default_credential_key() -> String {
    "accessToken".to_string()
}

/// Relative to the application data directory.
pub(crate) fn default_credential_file_path() -> Option<PathBuf> {
    Some(PathBuf::from("credentials.json"))
}
