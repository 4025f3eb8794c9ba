//! # TaskView Core Library (`taskview-core`)
//!
//! `taskview-core` is the foundational library for the TaskView workspace. It carries the
//! infrastructure every other TaskView crate leans on, and nothing task-specific.
//!
//! ## Purpose
//!
//! - **Error Handling**: A unified error system through the [`CoreError`] enum and its
//!   associated specific error types [`ConfigError`] and [`LoggingError`].
//! - **Configuration Management**: Loading, merging and validating the TOML configuration
//!   through [`ConfigLoader`] and [`TaskViewConfig`].
//! - **Logging**: A logging setup built on top of the `tracing` crate, configurable for
//!   console and rolling-file output in text or JSON format.
//! - **Utility Functions**: XDG path resolution (`utils::paths`) and small filesystem
//!   helpers (`utils::fs`).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use taskview_core::config::ConfigLoader;
//! use taskview_core::logging::initialize_logging;
//! use taskview_core::error::CoreError;
//!
//! fn main() -> Result<(), CoreError> {
//!     let config = ConfigLoader::load()?;
//!     initialize_logging(&config.logging)?;
//!
//!     tracing::info!(base_url = %config.store.base_url, "TaskView core initialized");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

pub use config::{ConfigLoader, CredentialsConfig, LoggingConfig, StoreConfig, TaskViewConfig};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_minimal_logging, initialize_logging};
pub use utils::{ensure_dir_exists, read_file_to_string, write_string_to_file};
