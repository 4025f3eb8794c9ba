//! Configuration Management for TaskView.
//!
//! - [`types`]: the configuration schema ([`TaskViewConfig`] and its sections).
//! - [`defaults`]: default values used by serde for missing fields.
//! - [`loader`]: [`ConfigLoader`], which finds, merges and validates the TOML files.
//!
//! ```rust,ignore
//! use taskview_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("Task store: {}", config.store.base_url),
//!     Err(e) => {
//!         taskview_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration error: {}", e);
//!     }
//! }
//! ```

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{CredentialsConfig, LoggingConfig, StoreConfig, TaskViewConfig};
