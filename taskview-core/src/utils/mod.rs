//! General utilities for TaskView core.
//!
//! # Submodules
//!
//! - [`fs`]: Filesystem helpers for ensuring directories exist and reading or writing
//!   whole files, mapped onto [`crate::error::CoreError`].
//! - [`paths`]: Resolution of XDG base directories and the TaskView-specific
//!   configuration, data and state directories.
//!
//! Path functions are not re-exported; use `taskview_core::utils::paths::...`.

pub mod fs;
pub mod paths;

pub use fs::{ensure_dir_exists, read_file_to_string, write_string_to_file};
