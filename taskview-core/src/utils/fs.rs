//! Filesystem Utilities.
//!
//! Helper functions for common filesystem operations. Every function maps
//! `std::io::Error` onto [`CoreError::Filesystem`] so callers get the path that failed.

use crate::error::CoreError;
use std::fs;
use std::path::Path;

/// Ensures that a directory exists at the given path.
///
/// Missing directories are created together with their parents. A path that exists
/// but is not a directory is an error.
///
/// # Examples
///
/// ```no_run
/// # use taskview_core::utils::fs::ensure_dir_exists;
/// # use tempfile::tempdir;
/// let temp_dir = tempdir().unwrap();
/// let dir_path = temp_dir.path().join("taskview_data");
/// ensure_dir_exists(&dir_path).unwrap();
/// assert!(dir_path.is_dir());
/// ```
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if !path.is_dir() {
            Err(CoreError::Filesystem {
                message: "Path exists but is not a directory".to_string(),
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "Path exists but is not a directory",
                ),
            })
        } else {
            Ok(())
        }
    } else {
        fs::create_dir_all(path).map_err(|e| CoreError::Filesystem {
            message: "Failed to create directory".to_string(),
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Reads the entire contents of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String, CoreError> {
    fs::read_to_string(path).map_err(|e| CoreError::Filesystem {
        message: "Failed to read file to string".to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}

/// Writes a string to a file, creating the parent directory first.
///
/// The file is created if it does not exist and truncated if it does.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir_exists(parent)?;
        }
    }
    fs::write(path, content).map_err(|e| CoreError::Filesystem {
        message: "Failed to write string to file".to_string(),
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_ensure_dir_exists_creates_nested_directories() {
        let temp_root = tempdir().expect("Failed to create temp root dir for test");
        let nested_dir_path = temp_root.path().join("parent_dir/child_dir");

        assert!(!nested_dir_path.exists());
        let result = ensure_dir_exists(&nested_dir_path);
        assert!(result.is_ok(), "ensure_dir_exists failed for nested: {:?}", result.err());
        assert!(nested_dir_path.is_dir(), "Nested path created is not a directory");
    }

    #[test]
    fn test_ensure_dir_exists_succeeds_if_directory_already_exists() {
        let temp_root = tempdir().expect("Failed to create temp root dir for test");
        assert!(ensure_dir_exists(temp_root.path()).is_ok());
    }

    #[test]
    fn test_ensure_dir_exists_fails_if_path_is_a_file() {
        let file = NamedTempFile::new().expect("Failed to create temp file");
        match ensure_dir_exists(file.path()) {
            Err(CoreError::Filesystem { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("Expected Filesystem error, got {:?}", other),
        }
    }

    #[test]
    fn test_write_then_read_creates_parent_directory() {
        let temp_root = tempdir().expect("Failed to create temp root dir for test");
        let file_path = temp_root.path().join("nested/credentials.json");

        write_string_to_file(&file_path, "{}").expect("write failed");
        assert_eq!(read_file_to_string(&file_path).expect("read failed"), "{}");
    }

    #[test]
    fn test_read_missing_file_reports_path() {
        let temp_root = tempdir().expect("Failed to create temp root dir for test");
        let missing = temp_root.path().join("missing.txt");
        match read_file_to_string(&missing) {
            Err(CoreError::Filesystem { path, source, .. }) => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("Expected Filesystem error, got {:?}", other),
        }
    }
}
