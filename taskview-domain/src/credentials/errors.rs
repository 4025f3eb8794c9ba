use std::path::PathBuf;
use taskview_core::error::CoreError;
use thiserror::Error;

use crate::error::TaskViewError;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Credential file {path:?} is not a JSON object of strings: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("Credential storage failed: {0}")]
    Storage(#[from] CoreError),
}

impl From<CredentialError> for TaskViewError {
    fn from(err: CredentialError) -> Self {
        TaskViewError::Credential(err.to_string())
    }
}
