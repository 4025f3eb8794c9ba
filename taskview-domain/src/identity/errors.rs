use thiserror::Error;

use crate::error::TaskViewError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("malformed credential: {0}")]
    Malformed(String),
}

impl From<IdentityError> for TaskViewError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Malformed(reason) => TaskViewError::MalformedCredential(reason),
        }
    }
}
