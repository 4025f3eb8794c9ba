//! Error taxonomy of the TaskView domain layer.
//!
//! [`TaskViewError`] is what the identity extractor, the task store client and the
//! controller return. It is `Clone` so the controller can keep the last surfaced
//! error in its state snapshot; foreign errors are therefore flattened into
//! [`FailureCause`] strings and status codes at the boundary.

use thiserror::Error;

/// Why a remote task store call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureCause {
    /// The request never produced a response: connection refused, DNS, TLS, or timeout.
    #[error("transport error{}: {message}", if *.timed_out { " (timed out)" } else { "" })]
    Transport { message: String, timed_out: bool },

    /// The store answered with a non-2xx status. `body` is truncated.
    #[error("store responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx response whose body is not the expected JSON.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskViewError {
    /// No credential is stored, or it is blank. No request was issued.
    #[error("No credential available; sign in first")]
    MissingCredential,

    /// The credential's claim payload could not be decoded.
    #[error("Credential is malformed: {0}")]
    MalformedCredential(String),

    #[error("Fetching tasks failed: {0}")]
    FetchFailed(FailureCause),

    #[error("Creating the task failed: {0}")]
    CreateFailed(FailureCause),

    /// The draft was rejected before any request was made.
    #[error("Task draft is invalid: {0}")]
    InvalidDraft(String),

    /// The credential source itself failed (unreadable or corrupt file).
    #[error("Credential storage error: {0}")]
    Credential(String),
}
