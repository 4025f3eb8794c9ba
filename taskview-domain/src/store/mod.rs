//! The remote task store, seen from the view.
//!
//! [`TaskStore`] is the seam between the controller and the network; the real
//! implementation is [`HttpTaskStore`].

pub mod http;

use async_trait::async_trait;

use crate::credentials::Credential;
use crate::error::TaskViewError;
use crate::tasks::{Task, TaskDraft};

pub use http::HttpTaskStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Every task visible to the credential's holder, in store order.
    ///
    /// Fails with [`TaskViewError::MissingCredential`] for a blank credential
    /// without contacting the store, otherwise with [`TaskViewError::FetchFailed`].
    async fn fetch_tasks(&self, credential: &Credential) -> Result<Vec<Task>, TaskViewError>;

    /// Creates a task from `draft`. The store assigns its id and owner.
    ///
    /// Fails with [`TaskViewError::MissingCredential`] for a blank credential
    /// without contacting the store, otherwise with [`TaskViewError::CreateFailed`].
    async fn create_task(&self, credential: &Credential, draft: &TaskDraft) -> Result<Task, TaskViewError>;
}
