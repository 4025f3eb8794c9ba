//! # TaskView Domain Library (`taskview-domain`)
//!
//! Everything between a bearer credential and a rendered task list:
//!
//! - [`tasks`]: the task record, new-task drafts and filter criteria.
//! - [`identity`]: reads the user id claim out of a credential.
//! - [`credentials`]: where the credential is loaded from.
//! - [`store`]: the remote task store and its HTTP client.
//! - [`derivation`]: pure filtered views, days-until-due and outstanding counts.
//! - [`view`]: the controller that ties them together and publishes events.
//!
//! Infrastructure (configuration, logging, filesystem helpers) lives in
//! `taskview-core`, re-exported here as [`taskview_core`].

pub mod credentials;
pub mod derivation;
pub mod error;
pub mod identity;
pub mod store;
pub mod tasks;
pub mod view;

pub use taskview_core;

pub use credentials::{Credential, CredentialError, CredentialSource, FileCredentialStore, StaticCredential};
pub use derivation::{
    days_until_due, filtered_view, matches, outstanding_count_for, outstanding_counts_by_owner, task_rows, TaskRow,
};
pub use error::{FailureCause, TaskViewError};
pub use identity::{decode_claims, extract_identity, CredentialClaims, IdentityError};
pub use store::{HttpTaskStore, TaskStore};
pub use tasks::{FilterCriteria, Priority, Selection, Task, TaskDraft, TaskId, TaskStatus, UserId};
pub use view::{DefaultTaskViewService, Operation, SurfacedError, TaskViewEvent, TaskViewService, TaskViewState, ViewPhase};
