//! Task data model: the records held in the collection snapshot, drafts for new
//! tasks, and the filter criteria applied to the snapshot.

pub mod filter;
pub mod types;

pub use filter::{FilterCriteria, Selection};
pub use types::{Priority, Task, TaskDraft, TaskId, TaskStatus, UserId};
