// Controller for the task view: owns the collection snapshot and the view phase,
// runs fetch and create against the store, and publishes change events.

pub mod events;
pub mod service;
pub mod types;

pub use self::events::TaskViewEvent;
pub use self::service::{DefaultTaskViewService, TaskViewService};
pub use self::types::{Operation, SurfacedError, TaskViewState, ViewPhase};
