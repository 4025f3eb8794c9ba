use crate::tasks::Task;

use super::types::{SurfacedError, ViewPhase};

/// Change notifications for whoever renders the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskViewEvent {
    PhaseChanged { from: ViewPhase, to: ViewPhase },
    /// The collection snapshot was replaced by a successful fetch.
    TasksReplaced { count: usize },
    TaskCreated { task: Task },
    ErrorSurfaced(SurfacedError),
}
