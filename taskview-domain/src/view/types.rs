use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::error::TaskViewError;
use crate::tasks::Task;

/// Lifecycle of the view's task collection.
///
/// `Idle -> Loading -> Loaded | Error`; any later fetch goes back through `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum ViewPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

impl fmt::Display for ViewPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewPhase::Idle => "idle",
            ViewPhase::Loading => "loading",
            ViewPhase::Loaded => "loaded",
            ViewPhase::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    Fetch,
    Create,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Fetch => f.write_str("fetch"),
            Operation::Create => f.write_str("create"),
        }
    }
}

/// The most recent failure, kept until the next successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfacedError {
    pub operation: Operation,
    pub error: TaskViewError,
    pub at: DateTime<Utc>,
}

/// Point-in-time copy of everything the presentation renders from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskViewState {
    pub phase: ViewPhase,
    /// Replaced wholesale on each successful fetch; kept as-is when one fails.
    pub tasks: Vec<Task>,
    pub last_error: Option<SurfacedError>,
    pub last_loaded_at: Option<DateTime<Utc>>,
}

impl TaskViewState {
    /// Tasks from an earlier fetch are shown while the latest one failed.
    pub fn is_stale(&self) -> bool {
        self.phase == ViewPhase::Error && self.last_loaded_at.is_some()
    }
}
