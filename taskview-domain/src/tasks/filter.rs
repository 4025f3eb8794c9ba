use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::types::{Priority, TaskStatus};

/// One filter axis: either everything passes, or only one value does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("All"),
            Selection::Only(value) => value.fmt(f),
        }
    }
}

/// `"all"` (any case) or an empty string selects everything; anything else must
/// parse as `T`.
impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Selection::All);
        }
        trimmed.parse().map(Selection::Only)
    }
}

/// What the user has typed and picked in the filter bar.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the title. Empty matches everything.
    pub search_term: String,
    pub priority: Selection<Priority>,
    pub status: Selection<TaskStatus>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_priority(mut self, priority: Selection<Priority>) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: Selection<TaskStatus>) -> Self {
        self.status = status;
        self
    }
}
