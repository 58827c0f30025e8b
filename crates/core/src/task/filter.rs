//! Display filters for the task list

use serde::{Deserialize, Serialize};

use super::model::Task;

/// Named predicate selecting a subset of tasks for display.
///
/// Purely a view projection; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    All,
    Active,
    Completed,
}

impl Default for Filter {
    fn default() -> Self {
        Self::All
    }
}

impl Filter {
    /// Whether a task is visible under this filter
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    /// The visible subset of `tasks`, in the order given
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

impl std::str::FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            other => Err(format!("Unknown filter: {}", other)),
        }
    }
}
