//! Presenters
//!
//! Pure view-model builders over a controller snapshot, plus the plain-text
//! renderers the interactive shell prints. No state of their own.

use std::fmt;

use rt_core::task::Filter;

use crate::controller::AppState;

/// One row of the filtered task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    /// A delete is in flight or just settled for this row
    pub loading: bool,
    /// An edit is in flight for this row
    pub updating: bool,
    /// This row was just created
    pub highlighted: bool,
}

/// The filtered task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListView {
    pub rows: Vec<TaskRow>,
}

impl TaskListView {
    pub fn build(state: &AppState) -> Self {
        let rows = state
            .visible_tasks()
            .into_iter()
            .map(|task| TaskRow {
                id: task.id,
                title: task.title.clone(),
                completed: task.completed,
                loading: state.loading.contains(&task.id),
                updating: state.updating == Some(task.id),
                highlighted: state.highlight == Some(task.id),
            })
            .collect();
        Self { rows }
    }
}

impl fmt::Display for TaskListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return writeln!(f, "  (no tasks)");
        }
        for row in &self.rows {
            let check = if row.completed { 'x' } else { ' ' };
            let mark = if row.highlighted { '*' } else { ' ' };
            write!(f, " {}[{}] {:>4}  {}", mark, check, row.id, row.title)?;
            if row.loading {
                write!(f, "  (removing...)")?;
            }
            if row.updating {
                write!(f, "  (saving...)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Counts and filter controls shown below the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterView {
    pub total: usize,
    pub active_count: usize,
    pub completed_count: usize,
    pub filter: Filter,
    /// Drives the toggle-all control rendering
    pub all_completed: bool,
}

impl FooterView {
    pub fn build(state: &AppState) -> Self {
        let total = state.tasks.len();
        let active_count = state.tasks.iter().filter(|t| !t.completed).count();
        Self {
            total,
            active_count,
            completed_count: total - active_count,
            filter: state.filter,
            all_completed: total > 0 && active_count == 0,
        }
    }
}

impl fmt::Display for FooterView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            " {} items left, {} completed | filter: {:?}",
            self.active_count, self.completed_count, self.filter
        )
    }
}

/// The dismissible error banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub message: Option<String>,
}

impl ErrorBanner {
    pub fn build(state: &AppState) -> Self {
        Self {
            message: state.error.clone(),
        }
    }
}

impl fmt::Display for ErrorBanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => writeln!(f, " !! {} (dismiss with `dismiss`)", message),
            None => Ok(()),
        }
    }
}
