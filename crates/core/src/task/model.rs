//! Task model definitions

use serde::{Deserialize, Serialize};

/// A task in the remote collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned identifier, immutable once assigned
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
}

/// Payload for creating a task; the server assigns the id
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
}

impl NewTask {
    pub fn new(user_id: i64, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            completed: false,
        }
    }
}

/// Partial update payload; `None` fields are omitted from the request body
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            title: None,
            completed: Some(completed),
        }
    }
}
