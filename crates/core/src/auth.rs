//! Authentication collaborator
//!
//! Supplies the current user; consumed read-only by the controller.

use serde::{Deserialize, Serialize};

/// The authenticated user, as handed over by the auth collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl User {
    pub fn new(id: i64) -> Self {
        Self { id, name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Source of the current user
pub trait AuthProvider: Send + Sync {
    /// The signed-in user, or `None` when unauthenticated
    fn current_user(&self) -> Option<User>;
}

/// Auth provider backed by a fixed value, resolved once at startup
pub struct FixedAuth {
    user: Option<User>,
}

impl FixedAuth {
    pub fn new(user: Option<User>) -> Self {
        Self { user }
    }

    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl AuthProvider for FixedAuth {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}
