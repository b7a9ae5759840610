use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Portal roles. Only `Admin` may activate live edit mode; `Leader` and
/// `Member` see the rendered site like everyone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Leader,
    Member,
}

impl Role {
    pub fn can_edit_content(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Snapshot of the logged-in user as supplied by the portal's identity layer.
/// Absence of a `CurrentUser` is the logout signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    /// Bearer token for the content service; commits fail fast without it.
    pub credential: Option<String>,
}

impl CurrentUser {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            role,
            credential: None,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }
}
