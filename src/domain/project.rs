//! Projects and user-project assignments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{STATUS_ACTIVE, STATUS_COMPLETED, STATUS_REMOVED};

/// A client project users can log time against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Project {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Acme Corp")]
    pub client_name: String,
    #[schema(example = "Website Redesign")]
    pub project_name: String,
    #[schema(example = "Development")]
    pub work_type: String,
    #[schema(example = "Remote")]
    pub location: String,
    pub created_at: DateTime<Utc>,
}

/// Editable project fields, used for both create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectFields {
    pub client_name: String,
    pub project_name: String,
    pub work_type: String,
    pub location: String,
}

impl ProjectFields {
    /// Trim surrounding whitespace from every field.
    pub fn trimmed(self) -> Self {
        Self {
            client_name: self.client_name.trim().to_string(),
            project_name: self.project_name.trim().to_string(),
            work_type: self.work_type.trim().to_string(),
            location: self.location.trim().to_string(),
        }
    }
}

/// Lifecycle of a user-project assignment.
///
/// `Active` moves to `Completed` or `Removed`; neither goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Active,
    Completed,
    Removed,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Active => STATUS_ACTIVE,
            AssignmentStatus::Completed => STATUS_COMPLETED,
            AssignmentStatus::Removed => STATUS_REMOVED,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, AssignmentStatus::Active)
    }
}

impl From<&str> for AssignmentStatus {
    fn from(s: &str) -> Self {
        match s {
            STATUS_COMPLETED => AssignmentStatus::Completed,
            STATUS_REMOVED => AssignmentStatus::Removed,
            _ => AssignmentStatus::Active,
        }
    }
}

/// Link between a user and a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Assignment {
    pub id: i32,
    pub user_id: i32,
    pub project_id: i32,
    pub status: AssignmentStatus,
    pub assigned_at: DateTime<Utc>,
}

/// A project as seen on a user's own list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AssignedProject {
    #[serde(flatten)]
    pub project: Project,
    pub status: AssignmentStatus,
    pub assigned_at: DateTime<Utc>,
}
