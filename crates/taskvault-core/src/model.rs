//! Core data types for team task boards.
//!
//! Tasks are organized on a per-team kanban board. Title and description
//! are the encrypted fields; identity, status, and timestamps stay
//! plaintext so boards can be sorted and filtered without a key.
//! Persistence belongs to the surrounding application; these types only
//! define the (de)serialized shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kanban column a task currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

/// A single task on a team board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for this task
    pub id: Uuid,

    /// Task title (encrypted at rest when encryption is enabled)
    pub title: String,

    /// Task description (encrypted at rest when encryption is enabled)
    pub description: String,

    /// Current kanban column
    pub status: TaskStatus,

    /// When this task was created
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task in the Todo column.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            status: TaskStatus::Todo,
            created_at: Utc::now(),
        }
    }
}

/// A team's board: the unit the CLI reads and writes as one JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    /// Identifier of the team owning these tasks; also the key-derivation
    /// scope for every encrypted field on the board
    pub team_id: String,

    /// Tasks on the board, in stored order
    pub tasks: Vec<Task>,
}
