//! Task record model: the immutable outcome of executing one task.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::TaskSpec;

/// An execution outcome as stored. Records are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskRecord {
    /// Unique identifier, also the insertion order
    pub id: u64,

    /// Owning plan
    pub plan_id: u64,

    /// Copy of the task name at record time
    pub task_name: String,

    pub scheduled_minutes: u32,

    /// Observed minutes; not validated against the schedule
    pub actual_minutes: u32,

    pub focus_level: i32,

    pub completed: bool,

    /// Set when `completed` is true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A record about to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTaskRecord {
    pub plan_id: u64,
    pub task_name: String,
    pub scheduled_minutes: u32,
    pub actual_minutes: u32,
    pub focus_level: i32,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
    pub notes: Option<String>,
}

impl NewTaskRecord {
    /// Record a completed task, copying name and schedule from its spec.
    pub fn completed(
        plan_id: u64,
        task: &TaskSpec,
        actual_minutes: u32,
        focus_level: i32,
        at: Timestamp,
    ) -> Self {
        Self {
            plan_id,
            task_name: task.name.clone(),
            scheduled_minutes: task.minutes,
            actual_minutes,
            focus_level,
            completed: true,
            completed_at: Some(at),
            notes: None,
        }
    }

    /// Attach operator notes; blank notes are dropped.
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self
    }
}
