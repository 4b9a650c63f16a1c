//! Plan model definition and related functionality.

use jiff::{civil::Date, Timestamp, Zoned};
use serde::{Deserialize, Serialize};

use super::{PlanStatus, TaskSpec};

/// Represents a persisted plan with its ordered tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan, assigned by the store
    pub id: u64,

    /// Local calendar day the plan was created on
    pub date: Date,

    /// Free-text label
    pub title: String,

    /// Sum of task minutes at creation time (not recomputed)
    pub total_minutes: u32,

    /// Tasks in execution order
    pub tasks: Vec<TaskSpec>,

    /// Status of the plan
    #[serde(default)]
    pub status: PlanStatus,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,
}

impl Plan {
    /// Planned duration of the whole plan in seconds.
    pub fn total_seconds(&self) -> i64 {
        i64::from(self.total_minutes) * 60
    }

    /// Cumulative scheduled seconds of every task before `index`.
    pub fn seconds_before(&self, index: usize) -> i64 {
        self.tasks.iter().take(index).map(TaskSpec::seconds).sum()
    }

    /// Index of the last task, `None` for an empty plan.
    pub fn last_index(&self) -> Option<usize> {
        self.tasks.len().checked_sub(1)
    }
}

/// A plan that has been validated but not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlan {
    pub date: Date,
    pub title: String,
    pub total_minutes: u32,
    pub tasks: Vec<TaskSpec>,
}

impl NewPlan {
    /// Build a plan dated today in the system time zone.
    pub fn today(total_minutes: u32, tasks: Vec<TaskSpec>, title: Option<String>) -> Self {
        Self::created_at(&Zoned::now(), total_minutes, tasks, title)
    }

    /// Build a plan dated on the day of `now`.
    ///
    /// Without a title the plan is labelled `Daily Plan YYYY-MM-DD HH:MM`.
    pub fn created_at(
        now: &Zoned,
        total_minutes: u32,
        tasks: Vec<TaskSpec>,
        title: Option<String>,
    ) -> Self {
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Daily Plan {}", now.strftime("%Y-%m-%d %H:%M")));

        Self {
            date: now.date(),
            title,
            total_minutes,
            tasks,
        }
    }
}
