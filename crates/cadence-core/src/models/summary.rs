//! Plan summary types and functionality.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{Plan, PlanStatus};

/// History row for a plan with record statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    /// Plan ID
    pub id: u64,
    /// Day the plan was created on
    pub date: Date,
    /// Title of the plan
    pub title: String,
    /// Plan status
    pub status: PlanStatus,
    /// Scheduled minutes at creation time
    pub total_minutes: u32,
    /// Number of tasks in the plan
    pub planned_tasks: u32,
    /// Number of task records written for the plan
    pub recorded_tasks: u32,
    /// Number of those records marked completed
    pub completed_tasks: u32,
    /// Creation timestamp
    pub created_at: Timestamp,
}

impl PlanSummary {
    /// Create a PlanSummary from a Plan and record counts
    pub fn from_plan(plan: &Plan, recorded_tasks: u32, completed_tasks: u32) -> Self {
        Self {
            id: plan.id,
            date: plan.date,
            title: plan.title.clone(),
            status: plan.status,
            total_minutes: plan.total_minutes,
            planned_tasks: plan.tasks.len() as u32,
            recorded_tasks,
            completed_tasks,
            created_at: plan.created_at,
        }
    }

    /// Completed records as a percentage of recorded ones (0 when none).
    pub fn completion_rate(&self) -> f64 {
        if self.recorded_tasks == 0 {
            0.0
        } else {
            f64::from(self.completed_tasks) * 100.0 / f64::from(self.recorded_tasks)
        }
    }
}
