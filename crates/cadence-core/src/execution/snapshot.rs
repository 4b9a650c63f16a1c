//! Read model of a running session for display.

use serde::{Deserialize, Serialize};

use crate::models::TaskSpec;

/// How many upcoming tasks a snapshot previews.
pub const UPCOMING_PREVIEW: usize = 3;

/// Urgency of the countdown for the current task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    /// More than half of the budget remains
    Calm,
    /// Between 20 % and 50 % of the budget remains
    Warning,
    /// 20 % or less remains
    Danger,
}

impl TimerPhase {
    pub fn for_remaining(remaining_secs: i64, budget_secs: i64) -> Self {
        if remaining_secs * 2 > budget_secs {
            TimerPhase::Calm
        } else if remaining_secs * 5 > budget_secs {
            TimerPhase::Warning
        } else {
            TimerPhase::Danger
        }
    }
}

/// Everything a host needs to draw the execution view at one instant.
///
/// Raw progress values are not clamped: running over time shows up as a
/// total progress above 1 and a positive `task_overtime_secs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionSnapshot {
    pub plan_id: u64,
    pub plan_title: String,
    pub task_index: usize,
    pub task_count: usize,
    pub task: TaskSpec,
    /// The current task already has a record (reached via go-back)
    pub already_recorded: bool,
    /// Seconds since the plan started
    pub elapsed_secs: i64,
    /// Seconds into the current task; negative when ahead of schedule
    pub task_elapsed_secs: i64,
    pub remaining_secs: i64,
    pub task_overtime_secs: i64,
    pub planned_total_secs: i64,
    pub task_progress: f64,
    pub total_progress: f64,
    pub phase: TimerPhase,
    pub upcoming: Vec<TaskSpec>,
}

impl ExecutionSnapshot {
    pub fn task_progress_clamped(&self) -> f64 {
        self.task_progress.clamp(0.0, 1.0)
    }

    pub fn total_progress_clamped(&self) -> f64 {
        self.total_progress.clamp(0.0, 1.0)
    }

    pub fn is_over_time(&self) -> bool {
        self.task_overtime_secs > 0
    }
}
