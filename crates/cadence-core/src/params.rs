//! Parameter structures for tracker operations
//!
//! Plain data shared across interfaces without framework-specific derives.
//! The CLI wraps these in its own `clap` argument structs and converts them
//! with `From`, so the core stays free of UI dependencies:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │
//! │  (clap derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// Default number of plans listed.
pub const DEFAULT_LIST_LIMIT: u32 = 20;

/// Default statistics window in days.
pub const DEFAULT_STATS_WINDOW_DAYS: u32 = 30;

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for importing a model-produced plan payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportPlan {
    /// Raw payload text (JSON object with `total_minutes` and `tasks`)
    pub payload: String,
    /// Optional plan title; defaults to a dated label
    pub title: Option<String>,
}

/// Parameters for listing plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPlans {
    /// Maximum number of plans, newest first
    pub limit: u32,
}

impl Default for ListPlans {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// Parameters for starting execution.
///
/// Without an ID the most recent in-progress plan is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartPlan {
    pub plan_id: Option<u64>,
}

/// Operator input when completing the current task.
///
/// Unset fields fall back to the observed elapsed minutes and the task's
/// target focus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompleteTask {
    pub actual_minutes: Option<u32>,
    pub focus_level: Option<i32>,
    pub notes: Option<String>,
}

/// Statistics window, counted in days back from today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsWindow {
    pub days: u32,
}

impl Default for StatsWindow {
    fn default() -> Self {
        Self {
            days: DEFAULT_STATS_WINDOW_DAYS,
        }
    }
}

/// Parameters for attaching a journal note to a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotateDay {
    /// Day to annotate; today when unset
    pub date: Option<jiff::civil::Date>,
    pub notes: String,
}
