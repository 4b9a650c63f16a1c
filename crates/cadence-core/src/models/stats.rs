//! Date-bucketed statistics types.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

/// Aggregated task records for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyStats {
    pub date: Date,
    pub scheduled_minutes: u64,
    pub actual_minutes: u64,
    pub avg_focus_level: f64,
    pub task_count: u32,
    pub completed_count: u32,
    /// Completed records as a 0-100 percentage of all records of the day
    pub completion_rate: f64,
}

impl DailyStats {
    /// Build a day from raw sums, deriving the completion rate.
    pub fn from_counts(
        date: Date,
        scheduled_minutes: u64,
        actual_minutes: u64,
        avg_focus_level: f64,
        task_count: u32,
        completed_count: u32,
    ) -> Self {
        let completion_rate = if task_count == 0 {
            0.0
        } else {
            f64::from(completed_count) * 100.0 / f64::from(task_count)
        };
        Self {
            date,
            scheduled_minutes,
            actual_minutes,
            avg_focus_level,
            task_count,
            completed_count,
            completion_rate,
        }
    }
}

/// Mean values across the days of a statistics window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendSummary {
    pub days: u32,
    pub avg_scheduled_minutes: f64,
    pub avg_actual_minutes: f64,
    pub avg_focus_level: f64,
    pub avg_completion_rate: f64,
}

impl TrendSummary {
    /// Summarise a set of days; `None` when there is nothing to summarise.
    pub fn from_days(days: &[DailyStats]) -> Option<Self> {
        if days.is_empty() {
            return None;
        }
        let n = days.len() as f64;
        let mean = |f: fn(&DailyStats) -> f64| days.iter().map(f).sum::<f64>() / n;

        Some(Self {
            days: days.len() as u32,
            avg_scheduled_minutes: mean(|d| d.scheduled_minutes as f64),
            avg_actual_minutes: mean(|d| d.actual_minutes as f64),
            avg_focus_level: mean(|d| d.avg_focus_level),
            avg_completion_rate: mean(|d| d.completion_rate),
        })
    }
}

/// Materialized daily rollup as cached in the `daily_logs` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyLog {
    pub date: Date,
    pub total_scheduled_minutes: u64,
    pub total_actual_minutes: u64,
    pub completion_rate: f64,
    pub avg_focus_level: f64,
    /// Operator journal note for the day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: Timestamp,
}
