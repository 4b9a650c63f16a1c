//! Collection wrapper types for displaying groups of domain objects.
//!
//! Each wrapper handles the empty case itself so callers never print a
//! bare heading.

use std::{fmt, ops::Index};

use crate::models::{DailyStats, PlanSummary, TaskRecord};

/// Newtype wrapper for displaying plan history, newest first.
///
/// # Examples
///
/// ```rust
/// use cadence_core::{
///     display::PlanSummaries,
///     models::{PlanStatus, PlanSummary},
/// };
/// use jiff::{civil::date, Timestamp};
///
/// let summary = PlanSummary {
///     id: 1,
///     date: date(2026, 3, 14),
///     title: "Morning block".to_string(),
///     status: PlanStatus::InProgress,
///     total_minutes: 50,
///     planned_tasks: 2,
///     recorded_tasks: 1,
///     completed_tasks: 1,
///     created_at: Timestamp::now(),
/// };
///
/// let output = PlanSummaries(vec![summary]).to_string();
/// assert!(output.contains("Morning block"));
/// ```
#[derive(Debug)]
pub struct PlanSummaries(pub Vec<PlanSummary>);

impl PlanSummaries {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of plan summaries in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get a reference to the plan summary at the given index.
    pub fn get(&self, index: usize) -> Option<&PlanSummary> {
        self.0.get(index)
    }

    /// Get an iterator over the plan summaries.
    pub fn iter(&self) -> std::slice::Iter<'_, PlanSummary> {
        self.0.iter()
    }
}

impl Index<usize> for PlanSummaries {
    type Output = PlanSummary;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IntoIterator for PlanSummaries {
    type Item = PlanSummary;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PlanSummaries {
    type Item = &'a PlanSummary;
    type IntoIter = std::slice::Iter<'a, PlanSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PlanSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No plans found.")
        } else {
            for plan in &self.0 {
                write!(f, "{}", plan)?;
            }
            Ok(())
        }
    }
}

/// Records of one plan in execution order.
#[derive(Debug)]
pub struct TaskRecords(pub Vec<TaskRecord>);

impl TaskRecords {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaskRecord> {
        self.0.iter()
    }

    /// Sum of actual minutes over all records.
    pub fn actual_minutes(&self) -> u64 {
        self.0.iter().map(|r| u64::from(r.actual_minutes)).sum()
    }
}

impl Index<usize> for TaskRecords {
    type Output = TaskRecord;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a TaskRecords {
    type Item = &'a TaskRecord;
    type IntoIter = std::slice::Iter<'a, TaskRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for TaskRecords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No task records yet.");
        }
        for record in &self.0 {
            write!(f, "{record}")?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{} record(s), {} min in total",
            self.0.len(),
            self.actual_minutes()
        )
    }
}

/// Daily statistics rendered as a markdown table, newest day first.
#[derive(Debug)]
pub struct DailyStatsTable(pub Vec<DailyStats>);

impl DailyStatsTable {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailyStats> {
        self.0.iter()
    }
}

impl fmt::Display for DailyStatsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No task records in this window.");
        }
        writeln!(f, "| Date | Scheduled | Actual | Focus | Done | Rate |")?;
        writeln!(f, "|:-|-:|-:|-:|-:|-:|")?;
        for day in &self.0 {
            writeln!(f, "{day}")?;
        }
        Ok(())
    }
}
