//! Status and tier enumerations for plans and tasks.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of plan statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Plan has been created and is (or can be) executed
    #[default]
    InProgress,

    /// Every task of the plan has been recorded
    Completed,

    /// Operator gave up on the plan; records already written remain
    Abandoned,
}

impl FromStr for PlanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_progress" | "inprogress" => Ok(PlanStatus::InProgress),
            "completed" => Ok(PlanStatus::Completed),
            "abandoned" => Ok(PlanStatus::Abandoned),
            _ => Err(format!("Invalid plan status: {s}")),
        }
    }
}

impl PlanStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::InProgress => "in_progress",
            PlanStatus::Completed => "completed",
            PlanStatus::Abandoned => "abandoned",
        }
    }

    /// Whether no further execution is expected for the plan.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PlanStatus::InProgress)
    }
}

/// Severity tier of a task.
///
/// Only used for grouping and statistics, never for ordering execution.
/// Model payloads use `S`/`A`/`B`; unrecognised labels fall back to
/// [`Priority::Normal`] instead of failing validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "S", alias = "s")]
    Top,
    #[serde(alias = "A", alias = "a")]
    High,
    #[default]
    #[serde(alias = "B", alias = "b")]
    Normal,
}

impl Priority {
    /// Parse a priority label permissively.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cadence_core::models::Priority;
    ///
    /// assert_eq!(Priority::from_label("S"), Priority::Top);
    /// assert_eq!(Priority::from_label(" high "), Priority::High);
    /// assert_eq!(Priority::from_label("urgent!!"), Priority::Normal);
    /// ```
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "s" | "top" => Priority::Top,
            "a" | "high" => Priority::High,
            _ => Priority::Normal,
        }
    }

    /// Convert to the stored string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Top => "top",
            Priority::High => "high",
            Priority::Normal => "normal",
        }
    }

    /// Single-letter tier label as used in model payloads.
    pub fn letter(&self) -> char {
        match self {
            Priority::Top => 'S',
            Priority::High => 'A',
            Priority::Normal => 'B',
        }
    }
}
