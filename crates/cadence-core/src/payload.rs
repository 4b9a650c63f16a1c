//! Validation of plan payloads produced by the language model.
//!
//! The model answers with loosely-typed JSON: minutes may arrive as strings,
//! focus as `"8"` or `"8/10"`, priorities as `S`/`A`/`B` or free text. This
//! module turns such a payload into a strongly-typed [`PlanDraft`] or a named
//! error, never passing unchecked data further in. It has no side effects.
//!
//! ```rust
//! use cadence_core::payload::parse_plan_text;
//!
//! let draft = parse_plan_text(
//!     r#"{"total_minutes": 35, "tasks": [
//!         {"name": "A", "minutes": 25, "priority": "S", "focus": "8"},
//!         {"name": "B", "minutes": "10", "priority": "B", "focus": 5}
//!     ]}"#,
//! )?;
//! assert_eq!(draft.tasks.len(), 2);
//! assert_eq!(draft.tasks[1].minutes, 10);
//! # Ok::<(), cadence_core::TrackerError>(())
//! ```

use jiff::Zoned;
use serde_json::{Map, Value};

use crate::{
    error::{Result, TrackerError},
    models::{NewPlan, Priority, TaskSpec},
};

/// A validated plan that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDraft {
    /// Total minutes as stated by the payload
    pub total_minutes: u32,
    /// Tasks in execution order, never empty
    pub tasks: Vec<TaskSpec>,
    /// Motivational text, display only
    pub motivation: String,
    /// Execution tips, display only
    pub tips: String,
}

impl PlanDraft {
    /// Sum of the scheduled minutes of all tasks.
    pub fn scheduled_minutes(&self) -> u32 {
        self.tasks.iter().map(|t| t.minutes).sum()
    }

    /// Turn the draft into a plan created at `now`, ready for the store.
    pub fn into_new_plan(self, now: &Zoned, title: Option<String>) -> NewPlan {
        NewPlan::created_at(now, self.total_minutes, self.tasks, title)
    }
}

/// Decode model output text and validate it.
///
/// Any surrounding markdown fence must already be stripped; see
/// [`crate::model_client::strip_code_fence`].
///
/// # Errors
///
/// Returns [`TrackerError::MalformedPlan`] with the raw text when the text is
/// not JSON, or [`TrackerError::InvalidPlan`] when required fields are absent.
pub fn parse_plan_text(text: &str) -> Result<PlanDraft> {
    let value: Value = serde_json::from_str(text).map_err(|e| TrackerError::MalformedPlan {
        reason: e.to_string(),
        raw: text.to_string(),
    })?;
    validate_and_normalize(&value)
}

/// Validate a decoded payload and normalize it into a [`PlanDraft`].
///
/// Requires a non-negative `total_minutes` and a non-empty `tasks` array in
/// which every task has a `name`, positive `minutes` and an integer-like
/// `focus`. Unknown priorities become [`Priority::Normal`]; missing `method`
/// and `warning` become empty strings.
///
/// # Errors
///
/// Returns [`TrackerError::InvalidPlan`] naming the first offending field.
pub fn validate_and_normalize(raw: &Value) -> Result<PlanDraft> {
    let object = raw
        .as_object()
        .ok_or_else(|| TrackerError::invalid_plan("payload").with_reason("must be a JSON object"))?;

    let tasks = match object.get("tasks") {
        None | Some(Value::Null) => {
            return Err(TrackerError::invalid_plan("tasks").with_reason("is missing"));
        }
        Some(value) => normalize_tasks(value)?,
    };
    if tasks.is_empty() {
        return Err(TrackerError::invalid_plan("tasks").with_reason("must contain at least one task"));
    }

    let total_minutes = match object.get("total_minutes") {
        None | Some(Value::Null) => {
            return Err(TrackerError::invalid_plan("total_minutes").with_reason("is missing"));
        }
        Some(value) => integer_from(value, false)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                TrackerError::invalid_plan("total_minutes")
                    .with_reason(format!("must be a non-negative integer, got {value}"))
            })?,
    };

    Ok(PlanDraft {
        total_minutes,
        tasks,
        motivation: text_field(object, "motivation"),
        tips: text_field(object, "tips"),
    })
}

/// Normalize a JSON array of task objects.
///
/// Also used when reading stored task payloads back, so rows written by
/// older versions with string focus values still load.
///
/// # Errors
///
/// Returns [`TrackerError::InvalidPlan`] for a non-array value or a bad task.
pub fn normalize_tasks(value: &Value) -> Result<Vec<TaskSpec>> {
    let items = value
        .as_array()
        .ok_or_else(|| TrackerError::invalid_plan("tasks").with_reason("must be an array"))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| normalize_task(index, item))
        .collect()
}

fn normalize_task(index: usize, item: &Value) -> Result<TaskSpec> {
    let field = |name: &str| format!("tasks[{index}].{name}");

    let object = item.as_object().ok_or_else(|| {
        TrackerError::invalid_plan(format!("tasks[{index}]")).with_reason("must be an object")
    })?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| TrackerError::invalid_plan(field("name")).with_reason("is missing"))?
        .to_string();

    let minutes = match object.get("minutes") {
        None | Some(Value::Null) => {
            return Err(TrackerError::invalid_plan(field("minutes")).with_reason("is missing"));
        }
        Some(value) => integer_from(value, false)
            .filter(|n| *n > 0)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                TrackerError::invalid_plan(field("minutes"))
                    .with_reason(format!("must be a positive integer, got {value}"))
            })?,
    };

    let focus = match object.get("focus") {
        None | Some(Value::Null) => {
            return Err(TrackerError::invalid_plan(field("focus")).with_reason("is missing"));
        }
        Some(value) => integer_from(value, true)
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| {
                TrackerError::invalid_plan(field("focus"))
                    .with_reason(format!("is not an integer, got {value}"))
            })?,
    };

    let priority = object
        .get("priority")
        .and_then(Value::as_str)
        .map(Priority::from_label)
        .unwrap_or_default();

    Ok(TaskSpec {
        name,
        minutes,
        priority,
        focus,
        method: text_field(object, "method"),
        warning: text_field(object, "warning"),
    })
}

/// Coerce a JSON value to an integer.
///
/// Strict mode accepts integers, integral floats and numeric strings.
/// Lenient mode additionally rounds fractional values and takes the leading
/// integer of strings like `"8/10"`.
fn integer_from(value: &Value, lenient: bool) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(|f| float_to_int(f, lenient))),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(|f| float_to_int(f, lenient)))
                .or_else(|| if lenient { leading_integer(s) } else { None })
        }
        _ => None,
    }
}

fn float_to_int(f: f64, lenient: bool) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    if lenient {
        Some(f.round() as i64)
    } else if f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && c == '-')))
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse().ok()
}

fn text_field(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}
