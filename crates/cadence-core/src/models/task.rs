//! Task spec model definition.

use serde::{Deserialize, Serialize};

use super::Priority;

/// One planned unit of work inside a plan, addressed by its position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskSpec {
    /// Task name as produced by the model (opaque)
    pub name: String,

    /// Scheduled budget in minutes, always positive
    pub minutes: u32,

    /// Severity tier
    #[serde(default)]
    pub priority: Priority,

    /// Target focus level (usually 1-10)
    pub focus: i32,

    /// Suggested working method, display only
    #[serde(default)]
    pub method: String,

    /// Time-pressure warning, display only
    #[serde(default)]
    pub warning: String,
}

impl TaskSpec {
    /// Scheduled budget in seconds.
    pub fn seconds(&self) -> i64 {
        i64::from(self.minutes) * 60
    }
}
