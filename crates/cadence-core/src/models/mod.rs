//! Data models for plans, tasks, records and statistics.
//!
//! This module contains the core domain models of the cadence tracker.
//! Display implementations for these models are located in
//! [`crate::display::models`] to keep data structures separate from
//! presentation logic.
//!
//! - [`Plan`]: one optimization session, an ordered list of [`TaskSpec`]s
//! - [`TaskRecord`]: the immutable outcome of executing one task
//! - [`PlanSummary`]: history row with record counts
//! - [`DailyStats`] / [`TrendSummary`]: date-bucketed aggregates
//!
//! # Examples
//!
//! ```rust
//! use cadence_core::models::{Plan, PlanStatus, Priority, TaskSpec};
//! use jiff::{civil::date, Timestamp};
//!
//! let plan = Plan {
//!     id: 1,
//!     date: date(2026, 3, 14),
//!     title: "Deep work".to_string(),
//!     total_minutes: 35,
//!     tasks: vec![
//!         TaskSpec {
//!             name: "Read chapter".to_string(),
//!             minutes: 25,
//!             priority: Priority::Top,
//!             focus: 8,
//!             method: String::new(),
//!             warning: String::new(),
//!         },
//!         TaskSpec {
//!             name: "Write summary".to_string(),
//!             minutes: 10,
//!             priority: Priority::Normal,
//!             focus: 6,
//!             method: String::new(),
//!             warning: String::new(),
//!         },
//!     ],
//!     status: PlanStatus::InProgress,
//!     created_at: Timestamp::now(),
//! };
//! assert_eq!(plan.seconds_before(1), 25 * 60);
//! println!("{}", plan); // Formats with markdown headers and metadata
//! ```

pub mod plan;
pub mod record;
pub mod stats;
pub mod status;
pub mod summary;
pub mod task;

#[cfg(test)]
mod tests;

pub use plan::{NewPlan, Plan};
pub use record::{NewTaskRecord, TaskRecord};
pub use stats::{DailyLog, DailyStats, TrendSummary};
pub use status::{PlanStatus, Priority};
pub use summary::PlanSummary;
pub use task::TaskSpec;
