//! Core library for the cadence plan tracker.
//!
//! Cadence takes a plan produced by a language model, drives it one task at
//! a time against a countdown, records how long each task really took and
//! rolls those records up into daily trends.
//!
//! - [`payload`]: validates the model's loosely-typed plan payload
//! - [`db`]: SQLite record store for plans, task records and daily logs
//! - [`execution`]: the controller stepping a caller-owned [`Session`]
//! - [`statistics`]: date-bucketed aggregation and CSV export
//! - [`model_client`]: the model-client interface with bounded retry
//! - [`settings`]: the persisted key-value settings
//! - [`tracker`]: async facade over all of the above
//!
//! # Display Architecture
//!
//! Domain models implement [`std::fmt::Display`] producing markdown, and
//! [`display`] adds wrappers for collections and operation results. The CLI
//! renders that markdown in the terminal.
//!
//! # Quick Start
//!
//! ```rust
//! use cadence_core::{
//!     params::{CompleteTask, ImportPlan, StartPlan},
//!     Session, TrackerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = TrackerBuilder::new()
//!     .with_database_path(Some("test.db"))
//!     .build()
//!     .await?;
//!
//! let imported = tracker
//!     .import_plan(&ImportPlan {
//!         payload: r#"{"total_minutes": 35, "tasks": [
//!             {"name": "A", "minutes": 25, "priority": "S", "focus": 8},
//!             {"name": "B", "minutes": 10, "priority": "B", "focus": 5}
//!         ]}"#
//!         .to_string(),
//!         title: Some("Morning".to_string()),
//!     })
//!     .await?;
//! println!("{}", imported);
//!
//! let mut session = Session::default();
//! tracker.start(&mut session, &StartPlan::default()).await?;
//! tracker
//!     .complete_current(&mut session, &CompleteTask::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod execution;
pub mod model_client;
pub mod models;
pub mod params;
pub mod payload;
pub mod settings;
pub mod statistics;
pub mod tracker;

// Re-export commonly used types
pub use db::Database;
pub use display::{
    CompletionResult, DailyStatsTable, ImportResult, OperationStatus, PlanSummaries, TaskRecords,
};
pub use error::{Result, TrackerError};
pub use execution::{
    Clock, Completion, CompletionOutcome, ExecutionController, ExecutionSnapshot, ManualClock,
    Session, SharedClock, SystemClock, TimerPhase,
};
pub use models::{
    DailyLog, DailyStats, NewPlan, NewTaskRecord, Plan, PlanStatus, PlanSummary, Priority,
    TaskRecord, TaskSpec, TrendSummary,
};
pub use params::{
    AnnotateDay, CompleteTask, Id, ImportPlan, ListPlans, StartPlan, StatsWindow,
};
pub use payload::{parse_plan_text, validate_and_normalize, PlanDraft};
pub use settings::Settings;
pub use tracker::{Tracker, TrackerBuilder};
