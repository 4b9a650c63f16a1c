//! Display formatting functions and result types.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! collections and operation outcomes get newtype wrappers so the same data
//! can be formatted differently depending on context. All output is
//! markdown, rendered by the CLI's terminal renderer.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers &      │    │   Formatted     │
//! │  (Plan, Record) │───▶│ Result Types    │───▶│    Output       │
//! │                 │    │                 │    │   (Terminal)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`collections`]: PlanSummaries, TaskRecords, DailyStatsTable
//! - [`results`]: ImportResult, CompletionResult
//! - [`status`]: OperationStatus
//! - [`datetime`]: timestamps, countdowns and progress bars
//! - [`models`] and [`execution`]: Display for domain and session types
//!
//! ```rust
//! use cadence_core::display::OperationStatus;
//!
//! println!("{}", OperationStatus::success("Plan 4 stopped"));
//! ```

pub mod collections;
pub mod datetime;
pub mod execution;
pub mod models;
pub mod results;
pub mod status;

// Re-export commonly used types for convenience
pub use collections::{DailyStatsTable, PlanSummaries, TaskRecords};
pub use datetime::{Countdown, LocalDateTime, ProgressBar};
pub use results::{CompletionResult, ImportResult};
pub use status::{OperationStatus, StatusKind};
