//! High-level async API over the store, the execution controller and the
//! statistics aggregator.
//!
//! [`Tracker`] is the interface hosts use. Every operation runs the
//! synchronous core on a blocking thread via
//! [`tokio::task::spawn_blocking`] and opens the database for that call
//! only, so each call commits on its own and an async host never blocks its
//! runtime.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Tracker      │    │  Controller /   │    │    Database     │
//! │ (plan_ops,      │───▶│  Aggregator     │───▶│   (via db/)     │
//! │  run_ops, ...)  │    │                 │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!     async facade         synchronous core      data persistence
//! ```
//!
//! Session state is never held here: execution operations take the caller's
//! [`Session`](crate::execution::Session) by `&mut` and write the updated
//! value back when the blocking call returns.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cadence_core::{params::{ImportPlan, StartPlan}, Session, TrackerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = TrackerBuilder::new()
//!     .with_database_path(Some("/tmp/cadence.db"))
//!     .build()
//!     .await?;
//!
//! let imported = tracker
//!     .import_plan(&ImportPlan {
//!         payload: r#"{"total_minutes": 25, "tasks": [{"name": "Read", "minutes": 25, "focus": 8}]}"#
//!             .to_string(),
//!         title: None,
//!     })
//!     .await?;
//!
//! let mut session = Session::default();
//! tracker
//!     .start(&mut session, &StartPlan { plan_id: Some(imported.plan.id) })
//!     .await?;
//! println!("{}", tracker.snapshot(&session)?);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use tokio::task;

use crate::{
    db::Database,
    error::{Result, TrackerError},
    execution::{ExecutionController, Session, SharedClock},
};

pub mod builder;
pub mod plan_ops;
pub mod run_ops;
pub mod stats_ops;


pub use builder::TrackerBuilder;

/// Main tracker interface.
///
/// Every time-dependent operation (timers, plan dates, statistics windows)
/// reads the one clock the tracker was built with.
pub struct Tracker {
    pub(crate) db_path: PathBuf,
    pub(crate) clock: SharedClock,
    pub(crate) controller: ExecutionController<SharedClock>,
}

impl Tracker {
    /// Creates a new tracker with the specified database path and clock.
    pub(crate) fn new(db_path: PathBuf, clock: SharedClock) -> Self {
        Self {
            db_path,
            controller: ExecutionController::with_clock(clock.clone()),
            clock,
        }
    }

    /// Path of the database file this tracker opens.
    pub fn database_path(&self) -> &Path {
        &self.db_path
    }

    /// Runs `op` against a freshly opened database on a blocking thread.
    pub(crate) async fn with_database<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(join_error)?
    }

    /// Like [`with_database`](Self::with_database) for operations that also
    /// drive the session. The session is updated only after the blocking
    /// call returns, with whatever state the operation left it in.
    pub(crate) async fn with_session<T, F>(&self, session: &mut Session, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&ExecutionController<SharedClock>, &mut Database, &mut Session) -> Result<T>
            + Send
            + 'static,
    {
        let db_path = self.db_path.clone();
        let controller = self.controller.clone();
        let mut working = session.clone();

        let (working, result) = task::spawn_blocking(move || {
            let result = Database::new(&db_path)
                .and_then(|mut db| op(&controller, &mut db, &mut working));
            (working, result)
        })
        .await
        .map_err(join_error)?;

        *session = working;
        result
    }
}

fn join_error(e: task::JoinError) -> TrackerError {
    TrackerError::Configuration {
        message: format!("Task join error: {e}"),
    }
}
