//! Builder for creating and configuring Tracker instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::debug;
use tokio::task;

use super::Tracker;
use crate::{
    db::Database,
    error::{Result, TrackerError},
    execution::{Clock, SharedClock, SystemClock},
};

/// Builder for creating and configuring Tracker instances.
#[derive(Debug, Clone)]
pub struct TrackerBuilder {
    database_path: Option<PathBuf>,
    clock: Option<SharedClock>,
}

impl TrackerBuilder {
    /// Creates a new builder using the XDG database path and the system
    /// clock.
    pub fn new() -> Self {
        Self {
            database_path: None,
            clock: None,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/cadence/cadence.db` or `~/.local/share/cadence/cadence.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the clock behind task timers, plan dates and statistics
    /// windows. Keep a handle to a [`ManualClock`](crate::ManualClock) in an
    /// `Arc` to move time from outside.
    pub fn with_clock<C>(mut self, clock: Arc<C>) -> Self
    where
        C: Clock + Send + Sync + 'static,
    {
        self.clock = Some(clock);
        self
    }

    /// Builds the tracker, creating the database file and schema if needed.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::FileSystem` if the parent directory cannot be
    /// created, `TrackerError::StoreUnavailable` if the database cannot be
    /// opened or initialized.
    pub async fn build(self) -> Result<Tracker> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TrackerError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), TrackerError>(())
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as SharedClock);
        debug!("Tracker ready with database {} and {clock:?}", db_path.display());
        Ok(Tracker::new(db_path, clock))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("cadence")
            .place_data_file("cadence.db")
            .map_err(|e| TrackerError::XdgDirectory(e.to_string()))
    }
}

impl Default for TrackerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
