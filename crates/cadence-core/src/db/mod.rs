//! Record store: SQLite persistence for plans, task records and daily logs.
//!
//! This module provides low-level storage operations for the cadence
//! tracker. It handles the SQLite connection and schema, and exposes query
//! interfaces for plans, records and the statistics aggregation.
//!
//! Every public operation is self-contained and commits before it returns,
//! so a later process can open the same file and continue where the previous
//! one stopped. Records are append-only; the only mutable plan field is its
//! status.

use std::path::Path;

use log::debug;
use rusqlite::Connection;

use crate::error::{Result, StoreResultExt};

pub mod migrations;
pub mod plan_queries;
pub mod record_queries;
pub mod stats_queries;
pub mod utils;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens (creating if needed) the database file and initializes the
    /// schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("Opening record store at {}", path.as_ref().display());
        let connection = Connection::open(path).store_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a private in-memory database, mostly useful for tests.
    pub fn in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().store_context("Failed to open in-memory database")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
