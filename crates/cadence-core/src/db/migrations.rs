//! Database schema initialization and migrations.

use log::info;

use crate::error::{Result, StoreResultExt};

/// Version written to `PRAGMA user_version` once migrations have run.
const SCHEMA_VERSION: i64 = 1;

/// Databases created by the first generation of the tool stored SQLite
/// `CURRENT_TIMESTAMP` values (`YYYY-MM-DD HH:MM:SS`, UTC) and allowed
/// untitled plans. Rewrite them into RFC 3339 so they parse as timestamps.
const NORMALIZE_LEGACY_ROWS_SQL: &str = "
    UPDATE plans SET created_at = replace(created_at, ' ', 'T') || 'Z'
        WHERE instr(created_at, 'T') = 0;
    UPDATE plans SET title = 'Daily Plan' WHERE title IS NULL;
    UPDATE task_records SET completed_at = replace(completed_at, ' ', 'T') || 'Z'
        WHERE completed_at IS NOT NULL AND instr(completed_at, 'T') = 0;
    UPDATE daily_logs SET created_at = replace(created_at, ' ', 'T') || 'Z'
        WHERE created_at IS NOT NULL AND instr(created_at, 'T') = 0;
";

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .store_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .store_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Current schema version of the open database.
    pub fn schema_version(&self) -> Result<i64> {
        self.connection
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .store_context("Failed to read schema version")
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        let version = self.schema_version()?;
        if version >= SCHEMA_VERSION {
            return Ok(());
        }

        self.connection
            .execute_batch(NORMALIZE_LEGACY_ROWS_SQL)
            .store_context("Failed to normalize legacy rows")?;
        self.connection
            .execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
            .store_context("Failed to record schema version")?;

        info!("Record store migrated from version {version} to {SCHEMA_VERSION}");
        Ok(())
    }
}
