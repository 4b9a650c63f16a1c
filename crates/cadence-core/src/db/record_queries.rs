//! Append-only task record operations.

use log::debug;
use rusqlite::{params, Row};

use super::{
    plan_queries::CHECK_PLAN_EXISTS_SQL,
    utils::{parse_optional_timestamp, to_u32},
};
use crate::{
    error::{Result, StoreResultExt, TrackerError},
    models::{NewTaskRecord, TaskRecord},
};

const INSERT_RECORD_SQL: &str = "INSERT INTO task_records (plan_id, task_name, scheduled_minutes, actual_minutes, focus_level, completed, completed_at, notes) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const SELECT_RECORDS_BY_PLAN_SQL: &str = "SELECT id, plan_id, task_name, scheduled_minutes, actual_minutes, focus_level, completed, completed_at, notes FROM task_records WHERE plan_id = ?1 ORDER BY id ASC";
const COUNT_RECORDS_SQL: &str = "SELECT COUNT(*) FROM task_records";

impl super::Database {
    /// Helper function to construct a TaskRecord from a database row
    fn build_record_from_row(row: &Row) -> rusqlite::Result<TaskRecord> {
        Ok(TaskRecord {
            id: row.get::<_, i64>(0)? as u64,
            plan_id: row.get::<_, i64>(1)? as u64,
            task_name: row.get(2)?,
            scheduled_minutes: to_u32(3, row.get(3)?)?,
            actual_minutes: to_u32(4, row.get(4)?)?,
            focus_level: row.get(5)?,
            completed: row.get(6)?,
            completed_at: parse_optional_timestamp(7, row.get(7)?)?,
            notes: row.get(8)?,
        })
    }

    /// Appends a task record. Existing records are never updated or deleted.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::PlanNotFound`] if the owning plan does not
    /// exist, or [`TrackerError::StoreUnavailable`] when the write fails.
    pub fn append_task_record(&mut self, record: &NewTaskRecord) -> Result<TaskRecord> {
        let tx = self
            .connection
            .transaction()
            .store_context("Failed to begin transaction")?;

        let plan_exists: bool = tx
            .query_row(CHECK_PLAN_EXISTS_SQL, params![record.plan_id as i64], |row| {
                row.get(0)
            })
            .store_context("Failed to check plan existence")?;
        if !plan_exists {
            return Err(TrackerError::PlanNotFound {
                id: record.plan_id,
            });
        }

        tx.execute(
            INSERT_RECORD_SQL,
            params![
                record.plan_id as i64,
                record.task_name,
                record.scheduled_minutes,
                record.actual_minutes,
                record.focus_level,
                record.completed,
                record.completed_at.map(|t| t.to_string()),
                record.notes,
            ],
        )
        .store_context("Failed to insert task record")?;

        let id = tx.last_insert_rowid() as u64;

        tx.commit().store_context("Failed to commit transaction")?;

        debug!(
            "Recorded task '{}' for plan {} ({} of {} min)",
            record.task_name, record.plan_id, record.actual_minutes, record.scheduled_minutes
        );

        Ok(TaskRecord {
            id,
            plan_id: record.plan_id,
            task_name: record.task_name.clone(),
            scheduled_minutes: record.scheduled_minutes,
            actual_minutes: record.actual_minutes,
            focus_level: record.focus_level,
            completed: record.completed,
            completed_at: record.completed_at,
            notes: record.notes.clone(),
        })
    }

    /// Records of a plan in insertion order, which is execution order.
    pub fn list_records_for_plan(&self, plan_id: u64) -> Result<Vec<TaskRecord>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_RECORDS_BY_PLAN_SQL)
            .store_context("Failed to prepare query")?;

        let records = stmt
            .query_map(params![plan_id as i64], Self::build_record_from_row)
            .store_context("Failed to query task records")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .store_context("Failed to fetch task records")?;

        Ok(records)
    }

    /// Total number of task records across all plans.
    pub fn count_task_records(&self) -> Result<u64> {
        self.connection
            .query_row(COUNT_RECORDS_SQL, [], |row| row.get::<_, i64>(0))
            .map(|n| n as u64)
            .store_context("Failed to count task records")
    }
}
