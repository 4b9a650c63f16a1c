//! Aggregation queries and the materialized `daily_logs` cache.

use jiff::{civil::Date, Timestamp};
use log::debug;
use rusqlite::{params, OptionalExtension};

use super::utils::{parse_date, parse_timestamp, to_u32, to_u64};
use crate::{
    error::{Result, StoreResultExt},
    models::{DailyLog, DailyStats},
};

const SELECT_DAILY_STATS_SQL: &str = "
    SELECT p.date,
           SUM(tr.scheduled_minutes),
           SUM(tr.actual_minutes),
           AVG(tr.focus_level),
           COUNT(*),
           SUM(CASE WHEN tr.completed THEN 1 ELSE 0 END)
    FROM task_records tr
    JOIN plans p ON tr.plan_id = p.id
    WHERE p.date >= ?1 AND p.date <= ?2
    GROUP BY p.date
    ORDER BY p.date DESC";
const UPSERT_DAILY_LOG_SQL: &str = "
    INSERT INTO daily_logs (date, total_scheduled_minutes, total_actual_minutes, completion_rate, avg_focus_level, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(date) DO UPDATE SET
        total_scheduled_minutes = excluded.total_scheduled_minutes,
        total_actual_minutes = excluded.total_actual_minutes,
        completion_rate = excluded.completion_rate,
        avg_focus_level = excluded.avg_focus_level";
const UPSERT_DAILY_NOTE_SQL: &str = "
    INSERT INTO daily_logs (date, notes, created_at) VALUES (?1, ?2, ?3)
    ON CONFLICT(date) DO UPDATE SET notes = excluded.notes";
const SELECT_DAILY_LOG_SQL: &str = "SELECT date, total_scheduled_minutes, total_actual_minutes, completion_rate, avg_focus_level, notes, created_at FROM daily_logs WHERE date = ?1";

impl super::Database {
    /// Per-day aggregates of every task record whose plan is dated from
    /// `since` through `until` inclusive, newest day first. Days without
    /// records are absent.
    pub fn daily_stats_between(&self, since: Date, until: Date) -> Result<Vec<DailyStats>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_DAILY_STATS_SQL)
            .store_context("Failed to prepare query")?;

        let days = stmt
            .query_map(params![since.to_string(), until.to_string()], |row| {
                Ok(DailyStats::from_counts(
                    parse_date(0, &row.get::<_, String>(0)?)?,
                    to_u64(1, row.get(1)?)?,
                    to_u64(2, row.get(2)?)?,
                    row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
                    to_u32(4, row.get(4)?)?,
                    to_u32(5, row.get::<_, Option<i64>>(5)?.unwrap_or(0))?,
                ))
            })
            .store_context("Failed to query daily statistics")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .store_context("Failed to fetch daily statistics")?;

        Ok(days)
    }

    /// Rewrites cached `daily_logs` rows from freshly computed statistics.
    ///
    /// Operator notes on existing rows are left untouched. Returns the
    /// number of days written.
    pub fn refresh_daily_logs(&mut self, days: &[DailyStats]) -> Result<usize> {
        let now = Timestamp::now().to_string();
        let tx = self
            .connection
            .transaction()
            .store_context("Failed to begin transaction")?;

        for day in days {
            tx.execute(
                UPSERT_DAILY_LOG_SQL,
                params![
                    day.date.to_string(),
                    day.scheduled_minutes as i64,
                    day.actual_minutes as i64,
                    day.completion_rate,
                    day.avg_focus_level,
                    now,
                ],
            )
            .store_context("Failed to write daily log")?;
        }

        tx.commit().store_context("Failed to commit transaction")?;

        debug!("Refreshed {} daily log row(s)", days.len());
        Ok(days.len())
    }

    /// Sets the journal note of a day, creating its cache row if needed.
    pub fn annotate_day(&mut self, date: Date, notes: &str) -> Result<()> {
        self.connection
            .execute(
                UPSERT_DAILY_NOTE_SQL,
                params![date.to_string(), notes, Timestamp::now().to_string()],
            )
            .store_context("Failed to write daily note")?;
        Ok(())
    }

    /// Cached rollup for a day, if one was materialized.
    pub fn get_daily_log(&self, date: Date) -> Result<Option<DailyLog>> {
        self.connection
            .query_row(SELECT_DAILY_LOG_SQL, params![date.to_string()], |row| {
                Ok(DailyLog {
                    date: parse_date(0, &row.get::<_, String>(0)?)?,
                    total_scheduled_minutes: to_u64(1, row.get(1)?)?,
                    total_actual_minutes: to_u64(2, row.get(2)?)?,
                    completion_rate: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
                    avg_focus_level: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
                    notes: row.get(5)?,
                    created_at: parse_timestamp(6, &row.get::<_, String>(6)?)?,
                })
            })
            .optional()
            .store_context("Failed to query daily log")
    }
}
