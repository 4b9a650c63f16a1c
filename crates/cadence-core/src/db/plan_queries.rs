//! Plan persistence and lookups.

use jiff::{civil::Date, Timestamp};
use log::{debug, info};
use rusqlite::{params, types::Type, OptionalExtension, Params, Row};
use serde_json::Value;

use super::utils::{parse_date, parse_timestamp, to_u32};
use crate::{
    error::{Result, StoreResultExt, TrackerError},
    models::{NewPlan, Plan, PlanStatus, PlanSummary},
    payload::normalize_tasks,
};

const INSERT_PLAN_SQL: &str = "INSERT INTO plans (date, title, total_minutes, tasks_json, status, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const SELECT_PLAN_SQL: &str = "SELECT id, date, title, total_minutes, tasks_json, status, created_at FROM plans WHERE id = ?1";
const SELECT_LATEST_PLAN_SQL: &str = "SELECT id, date, title, total_minutes, tasks_json, status, created_at FROM plans ORDER BY id DESC LIMIT 1";
const SELECT_LATEST_PLAN_WITH_STATUS_SQL: &str = "SELECT id, date, title, total_minutes, tasks_json, status, created_at FROM plans WHERE status = ?1 ORDER BY id DESC LIMIT 1";
const SELECT_PLAN_FOR_DATE_SQL: &str = "SELECT id, date, title, total_minutes, tasks_json, status, created_at FROM plans WHERE date = ?1 ORDER BY id DESC LIMIT 1";
const SELECT_RECENT_PLANS_SQL: &str = "SELECT id, date, title, total_minutes, tasks_json, status, created_at FROM plans ORDER BY id DESC LIMIT ?1";
const SELECT_PLAN_SUMMARIES_SQL: &str = "SELECT p.id, p.date, p.title, p.total_minutes, p.tasks_json, p.status, p.created_at, COUNT(tr.id), COALESCE(SUM(CASE WHEN tr.completed THEN 1 ELSE 0 END), 0) FROM plans p LEFT JOIN task_records tr ON tr.plan_id = p.id GROUP BY p.id ORDER BY p.id DESC LIMIT ?1";
const UPDATE_PLAN_STATUS_SQL: &str = "UPDATE plans SET status = ?1 WHERE id = ?2";
pub(super) const CHECK_PLAN_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM plans WHERE id = ?1)";

/// Plan columns as read from SQLite, before the task payload is decoded.
struct PlanRow {
    id: u64,
    date: Date,
    title: String,
    total_minutes: u32,
    tasks_json: String,
    status: PlanStatus,
    created_at: Timestamp,
}

impl PlanRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let status_str: String = row.get(5)?;
        let status = status_str.parse::<PlanStatus>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                Type::Text,
                format!("Invalid plan status: {status_str}").into(),
            )
        })?;

        Ok(Self {
            id: row.get::<_, i64>(0)? as u64,
            date: parse_date(1, &row.get::<_, String>(1)?)?,
            title: row
                .get::<_, Option<String>>(2)?
                .unwrap_or_else(|| "Daily Plan".to_string()),
            total_minutes: to_u32(3, row.get::<_, Option<i64>>(3)?.unwrap_or(0))?,
            tasks_json: row.get(4)?,
            status,
            created_at: parse_timestamp(6, &row.get::<_, String>(6)?)?,
        })
    }

    fn into_plan(self) -> Result<Plan> {
        let value: Value = serde_json::from_str(&self.tasks_json)?;
        Ok(Plan {
            id: self.id,
            date: self.date,
            title: self.title,
            total_minutes: self.total_minutes,
            tasks: normalize_tasks(&value)?,
            status: self.status,
            created_at: self.created_at,
        })
    }
}

impl super::Database {
    /// Persists a new plan. The store assigns the id and `created_at` and
    /// the plan starts `in_progress`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidPlan`] for a plan without tasks and
    /// [`TrackerError::StoreUnavailable`] when the write fails.
    pub fn create_plan(&mut self, plan: &NewPlan) -> Result<Plan> {
        if plan.tasks.is_empty() {
            return Err(TrackerError::invalid_plan("tasks")
                .with_reason("must contain at least one task"));
        }

        let tasks_json = serde_json::to_string(&plan.tasks)?;
        let now = Timestamp::now();
        let status = PlanStatus::InProgress;

        let tx = self
            .connection
            .transaction()
            .store_context("Failed to begin transaction")?;

        tx.execute(
            INSERT_PLAN_SQL,
            params![
                plan.date.to_string(),
                plan.title,
                plan.total_minutes,
                tasks_json,
                status.as_str(),
                now.to_string()
            ],
        )
        .store_context("Failed to insert plan")?;

        let id = tx.last_insert_rowid() as u64;

        tx.commit().store_context("Failed to commit transaction")?;

        info!(
            "Created plan {id} '{}' with {} task(s)",
            plan.title,
            plan.tasks.len()
        );

        Ok(Plan {
            id,
            date: plan.date,
            title: plan.title.clone(),
            total_minutes: plan.total_minutes,
            tasks: plan.tasks.clone(),
            status,
            created_at: now,
        })
    }

    /// Retrieves a plan by its ID.
    pub fn get_plan(&self, id: u64) -> Result<Option<Plan>> {
        self.query_plan(SELECT_PLAN_SQL, params![id as i64])
    }

    /// Most recently created plan, if any.
    pub fn get_latest_plan(&self) -> Result<Option<Plan>> {
        self.query_plan(SELECT_LATEST_PLAN_SQL, [])
    }

    /// Most recently created plan with the given status, if any.
    pub fn get_latest_plan_with_status(&self, status: PlanStatus) -> Result<Option<Plan>> {
        self.query_plan(SELECT_LATEST_PLAN_WITH_STATUS_SQL, params![status.as_str()])
    }

    /// Most recently created plan dated `date`, if any.
    pub fn get_plan_for_date(&self, date: Date) -> Result<Option<Plan>> {
        self.query_plan(SELECT_PLAN_FOR_DATE_SQL, params![date.to_string()])
    }

    /// Lists plans most-recent-first, at most `limit` of them.
    pub fn list_plans(&self, limit: u32) -> Result<Vec<Plan>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_RECENT_PLANS_SQL)
            .store_context("Failed to prepare query")?;

        let rows = stmt
            .query_map(params![limit], PlanRow::from_row)
            .store_context("Failed to query plans")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .store_context("Failed to fetch plans")?;

        rows.into_iter().map(PlanRow::into_plan).collect()
    }

    /// Lists plan history rows with record counts, most-recent-first.
    pub fn list_plan_summaries(&self, limit: u32) -> Result<Vec<PlanSummary>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_PLAN_SUMMARIES_SQL)
            .store_context("Failed to prepare query")?;

        let rows = stmt
            .query_map(params![limit], |row| {
                let plan = PlanRow::from_row(row)?;
                let recorded = to_u32(7, row.get(7)?)?;
                let completed = to_u32(8, row.get(8)?)?;
                Ok((plan, recorded, completed))
            })
            .store_context("Failed to query plan summaries")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .store_context("Failed to fetch plan summaries")?;

        rows.into_iter()
            .map(|(row, recorded, completed)| {
                let plan = row.into_plan()?;
                Ok(PlanSummary::from_plan(&plan, recorded, completed))
            })
            .collect()
    }

    /// Updates the status of a plan, its only mutable field.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::PlanNotFound`] if no plan has this id.
    pub fn set_plan_status(&mut self, id: u64, status: PlanStatus) -> Result<()> {
        let updated = self
            .connection
            .execute(UPDATE_PLAN_STATUS_SQL, params![status.as_str(), id as i64])
            .store_context("Failed to update plan status")?;

        if updated == 0 {
            return Err(TrackerError::PlanNotFound { id });
        }

        debug!("Plan {id} is now {}", status.as_str());
        Ok(())
    }

    /// Whether a plan with this id exists.
    pub fn plan_exists(&self, id: u64) -> Result<bool> {
        self.connection
            .query_row(CHECK_PLAN_EXISTS_SQL, params![id as i64], |row| row.get(0))
            .store_context("Failed to check plan existence")
    }

    fn query_plan<P: Params>(&self, sql: &str, params: P) -> Result<Option<Plan>> {
        let row = self
            .connection
            .query_row(sql, params, PlanRow::from_row)
            .optional()
            .store_context("Failed to query plan")?;

        row.map(PlanRow::into_plan).transpose()
    }
}
