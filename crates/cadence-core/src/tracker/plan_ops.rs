//! Plan and record operations for the Tracker.

use jiff::civil::Date;
use log::info;

use super::Tracker;
use crate::{
    display::{ImportResult, PlanSummaries, TaskRecords},
    error::{Result, TrackerError},
    execution::Clock,
    model_client::strip_code_fence,
    models::{NewPlan, Plan, PlanStatus},
    params::{Id, ImportPlan, ListPlans},
    payload::parse_plan_text,
};

impl Tracker {
    /// Validates a model payload and persists it as a new plan.
    ///
    /// Validation happens before the store is touched, so a rejected
    /// payload never creates a plan. A surrounding markdown code fence is
    /// ignored. The returned error keeps the raw text for malformed payloads.
    pub async fn import_plan(&self, params: &ImportPlan) -> Result<ImportResult> {
        let draft = parse_plan_text(strip_code_fence(&params.payload))?;
        let motivation = draft.motivation.clone();
        let tips = draft.tips.clone();
        let new_plan = draft.into_new_plan(&self.clock.zoned_now(), params.title.clone());

        let plan = self.create_plan(new_plan).await?;
        info!("Imported plan {} with {} task(s)", plan.id, plan.tasks.len());

        Ok(ImportResult {
            plan,
            motivation,
            tips,
        })
    }

    /// Persists an already validated plan.
    pub async fn create_plan(&self, plan: NewPlan) -> Result<Plan> {
        self.with_database(move |db| db.create_plan(&plan)).await
    }

    /// Retrieves a plan by its ID.
    pub async fn get_plan(&self, params: &Id) -> Result<Option<Plan>> {
        let plan_id = params.id;
        self.with_database(move |db| db.get_plan(plan_id)).await
    }

    /// Like [`get_plan`](Self::get_plan) but absence is an error.
    pub async fn require_plan(&self, params: &Id) -> Result<Plan> {
        self.get_plan(params)
            .await?
            .ok_or(TrackerError::PlanNotFound { id: params.id })
    }

    /// Most recently created plan, if any.
    pub async fn latest_plan(&self) -> Result<Option<Plan>> {
        self.with_database(|db| db.get_latest_plan()).await
    }

    /// Most recently created plan that is still in progress.
    pub async fn latest_in_progress_plan(&self) -> Result<Option<Plan>> {
        self.with_database(|db| db.get_latest_plan_with_status(PlanStatus::InProgress))
            .await
    }

    /// Most recent plan dated `date`, if any.
    pub async fn plan_for_date(&self, date: Date) -> Result<Option<Plan>> {
        self.with_database(move |db| db.get_plan_for_date(date)).await
    }

    /// Plans most-recent-first.
    pub async fn list_plans(&self, params: &ListPlans) -> Result<Vec<Plan>> {
        let limit = params.limit;
        self.with_database(move |db| db.list_plans(limit)).await
    }

    /// History rows with record counts for list display.
    pub async fn list_plan_summaries(&self, params: &ListPlans) -> Result<PlanSummaries> {
        let limit = params.limit;
        self.with_database(move |db| db.list_plan_summaries(limit))
            .await
            .map(PlanSummaries)
    }

    /// Records of a plan in execution order.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::PlanNotFound`] for an unknown plan, so an
    /// empty list always means "nothing recorded yet".
    pub async fn list_records(&self, params: &Id) -> Result<TaskRecords> {
        let plan_id = params.id;
        self.with_database(move |db| {
            if !db.plan_exists(plan_id)? {
                return Err(TrackerError::PlanNotFound { id: plan_id });
            }
            db.list_records_for_plan(plan_id)
        })
        .await
        .map(TaskRecords)
    }

    /// Sets a plan's status directly.
    pub async fn set_plan_status(&self, params: &Id, status: PlanStatus) -> Result<()> {
        let plan_id = params.id;
        self.with_database(move |db| db.set_plan_status(plan_id, status))
            .await
    }
}
