//! Execution operations for the Tracker.
//!
//! Pure reads of the session (snapshot, go back, stop) need no database
//! and run inline; everything that loads a plan or writes records goes
//! through a blocking call.

use super::Tracker;
use crate::{
    db::Database,
    error::{Result, TrackerError},
    execution::{Completion, ExecutionSnapshot, Session},
    models::{Plan, PlanStatus},
    params::{CompleteTask, StartPlan},
};

impl Tracker {
    /// Starts a plan from its first task: the given one, or the most recent
    /// in-progress plan.
    pub async fn start(&self, session: &mut Session, params: &StartPlan) -> Result<Plan> {
        let plan_id = params.plan_id;
        self.with_session(session, move |controller, db, session| {
            let plan = load_plan(db, plan_id)?;
            controller.start(session, plan.clone())?;
            Ok(plan)
        })
        .await
    }

    /// Continues a plan after its last recorded task.
    pub async fn resume(&self, session: &mut Session, params: &StartPlan) -> Result<Plan> {
        let plan_id = params.plan_id;
        self.with_session(session, move |controller, db, session| {
            let plan = load_plan(db, plan_id)?;
            controller.resume(session, db, plan.clone())?;
            Ok(plan)
        })
        .await
    }

    /// Records the current task and advances.
    pub async fn complete_current(
        &self,
        session: &mut Session,
        params: &CompleteTask,
    ) -> Result<Completion> {
        let params = params.clone();
        self.with_session(session, move |controller, db, session| {
            controller.complete_current(session, db, &params)
        })
        .await
    }

    /// Marks the running plan abandoned and ends the session.
    pub async fn abandon(&self, session: &mut Session) -> Result<u64> {
        self.with_session(session, |controller, db, session| {
            controller.abandon(session, db)
        })
        .await
    }

    /// Current execution view.
    pub fn snapshot(&self, session: &Session) -> Result<ExecutionSnapshot> {
        self.controller.snapshot(session)
    }

    /// Minutes spent on the current task so far.
    pub fn observed_actual_minutes(&self, session: &Session) -> Result<u32> {
        self.controller.observed_actual_minutes(session)
    }

    /// Moves back one task. Returns the new task index.
    pub fn go_back(&self, session: &mut Session) -> Result<usize> {
        self.controller.go_back(session)
    }

    /// Ends the session, leaving the plan in progress.
    pub fn stop(&self, session: &mut Session) -> Option<u64> {
        self.controller.stop(session)
    }
}

fn load_plan(db: &Database, plan_id: Option<u64>) -> Result<Plan> {
    match plan_id {
        Some(id) => db.get_plan(id)?.ok_or(TrackerError::PlanNotFound { id }),
        None => db
            .get_latest_plan_with_status(PlanStatus::InProgress)?
            .ok_or_else(|| TrackerError::no_active_plan("there is no plan in progress")),
    }
}
