//! Execution controller: drives a plan task by task against a clock.
//!
//! The controller is stateless apart from its clock. All session state lives
//! in a [`Session`] value that the host owns and passes to every call, so one
//! controller can serve any number of independent sessions.
//!
//! ```text
//!   Idle ──start/resume──▶ Running ──complete (last)──▶ Finished
//!    ▲                      │  ▲ │
//!    └──── stop/abandon ────┘  └─┘ complete / go back
//! ```
//!
//! Timing uses a single anchor: the instant the plan started. The current
//! task's elapsed time is the plan's elapsed time minus the scheduled
//! seconds of every earlier task, so finishing early gives time back to the
//! next task and running late takes it away.

use std::collections::{BTreeSet, HashMap};

use jiff::{SignedDuration, Timestamp};
use log::{debug, info};
use serde::{Deserialize, Serialize};

pub mod clock;
pub mod session;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use session::{RunningPlan, Session};
pub use snapshot::{ExecutionSnapshot, TimerPhase, UPCOMING_PREVIEW};

use crate::{
    db::Database,
    error::{Result, TrackerError},
    models::{NewTaskRecord, Plan, PlanStatus, TaskRecord, TaskSpec},
    params::CompleteTask,
};

/// Elapsed time of a running plan at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elapsed {
    /// Seconds since the plan started, never negative
    pub total_secs: i64,
    /// Seconds into the current task; negative when ahead of schedule
    pub task_secs: i64,
}

/// Where the session went after completing a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CompletionOutcome {
    Advanced { next_index: usize },
    Finished,
}

/// Result of [`ExecutionController::complete_current`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// The appended record; `None` when the task was already recorded
    pub record: Option<TaskRecord>,
    pub outcome: CompletionOutcome,
}

/// Drives plan execution for caller-owned sessions.
#[derive(Debug, Clone, Default)]
pub struct ExecutionController<C = SystemClock> {
    clock: C,
}

impl ExecutionController<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> ExecutionController<C> {
    /// Controller reading time from the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Begins executing `plan` from its first task with the timer anchored
    /// at now.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::PlanAlreadyRunning`] if the session is running
    /// - [`TrackerError::NoActivePlan`] if the plan has no tasks
    /// - [`TrackerError::InvalidInput`] if the plan is completed or abandoned
    pub fn start(&self, session: &mut Session, plan: Plan) -> Result<()> {
        Self::check_startable(session, &plan)?;

        info!("Starting plan {} '{}'", plan.id, plan.title);
        *session = Session::Running(RunningPlan {
            plan,
            task_index: 0,
            started_at: self.clock.now(),
            recorded: BTreeSet::new(),
        });
        Ok(())
    }

    /// Picks up an in-progress plan at its first unrecorded task.
    ///
    /// Records are matched to tasks by name, each record covering at most
    /// one task, so repeated records of the same task (from starting the
    /// plan over) never count toward later tasks. The timer anchor is placed
    /// so the first unrecorded task starts on schedule now. If every task is
    /// already recorded the plan is marked completed and the session becomes
    /// [`Session::Finished`].
    pub fn resume(&self, session: &mut Session, db: &mut Database, plan: Plan) -> Result<()> {
        Self::check_startable(session, &plan)?;

        let records = db.list_records_for_plan(plan.id)?;
        let recorded = recorded_indices(&plan.tasks, &records);
        let now = self.clock.now();

        let Some(next) = (0..plan.tasks.len()).find(|i| !recorded.contains(i)) else {
            db.set_plan_status(plan.id, PlanStatus::Completed)?;
            info!("Plan {} already has every task recorded; marked completed", plan.id);
            *session = Session::Finished {
                plan_id: plan.id,
                finished_at: now,
            };
            return Ok(());
        };

        let started_at = rewind(now, plan.seconds_before(next))?;
        info!(
            "Resuming plan {} at task {} of {}",
            plan.id,
            next + 1,
            plan.tasks.len()
        );
        *session = Session::Running(RunningPlan {
            plan,
            task_index: next,
            started_at,
            recorded,
        });
        Ok(())
    }

    /// Plan and current-task elapsed seconds.
    pub fn elapsed(&self, session: &Session) -> Result<Elapsed> {
        let run = running(session)?;
        Ok(self.elapsed_of(run))
    }

    /// Seconds left in the current task's budget, never negative.
    pub fn remaining_for_current_task(&self, session: &Session) -> Result<i64> {
        let run = running(session)?;
        let task = current_task(run)?;
        Ok((task.seconds() - self.elapsed_of(run).task_secs).max(0))
    }

    /// Whole minutes spent on the current task so far.
    pub fn observed_actual_minutes(&self, session: &Session) -> Result<u32> {
        let run = running(session)?;
        Ok(minutes_of(self.elapsed_of(run).task_secs))
    }

    /// Everything needed to draw the execution view right now.
    pub fn snapshot(&self, session: &Session) -> Result<ExecutionSnapshot> {
        let run = running(session)?;
        let task = current_task(run)?;
        let elapsed = self.elapsed_of(run);

        let budget = task.seconds();
        let remaining = (budget - elapsed.task_secs).max(0);
        let planned_total = run.plan.total_seconds();

        Ok(ExecutionSnapshot {
            plan_id: run.plan.id,
            plan_title: run.plan.title.clone(),
            task_index: run.task_index,
            task_count: run.plan.tasks.len(),
            task: task.clone(),
            already_recorded: run.current_recorded(),
            elapsed_secs: elapsed.total_secs,
            task_elapsed_secs: elapsed.task_secs,
            remaining_secs: remaining,
            task_overtime_secs: (elapsed.task_secs - budget).max(0),
            planned_total_secs: planned_total,
            task_progress: ratio(budget - remaining, budget),
            total_progress: ratio(elapsed.total_secs, planned_total),
            phase: TimerPhase::for_remaining(remaining, budget),
            upcoming: run
                .plan
                .tasks
                .iter()
                .skip(run.task_index + 1)
                .take(UPCOMING_PREVIEW)
                .cloned()
                .collect(),
        })
    }

    /// Records the current task and advances.
    ///
    /// The record is written before the session moves, so a failed write
    /// leaves the session untouched. A task that already has a record in
    /// this session (reached again via [`go_back`](Self::go_back)) is not
    /// recorded twice; the session just advances. Completing the last task
    /// marks the plan completed and finishes the session.
    pub fn complete_current(
        &self,
        session: &mut Session,
        db: &mut Database,
        params: &CompleteTask,
    ) -> Result<Completion> {
        let now = self.clock.now();
        let observed = self.observed_actual_minutes(session)?;

        let run = running_mut(session)?;
        let index = run.task_index;
        let task = current_task(run)?.clone();

        let record = if run.recorded.contains(&index) {
            debug!(
                "Task {} of plan {} already recorded; advancing only",
                index, run.plan.id
            );
            None
        } else {
            let new_record = NewTaskRecord::completed(
                run.plan.id,
                &task,
                params.actual_minutes.unwrap_or(observed),
                params.focus_level.unwrap_or(task.focus),
                now,
            )
            .with_notes(params.notes.clone());

            let record = db.append_task_record(&new_record)?;
            run.recorded.insert(index);
            Some(record)
        };

        if !run.is_last_task() {
            run.task_index += 1;
            return Ok(Completion {
                record,
                outcome: CompletionOutcome::Advanced {
                    next_index: run.task_index,
                },
            });
        }

        db.set_plan_status(run.plan.id, PlanStatus::Completed)?;
        let plan_id = run.plan.id;
        info!("Plan {plan_id} completed");

        *session = Session::Finished {
            plan_id,
            finished_at: now,
        };
        Ok(Completion {
            record,
            outcome: CompletionOutcome::Finished,
        })
    }

    /// Moves back one task without touching the store or the timer anchor.
    /// Stays on the first task when already there. Returns the new index.
    pub fn go_back(&self, session: &mut Session) -> Result<usize> {
        let run = running_mut(session)?;
        run.task_index = run.task_index.saturating_sub(1);
        debug!("Plan {} moved back to task {}", run.plan.id, run.task_index);
        Ok(run.task_index)
    }

    /// Leaves the session idle. The plan stays in progress and keeps its
    /// records. Returns the id of the plan that was running, if any.
    pub fn stop(&self, session: &mut Session) -> Option<u64> {
        match std::mem::take(session) {
            Session::Running(run) => {
                info!("Stopped plan {} at task {}", run.plan.id, run.task_index);
                Some(run.plan.id)
            }
            _ => None,
        }
    }

    /// Marks the running plan abandoned and leaves the session idle.
    pub fn abandon(&self, session: &mut Session, db: &mut Database) -> Result<u64> {
        let plan_id = running(session)?.plan.id;
        db.set_plan_status(plan_id, PlanStatus::Abandoned)?;
        info!("Abandoned plan {plan_id}");
        *session = Session::Idle;
        Ok(plan_id)
    }

    fn elapsed_of(&self, run: &RunningPlan) -> Elapsed {
        let total_secs = (self.clock.now().as_second() - run.started_at.as_second()).max(0);
        Elapsed {
            total_secs,
            task_secs: total_secs - run.plan.seconds_before(run.task_index),
        }
    }

    fn check_startable(session: &Session, plan: &Plan) -> Result<()> {
        if let Session::Running(run) = session {
            return Err(TrackerError::PlanAlreadyRunning { id: run.plan.id });
        }
        if plan.tasks.is_empty() {
            return Err(TrackerError::no_active_plan(format!(
                "plan {} has no tasks",
                plan.id
            )));
        }
        if plan.status.is_terminal() {
            return Err(TrackerError::invalid_input("plan_id")
                .with_reason(format!("plan {} is {}", plan.id, plan.status.as_str())));
        }
        Ok(())
    }
}

fn running(session: &Session) -> Result<&RunningPlan> {
    session
        .running()
        .ok_or_else(|| TrackerError::no_active_plan("no plan is running"))
}

fn running_mut(session: &mut Session) -> Result<&mut RunningPlan> {
    match session {
        Session::Running(run) => Ok(run),
        _ => Err(TrackerError::no_active_plan("no plan is running")),
    }
}

fn current_task(run: &RunningPlan) -> Result<&TaskSpec> {
    run.current_task().ok_or_else(|| {
        TrackerError::no_active_plan(format!(
            "task index {} is out of range for plan {}",
            run.task_index, run.plan.id
        ))
    })
}

/// Indices of the tasks covered by `records`. Each record is consumed by
/// the earliest task of the same name not yet covered.
fn recorded_indices(tasks: &[TaskSpec], records: &[TaskRecord]) -> BTreeSet<usize> {
    let mut unmatched: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *unmatched.entry(record.task_name.as_str()).or_default() += 1;
    }

    tasks
        .iter()
        .enumerate()
        .filter_map(|(index, task)| {
            let count = unmatched.get_mut(task.name.as_str())?;
            if *count == 0 {
                return None;
            }
            *count -= 1;
            Some(index)
        })
        .collect()
}

fn rewind(now: Timestamp, secs: i64) -> Result<Timestamp> {
    now.checked_sub(SignedDuration::from_secs(secs))
        .map_err(|e| TrackerError::invalid_input("started_at").with_reason(e.to_string()))
}

fn minutes_of(secs: i64) -> u32 {
    u32::try_from(secs.max(0) / 60).unwrap_or(u32::MAX)
}

fn ratio(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}
