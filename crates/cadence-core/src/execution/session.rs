//! Explicit execution session owned by the caller.

use std::collections::BTreeSet;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::{Plan, TaskSpec};

/// State of one operator session.
///
/// The controller never keeps this itself; hosts hold it and pass it to
/// every call. It serializes to JSON so a host can persist it between
/// process invocations.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Session {
    /// No plan is being driven
    #[default]
    Idle,
    /// A plan is being executed
    Running(RunningPlan),
    /// The last task of a plan was completed
    Finished {
        plan_id: u64,
        finished_at: Timestamp,
    },
}

/// Working copy of the plan being executed plus its timer anchor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunningPlan {
    pub plan: Plan,
    /// Index of the current task
    pub task_index: usize,
    /// Timer anchor; elapsed time is measured from here
    pub started_at: Timestamp,
    /// Task indices that already have a record in this session
    #[serde(default)]
    pub recorded: BTreeSet<usize>,
}

impl RunningPlan {
    /// The task at the current index, if the index is in range.
    pub fn current_task(&self) -> Option<&TaskSpec> {
        self.plan.tasks.get(self.task_index)
    }

    pub fn is_last_task(&self) -> bool {
        self.plan.last_index() == Some(self.task_index)
    }

    /// Whether the current task already has a record.
    pub fn current_recorded(&self) -> bool {
        self.recorded.contains(&self.task_index)
    }
}

impl Session {
    pub fn running(&self) -> Option<&RunningPlan> {
        match self {
            Session::Running(run) => Some(run),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Session::Running(_))
    }

    /// Id of the plan this session is about, if any.
    pub fn plan_id(&self) -> Option<u64> {
        match self {
            Session::Idle => None,
            Session::Running(run) => Some(run.plan.id),
            Session::Finished { plan_id, .. } => Some(*plan_id),
        }
    }
}
