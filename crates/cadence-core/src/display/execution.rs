//! Display of the live execution view.

use std::fmt;

use super::datetime::{Countdown, ProgressBar};
use crate::execution::{ExecutionSnapshot, Session, TimerPhase};

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimerPhase::Calm => "on track",
            TimerPhase::Warning => "hurry",
            TimerPhase::Danger => "time is nearly up",
        };
        write!(f, "{label}")
    }
}

impl fmt::Display for ExecutionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.plan_id, self.plan_title)?;
        writeln!(f)?;
        writeln!(
            f,
            "## Task {}/{}: {}",
            self.task_index + 1,
            self.task_count,
            self.task.name
        )?;
        writeln!(f)?;

        if self.is_over_time() {
            writeln!(
                f,
                "**Over time by {}** ({} min budget)",
                Countdown(self.task_overtime_secs),
                self.task.minutes
            )?;
        } else {
            writeln!(
                f,
                "**{} left** of {} min ({})",
                Countdown(self.remaining_secs),
                self.task.minutes,
                self.phase
            )?;
        }
        writeln!(f)?;
        writeln!(f, "- Task: {}", ProgressBar(self.task_progress))?;
        writeln!(
            f,
            "- Plan: {} ({} of {})",
            ProgressBar(self.total_progress),
            Countdown(self.elapsed_secs),
            Countdown(self.planned_total_secs)
        )?;
        writeln!(
            f,
            "- Priority {} · target focus {}/10",
            self.task.priority, self.task.focus
        )?;
        if !self.task.method.is_empty() {
            writeln!(f, "- Method: {}", self.task.method)?;
        }
        if !self.task.warning.is_empty() {
            writeln!(f, "- Warning: {}", self.task.warning)?;
        }
        if self.already_recorded {
            writeln!(f, "- Already recorded; completing again only moves on")?;
        }

        if !self.upcoming.is_empty() {
            writeln!(f, "\n### Up next")?;
            writeln!(f)?;
            for task in &self.upcoming {
                writeln!(f, "- {task}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Session::Idle => writeln!(f, "No plan is running."),
            Session::Running(run) => writeln!(
                f,
                "Running plan {} '{}', task {} of {}.",
                run.plan.id,
                run.plan.title,
                run.task_index + 1,
                run.plan.tasks.len()
            ),
            Session::Finished { plan_id, .. } => writeln!(f, "Plan {plan_id} is finished."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, TaskSpec};

    fn snapshot(remaining: i64, overtime: i64) -> ExecutionSnapshot {
        let task = TaskSpec {
            name: "Write report".to_string(),
            minutes: 10,
            priority: Priority::High,
            focus: 7,
            method: String::new(),
            warning: String::new(),
        };
        ExecutionSnapshot {
            plan_id: 2,
            plan_title: "Afternoon".to_string(),
            task_index: 0,
            task_count: 2,
            task: task.clone(),
            already_recorded: false,
            elapsed_secs: 600 - remaining + overtime,
            task_elapsed_secs: 600 - remaining + overtime,
            remaining_secs: remaining,
            task_overtime_secs: overtime,
            planned_total_secs: 1200,
            task_progress: (600 - remaining) as f64 / 600.0,
            total_progress: (600 - remaining + overtime) as f64 / 1200.0,
            phase: TimerPhase::for_remaining(remaining, 600),
            upcoming: vec![TaskSpec {
                name: "Send report".to_string(),
                ..task
            }],
        }
    }

    #[test]
    fn test_snapshot_shows_countdown_and_upcoming() {
        let output = snapshot(400, 0).to_string();
        assert!(output.contains("## Task 1/2: Write report"));
        assert!(output.contains("**06:40 left** of 10 min (on track)"));
        assert!(output.contains("### Up next"));
        assert!(output.contains("**Send report**"));
    }

    #[test]
    fn test_snapshot_shows_overtime() {
        let output = snapshot(0, 90).to_string();
        assert!(output.contains("**Over time by 01:30**"));
    }
}
