//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::{
    execution::{Completion, CompletionOutcome},
    models::Plan,
};

/// A plan imported from a model payload, with the payload's display-only
/// texts.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportResult {
    pub plan: Plan,
    pub motivation: String,
    pub tips: String,
}

impl fmt::Display for ImportResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Imported plan with ID: {}", self.plan.id)?;
        writeln!(f)?;
        write!(f, "{}", self.plan)?;
        if !self.motivation.is_empty() {
            writeln!(f)?;
            writeln!(f, "> {}", self.motivation)?;
        }
        if !self.tips.is_empty() {
            writeln!(f)?;
            writeln!(f, "**Tips**: {}", self.tips)?;
        }
        Ok(())
    }
}

/// Operator feedback after completing a task.
pub struct CompletionResult<'a>(pub &'a Completion);

impl<'a> fmt::Display for CompletionResult<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.record {
            Some(record) => writeln!(
                f,
                "Recorded **{}**: {} of {} min, focus {}.",
                record.task_name,
                record.actual_minutes,
                record.scheduled_minutes,
                record.focus_level
            )?,
            None => writeln!(f, "Task was already recorded; moved on without a new record.")?,
        }

        match self.0.outcome {
            CompletionOutcome::Advanced { next_index } => {
                writeln!(f, "Now on task {}.", next_index + 1)
            }
            CompletionOutcome::Finished => writeln!(f, "Plan complete. Every task is recorded."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskRecord;

    #[test]
    fn test_completion_result_messages() {
        let recorded = Completion {
            record: Some(TaskRecord {
                id: 1,
                plan_id: 1,
                task_name: "A".to_string(),
                scheduled_minutes: 25,
                actual_minutes: 20,
                focus_level: 8,
                completed: true,
                completed_at: None,
                notes: None,
            }),
            outcome: CompletionOutcome::Advanced { next_index: 1 },
        };
        let output = CompletionResult(&recorded).to_string();
        assert!(output.contains("Recorded **A**: 20 of 25 min, focus 8."));
        assert!(output.contains("Now on task 2."));

        let repeat = Completion {
            record: None,
            outcome: CompletionOutcome::Finished,
        };
        let output = CompletionResult(&repeat).to_string();
        assert!(output.contains("already recorded"));
        assert!(output.contains("Plan complete."));
    }
}
