//! Display implementations for domain models.
//!
//! Kept apart from the model definitions; every implementation produces
//! markdown for the terminal renderer.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    DailyLog, DailyStats, Plan, PlanStatus, PlanSummary, Priority, TaskRecord, TaskSpec,
    TrendSummary,
};

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PlanStatus {
    /// Status label with a leading icon.
    pub fn with_icon(&self) -> &'static str {
        match self {
            PlanStatus::InProgress => "▶ in progress",
            PlanStatus::Completed => "✓ completed",
            PlanStatus::Abandoned => "✗ abandoned",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl fmt::Display for TaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "**{}** · {} min · {} · focus {}/10",
            self.name, self.minutes, self.priority, self.focus
        )
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.title)?;
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.status.with_icon())?;
        writeln!(f, "- Date: {}", self.date)?;
        writeln!(f, "- Planned: {} min", self.total_minutes)?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;

        if self.tasks.is_empty() {
            return writeln!(f, "\nNo tasks in this plan.");
        }

        writeln!(f, "\n## Tasks")?;
        writeln!(f)?;
        for (index, task) in self.tasks.iter().enumerate() {
            writeln!(f, "{}. {task}", index + 1)?;
            if !task.method.is_empty() {
                writeln!(f, "   - Method: {}", task.method)?;
            }
            if !task.warning.is_empty() {
                writeln!(f, "   - Warning: {}", task.warning)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for TaskRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.completed { "✓" } else { "○" };
        write!(
            f,
            "- {mark} **{}**: {} of {} min, focus {}",
            self.task_name, self.actual_minutes, self.scheduled_minutes, self.focus_level
        )?;
        if let Some(at) = &self.completed_at {
            write!(f, " ({})", LocalDateTime(at))?;
        }
        writeln!(f)?;
        if let Some(notes) = &self.notes {
            writeln!(f, "  > {notes}")?;
        }
        Ok(())
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {} (ID: {}) ({}/{})",
            self.title, self.id, self.recorded_tasks, self.planned_tasks
        )?;
        writeln!(f)?;
        writeln!(f, "- **Date**: {}", self.date)?;
        writeln!(f, "- **Status**: {}", self.status.with_icon())?;
        writeln!(f, "- **Planned**: {} min", self.total_minutes)?;
        writeln!(f, "- **Completion**: {:.0}%", self.completion_rate())?;
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)
    }
}

impl fmt::Display for DailyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| {} | {} | {} | {:.1} | {}/{} | {:.0}% |",
            self.date,
            self.scheduled_minutes,
            self.actual_minutes,
            self.avg_focus_level,
            self.completed_count,
            self.task_count,
            self.completion_rate
        )
    }
}

impl fmt::Display for TrendSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Trend over {} day(s)", self.days)?;
        writeln!(f)?;
        writeln!(f, "- **Avg scheduled**: {:.0} min/day", self.avg_scheduled_minutes)?;
        writeln!(f, "- **Avg actual**: {:.0} min/day", self.avg_actual_minutes)?;
        writeln!(f, "- **Avg focus**: {:.1}/10", self.avg_focus_level)?;
        writeln!(f, "- **Avg completion**: {:.0}%", self.avg_completion_rate)
    }
}

impl fmt::Display for DailyLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.date)?;
        writeln!(f)?;
        writeln!(
            f,
            "- **Minutes**: {} actual of {} scheduled",
            self.total_actual_minutes, self.total_scheduled_minutes
        )?;
        writeln!(f, "- **Focus**: {:.1}", self.avg_focus_level)?;
        writeln!(f, "- **Completion**: {:.0}%", self.completion_rate)?;
        if let Some(notes) = &self.notes {
            writeln!(f)?;
            writeln!(f, "{notes}")?;
        }
        Ok(())
    }
}
