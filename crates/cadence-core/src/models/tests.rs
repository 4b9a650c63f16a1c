#[cfg(test)]
mod model_tests {
    use jiff::{civil::date, Timestamp};

    use crate::models::{
        DailyStats, NewPlan, NewTaskRecord, Plan, PlanStatus, PlanSummary, Priority, TaskSpec,
        TrendSummary,
    };

    fn create_test_task(name: &str, minutes: u32) -> TaskSpec {
        TaskSpec {
            name: name.to_string(),
            minutes,
            priority: Priority::High,
            focus: 7,
            method: "Pomodoro".to_string(),
            warning: "No phone".to_string(),
        }
    }

    fn create_test_plan() -> Plan {
        Plan {
            id: 42,
            date: date(2022, 1, 1),
            title: "Test Plan Title".to_string(),
            total_minutes: 60,
            tasks: vec![
                create_test_task("First", 25),
                create_test_task("Second", 10),
                create_test_task("Third", 25),
            ],
            status: PlanStatus::InProgress,
            created_at: Timestamp::from_second(1640995200).unwrap(), // 2022-01-01 00:00:00 UTC
        }
    }

    #[test]
    fn test_plan_status_round_trip_strings() {
        for status in [
            PlanStatus::InProgress,
            PlanStatus::Completed,
            PlanStatus::Abandoned,
        ] {
            assert_eq!(status.as_str().parse::<PlanStatus>().unwrap(), status);
        }
        assert!("finished".parse::<PlanStatus>().is_err());
        assert!(!PlanStatus::InProgress.is_terminal());
        assert!(PlanStatus::Abandoned.is_terminal());
    }

    #[test]
    fn test_priority_serde_accepts_letters() {
        let top: Priority = serde_json::from_str("\"S\"").unwrap();
        let high: Priority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(top, Priority::Top);
        assert_eq!(high, Priority::High);
        assert_eq!(serde_json::to_string(&Priority::Normal).unwrap(), "\"normal\"");
        assert_eq!(Priority::Top.letter(), 'S');
    }

    #[test]
    fn test_plan_timing_helpers() {
        let plan = create_test_plan();
        assert_eq!(plan.total_seconds(), 3600);
        assert_eq!(plan.seconds_before(0), 0);
        assert_eq!(plan.seconds_before(2), 35 * 60);
        assert_eq!(plan.seconds_before(10), 60 * 60);
        assert_eq!(plan.last_index(), Some(2));
    }

    #[test]
    fn test_plan_serialization_keeps_task_order() {
        let plan = create_test_plan();
        let json = serde_json::to_string(&plan).unwrap();
        let back: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
        assert!(json.contains("\"status\":\"in_progress\""));
        assert!(json.contains("\"date\":\"2022-01-01\""));
    }

    #[test]
    fn test_new_plan_today_default_title() {
        let plan = NewPlan::today(10, vec![create_test_task("Only", 10)], None);
        assert!(plan.title.starts_with("Daily Plan "));

        let titled = NewPlan::today(10, vec![], Some("Exam prep".to_string()));
        assert_eq!(titled.title, "Exam prep");

        let blank = NewPlan::today(10, vec![], Some("   ".to_string()));
        assert!(blank.title.starts_with("Daily Plan "));
    }

    #[test]
    fn test_new_plan_created_at_labels_with_local_time() {
        let now: jiff::Zoned = "2026-03-14T07:05:00+00:00[+00:00]".parse().unwrap();
        let plan = NewPlan::created_at(&now, 10, vec![create_test_task("Only", 10)], None);
        assert_eq!(plan.title, "Daily Plan 2026-03-14 07:05");
        assert_eq!(plan.date, jiff::civil::date(2026, 3, 14));
    }

    #[test]
    fn test_new_task_record_copies_spec() {
        let task = create_test_task("Copy me", 25);
        let at = Timestamp::from_second(1640995200).unwrap();
        let record = NewTaskRecord::completed(7, &task, 20, 9, at)
            .with_notes(Some("  ".to_string()));

        assert_eq!(record.task_name, "Copy me");
        assert_eq!(record.scheduled_minutes, 25);
        assert_eq!(record.actual_minutes, 20);
        assert_eq!(record.focus_level, 9);
        assert!(record.completed);
        assert_eq!(record.completed_at, Some(at));
        assert_eq!(record.notes, None);
    }

    #[test]
    fn test_plan_summary_completion_rate() {
        let plan = create_test_plan();
        let summary = PlanSummary::from_plan(&plan, 2, 1);
        assert_eq!(summary.planned_tasks, 3);
        assert_eq!(summary.completion_rate(), 50.0);

        let empty = PlanSummary::from_plan(&plan, 0, 0);
        assert_eq!(empty.completion_rate(), 0.0);
    }

    #[test]
    fn test_daily_stats_completion_rate() {
        let day = DailyStats::from_counts(date(2022, 1, 1), 60, 55, 7.5, 4, 3);
        assert_eq!(day.completion_rate, 75.0);
    }

    #[test]
    fn test_trend_summary_means() {
        let days = vec![
            DailyStats::from_counts(date(2022, 1, 2), 100, 80, 8.0, 2, 2),
            DailyStats::from_counts(date(2022, 1, 1), 50, 40, 6.0, 2, 1),
        ];
        let trend = TrendSummary::from_days(&days).unwrap();
        assert_eq!(trend.days, 2);
        assert_eq!(trend.avg_scheduled_minutes, 75.0);
        assert_eq!(trend.avg_actual_minutes, 60.0);
        assert_eq!(trend.avg_focus_level, 7.0);
        assert_eq!(trend.avg_completion_rate, 75.0);

        assert!(TrendSummary::from_days(&[]).is_none());
    }
}
