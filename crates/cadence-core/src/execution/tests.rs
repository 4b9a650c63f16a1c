//! Tests for the execution controller.

use jiff::{civil::date, Timestamp};

use super::*;
use crate::models::{NewPlan, Priority};

fn task(name: &str, minutes: u32, focus: i32) -> TaskSpec {
    TaskSpec {
        name: name.to_string(),
        minutes,
        priority: Priority::Normal,
        focus,
        method: String::new(),
        warning: String::new(),
    }
}

/// Fresh store with one persisted plan of the given tasks.
fn setup(tasks: Vec<TaskSpec>) -> (Database, Plan) {
    let mut db = Database::in_memory().expect("Failed to open in-memory database");
    let total = tasks.iter().map(|t| t.minutes).sum();
    let plan = db
        .create_plan(&NewPlan {
            date: date(2026, 3, 14),
            title: "Execution test".to_string(),
            total_minutes: total,
            tasks,
        })
        .expect("Failed to create plan");
    (db, plan)
}

fn controller() -> ExecutionController<ManualClock> {
    ExecutionController::with_clock(ManualClock::new(
        Timestamp::from_second(1_773_475_200).unwrap(),
    ))
}

#[test]
fn test_two_task_plan_runs_to_finished() {
    let (mut db, plan) = setup(vec![task("A", 10, 7), task("B", 5, 6)]);
    let ctl = controller();
    let mut session = Session::default();

    ctl.start(&mut session, plan.clone()).unwrap();
    ctl.clock().advance_secs(9 * 60);
    let first = ctl
        .complete_current(&mut session, &mut db, &CompleteTask::default())
        .unwrap();
    assert_eq!(first.outcome, CompletionOutcome::Advanced { next_index: 1 });

    ctl.clock().advance_secs(6 * 60);
    let second = ctl
        .complete_current(&mut session, &mut db, &CompleteTask::default())
        .unwrap();
    assert_eq!(second.outcome, CompletionOutcome::Finished);
    assert!(matches!(session, Session::Finished { plan_id, .. } if plan_id == plan.id));

    let records = db.list_records_for_plan(plan.id).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].task_name, "A");
    assert_eq!(records[0].actual_minutes, 9);
    assert_eq!(records[0].focus_level, 7);
    assert_eq!(records[1].task_name, "B");
    // Task B started 10 minutes in; 15 minutes elapsed leaves 5 on B.
    assert_eq!(records[1].actual_minutes, 5);
    assert!(records.iter().all(|r| r.completed && r.completed_at.is_some()));

    let stored = db.get_plan(plan.id).unwrap().unwrap();
    assert_eq!(stored.status, PlanStatus::Completed);
}

#[test]
fn test_operator_overrides_minutes_focus_and_notes() {
    let (mut db, plan) = setup(vec![task("A", 10, 7), task("B", 5, 6)]);
    let ctl = controller();
    let mut session = Session::default();
    ctl.start(&mut session, plan.clone()).unwrap();

    let completion = ctl
        .complete_current(
            &mut session,
            &mut db,
            &CompleteTask {
                actual_minutes: Some(12),
                focus_level: Some(3),
                notes: Some("interrupted twice".to_string()),
            },
        )
        .unwrap();

    let record = completion.record.unwrap();
    assert_eq!(record.actual_minutes, 12);
    assert_eq!(record.scheduled_minutes, 10);
    assert_eq!(record.focus_level, 3);
    assert_eq!(record.notes.as_deref(), Some("interrupted twice"));
}

#[test]
fn test_start_rejects_second_plan_and_empty_plan() {
    let (_db, plan) = setup(vec![task("A", 10, 7)]);
    let ctl = controller();
    let mut session = Session::default();
    ctl.start(&mut session, plan.clone()).unwrap();

    let err = ctl.start(&mut session, plan.clone()).unwrap_err();
    assert!(matches!(err, TrackerError::PlanAlreadyRunning { id } if id == plan.id));

    let mut idle = Session::default();
    let empty = Plan {
        tasks: Vec::new(),
        ..plan
    };
    let err = ctl.start(&mut idle, empty).unwrap_err();
    assert!(matches!(err, TrackerError::NoActivePlan { .. }));
    assert_eq!(idle, Session::Idle);
}

#[test]
fn test_start_rejects_terminal_plan() {
    let (_db, mut plan) = setup(vec![task("A", 10, 7)]);
    plan.status = PlanStatus::Completed;
    let ctl = controller();
    let mut session = Session::default();

    let err = ctl.start(&mut session, plan).unwrap_err();
    assert!(matches!(err, TrackerError::InvalidInput { .. }));
}

#[test]
fn test_operations_require_running_session() {
    let (mut db, _plan) = setup(vec![task("A", 10, 7)]);
    let ctl = controller();
    let mut session = Session::default();

    assert!(matches!(
        ctl.elapsed(&session),
        Err(TrackerError::NoActivePlan { .. })
    ));
    assert!(matches!(
        ctl.complete_current(&mut session, &mut db, &CompleteTask::default()),
        Err(TrackerError::NoActivePlan { .. })
    ));
    assert!(matches!(
        ctl.go_back(&mut session),
        Err(TrackerError::NoActivePlan { .. })
    ));
    assert_eq!(ctl.stop(&mut session), None);
    assert_eq!(db.count_task_records().unwrap(), 0);
}

#[test]
fn test_remaining_is_monotonic_and_clamped() {
    let (_db, plan) = setup(vec![task("A", 10, 7), task("B", 5, 6)]);
    let ctl = controller();
    let mut session = Session::default();
    ctl.start(&mut session, plan).unwrap();

    let mut last = ctl.remaining_for_current_task(&session).unwrap();
    assert_eq!(last, 600);
    for _ in 0..15 {
        ctl.clock().advance_secs(60);
        let now = ctl.remaining_for_current_task(&session).unwrap();
        assert!(now <= last);
        assert!(now >= 0);
        last = now;
    }
    assert_eq!(last, 0);
}

#[test]
fn test_early_finish_gives_time_to_next_task() {
    let (mut db, plan) = setup(vec![task("A", 10, 7), task("B", 5, 6)]);
    let ctl = controller();
    let mut session = Session::default();
    ctl.start(&mut session, plan).unwrap();

    ctl.clock().advance_secs(4 * 60);
    ctl.complete_current(&mut session, &mut db, &CompleteTask::default())
        .unwrap();

    let elapsed = ctl.elapsed(&session).unwrap();
    assert_eq!(elapsed.total_secs, 240);
    assert_eq!(elapsed.task_secs, 240 - 600);
    // B's budget is untouched while A's unused time is still ahead.
    assert_eq!(ctl.remaining_for_current_task(&session).unwrap(), 300 + 360);
    assert_eq!(ctl.observed_actual_minutes(&session).unwrap(), 0);
}

#[test]
fn test_snapshot_reports_progress_phase_and_upcoming() {
    let (_db, plan) = setup(vec![
        task("A", 10, 7),
        task("B", 5, 6),
        task("C", 5, 6),
        task("D", 5, 6),
        task("E", 5, 6),
    ]);
    let ctl = controller();
    let mut session = Session::default();
    ctl.start(&mut session, plan).unwrap();

    let calm = ctl.snapshot(&session).unwrap();
    assert_eq!(calm.phase, TimerPhase::Calm);
    assert_eq!(calm.task_progress, 0.0);
    assert_eq!(
        calm.upcoming.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        vec!["B", "C", "D"]
    );

    ctl.clock().advance_secs(7 * 60);
    let warning = ctl.snapshot(&session).unwrap();
    assert_eq!(warning.phase, TimerPhase::Warning);
    assert_eq!(warning.remaining_secs, 180);
    assert!((warning.task_progress - 0.7).abs() < 1e-9);

    ctl.clock().advance_secs(5 * 60);
    let over = ctl.snapshot(&session).unwrap();
    assert_eq!(over.phase, TimerPhase::Danger);
    assert_eq!(over.remaining_secs, 0);
    assert_eq!(over.task_overtime_secs, 120);
    assert!(over.is_over_time());
    assert_eq!(over.task_progress_clamped(), 1.0);
}

#[test]
fn test_total_progress_exceeds_one_when_over_plan() {
    let (_db, plan) = setup(vec![task("A", 10, 7)]);
    let ctl = controller();
    let mut session = Session::default();
    ctl.start(&mut session, plan).unwrap();

    ctl.clock().advance_secs(15 * 60);
    let snapshot = ctl.snapshot(&session).unwrap();
    assert!((snapshot.total_progress - 1.5).abs() < 1e-9);
    assert_eq!(snapshot.total_progress_clamped(), 1.0);
}

#[test]
fn test_go_back_never_rewrites_records() {
    let (mut db, plan) = setup(vec![task("A", 10, 7), task("B", 5, 6)]);
    let ctl = controller();
    let mut session = Session::default();
    ctl.start(&mut session, plan.clone()).unwrap();

    ctl.clock().advance_secs(8 * 60);
    ctl.complete_current(&mut session, &mut db, &CompleteTask::default())
        .unwrap();
    assert_eq!(ctl.go_back(&mut session).unwrap(), 0);
    assert!(ctl.snapshot(&session).unwrap().already_recorded);

    // Completing A again advances without a duplicate record.
    let again = ctl
        .complete_current(&mut session, &mut db, &CompleteTask::default())
        .unwrap();
    assert!(again.record.is_none());
    assert_eq!(again.outcome, CompletionOutcome::Advanced { next_index: 1 });

    let records = db.list_records_for_plan(plan.id).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].actual_minutes, 8);
}

#[test]
fn test_go_back_on_first_task_stays_put() {
    let (_db, plan) = setup(vec![task("A", 10, 7)]);
    let ctl = controller();
    let mut session = Session::default();
    ctl.start(&mut session, plan).unwrap();

    assert_eq!(ctl.go_back(&mut session).unwrap(), 0);
    assert!(session.is_running());
}

#[test]
fn test_stop_keeps_plan_in_progress() {
    let (mut db, plan) = setup(vec![task("A", 10, 7), task("B", 5, 6)]);
    let ctl = controller();
    let mut session = Session::default();
    ctl.start(&mut session, plan.clone()).unwrap();
    ctl.complete_current(&mut session, &mut db, &CompleteTask::default())
        .unwrap();

    assert_eq!(ctl.stop(&mut session), Some(plan.id));
    assert_eq!(session, Session::Idle);

    let stored = db.get_plan(plan.id).unwrap().unwrap();
    assert_eq!(stored.status, PlanStatus::InProgress);
    assert_eq!(db.list_records_for_plan(plan.id).unwrap().len(), 1);
}

#[test]
fn test_abandon_marks_plan() {
    let (mut db, plan) = setup(vec![task("A", 10, 7)]);
    let ctl = controller();
    let mut session = Session::default();
    ctl.start(&mut session, plan.clone()).unwrap();

    assert_eq!(ctl.abandon(&mut session, &mut db).unwrap(), plan.id);
    assert_eq!(session, Session::Idle);
    let stored = db.get_plan(plan.id).unwrap().unwrap();
    assert_eq!(stored.status, PlanStatus::Abandoned);
}

#[test]
fn test_resume_skips_recorded_tasks() {
    let (mut db, plan) = setup(vec![task("A", 10, 7), task("B", 5, 6), task("C", 5, 6)]);
    let ctl = controller();
    let mut session = Session::default();
    ctl.start(&mut session, plan.clone()).unwrap();
    ctl.clock().advance_secs(10 * 60);
    ctl.complete_current(&mut session, &mut db, &CompleteTask::default())
        .unwrap();
    ctl.stop(&mut session);

    ctl.clock().advance_secs(3600);
    ctl.resume(&mut session, &mut db, plan.clone()).unwrap();

    let run = session.running().unwrap();
    assert_eq!(run.task_index, 1);
    assert!(run.recorded.contains(&0));
    let elapsed = ctl.elapsed(&session).unwrap();
    assert_eq!(elapsed.total_secs, 600);
    assert_eq!(elapsed.task_secs, 0);
}

#[test]
fn test_resume_after_restart_does_not_skip_unrun_tasks() {
    let (mut db, plan) = setup(vec![task("A", 10, 7), task("B", 5, 6), task("C", 5, 6)]);
    let ctl = controller();
    let mut session = Session::default();

    // Start the plan twice, recording only the first task each time.
    for _ in 0..2 {
        ctl.start(&mut session, plan.clone()).unwrap();
        ctl.complete_current(&mut session, &mut db, &CompleteTask::default())
            .unwrap();
        ctl.stop(&mut session);
    }
    let names: Vec<_> = db
        .list_records_for_plan(plan.id)
        .unwrap()
        .into_iter()
        .map(|r| r.task_name)
        .collect();
    assert_eq!(names, ["A", "A"]);

    ctl.resume(&mut session, &mut db, plan.clone()).unwrap();
    let run = session.running().unwrap();
    assert_eq!(run.task_index, 1);
    assert_eq!(run.current_task().unwrap().name, "B");
    assert_eq!(run.recorded, BTreeSet::from([0]));

    ctl.complete_current(&mut session, &mut db, &CompleteTask::default())
        .unwrap();
    let done = ctl
        .complete_current(&mut session, &mut db, &CompleteTask::default())
        .unwrap();
    assert_eq!(done.outcome, CompletionOutcome::Finished);
    let names: Vec<_> = db
        .list_records_for_plan(plan.id)
        .unwrap()
        .into_iter()
        .map(|r| r.task_name)
        .collect();
    assert_eq!(names, ["A", "A", "B", "C"]);
}

#[test]
fn test_resume_fully_recorded_plan_finishes() {
    let (mut db, plan) = setup(vec![task("A", 10, 7)]);
    db.append_task_record(&NewTaskRecord::completed(
        plan.id,
        &plan.tasks[0],
        10,
        7,
        Timestamp::now(),
    ))
    .unwrap();

    let ctl = controller();
    let mut session = Session::default();
    ctl.resume(&mut session, &mut db, plan.clone()).unwrap();

    assert_eq!(session.plan_id(), Some(plan.id));
    assert!(matches!(session, Session::Finished { .. }));
    let stored = db.get_plan(plan.id).unwrap().unwrap();
    assert_eq!(stored.status, PlanStatus::Completed);
}

#[test]
fn test_session_survives_json_round_trip() {
    let (_db, plan) = setup(vec![task("A", 10, 7), task("B", 5, 6)]);
    let ctl = controller();
    let mut session = Session::default();
    ctl.start(&mut session, plan).unwrap();

    let json = serde_json::to_string(&session).unwrap();
    assert!(json.contains("\"state\":\"running\""));
    let restored: Session = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, session);
}
