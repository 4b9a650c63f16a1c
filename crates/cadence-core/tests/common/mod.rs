#![allow(dead_code)]

use cadence_core::{Priority, TaskSpec, Tracker, TrackerBuilder};
use tempfile::TempDir;

/// Helper function to create a test tracker
pub async fn create_test_tracker() -> (TempDir, Tracker) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let tracker = TrackerBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create tracker");
    (temp_dir, tracker)
}

/// Task spec with empty advisory fields.
pub fn task(name: &str, minutes: u32, focus: i32) -> TaskSpec {
    TaskSpec {
        name: name.to_string(),
        minutes,
        priority: Priority::Normal,
        focus,
        method: String::new(),
        warning: String::new(),
    }
}

/// Payload with tasks A (25 min) and B (10 min).
pub const AB_PAYLOAD: &str = r#"{
    "total_minutes": 35,
    "tasks": [
        {"name": "A", "minutes": 25, "priority": "S", "focus": 8},
        {"name": "B", "minutes": 10, "priority": "A", "focus": 6}
    ]
}"#;
