//! End-to-end reminder cycles over the on-disk store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{Local, NaiveDateTime};
use donna::commands::Tracker;
use donna::notify::RecordingNotifier;
use donna::reminder::ReminderService;
use donna::store::{JsonTaskStore, TaskSet, TaskStore};
use donna::task::{DUE_INPUT_FORMAT, Task, TaskStatus};
use std::sync::Arc;
use std::time::Duration;

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn seeded_file_store(dir: &tempfile::TempDir, offsets_secs: &[i64]) -> JsonTaskStore {
    let store = JsonTaskStore::new(dir.path().join("tasks.json"));
    let mut set = TaskSet::default();
    for offset in offsets_secs {
        let id = set.allocate_id();
        set.tasks.push(Task::new(
            id,
            format!("task {id}"),
            now() + chrono::Duration::seconds(*offset),
            "medium",
        ));
    }
    store.save(&set).unwrap();
    store
}

#[test]
fn one_cycle_completes_due_and_schedules_the_near_wake() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_file_store(&dir, &[-1, 30, 120]);
    let notifier = RecordingNotifier::new();
    let service = ReminderService::new(Arc::new(store.clone()), Arc::new(notifier.clone()));

    let sleep = service.run_cycle(now());

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, "Reminder: task 1");

    // The change is on disk, not just in memory.
    let set = store.load().unwrap();
    assert_eq!(set.tasks[0].status, TaskStatus::Completed);
    assert!(set.tasks[1].is_pending());
    assert!(set.tasks[2].is_pending());

    // 30s away beats both the 120s task and the 60s ceiling.
    assert!(sleep <= Duration::from_secs(30));
    assert!(sleep > Duration::from_secs(25));
}

#[test]
fn missing_store_file_is_a_quiet_empty_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonTaskStore::new(dir.path().join("tasks.json"));
    let notifier = RecordingNotifier::new();
    let service = ReminderService::new(Arc::new(store), Arc::new(notifier.clone()));

    let sleep = service.run_cycle(now());

    assert!(notifier.sent().is_empty());
    assert_eq!(sleep, Duration::from_secs(60));
}

#[test]
fn both_due_tasks_are_notified_once_each() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_file_store(&dir, &[-5, -1]);
    let notifier = RecordingNotifier::new();
    let service = ReminderService::new(Arc::new(store.clone()), Arc::new(notifier.clone()));

    service.run_cycle(now());

    let mut bodies: Vec<String> = notifier.sent().into_iter().map(|n| n.body).collect();
    bodies.sort();
    assert_eq!(bodies, vec!["Reminder: task 1", "Reminder: task 2"]);

    let set = store.load().unwrap();
    assert!(set.tasks.iter().all(|t| t.status == TaskStatus::Completed));
}

#[test]
fn repeated_cycles_never_double_notify() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_file_store(&dir, &[-1]);
    let notifier = RecordingNotifier::new();
    let service = ReminderService::new(Arc::new(store), Arc::new(notifier.clone()));

    for _ in 0..3 {
        service.run_cycle(now());
    }

    assert_eq!(notifier.sent().len(), 1);
}

#[test]
fn task_added_between_cycles_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_file_store(&dir, &[]);
    let notifier = RecordingNotifier::new();
    let service = ReminderService::new(Arc::new(store.clone()), Arc::new(notifier.clone()));

    assert_eq!(service.run_cycle(now()), Duration::from_secs(60));
    assert!(notifier.sent().is_empty());

    // The command interface writes through its own handle while the loop
    // sleeps; the next cycle re-reads the store and sees the new task.
    let tracker = Tracker::new(Arc::new(store.clone()));
    let due = (Local::now() - chrono::Duration::minutes(1))
        .format(DUE_INPUT_FORMAT)
        .to_string();
    tracker.add("surprise", &due, "high").unwrap();

    service.run_cycle(now());
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, "Reminder: surprise");

    let set = store.load().unwrap();
    assert_eq!(set.tasks.len(), 1);
    assert_eq!(set.tasks[0].status, TaskStatus::Completed);
}

#[tokio::test]
async fn spawned_loop_delivers_and_stops_on_cancel() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_file_store(&dir, &[-1]);
    let notifier = RecordingNotifier::new();
    let service = ReminderService::new(Arc::new(store), Arc::new(notifier.clone()));
    let cancel = service.cancel_token();

    let handle = service.run();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(notifier.sent().len(), 1);

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("loop exits after cancel")
        .expect("loop task does not panic");
}
