//! Task collection persistence.
//!
//! The whole collection is one JSON document, read and written in full on
//! every operation. [`JsonTaskStore`] is the on-disk backend used by the
//! binary; [`MemoryTaskStore`] backs tests and ephemeral usage. Both sides
//! of the program (command interface and reminder loop) go through the
//! [`TaskStore`] trait and nothing else, so the race between them is
//! confined to the load/save contract: last save wins, whole file.
//!
//! Loading upgrades legacy layouts in place: a bare array of records, the
//! old `due_time` field name, and records with missing fields are all
//! accepted, normalized, and immediately re-persisted in the current
//! layout.

use crate::error::{DonnaError, Result};
use crate::task::{Task, TaskStatus};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Schema version written with every save.
const STORE_VERSION: u8 = 1;

/// Default priority back-filled into legacy records.
const DEFAULT_PRIORITY: &str = "medium";

/// The full task collection plus its identifier counter.
///
/// `next_id` is persisted alongside the tasks so deleting a task can never
/// cause a later add to reuse its identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskSet {
    /// Next identifier to hand out. Zero means "not yet allocated".
    pub next_id: u64,
    /// The tasks, in insertion order.
    pub tasks: Vec<Task>,
}

impl TaskSet {
    /// Hand out the next task identifier.
    pub fn allocate_id(&mut self) -> u64 {
        if self.next_id == 0 {
            self.next_id = 1;
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Find a task by identifier.
    pub fn find(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Find a task by identifier, mutably.
    pub fn find_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Remove a task by identifier. The identifier is not recycled.
    pub fn remove(&mut self, id: u64) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }
}

/// Storage backend for the task collection.
///
/// `load` returns an empty set when no backing data exists yet. `save`
/// replaces the prior content entirely; nothing stronger than that is
/// guaranteed, and callers must not assume atomicity.
pub trait TaskStore: Send + Sync {
    /// Load the full current task collection.
    fn load(&self) -> Result<TaskSet>;

    /// Replace the persisted collection with `set`.
    fn save(&self, set: &TaskSet) -> Result<()>;
}

// ---------------------------------------------------------------------------
// JSON file backend
// ---------------------------------------------------------------------------

/// Persisted layout, current revision.
#[derive(Debug, Serialize)]
struct StateOut<'a> {
    version: u8,
    next_id: u64,
    tasks: &'a [Task],
}

/// Tolerant decode target for both current and legacy object layouts.
#[derive(Debug, Deserialize)]
struct StateIn {
    #[serde(default)]
    #[allow(dead_code)]
    version: u8,
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    tasks: Vec<RawTask>,
}

/// One task record as found on disk, fields optional so legacy and
/// hand-edited files decode.
#[derive(Debug, Deserialize)]
struct RawTask {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    due: Option<String>,
    /// Field name used by the oldest layout.
    #[serde(default)]
    due_time: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl RawTask {
    /// Normalize into a [`Task`], back-filling defaults. Returns the task
    /// and whether anything had to change.
    fn normalize(self, position: usize, now: NaiveDateTime) -> (Task, bool) {
        let mut changed = false;

        let id = match self.id {
            Some(id) => id,
            None => {
                changed = true;
                position as u64 + 1
            }
        };

        let due = match (self.due, self.due_time) {
            (Some(due), _) => due,
            (None, Some(legacy)) => {
                changed = true;
                legacy
            }
            (None, None) => {
                changed = true;
                now.format(crate::task::DUE_STORE_FORMAT).to_string()
            }
        };

        let priority = match self.priority {
            Some(p) => p,
            None => {
                changed = true;
                DEFAULT_PRIORITY.to_owned()
            }
        };

        let status = match self.status.as_deref() {
            Some("pending") => TaskStatus::Pending,
            Some("completed") => TaskStatus::Completed,
            _ => {
                changed = true;
                TaskStatus::Pending
            }
        };

        (
            Task {
                id,
                description: self.description,
                due,
                priority,
                status,
            },
            changed,
        )
    }
}

/// One identifier past the highest in use.
fn derive_next_id(tasks: &[Task]) -> u64 {
    tasks.iter().map(|t| t.id).max().map_or(1, |max| max + 1)
}

/// Decode store bytes, tolerating legacy layouts. Returns the set and
/// whether normalization changed anything (and the file should be
/// re-persisted).
fn decode_state(bytes: &[u8], now: NaiveDateTime) -> Result<(TaskSet, bool)> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| DonnaError::Store(format!("cannot parse task store: {e}")))?;

    match value {
        // Oldest layout: a bare array of records, no counter.
        serde_json::Value::Array(_) => {
            let records: Vec<RawTask> = serde_json::from_value(value)
                .map_err(|e| DonnaError::Store(format!("cannot decode task records: {e}")))?;
            let tasks: Vec<Task> = records
                .into_iter()
                .enumerate()
                .map(|(pos, raw)| raw.normalize(pos, now).0)
                .collect();
            let next_id = derive_next_id(&tasks);
            Ok((TaskSet { next_id, tasks }, true))
        }
        serde_json::Value::Object(_) => {
            let state: StateIn = serde_json::from_value(value)
                .map_err(|e| DonnaError::Store(format!("cannot decode task store: {e}")))?;
            let mut changed = false;
            let tasks: Vec<Task> = state
                .tasks
                .into_iter()
                .enumerate()
                .map(|(pos, raw)| {
                    let (task, task_changed) = raw.normalize(pos, now);
                    changed |= task_changed;
                    task
                })
                .collect();
            let next_id = if state.next_id == 0 {
                changed = true;
                derive_next_id(&tasks)
            } else {
                state.next_id
            };
            Ok((TaskSet { next_id, tasks }, changed))
        }
        other => Err(DonnaError::Store(format!(
            "unexpected task store layout: {other}"
        ))),
    }
}

/// Task collection persisted to a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    /// Create a store backed by `path`. Nothing is read until [`TaskStore::load`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStore for JsonTaskStore {
    fn load(&self) -> Result<TaskSet> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(TaskSet::default());
            }
            Err(e) => {
                return Err(DonnaError::Store(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )));
            }
        };

        let (set, migrated) = decode_state(&bytes, Local::now().naive_local())?;
        if migrated {
            // One-time upgrade pass: rewrite the normalized layout so the
            // next reader sees the current schema.
            info!("upgrading legacy task store layout at {}", self.path.display());
            self.save(&set)?;
        }
        Ok(set)
    }

    fn save(&self, set: &TaskSet) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                DonnaError::Store(format!("cannot create store dir {}: {e}", parent.display()))
            })?;
        }

        let state = StateOut {
            version: STORE_VERSION,
            next_id: set.next_id,
            tasks: &set.tasks,
        };
        let json = serde_json::to_string_pretty(&state)
            .map_err(|e| DonnaError::Store(format!("cannot serialize task store: {e}")))?;

        std::fs::write(&self.path, json).map_err(|e| {
            DonnaError::Store(format!("cannot write {}: {e}", self.path.display()))
        })
    }
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// In-memory task store for tests and ephemeral usage.
///
/// Cloning shares the underlying set, so a clone handed to the reminder
/// loop observes edits made through the original handle.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    inner: Arc<Mutex<TaskSet>>,
}

impl MemoryTaskStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryTaskStore {
    fn load(&self) -> Result<TaskSet> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| DonnaError::Store("task set lock poisoned".to_owned()))?;
        Ok(inner.clone())
    }

    fn save(&self, set: &TaskSet) -> Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| DonnaError::Store("task set lock poisoned".to_owned()))?;
        *inner = set.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 20)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn allocate_id_is_monotonic() {
        let mut set = TaskSet::default();
        assert_eq!(set.allocate_id(), 1);
        assert_eq!(set.allocate_id(), 2);
        assert_eq!(set.allocate_id(), 3);
    }

    #[test]
    fn removed_ids_are_not_reused() {
        let mut set = TaskSet::default();
        for _ in 0..3 {
            let id = set.allocate_id();
            set.tasks.push(Task::new(id, "t", noon(), "medium"));
        }
        assert!(set.remove(2).is_some());
        let next = set.allocate_id();
        assert_eq!(next, 4);
        assert!(set.find(2).is_none());
    }

    #[test]
    fn remove_unknown_id_is_none() {
        let mut set = TaskSet::default();
        assert!(set.remove(42).is_none());
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTaskStore::new();
        let mut set = TaskSet::default();
        let id = set.allocate_id();
        set.tasks.push(Task::new(id, "remember", noon(), "high"));
        store.save(&set).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, set);
    }

    #[test]
    fn memory_store_clone_shares_state() {
        let store = MemoryTaskStore::new();
        let clone = store.clone();
        let mut set = TaskSet::default();
        set.allocate_id();
        store.save(&set).unwrap();
        assert_eq!(clone.load().unwrap().next_id, 2);
    }

    #[test]
    fn json_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTaskStore::new(dir.path().join("tasks.json"));
        let set = store.load().unwrap();
        assert!(set.tasks.is_empty());
        assert_eq!(set.next_id, 0);
    }

    #[test]
    fn json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTaskStore::new(dir.path().join("tasks.json"));

        let mut set = TaskSet::default();
        let id = set.allocate_id();
        set.tasks.push(Task::new(id, "water plants", noon(), "low"));
        store.save(&set).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, set);
    }

    #[test]
    fn json_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTaskStore::new(dir.path().join("deep").join("tasks.json"));
        store.save(&TaskSet::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn json_store_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "not json {").unwrap();
        let store = JsonTaskStore::new(path);
        assert!(matches!(store.load(), Err(DonnaError::Store(_))));
    }

    #[test]
    fn decode_bare_array_backfills_and_flags_change() {
        let legacy = r#"[
            {"description": "old one", "due_time": "2025-05-20T09:00:00"},
            {"id": 5, "description": "new one", "due": "2025-05-21T09:00:00",
             "priority": "high", "status": "completed"}
        ]"#;
        let (set, changed) = decode_state(legacy.as_bytes(), noon()).unwrap();
        assert!(changed);
        assert_eq!(set.tasks.len(), 2);

        let first = &set.tasks[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.due, "2025-05-20T09:00:00");
        assert_eq!(first.priority, "medium");
        assert_eq!(first.status, TaskStatus::Pending);

        let second = &set.tasks[1];
        assert_eq!(second.id, 5);
        assert_eq!(second.status, TaskStatus::Completed);

        // Counter lands one past the highest id in use.
        assert_eq!(set.next_id, 6);
    }

    #[test]
    fn decode_missing_due_falls_back_to_capture_time() {
        let legacy = r#"[{"description": "no due at all"}]"#;
        let (set, changed) = decode_state(legacy.as_bytes(), noon()).unwrap();
        assert!(changed);
        assert_eq!(set.tasks[0].due, "2025-05-20T12:00:00");
    }

    #[test]
    fn decode_unknown_status_becomes_pending() {
        let legacy = r#"[{"description": "weird", "due": "2025-05-20T09:00:00",
                          "priority": "high", "status": "paused", "id": 1}]"#;
        let (set, changed) = decode_state(legacy.as_bytes(), noon()).unwrap();
        assert!(changed);
        assert_eq!(set.tasks[0].status, TaskStatus::Pending);
    }

    #[test]
    fn decode_current_layout_is_unchanged() {
        let current = r#"{
            "version": 1,
            "next_id": 9,
            "tasks": [{"id": 3, "description": "t", "due": "2025-05-20T09:00:00",
                       "priority": "medium", "status": "pending"}]
        }"#;
        let (set, changed) = decode_state(current.as_bytes(), noon()).unwrap();
        assert!(!changed);
        assert_eq!(set.next_id, 9);
        assert_eq!(set.tasks.len(), 1);
    }

    #[test]
    fn decode_object_without_counter_derives_it() {
        let partial = r#"{"tasks": [{"id": 4, "description": "t",
            "due": "2025-05-20T09:00:00", "priority": "medium", "status": "pending"}]}"#;
        let (set, changed) = decode_state(partial.as_bytes(), noon()).unwrap();
        assert!(changed);
        assert_eq!(set.next_id, 5);
    }

    #[test]
    fn decode_scalar_layout_is_an_error() {
        assert!(decode_state(b"42", noon()).is_err());
    }
}
