//! Donna: a personal task tracker with background reminders.
//!
//! Two halves share one persisted task collection and nothing else:
//!
//! - the **command interface** (add / list / complete / delete), a line-based
//!   REPL running on the foreground task, and
//! - the **reminder loop**, a spawned background task that re-reads the
//!   store every cycle, notifies each pending task whose due time has
//!   passed, marks it completed, writes the collection back, then sleeps
//!   until the nearest future due time (never longer than 60 seconds).
//!
//! The store file is the single source of truth. There is no in-memory
//! shared task list, no locking, and no merge: both sides load the whole
//! collection, mutate it, and save the whole collection. Concurrent saves
//! race and the later writer wins entirely.

pub mod commands;
pub mod config;
pub mod error;
pub mod notify;
pub mod personality;
pub mod reminder;
pub mod store;
pub mod task;

pub use config::DonnaConfig;
pub use error::{DonnaError, Result};
pub use notify::{ChannelNotifier, Notification, Notifier};
pub use reminder::ReminderService;
pub use store::{JsonTaskStore, MemoryTaskStore, TaskSet, TaskStore};
pub use task::{Task, TaskStatus};
