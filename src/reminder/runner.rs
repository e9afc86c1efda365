//! Reminder loop.
//!
//! Spawns a tokio task that re-reads the task store every cycle, delivers a
//! notification for each due pending task, marks delivered tasks completed,
//! writes the whole collection back, and sleeps until the next check. No
//! failure inside a cycle escapes the loop; everything is logged and the
//! next cycle starts fresh from disk.

use crate::notify::{Notification, Notifier};
use crate::reminder::due::{DEFAULT_POLL_CEILING, sleep_interval, split_due};
use crate::store::TaskStore;
use crate::task::TaskStatus;
use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Title used for every reminder notification.
const REMINDER_TITLE: &str = "DONNA";

/// Background reminder delivery service.
///
/// Holds no task state of its own: every cycle starts from a fresh store
/// read, so edits made by the command interface between cycles are always
/// observed. The flip side is the documented last-writer-wins race: an edit
/// that lands between this loop's load and save is overwritten.
pub struct ReminderService {
    store: Arc<dyn TaskStore>,
    notifier: Arc<dyn Notifier>,
    ceiling: Duration,
    toast_duration_secs: u32,
    cancel: CancellationToken,
}

impl ReminderService {
    /// Create a service over the given store and notifier.
    pub fn new(store: Arc<dyn TaskStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            notifier,
            ceiling: DEFAULT_POLL_CEILING,
            toast_duration_secs: 10,
            cancel: CancellationToken::new(),
        }
    }

    /// Override the maximum sleep between due checks.
    pub fn with_ceiling(mut self, ceiling: Duration) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// Override the display-duration hint sent with each notification.
    pub fn with_toast_duration(mut self, secs: u32) -> Self {
        self.toast_duration_secs = secs;
        self
    }

    /// Token that stops the loop when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Start the background loop. The returned handle completes once the
    /// cancellation token fires.
    pub fn run(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!("reminder loop started");
            loop {
                let sleep_for = self.run_cycle(Local::now().naive_local());
                tokio::select! {
                    () = self.cancel.cancelled() => {
                        info!("reminder loop stopped");
                        return;
                    }
                    () = tokio::time::sleep(sleep_for) => {}
                }
            }
        })
    }

    /// Execute one fetch, deliver, persist cycle as of `now`; returns how
    /// long to sleep before the next one.
    pub fn run_cycle(&self, now: NaiveDateTime) -> Duration {
        let mut set = match self.store.load() {
            Ok(set) => set,
            Err(e) => {
                // Unreadable store (not merely missing): run the cycle as
                // empty but skip the persist, so a transient read failure
                // cannot replace the collection with nothing.
                warn!("cannot load task store, treating cycle as empty: {e}");
                return self.ceiling;
            }
        };

        let split = split_due(&set.tasks, now);

        for idx in &split.due {
            let task = &mut set.tasks[*idx];
            let note = Notification {
                title: REMINDER_TITLE.to_owned(),
                body: format!("Reminder: {}", task.description),
                duration_secs: self.toast_duration_secs,
            };
            match self.notifier.notify(&note) {
                Ok(()) => {
                    task.status = TaskStatus::Completed;
                    debug!("reminder delivered for task {}", task.id);
                }
                Err(e) => {
                    // Leave the task pending; the next cycle retries.
                    warn!("reminder delivery failed for task {}: {e}", task.id);
                }
            }
        }

        // Whole-collection write-back every cycle, changed or not.
        if let Err(e) = self.store.save(&set) {
            error!("cannot persist task collection: {e}");
        }

        sleep_interval(split.next_due_in, self.ceiling)
    }
}
