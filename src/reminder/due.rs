//! Due-set and sleep-interval computation.

use crate::task::Task;
use chrono::NaiveDateTime;
use std::time::Duration;
use tracing::warn;

/// Longest the reminder loop will sleep between due checks.
pub const DEFAULT_POLL_CEILING: Duration = Duration::from_secs(60);

/// Outcome of partitioning a task slice at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueSplit {
    /// Indices of pending tasks whose due time has passed.
    pub due: Vec<usize>,
    /// Time remaining until the nearest pending future task, if any.
    pub next_due_in: Option<Duration>,
}

/// Partition pending tasks into due (due time at or before `now`) and
/// future, reporting the nearest future gap.
///
/// Completed tasks are ignored. A pending task whose due string does not
/// parse is skipped with a warning and left untouched; it belongs to
/// neither set.
pub fn split_due(tasks: &[Task], now: NaiveDateTime) -> DueSplit {
    let mut split = DueSplit::default();

    for (idx, task) in tasks.iter().enumerate() {
        if !task.is_pending() {
            continue;
        }
        let due_at = match task.due_at() {
            Ok(at) => at,
            Err(e) => {
                warn!("skipping task {} with unreadable due time: {e}", task.id);
                continue;
            }
        };

        if due_at <= now {
            split.due.push(idx);
        } else {
            let remaining = (due_at - now).to_std().unwrap_or(Duration::ZERO);
            split.next_due_in = Some(match split.next_due_in {
                Some(nearest) => nearest.min(remaining),
                None => remaining,
            });
        }
    }

    split
}

/// Sleep until the nearest future due time, never longer than `ceiling`.
/// With no future task in sight, sleep exactly `ceiling`.
pub fn sleep_interval(next_due_in: Option<Duration>, ceiling: Duration) -> Duration {
    match next_due_in {
        Some(gap) => gap.min(ceiling),
        None => ceiling,
    }
}
