//! Notification delivery seam.
//!
//! The reminder loop only ever talks to a [`Notifier`]; what actually shows
//! the message (terminal, desktop toast, a GUI draining a channel) lives on
//! the other side of the trait. [`ChannelNotifier`] forwards notifications
//! over an unbounded channel for a frontend to drain; [`RecordingNotifier`]
//! collects them for tests.

use crate::error::{DonnaError, Result};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// A single reminder message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short title, shown as the toast/window heading.
    pub title: String,
    /// Message body.
    pub body: String,
    /// How long the message should stay visible, in seconds. A hint only;
    /// backends may ignore it.
    pub duration_secs: u32,
}

/// Delivery backend for reminder messages.
///
/// One call per due task per cycle. Implementations are expected to return
/// promptly; the reminder loop performs no per-call timeout.
pub trait Notifier: Send + Sync {
    /// Deliver a single notification.
    fn notify(&self, note: &Notification) -> Result<()>;
}

/// Forwards notifications over an unbounded channel.
///
/// The receiving side decides presentation. Delivery fails once the
/// receiver is dropped, which the reminder loop treats like any other
/// notifier failure: the task stays pending and is retried next cycle.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier sending into `tx`.
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, note: &Notification) -> Result<()> {
        self.tx
            .send(note.clone())
            .map_err(|_| DonnaError::Notify("notification channel closed".to_owned()))
    }
}

/// Records every notification it is asked to deliver.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Create a new empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, in order.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, note: &Notification) -> Result<()> {
        self.sent
            .lock()
            .map_err(|_| DonnaError::Notify("recorder lock poisoned".to_owned()))?
            .push(note.clone());
        Ok(())
    }
}
