//! Background reminder delivery.
//!
//! Watches the persisted task collection and guarantees every pending task
//! whose due time passes receives exactly one notification, after which it
//! is marked completed. Polls with a bounded sleep rather than an
//! event-driven wake: the loop sleeps until the nearest future due time,
//! never longer than the 60-second ceiling, so tasks added mid-sleep are
//! picked up within one ceiling interval.

pub mod due;
pub mod runner;

pub use due::{DEFAULT_POLL_CEILING, DueSplit, sleep_interval, split_due};
pub use runner::ReminderService;
