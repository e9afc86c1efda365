//! Error types for the donna task tracker.

/// Top-level error type for the task tracker.
#[derive(Debug, thiserror::Error)]
pub enum DonnaError {
    /// Task store read/write/decode error.
    #[error("store error: {0}")]
    Store(String),

    /// Notification delivery error.
    #[error("notify error: {0}")]
    Notify(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Operator command error.
    #[error("command error: {0}")]
    Command(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, DonnaError>;
