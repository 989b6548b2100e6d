// file: src/error.rs
// version: 1.0.0
// guid: 3f9c2a71-5d4e-4b8a-9e61-0c7d2b5a8f14

use thiserror::Error;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, ShellError>;

/// Error types for shell execution and mail notification
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsafe {field}: {reason}")]
    UnsafeInput { field: &'static str, reason: String },

    #[error("Mail command failed with exit status {status}")]
    MailFailed { status: i32 },

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for ShellError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::task(err.to_string())
    }
}

impl ShellError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new spawn error for the given command line
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Create a new unsafe input error
    pub fn unsafe_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::UnsafeInput {
            field,
            reason: reason.into(),
        }
    }

    /// Create a new background task error
    pub fn task(msg: impl Into<String>) -> Self {
        Self::Task(msg.into())
    }

    /// Collapse the error into the flat integer status used by the
    /// external-procedure entry points.
    pub fn status(&self) -> i32 {
        match self {
            Self::MailFailed { status } => *status,
            _ => -1,
        }
    }
}
