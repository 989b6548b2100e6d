// file: src/logging/logger.rs
// version: 1.0.0
// guid: e4b83d17-6a2c-4f95-8c0e-d5f1a7b2396e

//! Logger initialization
//!
//! Logs go to stderr so they never mix with the output of the commands
//! being run.

use crate::error::{Result, ShellError};
use std::io;
use tracing::Instrument;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Pick the filter from `RUST_LOG`, falling back to the verbosity flags
fn level_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    }
}

/// Initialize the logging system
pub fn init_logger(verbose: bool, quiet: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(level_filter(verbose, quiet))
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| ShellError::config(format!("Failed to initialize logger: {}", e)))?;

    Ok(())
}

/// Initialize structured JSON logging
pub fn init_json_logger(verbose: bool, quiet: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(level_filter(verbose, quiet))
        .with(fmt::layer().with_writer(io::stderr).json())
        .try_init()
        .map_err(|e| {
            ShellError::config(format!("Failed to initialize JSON logger: {}", e))
        })?;

    Ok(())
}

/// Run an async operation inside a named span
pub async fn with_async_operation_span<F, Fut, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = R>,
{
    let span = tracing::info_span!("operation", name = operation);
    async move { f().await }.instrument(span).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_twice_fails_gracefully() {
        // The global subscriber can only be set once per process, so the
        // second call must surface an error instead of panicking.
        let _ = init_logger(false, false);
        let second = init_logger(true, false);

        assert!(matches!(second, Err(ShellError::Config(_))));
    }

    #[test]
    fn test_init_json_logger_after_logger_fails() {
        let _ = init_logger(false, true);
        assert!(init_json_logger(false, false).is_err());
    }

    #[tokio::test]
    async fn test_with_async_operation_span() {
        // Arrange
        let operation = "async_test_operation";

        // Act
        let result = with_async_operation_span(operation, || async {
            tokio::task::yield_now().await;
            42
        })
        .await;

        // Assert
        assert_eq!(result, 42);
    }
}
