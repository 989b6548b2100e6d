// file: src/extproc.rs
// version: 1.0.0
// guid: 9d4f61c8-0b3e-47a5-b9e2-7c1a58d06f3b

//! Flat entry points in the shape of database external-procedure
//! callbacks: strings in, one integer status out.
//!
//! Each call reads the configuration from the environment (no files), so a
//! host process can steer the shell and mail program with `EXTPROC_*`
//! variables. Every failure collapses into the returned integer.

use crate::config::Config;
use crate::error::Result;
use crate::mail::MailNotifier;
use crate::runner::{CommandRunner, SPAWN_FAILURE_STATUS};
use tracing::error;

/// Run a command line through the configured shell
pub fn sh(command: &str) -> i32 {
    match Config::from_env() {
        Ok(config) => sh_with(&config, command),
        Err(e) => {
            error!("{}", e);
            SPAWN_FAILURE_STATUS
        }
    }
}

/// Send `message` to `to` with the given subject
pub fn mailx(to: &str, subject: &str, message: &str) -> i32 {
    match Config::from_env() {
        Ok(config) => mailx_with(&config, to, subject, message),
        Err(e) => {
            error!("{}", e);
            SPAWN_FAILURE_STATUS
        }
    }
}

/// [`sh`] against an explicit configuration
pub fn sh_with(config: &Config, command: &str) -> i32 {
    CommandRunner::from_config(config).status(command)
}

/// [`mailx`] against an explicit configuration
pub fn mailx_with(config: &Config, to: &str, subject: &str, message: &str) -> i32 {
    flatten(MailNotifier::from_config(config).send(to, subject, message))
}

fn flatten(result: Result<i32>) -> i32 {
    match result {
        Ok(status) => status,
        Err(e) => {
            error!("{}", e);
            e.status()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{QuotingPolicy, StatusPolicy};

    #[test]
    fn test_sh_with_returns_status() {
        let config = Config::default();
        assert_eq!(sh_with(&config, "exit 0"), 0);
        assert_eq!(sh_with(&config, "exit 12"), 12);
    }

    #[test]
    fn test_sh_with_missing_shell() {
        let mut config = Config::default();
        config.general.shell = "/nonexistent/bin/sh".to_string();
        assert_eq!(sh_with(&config, "true"), SPAWN_FAILURE_STATUS);
    }

    #[test]
    fn test_mailx_with_rejected_input() {
        let config = Config::default();
        assert_eq!(
            mailx_with(&config, "alice@example.com", "status", "say \"hi\""),
            SPAWN_FAILURE_STATUS
        );
    }

    #[test]
    fn test_mailx_with_reports_failure_status() {
        // Arrange
        let mut config = Config::default();
        config.mail.program = "definitely-not-a-mailer-4d1f".to_string();

        // Act
        let propagated = mailx_with(&config, "alice@example.com", "status", "ok");
        config.mail.status_policy = StatusPolicy::Suppress;
        let suppressed = mailx_with(&config, "alice@example.com", "status", "ok");

        // Assert
        assert_eq!(propagated, 127);
        assert_eq!(suppressed, 127);
    }

    #[test]
    fn test_mailx_with_dry_run() {
        let mut config = Config::default();
        config.general.dry_run = true;
        config.mail.quoting = QuotingPolicy::Legacy;
        assert_eq!(mailx_with(&config, "alice@example.com", "s", "m"), 0);
    }
}
