// file: src/cli/commands.rs
// version: 1.0.0
// guid: 47a9c0e2-3b6f-4d18-a7c5-e0f28b94d13a

//! Command implementations for the CLI
//!
//! Each command returns the process exit code.

use crate::{
    config::{Config, QuotingPolicy, StatusPolicy},
    mail::MailNotifier,
    runner::CommandRunner,
    Result,
};
use std::io::Read;
use std::path::Path;
use tracing::{error, info, warn};

/// Run a command line and return its exit status
pub async fn sh_command(config: &Config, command: &str) -> Result<i32> {
    let runner = CommandRunner::from_config(config);
    runner.run_async(command).await
}

/// Send a mail notification and return the pipeline's exit status
pub async fn mailx_command(
    config: &Config,
    to: String,
    subject: String,
    message: Option<String>,
) -> Result<i32> {
    let message = match message {
        Some(message) => message,
        None => read_message_from_stdin()?,
    };

    let notifier = MailNotifier::from_config(config);
    info!(
        "Sending mail to {} via {} ({} quoting)",
        to,
        notifier.program(),
        notifier.quoting().as_str()
    );

    // The notifier blocks until the mail pipeline exits
    let status =
        tokio::task::spawn_blocking(move || notifier.send(&to, &subject, &message)).await??;

    if config.mail.status_policy == StatusPolicy::Suppress {
        return Ok(0);
    }
    Ok(status)
}

/// Print the composed mail command line
pub fn compose_command(config: &Config, to: &str, subject: &str, message: &str) -> Result<i32> {
    let notifier = MailNotifier::from_config(config);
    let line = notifier.compose(to, subject, message)?;

    if notifier.quoting() == QuotingPolicy::Direct {
        info!("Direct quoting bypasses the shell; this line is shown for reference only");
    }
    println!("{}", line);
    Ok(0)
}

/// Report whether the configured shell and mail program are usable
pub fn check_command(config: &Config) -> Result<i32> {
    let notifier = MailNotifier::from_config(config);
    let shell_ok = program_exists(&config.general.shell);
    let mail_ok = notifier.program_available();

    println!(
        "shell  {:<24} {}",
        config.general.shell,
        if shell_ok { "found" } else { "MISSING" }
    );
    println!(
        "mail   {:<24} {}",
        notifier.program(),
        if mail_ok { "found" } else { "MISSING" }
    );

    if shell_ok && mail_ok {
        info!("All prerequisites satisfied");
        Ok(0)
    } else {
        if !shell_ok {
            error!("Shell not found: {}", config.general.shell);
        }
        if !mail_ok {
            warn!("Mail program not found on PATH: {}", notifier.program());
        }
        Ok(1)
    }
}

fn program_exists(program: &str) -> bool {
    if program.contains('/') {
        Path::new(program).is_file()
    } else {
        which::which(program).is_ok()
    }
}

fn read_message_from_stdin() -> Result<String> {
    let mut message = String::new();
    std::io::stdin().read_to_string(&mut message)?;

    // echo adds its own newline
    if message.ends_with('\n') {
        message.pop();
    }
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;

    #[tokio::test]
    async fn test_sh_command_status() {
        let config = Config::default();
        assert_eq!(sh_command(&config, "exit 0").await.unwrap(), 0);
        assert_eq!(sh_command(&config, "exit 6").await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_mailx_command_propagates_failure() {
        // Arrange
        let mut config = Config::default();
        config.mail.program = "definitely-not-a-mailer-4d1f".to_string();

        // Act
        let result = mailx_command(
            &config,
            "alice@example.com".to_string(),
            "status".to_string(),
            Some("ok".to_string()),
        )
        .await;

        // Assert
        assert!(matches!(result, Err(ShellError::MailFailed { status: 127 })));
    }

    #[tokio::test]
    async fn test_mailx_command_suppressed_exits_zero() {
        let mut config = Config::default();
        config.mail.program = "definitely-not-a-mailer-4d1f".to_string();
        config.mail.status_policy = StatusPolicy::Suppress;

        let status = mailx_command(
            &config,
            "alice@example.com".to_string(),
            "status".to_string(),
            Some("ok".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(status, 0);
    }

    #[test]
    fn test_compose_command_rejects_unsafe_input() {
        let config = Config::default();
        let result = compose_command(&config, "alice@example.com", "status", "`id`");
        assert!(matches!(result, Err(ShellError::UnsafeInput { .. })));
    }

    #[test]
    fn test_check_command_missing_mailer() {
        let mut config = Config::default();
        config.mail.program = "definitely-not-a-mailer-4d1f".to_string();
        assert_eq!(check_command(&config).unwrap(), 1);
    }

    #[test]
    fn test_program_exists() {
        assert!(program_exists("/bin/sh"));
        assert!(program_exists("sh"));
        assert!(!program_exists("/nonexistent/bin/sh"));
    }
}
