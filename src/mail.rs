// file: src/mail.rs
// version: 1.0.0
// guid: 5e08b3f4-9a21-4c6d-8d7f-2b6c1e4a90d5

//! Mail Notifier
//!
//! Builds `echo "<message>" | mailx -s "<subject>" <to>` and hands it to the
//! [`CommandRunner`]. The [`QuotingPolicy`] decides what happens to input the
//! double-quote wrapping cannot hold, and the [`StatusPolicy`] decides whether
//! a failing pipeline is reported to the caller.

use crate::config::{Config, QuotingPolicy, StatusPolicy};
use crate::error::{Result, ShellError};
use crate::runner::CommandRunner;
use regex::Regex;
use tracing::{debug, info, warn};

/// Default mail-sending program, looked up on `PATH`
pub const DEFAULT_MAIL_PROGRAM: &str = "mailx";

/// Characters that keep a special meaning inside double quotes
const DOUBLE_QUOTE_SPECIALS: [char; 4] = ['"', '\\', '$', '`'];

/// Sends a message body to a recipient through the mail command
#[derive(Debug, Clone)]
pub struct MailNotifier {
    runner: CommandRunner,
    program: String,
    quoting: QuotingPolicy,
    status_policy: StatusPolicy,
}

impl MailNotifier {
    /// Create a notifier with the default program and policies
    pub fn new(runner: CommandRunner) -> Self {
        Self {
            runner,
            program: DEFAULT_MAIL_PROGRAM.to_string(),
            quoting: QuotingPolicy::Strict,
            status_policy: StatusPolicy::Propagate,
        }
    }

    /// Create a notifier from a full configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            runner: CommandRunner::from_config(config),
            program: config.mail.program.clone(),
            quoting: config.mail.quoting,
            status_policy: config.mail.status_policy,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_quoting(mut self, quoting: QuotingPolicy) -> Self {
        self.quoting = quoting;
        self
    }

    pub fn with_status_policy(mut self, status_policy: StatusPolicy) -> Self {
        self.status_policy = status_policy;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn quoting(&self) -> QuotingPolicy {
        self.quoting
    }

    pub fn status_policy(&self) -> StatusPolicy {
        self.status_policy
    }

    /// Whether the mail program resolves on `PATH`
    pub fn program_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    /// Compose the shell pipeline that delivers `message` to `to`.
    ///
    /// Under [`QuotingPolicy::Strict`] input that would escape the double
    /// quotes is rejected; the other policies render it verbatim.
    pub fn compose(&self, to: &str, subject: &str, message: &str) -> Result<String> {
        if self.quoting == QuotingPolicy::Strict {
            check_quotable("message", message)?;
            check_quotable("subject", subject)?;
            check_recipient(to)?;
        }

        Ok(format!(
            "echo \"{}\" | {} -s \"{}\" {}",
            message, self.program, subject, to
        ))
    }

    /// Send the message and return the pipeline's exit status
    pub fn send(&self, to: &str, subject: &str, message: &str) -> Result<i32> {
        let status = match self.quoting {
            QuotingPolicy::Direct => self.send_direct(to, subject, message)?,
            QuotingPolicy::Strict | QuotingPolicy::Legacy => {
                let command = self.compose(to, subject, message)?;
                debug!("Composed mail command: {}", command);
                self.runner.run(&command)?
            }
        };

        if status == 0 {
            info!("Mail to {} sent", to);
            return Ok(status);
        }

        match self.status_policy {
            StatusPolicy::Propagate => Err(ShellError::MailFailed { status }),
            StatusPolicy::Suppress => {
                warn!(
                    "Mail to {} failed with status {} (suppressed)",
                    to, status
                );
                Ok(status)
            }
        }
    }

    fn send_direct(&self, to: &str, subject: &str, message: &str) -> Result<i32> {
        if to.is_empty() {
            return Err(ShellError::unsafe_input("recipient", "is empty"));
        }
        if to.starts_with('-') {
            return Err(ShellError::unsafe_input(
                "recipient",
                format!("'{}' would be read as an option", to),
            ));
        }

        // echo terminates the body with a newline
        let body = format!("{}\n", message);
        self.runner
            .run_program(&self.program, &["-s", subject, to], Some(body.as_bytes()))
    }
}

fn check_quotable(field: &'static str, value: &str) -> Result<()> {
    match value.chars().find(|c| DOUBLE_QUOTE_SPECIALS.contains(c)) {
        Some(c) => Err(ShellError::unsafe_input(
            field,
            format!("contains '{}' which breaks double-quote wrapping", c),
        )),
        None => Ok(()),
    }
}

fn check_recipient(to: &str) -> Result<()> {
    if to.is_empty() {
        return Err(ShellError::unsafe_input("recipient", "is empty"));
    }
    if to.starts_with('-') {
        return Err(ShellError::unsafe_input(
            "recipient",
            format!("'{}' would be read as an option", to),
        ));
    }
    let pattern = Regex::new(r"^[A-Za-z0-9._%+,@=-]+$")
        .map_err(|e| ShellError::config(format!("Regex error: {}", e)))?;
    if !pattern.is_match(to) {
        return Err(ShellError::unsafe_input(
            "recipient",
            format!("'{}' contains whitespace or shell metacharacters", to),
        ));
    }
    Ok(())
}
