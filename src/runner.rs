// file: src/runner.rs
// version: 1.0.0
// guid: c2d7a95e-6f18-4e3b-b0c4-9a5e1f7d3b62

//! Command Runner: hand a command line to the host command interpreter
//!
//! Output is never captured. The child's stdin, stdout and stderr are the
//! caller's own, and the call blocks until the interpreter exits.

use crate::config::Config;
use crate::error::{Result, ShellError};
use std::io::Write;
use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::{debug, info, warn};

/// Default command interpreter
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Status reported by the flat API when no child could be started
pub const SPAWN_FAILURE_STATUS: i32 = -1;

/// Runs command lines through `<shell> -c`
#[derive(Debug, Clone)]
pub struct CommandRunner {
    shell: String,
    dry_run: bool,
}

impl CommandRunner {
    /// Create a runner for the given interpreter
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
            dry_run: false,
        }
    }

    /// Create a runner from the `[general]` section of a configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            shell: config.general.shell.clone(),
            dry_run: config.general.dry_run,
        }
    }

    /// Log commands instead of running them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Execute a command line and return the interpreter's exit status.
    ///
    /// The only error is failing to start the interpreter itself; every
    /// outcome of the command, including "command not found", is a status.
    pub fn run(&self, command: &str) -> Result<i32> {
        debug!("Executing shell command: {}", command);

        if self.dry_run {
            info!("DRY RUN: Would execute: {} -c {}", self.shell, command);
            return Ok(0);
        }

        let status = self
            .shell_command(command)
            .status()
            .map_err(|e| ShellError::spawn(command, e))?;

        Ok(self.report(command, status))
    }

    /// Same as [`run`](Self::run) with every failure collapsed into one integer
    pub fn status(&self, command: &str) -> i32 {
        match self.run(command) {
            Ok(status) => status,
            Err(e) => {
                warn!("{}", e);
                SPAWN_FAILURE_STATUS
            }
        }
    }

    /// Execute a command line with `input` written to its standard input
    pub fn run_with_input(&self, command: &str, input: &[u8]) -> Result<i32> {
        debug!("Executing shell command with {} bytes of input: {}", input.len(), command);

        if self.dry_run {
            info!("DRY RUN: Would execute: {} -c {}", self.shell, command);
            return Ok(0);
        }

        let mut cmd = self.shell_command(command);
        self.feed(command, &mut cmd, input)
    }

    /// Invoke a program directly with an argument list, no shell involved
    pub fn run_program(&self, program: &str, args: &[&str], input: Option<&[u8]>) -> Result<i32> {
        let label = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        debug!("Executing program: {}", label);

        if self.dry_run {
            info!("DRY RUN: Would execute: {:?} {:?}", program, args);
            return Ok(0);
        }

        let mut cmd = Command::new(program);
        cmd.args(args);

        match input {
            Some(input) => self.feed(&label, &mut cmd, input),
            None => {
                let status = cmd.status().map_err(|e| ShellError::spawn(&label, e))?;
                Ok(self.report(&label, status))
            }
        }
    }

    /// Async variant of [`run`](Self::run) for callers inside a tokio runtime
    pub async fn run_async(&self, command: &str) -> Result<i32> {
        debug!("Executing shell command: {}", command);

        if self.dry_run {
            info!("DRY RUN: Would execute: {} -c {}", self.shell, command);
            return Ok(0);
        }

        let status = tokio::process::Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| ShellError::spawn(command, e))?;

        Ok(self.report(command, status))
    }

    fn shell_command(&self, command: &str) -> Command {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }

    fn feed(&self, label: &str, cmd: &mut Command, input: &[u8]) -> Result<i32> {
        let mut child = cmd
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| ShellError::spawn(label, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A child that exits without reading its input is not an error here
            match stdin.write_all(input) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!("Child closed stdin early: {}", label);
                }
                Err(e) => {
                    warn!("Failed to write input to '{}': {}", label, e);
                    drop(stdin);
                    reap(&mut child);
                    return Err(e.into());
                }
            }
        }

        let status = child.wait()?;
        Ok(self.report(label, status))
    }

    fn report(&self, command: &str, status: ExitStatus) -> i32 {
        let code = exit_status_code(status);
        if code == 0 {
            info!("Command completed successfully");
        } else {
            warn!("Command '{}' exited with status {}", command, code);
        }
        code
    }
}

/// Kill and wait on a child that is being abandoned so it does not linger
/// as a zombie
fn reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!("Child already exited: {}", e);
    }
    if let Err(e) = child.wait() {
        warn!("Failed to wait on child: {}", e);
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

/// Convert an exit status into the integer a shell would report
pub fn exit_status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    SPAWN_FAILURE_STATUS
}
