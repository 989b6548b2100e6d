// file: src/lib.rs
// version: 1.0.0
// guid: 6c1d8f3b-e920-4a57-b4d6-0a7e5c29f81b

//! # extproc-shell
//!
//! Runs operating-system shell commands and sends mail notifications on
//! behalf of an external caller, typically a database external-procedure
//! mechanism.
//!
//! - [`runner::CommandRunner`] hands a command line to `<shell> -c` and
//!   returns the exit status.
//! - [`mail::MailNotifier`] composes `echo "<message>" | mailx -s "<subject>" <to>`
//!   and runs it through the runner.
//! - [`extproc`] and [`ffi`] expose both as flat `sh` / `mailx` entry points.

pub mod cli;
pub mod config;
pub mod error;
pub mod extproc;
pub mod ffi;
pub mod logging;
pub mod mail;
pub mod runner;

pub use config::{Config, QuotingPolicy, StatusPolicy};
pub use error::{Result, ShellError};
pub use mail::MailNotifier;
pub use runner::CommandRunner;

/// Version information for the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
