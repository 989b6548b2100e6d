// file: src/cli/args.rs
// version: 1.0.0
// guid: b58e1c3a-7d94-4a02-8f6b-19c3e5d7a0f4

//! Command line argument definitions

use crate::config::{QuotingPolicy, StatusPolicy};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "extproc-shell")]
#[command(about = "Run shell commands and send mail notifications")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, global = true, help = "Log commands instead of running them")]
    pub dry_run: bool,

    #[arg(short, long, global = true, env = "EXTPROC_CONFIG", help = "Extra configuration file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a command line through the shell and exit with its status
    Sh {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Send a message through the mail command
    Mailx {
        #[arg(short, long)]
        to: String,

        #[arg(short, long)]
        subject: String,

        #[arg(short, long, help = "Message body; read from stdin when omitted")]
        message: Option<String>,

        #[arg(long, value_enum)]
        quoting: Option<QuotingArg>,

        #[arg(long, help = "Exit 0 even when the mail command fails")]
        suppress_status: bool,
    },

    /// Print the mail command line without running it
    Compose {
        #[arg(short, long)]
        to: String,

        #[arg(short, long)]
        subject: String,

        #[arg(short, long, default_value = "")]
        message: String,

        #[arg(long, value_enum)]
        quoting: Option<QuotingArg>,
    },

    /// Check that the shell and the mail program are available
    Check,
}

/// Quoting policy argument for CLI
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum QuotingArg {
    Strict,
    Legacy,
    Direct,
}

impl From<QuotingArg> for QuotingPolicy {
    fn from(arg: QuotingArg) -> Self {
        match arg {
            QuotingArg::Strict => QuotingPolicy::Strict,
            QuotingArg::Legacy => QuotingPolicy::Legacy,
            QuotingArg::Direct => QuotingPolicy::Direct,
        }
    }
}

/// Status policy selected by `--suppress-status`
pub fn status_policy(suppress_status: bool) -> Option<StatusPolicy> {
    suppress_status.then_some(StatusPolicy::Suppress)
}
