// file: src/main.rs
// version: 1.0.0
// guid: d3a0f7b6-1e48-4c29-9b5a-f6c82e03d4a7

//! extproc-shell - Main entry point

use clap::Parser;
use extproc_shell::{
    cli::{
        args::{status_policy, Cli, Commands},
        commands::*,
    },
    logging::{init_json_logger, init_logger, logger::with_async_operation_span},
    Config, ShellError,
};
use tokio::signal;
use tracing::{error, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.json_logs {
        init_json_logger(cli.verbose, cli.quiet)?;
    } else {
        init_logger(cli.verbose, cli.quiet)?;
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if cli.dry_run {
        config.general.dry_run = true;
    }

    let command_future = async {
        match cli.command {
            Commands::Sh { command } => {
                let command = command.join(" ");
                with_async_operation_span("sh", || sh_command(&config, &command)).await
            }
            Commands::Mailx {
                to,
                subject,
                message,
                quoting,
                suppress_status,
            } => {
                if let Some(quoting) = quoting {
                    config.mail.quoting = quoting.into();
                }
                if let Some(policy) = status_policy(suppress_status) {
                    config.mail.status_policy = policy;
                }
                with_async_operation_span("mailx", || {
                    mailx_command(&config, to, subject, message)
                })
                .await
            }
            Commands::Compose {
                to,
                subject,
                message,
                quoting,
            } => {
                if let Some(quoting) = quoting {
                    config.mail.quoting = quoting.into();
                }
                compose_command(&config, &to, &subject, &message)
            }
            Commands::Check => check_command(&config),
        }
    };

    // Run command with signal handling
    let result = tokio::select! {
        result = command_future => result,
        _ = signal::ctrl_c() => {
            warn!("Interrupted by user");
            std::process::exit(130); // Standard exit code for Ctrl+C
        }
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(ShellError::MailFailed { status }) => {
            error!("Mail command failed with exit status {}", status);
            std::process::exit(status);
        }
        Err(e) => Err(e.into()),
    }
}
