//! txval CLI - Main entry point

use clap::Parser;
use std::process;
use tracing::error;
use txval_cli::{Cli, Commands};
use txval_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let Some(ref _command) = cli.command else {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    };

    let log_config = LogConfig::builder()
        .level(if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        })
        .output(LogOutput::Console)
        .log_file_prefix("txval-cli".to_string())
        .build();

    // Environment variables take precedence over the flag-derived defaults
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    // The CLI stays usable even when logging cannot initialise
    let _ = init_logging(&log_config);

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> txval_cli::Result<()> {
    let server_url = cli.resolved_server_url();

    // Command presence was validated in main
    let Some(ref command) = cli.command else {
        unreachable!("command checked in main");
    };

    match command {
        Commands::Start {
            input_file,
            watch,
            interval,
        } => {
            txval_cli::commands::start::run(server_url, input_file.clone(), *watch, *interval)
                .await
        }

        Commands::Status { job_id } => {
            txval_cli::commands::status::run(server_url, job_id).await
        }
    }
}
