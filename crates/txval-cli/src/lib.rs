//! txval CLI library
//!
//! Thin client over the server's batch trigger surface: submit a validation
//! job, optionally watch it run, and inspect job status.

pub mod api;
pub mod commands;
pub mod error;

pub use error::{CliError, Result};

use clap::{Parser, Subcommand};

/// Default server URL when not specified via flag or environment.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Trigger and monitor transaction validation batch jobs
#[derive(Debug, Parser)]
#[command(name = "txval", version, about)]
pub struct Cli {
    /// Server URL (defaults to $TXVAL_SERVER_URL, then localhost)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Verbose console logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Resolve the server URL from flag, environment, or default.
    pub fn resolved_server_url(&self) -> String {
        self.server_url
            .clone()
            .or_else(|| std::env::var("TXVAL_SERVER_URL").ok())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a transaction validation job
    Start {
        /// Input file path override passed to the server
        #[arg(long)]
        input_file: Option<String>,

        /// Poll the job until it reaches a terminal state
        #[arg(long)]
        watch: bool,

        /// Poll interval in seconds while watching
        #[arg(long, default_value_t = 2)]
        interval: u64,
    },

    /// Show the status of a job
    Status {
        /// Job ID returned by `txval start`
        job_id: String,
    },
}
