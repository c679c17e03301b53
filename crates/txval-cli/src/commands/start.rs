//! `txval start` command implementation
//!
//! Submits a validation job; with `--watch`, polls the status endpoint until
//! the job reaches a terminal state.

use colored::Colorize;
use std::time::Duration;
use tracing::debug;

use super::{paint_status, print_projection};
use crate::api::ApiClient;
use crate::error::{CliError, Result};

/// Submit a job, optionally watching it to completion
pub async fn run(
    server_url: String,
    input_file: Option<String>,
    watch: bool,
    interval_secs: u64,
) -> Result<()> {
    let client = ApiClient::new(server_url)?;

    let started = client.start_job(input_file.as_deref()).await?;

    println!("{}", "Job submitted".green().bold());
    println!("  ID:      {}", started.job_id);
    println!("  Status:  {}", paint_status(&started.status));
    println!("  Input:   {}", started.input_file);
    println!("  Started: {}", started.start_time);

    if !watch {
        println!();
        println!("Poll with: txval status {}", started.job_id);
        return Ok(());
    }

    let interval = Duration::from_secs(interval_secs.max(1));
    loop {
        let projection = client.job_status(started.job_id).await?;
        debug!(status = %projection.status, "polled job");

        println!(
            "  {}  partitions {}/{} done, read={} written={}",
            paint_status(&projection.status),
            projection.aggregate.completed + projection.aggregate.failed,
            projection.aggregate.total_partitions,
            projection.aggregate.total_read,
            projection.aggregate.total_written,
        );

        if projection.is_terminal() {
            println!();
            print_projection(&projection);
            if projection.status == "FAILED" {
                return Err(CliError::JobFailed {
                    job_id: started.job_id.to_string(),
                });
            }
            return Ok(());
        }

        tokio::time::sleep(interval).await;
    }
}
