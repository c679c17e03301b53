//! Job coordinator
//!
//! Drives one run of the validation job: count the input's data lines, ask
//! the partitioner for ranges, fan one worker task out per partition, wait
//! for all of them, and fold the step results into the job's terminal
//! status. Step failures never abort siblings; the job is completed only
//! when every step completed.

use anyhow::{Context, Result};
use chrono::Utc;
use futures::future::join_all;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use txval_common::TxvalError;

use super::partition::partition_lines;
use super::worker::PartitionWorker;
use crate::jobs::{JobId, JobParameters, JobRepository, JobStatus, StepStatus};
use crate::validate::RecordValidator;

/// Name under which every run is registered.
pub const JOB_NAME: &str = "transactionValidationJob";

/// Batch shape of one job run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    pub chunk_size: usize,
    pub grid_size: usize,
}

/// Launches jobs and owns the fan-out across partition workers.
#[derive(Clone)]
pub struct JobCoordinator {
    options: BatchOptions,
    validator: Arc<RecordValidator>,
    repository: JobRepository,
}

impl JobCoordinator {
    pub fn new(
        options: BatchOptions,
        validator: Arc<RecordValidator>,
        repository: JobRepository,
    ) -> Self {
        Self {
            options,
            validator,
            repository,
        }
    }

    /// Register a job and run it on a background task.
    ///
    /// Returns as soon as the job exists in `Starting` state; callers poll
    /// the status projection for progress.
    pub fn start_job(&self, input_override: Option<PathBuf>) -> JobId {
        let input_file = input_override.unwrap_or_else(|| self.options.input_file.clone());
        let job_id = self.repository.create_job(
            JOB_NAME,
            JobParameters {
                input_file: input_file.clone(),
                started_at: Utc::now(),
            },
        );

        info!(job_id = %job_id, input_file = %input_file.display(), "job accepted");

        let coordinator = self.clone();
        tokio::spawn(async move {
            coordinator.execute(job_id, input_file).await;
        });

        job_id
    }

    /// Run a job to its terminal state, updating the store as it goes.
    pub async fn execute(&self, job_id: JobId, input_file: PathBuf) {
        self.repository.mark_job_started(job_id);

        let status = match self.run_partitions(job_id, input_file).await {
            Ok(status) => status,
            Err(error) => {
                error!(job_id = %job_id, error = %format!("{error:#}"), "job failed before fan-out");
                JobStatus::Failed
            }
        };

        self.repository.finish_job(job_id, status);
        info!(job_id = %job_id, status = status.as_str(), "job finished");
    }

    async fn run_partitions(&self, job_id: JobId, input_file: PathBuf) -> Result<JobStatus> {
        let counted_path = input_file.clone();
        let total_data_lines = tokio::task::spawn_blocking(move || count_data_lines(&counted_path))
            .await
            .context("line counting task panicked")?
            .map_err(|error| {
                TxvalError::input_file(input_file.display().to_string(), error.to_string())
            })?;

        let partitions = partition_lines(total_data_lines, self.options.grid_size);
        info!(
            job_id = %job_id,
            total_data_lines,
            partitions = partitions.len(),
            grid_size = self.options.grid_size,
            "dispatching partition workers"
        );

        let workers = partitions.into_iter().map(|partition| {
            let worker = PartitionWorker::new(
                partition,
                input_file.clone(),
                self.options.output_dir.clone(),
                self.options.chunk_size,
                Arc::clone(&self.validator),
                self.repository.clone(),
                job_id,
            );
            tokio::spawn(worker.run())
        });

        let mut all_completed = true;
        for outcome in join_all(workers).await {
            match outcome {
                Ok(StepStatus::Completed) => {}
                Ok(_) => all_completed = false,
                Err(join_error) => {
                    error!(job_id = %job_id, %join_error, "partition worker panicked");
                    all_completed = false;
                }
            }
        }

        Ok(if all_completed {
            JobStatus::Completed
        } else {
            JobStatus::Failed
        })
    }
}

/// Total lines minus one for the header; an empty file has zero data lines.
fn count_data_lines(path: &Path) -> std::io::Result<u64> {
    let file = File::open(path)?;
    let mut lines: u64 = 0;
    for line in BufReader::new(file).lines() {
        line?;
        lines += 1;
    }
    Ok(lines.saturating_sub(1))
}
