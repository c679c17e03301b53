//! Job and step execution records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Identifier of one job execution.
pub type JobId = Uuid;

/// Lifecycle of a job execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Created; the coordinator has not begun partitioning yet.
    Starting,
    /// Workers are running.
    Started,
    /// Every step completed.
    Completed,
    /// At least one step failed, or the coordinator itself failed.
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Starting => "STARTING",
            JobStatus::Started => "STARTED",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
        }
    }
}

/// Lifecycle of one partition worker's step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    Started,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed)
    }
}

/// Parameters a job was triggered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobParameters {
    pub input_file: PathBuf,
    /// Trigger timestamp; makes re-runs of the same file distinct.
    pub started_at: DateTime<Utc>,
}

/// Bookkeeping row for one partition worker.
///
/// Counters are monotonically non-decreasing for the lifetime of the step.
#[derive(Debug, Clone)]
pub struct StepExecution {
    pub name: String,
    pub status: StepStatus,
    pub read_count: u64,
    pub write_count: u64,
    pub skip_count: u64,
    pub filter_count: u64,
    pub start_ts: DateTime<Utc>,
    pub end_ts: Option<DateTime<Utc>>,
}

impl StepExecution {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Started,
            read_count: 0,
            write_count: 0,
            skip_count: 0,
            filter_count: 0,
            start_ts: Utc::now(),
            end_ts: None,
        }
    }
}

/// Bookkeeping envelope for one run of the validation job.
#[derive(Debug, Clone)]
pub struct JobExecution {
    pub id: JobId,
    pub name: String,
    pub status: JobStatus,
    pub parameters: JobParameters,
    pub start_ts: DateTime<Utc>,
    pub end_ts: Option<DateTime<Utc>>,
    pub steps: Vec<StepExecution>,
}
