//! Wire types of the server's batch API

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Response to a job submission
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStartResponse {
    pub job_id: Uuid,
    pub status: String,
    pub input_file: String,
    pub start_time: DateTime<Utc>,
}

/// Counters summed and bucketed across all partitions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateCounters {
    pub total_partitions: usize,
    pub completed: usize,
    pub running: usize,
    pub failed: usize,
    pub total_read: u64,
    pub total_written: u64,
    pub total_skipped: u64,
    pub total_filtered: u64,
}

/// One partition step as exposed by the status endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionStatus {
    pub name: String,
    pub status: String,
    pub read_count: u64,
    pub write_count: u64,
    pub skip_count: u64,
    pub filter_count: u64,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// Point-in-time view of one job execution
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusProjection {
    pub job_id: Uuid,
    pub job_name: String,
    pub status: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub elapsed_ms: i64,
    pub aggregate: AggregateCounters,
    pub partitions: Vec<PartitionStatus>,
}

impl JobStatusProjection {
    /// True once the job can no longer change.
    pub fn is_terminal(&self) -> bool {
        self.status == "COMPLETED" || self.status == "FAILED"
    }
}
