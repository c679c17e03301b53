//! Status projection for external polling
//!
//! Renders one job execution and its step rows into the JSON shape served by
//! the status endpoint and consumed by the CLI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{JobExecution, JobStatus, StepStatus};

/// Counters summed and bucketed across all partitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

/// One partition step as exposed to pollers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionStatus {
    pub name: String,
    pub status: StepStatus,
    pub read_count: u64,
    pub write_count: u64,
    pub skip_count: u64,
    pub filter_count: u64,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

/// Point-in-time view of one job execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusProjection {
    pub job_id: Uuid,
    pub job_name: String,
    pub status: JobStatus,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Wall time from start to end, or to now for a live job.
    pub elapsed_ms: i64,
    pub aggregate: AggregateCounters,
    pub partitions: Vec<PartitionStatus>,
}

impl JobStatusProjection {
    /// Project a job execution snapshot into the polling shape.
    pub fn from_execution(job: &JobExecution) -> Self {
        let mut aggregate = AggregateCounters {
            total_partitions: job.steps.len(),
            completed: 0,
            running: 0,
            failed: 0,
            total_read: 0,
            total_written: 0,
            total_skipped: 0,
            total_filtered: 0,
        };

        let mut partitions: Vec<PartitionStatus> = job
            .steps
            .iter()
            .map(|step| {
                match step.status {
                    StepStatus::Started => aggregate.running += 1,
                    StepStatus::Completed => aggregate.completed += 1,
                    StepStatus::Failed => aggregate.failed += 1,
                }
                aggregate.total_read += step.read_count;
                aggregate.total_written += step.write_count;
                aggregate.total_skipped += step.skip_count;
                aggregate.total_filtered += step.filter_count;

                PartitionStatus {
                    name: step.name.clone(),
                    status: step.status,
                    read_count: step.read_count,
                    write_count: step.write_count,
                    skip_count: step.skip_count,
                    filter_count: step.filter_count,
                    start_time: step.start_ts,
                    end_time: step.end_ts,
                }
            })
            .collect();
        partitions.sort_by(|a, b| a.name.cmp(&b.name));

        let elapsed_end = job.end_ts.unwrap_or_else(Utc::now);
        Self {
            job_id: job.id,
            job_name: job.name.clone(),
            status: job.status,
            start_time: job.start_ts,
            end_time: job.end_ts,
            elapsed_ms: (elapsed_end - job.start_ts).num_milliseconds(),
            aggregate,
            partitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::model::{JobParameters, StepExecution};
    use std::path::PathBuf;

    fn job_with_steps(steps: Vec<StepExecution>) -> JobExecution {
        JobExecution {
            id: Uuid::new_v4(),
            name: "transactionValidationJob".to_string(),
            status: JobStatus::Started,
            parameters: JobParameters {
                input_file: PathBuf::from("/tmp/in.csv"),
                started_at: Utc::now(),
            },
            start_ts: Utc::now(),
            end_ts: None,
            steps,
        }
    }

    fn step(name: &str, status: StepStatus, read: u64, write: u64) -> StepExecution {
        let mut step = StepExecution::new(name);
        step.status = status;
        step.read_count = read;
        step.write_count = write;
        if status.is_terminal() {
            step.end_ts = Some(Utc::now());
        }
        step
    }

    #[test]
    fn test_aggregates_and_buckets() {
        let job = job_with_steps(vec![
            step("partition-0", StepStatus::Completed, 7, 7),
            step("partition-1", StepStatus::Started, 3, 3),
            step("partition-2", StepStatus::Failed, 2, 0),
        ]);

        let projection = JobStatusProjection::from_execution(&job);
        assert_eq!(projection.aggregate.total_partitions, 3);
        assert_eq!(projection.aggregate.completed, 1);
        assert_eq!(projection.aggregate.running, 1);
        assert_eq!(projection.aggregate.failed, 1);
        assert_eq!(projection.aggregate.total_read, 12);
        assert_eq!(projection.aggregate.total_written, 10);
    }

    #[test]
    fn test_partitions_sorted_by_name() {
        let job = job_with_steps(vec![
            step("partition-2", StepStatus::Completed, 1, 1),
            step("partition-0", StepStatus::Completed, 1, 1),
            step("partition-1", StepStatus::Completed, 1, 1),
        ]);

        let projection = JobStatusProjection::from_execution(&job);
        let names: Vec<&str> = projection.partitions.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["partition-0", "partition-1", "partition-2"]);
    }

    #[test]
    fn test_live_job_has_growing_elapsed_and_no_end() {
        let job = job_with_steps(vec![]);
        let projection = JobStatusProjection::from_execution(&job);
        assert!(projection.end_time.is_none());
        assert!(projection.elapsed_ms >= 0);
    }

    #[test]
    fn test_projection_serializes_camel_case() {
        let job = job_with_steps(vec![step("partition-0", StepStatus::Completed, 1, 1)]);
        let value = serde_json::to_value(JobStatusProjection::from_execution(&job)).unwrap();

        assert!(value.get("jobId").is_some());
        assert!(value.get("aggregate").unwrap().get("totalPartitions").is_some());
        assert!(value.get("partitions").unwrap()[0].get("readCount").is_some());
    }
}
