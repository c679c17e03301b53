//! Job and step execution bookkeeping
//!
//! - **model**: job/step execution records and their status machines
//! - **repository**: in-memory store of executions; the durable-store seam
//! - **status**: the projection rendered to external pollers

pub mod model;
pub mod repository;
pub mod status;

pub use model::{JobExecution, JobId, JobParameters, JobStatus, StepExecution, StepStatus};
pub use repository::JobRepository;
pub use status::{AggregateCounters, JobStatusProjection, PartitionStatus};
