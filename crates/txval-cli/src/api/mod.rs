//! HTTP API client for the txval server

mod client;
mod types;

pub use client::ApiClient;
pub use types::{AggregateCounters, JobStartResponse, JobStatusProjection, PartitionStatus};
