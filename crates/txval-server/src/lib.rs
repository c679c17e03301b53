//! txval server library
//!
//! Partitioned batch validation of delimited transaction files against two
//! downstream services, plus the HTTP surface to trigger and monitor runs.
//!
//! # Architecture
//!
//! A job run flows through four layers:
//!
//! - **batch**: the pipeline core — line-range partitioner, per-partition
//!   chunked workers, dual valid/invalid output sinks, and the coordinator
//!   that fans workers out and folds their results into the job status.
//! - **validate**: the per-record pipeline — three config-service checks run
//!   inline under a semaphore bulkhead while the bulk account check runs
//!   concurrently on the pool bulkhead.
//! - **bulkhead**: the two bounded-concurrency primitives isolating the
//!   downstreams from overload.
//! - **jobs**: in-memory job/step bookkeeping and the status projection
//!   served to pollers.
//!
//! The HTTP surface (`features::batch`) exposes `POST /api/v1/batch/start`
//! and `GET /api/v1/batch/status/{id}`.
//!
//! # Framework stack
//!
//! - **Axum** for the trigger surface
//! - **Reqwest** for the downstream clients
//! - **Tokio** for partition fan-out and the pool bulkhead's workers

pub mod batch;
pub mod bulkhead;
pub mod clients;
pub mod config;
pub mod error;
pub mod features;
pub mod jobs;
pub mod validate;

// Re-export commonly used types
pub use error::AppError;
