//! Bulkhead primitives bounding concurrent access to downstream services
//!
//! Two isolation regimes, matching the two downstream call profiles:
//!
//! - [`SemaphoreBulkhead`]: a bounded permit counter for fast, inline calls.
//!   The caller runs the call on its own task while holding a permit, and
//!   waits at most a configured bound for one to free up.
//! - [`PoolBulkhead`]: a dedicated, bounded worker pool with a bounded queue
//!   for the dominant-latency call. Submission never blocks; the caller gets
//!   a handle to join later, so the call overlaps other work.
//!
//! Both are process-wide singletons created from configuration at startup and
//! shared by every partition worker.

mod pool;
mod semaphore;

pub use pool::{PoolBulkhead, PoolBulkheadConfig, PoolHandle};
pub use semaphore::{SemaphoreBulkhead, SemaphoreBulkheadConfig};

use thiserror::Error;

/// Why a bulkhead-guarded call produced no result.
///
/// `Full` means admission was refused before the call started; `Interrupted`
/// means the call was admitted but its executor went away before a result
/// could be delivered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BulkheadError {
    #[error("bulkhead '{0}' is full")]
    Full(String),

    #[error("bulkhead '{0}' call was interrupted")]
    Interrupted(String),
}
