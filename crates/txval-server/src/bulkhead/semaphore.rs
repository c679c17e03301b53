//! Semaphore bulkhead
//!
//! Admission control for fast inline downstream calls: at most
//! `max_concurrent_calls` callers hold a permit at once, and a caller waits
//! at most `max_wait` for admission before being turned away as `Full`.
//!
//! The permit is held only for the duration of the guarded call itself. Never
//! submit work to another executor while holding a permit; one logical call
//! would then pin a permit while queued elsewhere and saturate the bulkhead
//! under modest load.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio::time::timeout;
use tracing::{info, warn};

use super::BulkheadError;

/// Sizing for a [`SemaphoreBulkhead`].
#[derive(Debug, Clone, Copy)]
pub struct SemaphoreBulkheadConfig {
    pub max_concurrent_calls: usize,
    pub max_wait: Duration,
}

/// Named, process-wide bounded-permit bulkhead.
pub struct SemaphoreBulkhead {
    name: String,
    permits: Arc<Semaphore>,
    max_wait: Duration,
}

impl SemaphoreBulkhead {
    pub fn new(name: impl Into<String>, config: SemaphoreBulkheadConfig) -> Self {
        let name = name.into();
        info!(
            bulkhead = %name,
            max_concurrent_calls = config.max_concurrent_calls,
            max_wait_ms = config.max_wait.as_millis() as u64,
            "semaphore bulkhead created"
        );
        Self {
            name,
            permits: Arc::new(Semaphore::new(config.max_concurrent_calls)),
            max_wait: config.max_wait,
        }
    }

    /// Wait up to `max_wait` for a permit.
    ///
    /// The permit releases itself when the returned guard drops, so admission
    /// and release pair up on every path, including early returns.
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, BulkheadError> {
        match timeout(self.max_wait, self.permits.acquire()).await {
            Ok(Ok(permit)) => Ok(permit),
            // acquire() only errors when the semaphore is closed, which
            // never happens for a process-lifetime bulkhead
            Ok(Err(_)) => Err(BulkheadError::Interrupted(self.name.clone())),
            Err(_elapsed) => {
                warn!(bulkhead = %self.name, "no permit within max wait, rejecting call");
                Err(BulkheadError::Full(self.name.clone()))
            }
        }
    }

    /// Run `call` while holding a permit.
    pub async fn run<F, T>(&self, call: F) -> Result<T, BulkheadError>
    where
        F: Future<Output = T>,
    {
        let permit = self.acquire().await?;
        let output = call.await;
        drop(permit);
        Ok(output)
    }

    /// Permits currently free; exposed for observability and tests.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bulkhead(max_calls: usize, max_wait_ms: u64) -> SemaphoreBulkhead {
        SemaphoreBulkhead::new(
            "test",
            SemaphoreBulkheadConfig {
                max_concurrent_calls: max_calls,
                max_wait: Duration::from_millis(max_wait_ms),
            },
        )
    }

    #[tokio::test]
    async fn test_run_returns_call_output_and_releases_permit() {
        let bulkhead = bulkhead(2, 50);

        let out = bulkhead.run(async { 41 + 1 }).await.unwrap();
        assert_eq!(out, 42);
        assert_eq!(bulkhead.available_permits(), 2);
    }

    #[tokio::test]
    async fn test_full_when_saturated() {
        let bulkhead = bulkhead(1, 10);

        let held = bulkhead.acquire().await.unwrap();
        let result = bulkhead.run(async {}).await;
        assert_eq!(result, Err(BulkheadError::Full("test".to_string())));

        drop(held);
        assert!(bulkhead.run(async {}).await.is_ok());
    }

    #[tokio::test]
    async fn test_waits_for_permit_within_bound() {
        let bulkhead = Arc::new(bulkhead(1, 500));

        let held = bulkhead.acquire().await.unwrap();
        let contender = {
            let bulkhead = Arc::clone(&bulkhead);
            tokio::spawn(async move { bulkhead.run(async { 7 }).await })
        };

        // free the permit while the contender is still inside its wait window
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(held);

        assert_eq!(contender.await.unwrap().unwrap(), 7);
    }

    #[tokio::test]
    async fn test_concurrent_holders_bounded() {
        let bulkhead = Arc::new(bulkhead(3, 50));
        let (gate_tx, _) = tokio::sync::broadcast::channel::<()>(1);

        let mut holders = Vec::new();
        for _ in 0..3 {
            let bulkhead = Arc::clone(&bulkhead);
            let mut gate = gate_tx.subscribe();
            holders.push(tokio::spawn(async move {
                bulkhead
                    .run(async move {
                        let _ = gate.recv().await;
                    })
                    .await
            }));
        }

        // let the three holders take every permit
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(bulkhead.available_permits(), 0);
        assert!(matches!(
            bulkhead.run(async {}).await,
            Err(BulkheadError::Full(_))
        ));

        gate_tx.send(()).unwrap();
        for holder in holders {
            assert!(holder.await.unwrap().is_ok());
        }
        assert_eq!(bulkhead.available_permits(), 3);
    }
}
