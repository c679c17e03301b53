//! Pool bulkhead
//!
//! A dedicated worker-task pool with a bounded submission queue. `submit`
//! never blocks: the call either starts on an idle worker, waits its turn in
//! the queue, grows the pool toward `max_pool_size`, or is rejected as full.
//! The caller receives a [`PoolHandle`] it can join from any task.
//!
//! Pool sizing follows the classic executor shape: `core_pool_size` workers
//! stay alive for the process lifetime, extra workers up to `max_pool_size`
//! retire after `keep_alive` of idleness. Dropping a handle cancels its call:
//! a queued task is abandoned before it starts, a running one is cancelled at
//! its next suspension point and its result discarded.

use futures::future::BoxFuture;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::BulkheadError;

type Task = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Sizing for a [`PoolBulkhead`].
#[derive(Debug, Clone, Copy)]
pub struct PoolBulkheadConfig {
    pub core_pool_size: usize,
    pub max_pool_size: usize,
    pub queue_capacity: usize,
    pub keep_alive: Duration,
}

/// Named, process-wide worker-pool bulkhead.
pub struct PoolBulkhead {
    name: String,
    queue: mpsc::Sender<Task>,
    shared: Arc<Shared>,
}

struct Shared {
    name: String,
    core_pool_size: usize,
    max_pool_size: usize,
    keep_alive: Duration,
    /// Workers currently alive, core and extra alike.
    workers: AtomicUsize,
    /// Workers currently executing a task.
    busy: AtomicUsize,
    /// Single consumer end, shared by all workers; the lock serialises
    /// dequeueing only, never task execution.
    queue_rx: Mutex<mpsc::Receiver<Task>>,
}

/// Joinable result of a pool submission.
///
/// Dropping the handle cancels the call best-effort and discards any late
/// result.
pub struct PoolHandle<T> {
    name: String,
    result: oneshot::Receiver<T>,
}

impl<T> PoolHandle<T> {
    /// Wait for the call's result.
    pub async fn join(self) -> Result<T, BulkheadError> {
        self.result
            .await
            .map_err(|_| BulkheadError::Interrupted(self.name))
    }
}

impl PoolBulkhead {
    /// Create the pool and spawn its core workers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(name: impl Into<String>, config: PoolBulkheadConfig) -> Self {
        assert!(config.max_pool_size >= 1, "max_pool_size must be at least 1");
        assert!(
            config.core_pool_size <= config.max_pool_size,
            "core_pool_size must not exceed max_pool_size"
        );
        assert!(config.queue_capacity >= 1, "queue_capacity must be at least 1");

        let name = name.into();
        let (queue, queue_rx) = mpsc::channel(config.queue_capacity);
        let shared = Arc::new(Shared {
            name: name.clone(),
            core_pool_size: config.core_pool_size,
            max_pool_size: config.max_pool_size,
            keep_alive: config.keep_alive,
            workers: AtomicUsize::new(0),
            busy: AtomicUsize::new(0),
            queue_rx: Mutex::new(queue_rx),
        });

        for _ in 0..config.core_pool_size {
            shared.workers.fetch_add(1, Ordering::AcqRel);
            tokio::spawn(worker_loop(Arc::clone(&shared), None));
        }

        info!(
            bulkhead = %name,
            core_pool_size = config.core_pool_size,
            max_pool_size = config.max_pool_size,
            queue_capacity = config.queue_capacity,
            "pool bulkhead created"
        );

        Self { name, queue, shared }
    }

    /// Hand `call` to the pool without blocking.
    ///
    /// Rejected with [`BulkheadError::Full`] only when the queue is full and
    /// the pool is already at `max_pool_size`.
    pub fn submit<T, F>(&self, call: F) -> Result<PoolHandle<T>, BulkheadError>
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        let (mut result_tx, result_rx) = oneshot::channel();
        let task: Task = Box::new(move || {
            Box::pin(async move {
                tokio::select! {
                    // caller dropped its handle; abandon the call
                    _ = result_tx.closed() => {}
                    output = call => {
                        let _ = result_tx.send(output);
                    }
                }
            })
        });

        // grow toward max before admission when every worker is occupied
        if self.shared.busy.load(Ordering::Acquire) >= self.shared.workers.load(Ordering::Acquire) {
            self.try_spawn_worker(None);
        }

        let handle = PoolHandle {
            name: self.name.clone(),
            result: result_rx,
        };

        match self.queue.try_send(task) {
            Ok(()) => Ok(handle),
            Err(mpsc::error::TrySendError::Full(task)) => {
                // a new worker takes the overflow task directly, bypassing
                // the full queue
                if self.try_spawn_worker(Some(task)) {
                    Ok(handle)
                } else {
                    warn!(
                        bulkhead = %self.name,
                        "queue full and pool at max, rejecting submission"
                    );
                    Err(BulkheadError::Full(self.name.clone()))
                }
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(BulkheadError::Interrupted(self.name.clone()))
            }
        }
    }

    /// Spawn an extra worker unless the pool is already at max.
    fn try_spawn_worker(&self, first_task: Option<Task>) -> bool {
        let grew = self.shared.workers.fetch_update(
            Ordering::AcqRel,
            Ordering::Acquire,
            |workers| (workers < self.shared.max_pool_size).then_some(workers + 1),
        );
        if grew.is_ok() {
            debug!(bulkhead = %self.name, "spawning extra pool worker");
            tokio::spawn(worker_loop(Arc::clone(&self.shared), first_task));
            true
        } else {
            false
        }
    }

    /// Workers currently alive; exposed for observability and tests.
    pub fn worker_count(&self) -> usize {
        self.shared.workers.load(Ordering::Acquire)
    }
}

async fn worker_loop(shared: Arc<Shared>, mut first_task: Option<Task>) {
    if let Some(task) = first_task.take() {
        run_task(&shared, task).await;
    }

    loop {
        let mut rx = shared.queue_rx.lock().await;
        let received = timeout(shared.keep_alive, rx.recv()).await;
        drop(rx);

        match received {
            Ok(Some(task)) => run_task(&shared, task).await,
            Ok(None) => {
                // pool dropped and queue drained
                shared.workers.fetch_sub(1, Ordering::AcqRel);
                return;
            }
            Err(_idle) => {
                let retired = shared.workers.fetch_update(
                    Ordering::AcqRel,
                    Ordering::Acquire,
                    |workers| (workers > shared.core_pool_size).then_some(workers - 1),
                );
                if retired.is_ok() {
                    debug!(bulkhead = %shared.name, "idle worker above core pool retired");
                    return;
                }
            }
        }
    }
}

async fn run_task(shared: &Shared, task: Task) {
    shared.busy.fetch_add(1, Ordering::AcqRel);
    task().await;
    shared.busy.fetch_sub(1, Ordering::AcqRel);
}
