//! In-memory job execution repository
//!
//! The store behind the status API and the coordinator's bookkeeping. All
//! writes to a given row serialise through one lock; critical sections only
//! copy or mutate plain data, never perform I/O. A durable implementation
//! can replace this behind the same methods.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use super::model::{JobExecution, JobId, JobParameters, JobStatus, StepExecution, StepStatus};

#[derive(Default)]
struct Inner {
    jobs: HashMap<JobId, JobExecution>,
    /// Insertion order, newest last; backs `list`.
    order: Vec<JobId>,
}

/// Shared handle to the job store.
#[derive(Clone, Default)]
pub struct JobRepository {
    inner: Arc<RwLock<Inner>>,
}

impl JobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job execution in `Starting` state.
    pub fn create_job(&self, name: impl Into<String>, parameters: JobParameters) -> JobId {
        let id = JobId::new_v4();
        let job = JobExecution {
            id,
            name: name.into(),
            status: JobStatus::Starting,
            parameters,
            start_ts: Utc::now(),
            end_ts: None,
            steps: Vec::new(),
        };

        let mut inner = self.inner.write().expect("job store lock poisoned");
        inner.jobs.insert(id, job);
        inner.order.push(id);
        debug!(job_id = %id, "job registered");
        id
    }

    /// Move a job from `Starting` to `Started`.
    pub fn mark_job_started(&self, id: JobId) {
        let mut inner = self.inner.write().expect("job store lock poisoned");
        if let Some(job) = inner.jobs.get_mut(&id) {
            job.status = JobStatus::Started;
        }
    }

    /// Move a job to a terminal status and stamp its end time.
    pub fn finish_job(&self, id: JobId, status: JobStatus) {
        debug_assert!(status.is_terminal());
        let mut inner = self.inner.write().expect("job store lock poisoned");
        if let Some(job) = inner.jobs.get_mut(&id) {
            job.status = status;
            job.end_ts = Some(Utc::now());
        }
    }

    /// Register a step row for a partition worker.
    pub fn add_step(&self, id: JobId, step_name: &str) {
        let mut inner = self.inner.write().expect("job store lock poisoned");
        if let Some(job) = inner.jobs.get_mut(&id) {
            job.steps.push(StepExecution::new(step_name));
        }
    }

    /// Publish a worker's running totals.
    ///
    /// Totals are cumulative, so counters never move backwards.
    pub fn update_step_counters(
        &self,
        id: JobId,
        step_name: &str,
        read_count: u64,
        write_count: u64,
        skip_count: u64,
        filter_count: u64,
    ) {
        let mut inner = self.inner.write().expect("job store lock poisoned");
        if let Some(step) = step_mut(&mut inner, id, step_name) {
            step.read_count = step.read_count.max(read_count);
            step.write_count = step.write_count.max(write_count);
            step.skip_count = step.skip_count.max(skip_count);
            step.filter_count = step.filter_count.max(filter_count);
        }
    }

    /// Move a step to a terminal status and stamp its end time.
    pub fn finish_step(&self, id: JobId, step_name: &str, status: StepStatus) {
        debug_assert!(status.is_terminal());
        let mut inner = self.inner.write().expect("job store lock poisoned");
        if let Some(step) = step_mut(&mut inner, id, step_name) {
            step.status = status;
            step.end_ts = Some(Utc::now());
        }
    }

    /// Snapshot one job execution.
    pub fn get(&self, id: JobId) -> Option<JobExecution> {
        let inner = self.inner.read().expect("job store lock poisoned");
        inner.jobs.get(&id).cloned()
    }

    /// Snapshot all job executions, newest first.
    pub fn list(&self) -> Vec<JobExecution> {
        let inner = self.inner.read().expect("job store lock poisoned");
        inner
            .order
            .iter()
            .rev()
            .filter_map(|id| inner.jobs.get(id).cloned())
            .collect()
    }
}

fn step_mut<'a>(inner: &'a mut Inner, id: JobId, step_name: &str) -> Option<&'a mut StepExecution> {
    inner
        .jobs
        .get_mut(&id)?
        .steps
        .iter_mut()
        .find(|step| step.name == step_name)
}
