//! Feature modules implementing the txval API
//!
//! Each feature is a vertical slice owning its routes and handlers. There is
//! currently one slice:
//!
//! - **batch**: trigger and monitor transaction validation jobs

pub mod batch;

use axum::Router;
use std::sync::Arc;

use crate::batch::JobCoordinator;
use crate::jobs::JobRepository;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Launches jobs and fans out partition workers.
    pub coordinator: Arc<JobCoordinator>,
    /// Job/step bookkeeping behind the status endpoints.
    pub repository: JobRepository,
}

/// Creates the API router with all feature routes mounted
pub fn router(state: FeatureState) -> Router {
    Router::new().nest("/batch", batch::batch_routes().with_state(state))
}
