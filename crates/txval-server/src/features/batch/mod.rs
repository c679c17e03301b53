//! Batch job feature slice

mod routes;

pub use routes::{batch_routes, JobStartResponse};
