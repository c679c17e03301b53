//! txval server - Main entry point

use anyhow::Result;
use axum::{routing::get, Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::info;
use txval_common::logging::{init_logging, LogConfig};

use txval_server::{
    batch::{BatchOptions, JobCoordinator},
    bulkhead::{PoolBulkhead, SemaphoreBulkhead},
    clients::{AccountValidationClient, ConfigServiceClient},
    config::Config,
    features,
    jobs::JobRepository,
    validate::RecordValidator,
};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("txval-server".to_string())
        .filter_directives("txval_server=debug,tower_http=debug".to_string())
        .build();

    // Environment variables take precedence over the built-in defaults
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    info!("Starting txval server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let state = build_state(&config)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Wire clients, bulkheads, validator and coordinator from configuration
fn build_state(config: &Config) -> Result<features::FeatureState> {
    let config_client = Arc::new(ConfigServiceClient::new(
        config.downstream.config_service_base_url.clone(),
        config.downstream.timeout(),
    )?);
    let account_client = Arc::new(AccountValidationClient::new(
        config.downstream.account_validation_base_url.clone(),
        config.downstream.timeout(),
    )?);

    // process-wide singletons shared by every partition worker
    let config_bulkhead = Arc::new(SemaphoreBulkhead::new(
        "configService",
        config.bulkheads.config_bulkhead(),
    ));
    let account_pool = Arc::new(PoolBulkhead::new(
        "accountValidation",
        config.bulkheads.account_pool(),
    ));

    let validator = Arc::new(RecordValidator::new(
        config_client,
        account_client,
        config_bulkhead,
        account_pool,
    ));

    let repository = JobRepository::new();
    let coordinator = Arc::new(JobCoordinator::new(
        BatchOptions {
            input_file: config.batch.input_file.clone().into(),
            output_dir: config.batch.output_dir(),
            chunk_size: config.batch.chunk_size,
            grid_size: config.batch.grid_size,
        },
        validator,
        repository.clone(),
    ));

    Ok(features::FeatureState {
        coordinator,
        repository,
    })
}

/// Create the application router with all routes and middleware
fn create_router(state: features::FeatureState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", features::router(state))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    // Give running partition workers a moment to finish their current chunk
    info!("Waiting up to {} seconds for work to settle", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
