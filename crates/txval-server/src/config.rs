//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use txval_common::TxvalError;

use crate::bulkhead::{PoolBulkheadConfig, SemaphoreBulkheadConfig};

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default input file path.
pub const DEFAULT_INPUT_FILE: &str = "./data/transactions.csv";

/// Default records per read/write cycle.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Default desired partition count.
pub const DEFAULT_GRID_SIZE: usize = 10;

/// Default config service endpoint.
pub const DEFAULT_CONFIG_SERVICE_URL: &str = "http://localhost:8081";

/// Default account validation service endpoint.
pub const DEFAULT_ACCOUNT_VALIDATION_URL: &str = "http://localhost:8082";

/// Default downstream HTTP timeout in seconds.
pub const DEFAULT_DOWNSTREAM_TIMEOUT_SECS: u64 = 5;

/// Default permits on the config service bulkhead.
pub const DEFAULT_CONFIG_BULKHEAD_MAX_CALLS: usize = 20;

/// Default admission wait bound on the config service bulkhead.
pub const DEFAULT_CONFIG_BULKHEAD_MAX_WAIT_MS: u64 = 500;

/// Default core size of the account validation pool.
pub const DEFAULT_ACCOUNT_POOL_CORE_SIZE: usize = 10;

/// Default max size of the account validation pool.
pub const DEFAULT_ACCOUNT_POOL_MAX_SIZE: usize = 20;

/// Default queue capacity of the account validation pool.
pub const DEFAULT_ACCOUNT_POOL_QUEUE_CAPACITY: usize = 200;

/// Default keep-alive of extra account pool workers in milliseconds.
pub const DEFAULT_ACCOUNT_POOL_KEEP_ALIVE_MS: u64 = 20;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub batch: BatchSettings,
    pub downstream: DownstreamConfig,
    pub bulkheads: BulkheadSettings,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// Batch pipeline shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Path to the delimited input file.
    pub input_file: String,
    /// Output file path; only its parent directory is used.
    pub output_file: String,
    pub chunk_size: usize,
    pub grid_size: usize,
}

impl BatchSettings {
    /// Directory the per-partition output pairs land in.
    pub fn output_dir(&self) -> PathBuf {
        match PathBuf::from(&self.output_file).parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => std::env::temp_dir(),
        }
    }
}

/// Downstream service endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownstreamConfig {
    pub config_service_base_url: String,
    pub account_validation_base_url: String,
    pub timeout_secs: u64,
}

impl DownstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Bulkhead sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkheadSettings {
    pub config_max_concurrent_calls: usize,
    pub config_max_wait_ms: u64,
    pub account_pool_core_size: usize,
    pub account_pool_max_size: usize,
    pub account_pool_queue_capacity: usize,
    pub account_pool_keep_alive_ms: u64,
}

impl BulkheadSettings {
    pub fn config_bulkhead(&self) -> SemaphoreBulkheadConfig {
        SemaphoreBulkheadConfig {
            max_concurrent_calls: self.config_max_concurrent_calls,
            max_wait: Duration::from_millis(self.config_max_wait_ms),
        }
    }

    pub fn account_pool(&self) -> PoolBulkheadConfig {
        PoolBulkheadConfig {
            core_pool_size: self.account_pool_core_size,
            max_pool_size: self.account_pool_max_size,
            queue_capacity: self.account_pool_queue_capacity,
            keep_alive: Duration::from_millis(self.account_pool_keep_alive_ms),
        }
    }
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let default_output = std::env::temp_dir()
            .join("batch-output")
            .join("validation-results.csv")
            .to_string_lossy()
            .to_string();

        let config = Config {
            server: ServerConfig {
                host: env_or("TXVAL_HOST", DEFAULT_SERVER_HOST),
                port: env_parsed("TXVAL_PORT", DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: env_parsed(
                    "TXVAL_SHUTDOWN_TIMEOUT",
                    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
                ),
            },
            batch: BatchSettings {
                input_file: env_or("BATCH_INPUT_FILE", DEFAULT_INPUT_FILE),
                output_file: std::env::var("BATCH_OUTPUT_FILE").unwrap_or(default_output),
                chunk_size: env_parsed("BATCH_CHUNK_SIZE", DEFAULT_CHUNK_SIZE),
                grid_size: env_parsed("BATCH_GRID_SIZE", DEFAULT_GRID_SIZE),
            },
            downstream: DownstreamConfig {
                config_service_base_url: env_or(
                    "CONFIG_SERVICE_BASE_URL",
                    DEFAULT_CONFIG_SERVICE_URL,
                ),
                account_validation_base_url: env_or(
                    "ACCOUNT_VALIDATION_SERVICE_BASE_URL",
                    DEFAULT_ACCOUNT_VALIDATION_URL,
                ),
                timeout_secs: env_parsed("DOWNSTREAM_TIMEOUT_SECS", DEFAULT_DOWNSTREAM_TIMEOUT_SECS),
            },
            bulkheads: BulkheadSettings {
                config_max_concurrent_calls: env_parsed(
                    "CONFIG_BULKHEAD_MAX_CONCURRENT_CALLS",
                    DEFAULT_CONFIG_BULKHEAD_MAX_CALLS,
                ),
                config_max_wait_ms: env_parsed(
                    "CONFIG_BULKHEAD_MAX_WAIT_MS",
                    DEFAULT_CONFIG_BULKHEAD_MAX_WAIT_MS,
                ),
                account_pool_core_size: env_parsed(
                    "ACCOUNT_POOL_CORE_SIZE",
                    DEFAULT_ACCOUNT_POOL_CORE_SIZE,
                ),
                account_pool_max_size: env_parsed(
                    "ACCOUNT_POOL_MAX_SIZE",
                    DEFAULT_ACCOUNT_POOL_MAX_SIZE,
                ),
                account_pool_queue_capacity: env_parsed(
                    "ACCOUNT_POOL_QUEUE_CAPACITY",
                    DEFAULT_ACCOUNT_POOL_QUEUE_CAPACITY,
                ),
                account_pool_keep_alive_ms: env_parsed(
                    "ACCOUNT_POOL_KEEP_ALIVE_MS",
                    DEFAULT_ACCOUNT_POOL_KEEP_ALIVE_MS,
                ),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> txval_common::Result<()> {
        if self.server.port == 0 {
            return Err(TxvalError::config(
                "server port is 0",
                "Set TXVAL_PORT to a positive value.",
            ));
        }

        if self.batch.chunk_size == 0 {
            return Err(TxvalError::config(
                "chunk size is 0",
                "Set BATCH_CHUNK_SIZE to a positive value.",
            ));
        }

        if self.batch.grid_size == 0 {
            return Err(TxvalError::config(
                "grid size is 0",
                "Set BATCH_GRID_SIZE to a positive value.",
            ));
        }

        if self.bulkheads.config_max_concurrent_calls == 0 {
            return Err(TxvalError::config(
                "config bulkhead has no permits",
                "Set CONFIG_BULKHEAD_MAX_CONCURRENT_CALLS to a positive value.",
            ));
        }

        if self.bulkheads.account_pool_max_size == 0 {
            return Err(TxvalError::config(
                "account pool max size is 0",
                "Set ACCOUNT_POOL_MAX_SIZE to a positive value.",
            ));
        }

        if self.bulkheads.account_pool_core_size > self.bulkheads.account_pool_max_size {
            return Err(TxvalError::config(
                format!(
                    "account pool core size ({}) exceeds max size ({})",
                    self.bulkheads.account_pool_core_size, self.bulkheads.account_pool_max_size
                ),
                "Lower ACCOUNT_POOL_CORE_SIZE or raise ACCOUNT_POOL_MAX_SIZE.",
            ));
        }

        if self.bulkheads.account_pool_queue_capacity == 0 {
            return Err(TxvalError::config(
                "account pool queue capacity is 0",
                "Set ACCOUNT_POOL_QUEUE_CAPACITY to a positive value.",
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            batch: BatchSettings {
                input_file: DEFAULT_INPUT_FILE.to_string(),
                output_file: std::env::temp_dir()
                    .join("batch-output")
                    .join("validation-results.csv")
                    .to_string_lossy()
                    .to_string(),
                chunk_size: DEFAULT_CHUNK_SIZE,
                grid_size: DEFAULT_GRID_SIZE,
            },
            downstream: DownstreamConfig {
                config_service_base_url: DEFAULT_CONFIG_SERVICE_URL.to_string(),
                account_validation_base_url: DEFAULT_ACCOUNT_VALIDATION_URL.to_string(),
                timeout_secs: DEFAULT_DOWNSTREAM_TIMEOUT_SECS,
            },
            bulkheads: BulkheadSettings {
                config_max_concurrent_calls: DEFAULT_CONFIG_BULKHEAD_MAX_CALLS,
                config_max_wait_ms: DEFAULT_CONFIG_BULKHEAD_MAX_WAIT_MS,
                account_pool_core_size: DEFAULT_ACCOUNT_POOL_CORE_SIZE,
                account_pool_max_size: DEFAULT_ACCOUNT_POOL_MAX_SIZE,
                account_pool_queue_capacity: DEFAULT_ACCOUNT_POOL_QUEUE_CAPACITY,
                account_pool_keep_alive_ms: DEFAULT_ACCOUNT_POOL_KEEP_ALIVE_MS,
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
