//! txval common library
//!
//! Shared building blocks used by every txval workspace member:
//!
//! - **Error handling**: the [`TxvalError`] type and the crate-wide
//!   [`Result`] alias.
//! - **Logging**: environment-driven `tracing` initialisation shared by the
//!   server and the CLI.
//!
//! # Example
//!
//! ```no_run
//! use txval_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;

pub use error::{Result, TxvalError};
