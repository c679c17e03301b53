//! CLI error types

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced to the terminal
#[derive(Error, Debug)]
pub enum CliError {
    /// The HTTP request itself failed (connection, timeout, decode)
    #[error("Request to the txval server failed: {0}. Is the server running? Check --server-url or TXVAL_SERVER_URL.")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error payload
    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// A watched job finished in the FAILED state
    #[error("Job {job_id} failed; inspect the server logs and the status endpoint for per-partition detail")]
    JobFailed { job_id: String },

    /// The job id argument is not a UUID
    #[error("'{0}' is not a valid job id (expected a UUID)")]
    InvalidJobId(String),
}

impl CliError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let err = CliError::api(404, "job 'x' not found");
        assert_eq!(err.to_string(), "Server returned 404: job 'x' not found");
    }
}
