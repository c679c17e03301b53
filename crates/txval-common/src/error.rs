//! Error types shared across the txval workspace
//!
//! Messages are written to be actionable: they name the resource involved
//! and, where it helps, what to check next.

use thiserror::Error;

/// Result type alias for txval operations
pub type Result<T> = std::result::Result<T, TxvalError>;

/// Main error type for txval
#[derive(Error, Debug)]
pub enum TxvalError {
    /// Configuration is missing or invalid
    #[error("Configuration error: {message}. {suggestion}")]
    Config { message: String, suggestion: String },

    /// Requested input file does not exist or cannot be read
    #[error("Input file '{path}' cannot be read: {reason}. Check the path and permissions.")]
    InputFile { path: String, reason: String },
}

impl TxvalError {
    /// Create a configuration error with a suggestion
    pub fn config(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create an input-file error
    pub fn input_file(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InputFile {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = TxvalError::config("chunk size is 0", "set BATCH_CHUNK_SIZE to a positive value");
        assert_eq!(
            err.to_string(),
            "Configuration error: chunk size is 0. set BATCH_CHUNK_SIZE to a positive value"
        );
    }

    #[test]
    fn test_input_file_error_message() {
        let err = TxvalError::input_file("/data/missing.csv", "No such file or directory");
        assert_eq!(
            err.to_string(),
            "Input file '/data/missing.csv' cannot be read: No such file or directory. \
             Check the path and permissions."
        );
    }
}
