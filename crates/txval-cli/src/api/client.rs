//! HTTP API client for the txval server

use reqwest::Client;
use std::time::Duration;
use uuid::Uuid;

use super::types::{JobStartResponse, JobStatusProjection};
use crate::error::{CliError, Result};

/// Default timeout for API requests in seconds.
/// Can be overridden via the TXVAL_API_TIMEOUT_SECS environment variable.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

/// API client for the txval server
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: String) -> Result<Self> {
        let timeout_secs = std::env::var("TXVAL_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Submit a validation job, optionally overriding the input file
    pub async fn start_job(&self, input_file: Option<&str>) -> Result<JobStartResponse> {
        let url = format!("{}/api/v1/batch/start", self.base_url);

        let mut request = self.client.post(&url);
        if let Some(path) = input_file {
            request = request.query(&[("inputFile", path)]);
        }

        let response = request.send().await?;
        Self::decode(response).await
    }

    /// Fetch the status projection of a job
    pub async fn job_status(&self, job_id: Uuid) -> Result<JobStatusProjection> {
        let url = format!("{}/api/v1/batch/status/{}", self.base_url, job_id);

        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn an HTTP response into its typed body, mapping the server's error
    /// shape onto [`CliError::Api`].
    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| {
                body.pointer("/error/message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("request failed with status {status}"));

        Err(CliError::api(status.as_u16(), message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_creation() {
        let client = ApiClient::new("http://localhost:8080".to_string()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        let client = ApiClient::new("http://127.0.0.1:1".to_string()).unwrap();
        let result = client.job_status(Uuid::new_v4()).await;
        assert!(matches!(result, Err(CliError::Http(_))));
    }
}
