//! Client for the account validation service
//!
//! A single bulk endpoint checks up to [`MAX_BULK_ACCOUNTS`] account/bank
//! pairs per round trip. Transport failure yields an empty result list; the
//! validator turns that into its own "no results" reason.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Hard per-request limit of the bulk endpoint.
pub const MAX_BULK_ACCOUNTS: usize = 100;

/// One account/bank pair to validate.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountPair {
    pub account_number: String,
    pub bank_code: String,
}

/// Account lifecycle state as reported by the downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountState {
    Active,
    Inactive,
    Blocked,
    NotFound,
}

impl fmt::Display for AccountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccountState::Active => "ACTIVE",
            AccountState::Inactive => "INACTIVE",
            AccountState::Blocked => "BLOCKED",
            AccountState::NotFound => "NOT_FOUND",
        };
        f.write_str(s)
    }
}

/// Per-account verdict from the bulk endpoint.
///
/// `valid` is authoritative; `status` and `reason` only explain it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatus {
    pub account_number: String,
    pub bank_code: String,
    #[serde(default)]
    pub account_name: Option<String>,
    pub valid: bool,
    pub status: AccountState,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Serialize)]
struct BulkRequest<'a> {
    accounts: &'a [AccountPair],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkResponse {
    total_requested: usize,
    total_valid: usize,
    total_invalid: usize,
    results: Vec<AccountStatus>,
}

/// HTTP facade over the account validation service.
pub struct AccountValidationClient {
    client: Client,
    base_url: String,
}

impl AccountValidationClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// `POST /api/v1/accounts/validate/bulk`
    ///
    /// Returns an empty vec on any transport or decode failure. Requests
    /// beyond [`MAX_BULK_ACCOUNTS`] pairs are truncated to stay inside the
    /// downstream contract.
    pub async fn validate_bulk(&self, pairs: &[AccountPair]) -> Vec<AccountStatus> {
        debug_assert!(pairs.len() <= MAX_BULK_ACCOUNTS, "bulk request over limit");
        let pairs = if pairs.len() > MAX_BULK_ACCOUNTS {
            warn!(
                requested = pairs.len(),
                limit = MAX_BULK_ACCOUNTS,
                "truncating oversized bulk account request"
            );
            &pairs[..MAX_BULK_ACCOUNTS]
        } else {
            pairs
        };

        let url = format!("{}/api/v1/accounts/validate/bulk", self.base_url);
        let request = BulkRequest { accounts: pairs };

        let response = async {
            self.client
                .post(&url)
                .json(&request)
                .send()
                .await?
                .error_for_status()?
                .json::<BulkResponse>()
                .await
        }
        .await;

        match response {
            Ok(body) => {
                debug!(
                    total_requested = body.total_requested,
                    total_valid = body.total_valid,
                    total_invalid = body.total_invalid,
                    "bulk account validation returned"
                );
                body.results
            }
            Err(error) => {
                warn!(accounts = pairs.len(), %error, "bulk account validation call failed");
                Vec::new()
            }
        }
    }
}
