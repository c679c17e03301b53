//! Client for the config service
//!
//! Two operations are used during validation: bank-code lookup and
//! transaction-limit checking. Failures map to `false` with a warning.

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP facade over the config service.
pub struct ConfigServiceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BankCodeValidation {
    code: String,
    valid: bool,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmountValidation {
    transaction_type: String,
    amount: Decimal,
    valid: bool,
    #[serde(default)]
    message: Option<String>,
}

impl ConfigServiceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// `GET /api/v1/config/bank-codes/{code}/validate`
    ///
    /// Returns `false` on any transport or decode failure.
    pub async fn is_bank_code_valid(&self, bank_code: &str) -> bool {
        let url = format!(
            "{}/api/v1/config/bank-codes/{}/validate",
            self.base_url, bank_code
        );

        match self.fetch_json::<BankCodeValidation>(&url).await {
            Ok(body) => {
                debug!(code = %body.code, valid = body.valid, name = ?body.name, "bank code checked");
                body.valid
            }
            Err(error) => {
                warn!(bank_code, %error, "bank code validation call failed");
                false
            }
        }
    }

    /// `GET /api/v1/config/transaction-limits/{type}/validate?amount=`
    ///
    /// Returns `false` on any transport or decode failure.
    pub async fn is_amount_valid(&self, transaction_type: &str, amount: Decimal) -> bool {
        let url = format!(
            "{}/api/v1/config/transaction-limits/{}/validate?amount={}",
            self.base_url, transaction_type, amount
        );

        match self.fetch_json::<AmountValidation>(&url).await {
            Ok(body) => {
                debug!(
                    transaction_type = %body.transaction_type,
                    amount = %body.amount,
                    valid = body.valid,
                    message = ?body.message,
                    "amount checked"
                );
                body.valid
            }
            Err(error) => {
                warn!(transaction_type, %amount, %error, "amount validation call failed");
                false
            }
        }
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> reqwest::Result<T> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }
}
