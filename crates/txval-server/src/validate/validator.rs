//! Record validator
//!
//! Runs the four checks for one record and attaches the verdict:
//!
//! 1. source bank code recognised (config service)
//! 2. beneficiary bank code recognised (config service)
//! 3. amount meets the minimum for the transaction type (config service)
//! 4. both accounts valid (account validation service, one bulk call)
//!
//! Check 4 is handed to the pool bulkhead before check 1 starts, so the
//! dominant-latency bulk call overlaps the three short config calls. Checks
//! 1-3 run sequentially on the current task, each under a config-bulkhead
//! permit for the duration of its own HTTP call. Failing checks accumulate;
//! nothing short-circuits.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::batch::record::TransactionRecord;
use crate::bulkhead::{BulkheadError, PoolBulkhead, SemaphoreBulkhead};
use crate::clients::{AccountPair, AccountStatus, AccountValidationClient, ConfigServiceClient};

/// Reason attached when either bulkhead refuses admission for a check.
pub const BULKHEAD_FULL_REASON: &str = "validation could not be performed (bulkhead full)";

/// Reason attached when a check was cut short by shutdown.
pub const INTERRUPTED_REASON: &str = "validation interrupted";

/// Reason attached when the bulk account call produced no results at all.
pub const NO_RESULTS_REASON: &str = "account validation service returned no results";

/// Whether the worker may continue with the next record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Completed,
    /// The executor is going away; finish the current chunk and stop.
    Interrupted,
}

/// Orchestrates the four checks for one record under both bulkheads.
pub struct RecordValidator {
    config_client: Arc<ConfigServiceClient>,
    account_client: Arc<AccountValidationClient>,
    config_bulkhead: Arc<SemaphoreBulkhead>,
    account_pool: Arc<PoolBulkhead>,
}

impl RecordValidator {
    pub fn new(
        config_client: Arc<ConfigServiceClient>,
        account_client: Arc<AccountValidationClient>,
        config_bulkhead: Arc<SemaphoreBulkhead>,
        account_pool: Arc<PoolBulkhead>,
    ) -> Self {
        Self {
            config_client,
            account_client,
            config_bulkhead,
            account_pool,
        }
    }

    /// Validate one record and attach its verdict.
    ///
    /// Reasons accrue in check order: source bank, beneficiary bank, amount,
    /// then source and beneficiary account from the bulk result.
    pub async fn validate(&self, record: &mut TransactionRecord) -> ValidationOutcome {
        let mut reasons = Vec::new();
        let mut interrupted = false;

        // the bulk account call goes out first so it runs while the three
        // config checks occupy this task
        let pairs = vec![
            AccountPair {
                account_number: record.source_account.clone(),
                bank_code: record.source_bank_code.clone(),
            },
            AccountPair {
                account_number: record.beneficiary_account.clone(),
                bank_code: record.beneficiary_bank_code.clone(),
            },
        ];
        let account_client = Arc::clone(&self.account_client);
        let account_call = self
            .account_pool
            .submit(async move { account_client.validate_bulk(&pairs).await });

        // check 1: source bank code
        match self
            .config_bulkhead
            .run(self.config_client.is_bank_code_valid(&record.source_bank_code))
            .await
        {
            Ok(true) => {}
            Ok(false) => reasons.push(format!(
                "sourceBankCode '{}' is not a recognised bank code",
                record.source_bank_code
            )),
            Err(error) => interrupted |= self.bulkhead_reason(error, &mut reasons),
        }

        // check 2: beneficiary bank code
        match self
            .config_bulkhead
            .run(
                self.config_client
                    .is_bank_code_valid(&record.beneficiary_bank_code),
            )
            .await
        {
            Ok(true) => {}
            Ok(false) => reasons.push(format!(
                "beneficiaryBankCode '{}' is not a recognised bank code",
                record.beneficiary_bank_code
            )),
            Err(error) => interrupted |= self.bulkhead_reason(error, &mut reasons),
        }

        // check 3: amount against the minimum for the type
        match self
            .config_bulkhead
            .run(
                self.config_client
                    .is_amount_valid(record.transaction_type.as_str(), record.amount),
            )
            .await
        {
            Ok(true) => {}
            Ok(false) => reasons.push(format!(
                "amount {} is below the minimum for {}",
                record.amount, record.transaction_type
            )),
            Err(error) => interrupted |= self.bulkhead_reason(error, &mut reasons),
        }

        // check 4: join the bulk account result
        match account_call {
            Ok(handle) => match handle.join().await {
                Ok(results) => self.account_reasons(record, results, &mut reasons),
                Err(error) => interrupted |= self.bulkhead_reason(error, &mut reasons),
            },
            Err(error) => interrupted |= self.bulkhead_reason(error, &mut reasons),
        }

        if reasons.is_empty() {
            debug!(reference_id = %record.reference_id, "record valid");
        } else {
            debug!(
                reference_id = %record.reference_id,
                reasons = reasons.len(),
                "record invalid"
            );
        }
        record.attach_verdict(reasons);

        if interrupted {
            ValidationOutcome::Interrupted
        } else {
            ValidationOutcome::Completed
        }
    }

    /// Map a bulkhead refusal to its record-level reason; true means the
    /// worker should wind down.
    fn bulkhead_reason(&self, error: BulkheadError, reasons: &mut Vec<String>) -> bool {
        match error {
            BulkheadError::Full(name) => {
                warn!(bulkhead = %name, "check skipped, bulkhead full");
                reasons.push(BULKHEAD_FULL_REASON.to_string());
                false
            }
            BulkheadError::Interrupted(name) => {
                warn!(bulkhead = %name, "check interrupted");
                reasons.push(INTERRUPTED_REASON.to_string());
                true
            }
        }
    }

    /// Derive the source/beneficiary account reasons from the bulk result.
    fn account_reasons(
        &self,
        record: &TransactionRecord,
        results: Vec<AccountStatus>,
        reasons: &mut Vec<String>,
    ) {
        if results.is_empty() {
            reasons.push(NO_RESULTS_REASON.to_string());
            return;
        }

        // index by account number; the downstream may reorder or duplicate,
        // and the first occurrence wins
        let mut by_account: HashMap<&str, &AccountStatus> = HashMap::new();
        for status in &results {
            by_account.entry(status.account_number.as_str()).or_insert(status);
        }

        for (field, account) in [
            ("sourceAccount", record.source_account.as_str()),
            ("beneficiaryAccount", record.beneficiary_account.as_str()),
        ] {
            match by_account.get(account) {
                Some(status) if status.valid => {}
                Some(status) => reasons.push(format!(
                    "{field} '{account}' is invalid ({})",
                    status.status
                )),
                None => reasons.push(format!("{field} '{account}' is invalid (NOT_FOUND)")),
            }
        }
    }
}
