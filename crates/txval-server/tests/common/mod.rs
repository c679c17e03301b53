//! Shared test harness: wiremock downstreams seeded like the real services
//!
//! The config service knows ten bank codes and four transaction-type
//! minimums; the account service knows fifteen accounts in various states.
//! Responders derive their answers from the request, so one mount covers
//! every record in a fixture.

#![allow(dead_code)]

use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use txval_server::bulkhead::{
    PoolBulkhead, PoolBulkheadConfig, SemaphoreBulkhead, SemaphoreBulkheadConfig,
};
use txval_server::clients::{AccountValidationClient, ConfigServiceClient};
use txval_server::validate::RecordValidator;

/// Bank codes the config service recognises.
pub const VALID_BANK_CODES: &[&str] = &[
    "BCA", "BNI", "BRI", "MANDIRI", "CIMB", "DANAMON", "PERMATA", "BTN", "BSI", "OCBC",
];

/// Seeded accounts: (number, name, bank, status).
pub const SEEDED_ACCOUNTS: &[(&str, &str, &str, &str)] = &[
    ("1234567890", "Budi Santoso", "BCA", "ACTIVE"),
    ("0987654321", "Siti Rahayu", "BNI", "ACTIVE"),
    ("1122334455", "Ahmad Fauzi", "BRI", "ACTIVE"),
    ("5544332211", "Dewi Lestari", "MANDIRI", "ACTIVE"),
    ("6677889900", "Rudi Hermawan", "CIMB", "INACTIVE"),
    ("9900112233", "Rina Kusuma", "DANAMON", "ACTIVE"),
    ("3344556677", "Hendra Gunawan", "PERMATA", "BLOCKED"),
    ("7788990011", "Yuni Astuti", "BTN", "ACTIVE"),
    ("2233445566", "Fajar Nugroho", "BSI", "ACTIVE"),
    ("4455667788", "Indah Permata", "OCBC", "ACTIVE"),
    ("1357924680", "Wahyu Prasetyo", "BCA", "ACTIVE"),
    ("2468013579", "Maya Sari", "BRI", "ACTIVE"),
    ("1111222233", "Doni Kurniawan", "MANDIRI", "ACTIVE"),
    ("4444555566", "Lina Marlina", "BNI", "INACTIVE"),
    ("7777888899", "Agus Salim", "BSI", "ACTIVE"),
];

fn minimum_for(transaction_type: &str) -> Option<i64> {
    match transaction_type {
        "TRANSFER" => Some(10_000),
        "PAYMENT" => Some(1_000),
        "TOPUP" => Some(10_000),
        "WITHDRAWAL" => Some(50_000),
        _ => None,
    }
}

struct BankCodeResponder;

impl Respond for BankCodeResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let segments: Vec<&str> = request.url.path_segments().unwrap().collect();
        let code = segments[segments.len() - 2];
        let valid = VALID_BANK_CODES.contains(&code);

        ResponseTemplate::new(200).set_body_json(json!({
            "code": code,
            "valid": valid,
        }))
    }
}

struct TransactionLimitResponder;

impl Respond for TransactionLimitResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let segments: Vec<&str> = request.url.path_segments().unwrap().collect();
        let transaction_type = segments[segments.len() - 2].to_string();
        let amount: Decimal = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "amount")
            .and_then(|(_, value)| value.parse().ok())
            .unwrap_or_default();

        let valid = minimum_for(&transaction_type)
            .map(|minimum| amount >= Decimal::from(minimum))
            .unwrap_or(false);

        ResponseTemplate::new(200).set_body_json(json!({
            "transactionType": transaction_type,
            "amount": amount.to_string(),
            "valid": valid,
        }))
    }
}

struct BulkAccountResponder;

impl Respond for BulkAccountResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        let accounts = body["accounts"].as_array().cloned().unwrap_or_default();

        let results: Vec<serde_json::Value> = accounts
            .iter()
            .map(|entry| {
                let number = entry["accountNumber"].as_str().unwrap_or_default();
                let bank = entry["bankCode"].as_str().unwrap_or_default();
                match SEEDED_ACCOUNTS.iter().find(|(n, _, _, _)| *n == number) {
                    Some((number, name, bank, status)) => json!({
                        "accountNumber": number,
                        "bankCode": bank,
                        "accountName": name,
                        "valid": *status == "ACTIVE",
                        "status": status,
                        "reason": match *status {
                            "INACTIVE" => Some("Account is inactive"),
                            "BLOCKED" => Some("Account is blocked"),
                            _ => None,
                        },
                    }),
                    None => json!({
                        "accountNumber": number,
                        "bankCode": bank,
                        "valid": false,
                        "status": "NOT_FOUND",
                        "reason": "Account not found",
                    }),
                }
            })
            .collect();

        let total_valid = results
            .iter()
            .filter(|r| r["valid"] == serde_json::Value::Bool(true))
            .count();

        ResponseTemplate::new(200).set_body_json(json!({
            "totalRequested": results.len(),
            "totalValid": total_valid,
            "totalInvalid": results.len() - total_valid,
            "results": results,
        }))
    }
}

/// Start a config service double with the standard seed data.
pub async fn mock_config_service() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v1/config/bank-codes/[^/]+/validate$"))
        .respond_with(BankCodeResponder)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v1/config/transaction-limits/[^/]+/validate$"))
        .respond_with(TransactionLimitResponder)
        .mount(&server)
        .await;

    server
}

/// Start an account validation service double with the standard seed data.
pub async fn mock_account_service() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/accounts/validate/bulk"))
        .respond_with(BulkAccountResponder)
        .mount(&server)
        .await;

    server
}

/// Build the clients against the given mock endpoints.
pub fn build_clients(
    config_url: &str,
    account_url: &str,
) -> (Arc<ConfigServiceClient>, Arc<AccountValidationClient>) {
    let config_client = Arc::new(
        ConfigServiceClient::new(config_url.to_string(), Duration::from_secs(5)).unwrap(),
    );
    let account_client = Arc::new(
        AccountValidationClient::new(account_url.to_string(), Duration::from_secs(5)).unwrap(),
    );
    (config_client, account_client)
}

/// Build a validator with test-sized bulkheads against the given endpoints.
pub fn build_validator(config_url: &str, account_url: &str) -> Arc<RecordValidator> {
    let (config_client, account_client) = build_clients(config_url, account_url);

    let config_bulkhead = Arc::new(SemaphoreBulkhead::new(
        "configService",
        SemaphoreBulkheadConfig {
            max_concurrent_calls: 20,
            max_wait: Duration::from_millis(500),
        },
    ));
    let account_pool = Arc::new(PoolBulkhead::new(
        "accountValidation",
        PoolBulkheadConfig {
            core_pool_size: 2,
            max_pool_size: 4,
            queue_capacity: 16,
            keep_alive: Duration::from_millis(20),
        },
    ));

    Arc::new(RecordValidator::new(
        config_client,
        account_client,
        config_bulkhead,
        account_pool,
    ))
}

/// The 13-row integration fixture: 5 valid rows, then one row per failure
/// mode exercised by the seed data.
pub const FIXTURE_HEADER: &str = "referenceId,sourceAccount,sourceAccountName,sourceBankCode,beneficiaryAccount,beneficiaryAccountName,beneficiaryBankCode,currency,amount,transactionType,note";

pub const FIXTURE_ROWS: &[&str] = &[
    "TRX-T001,1234567890,Budi Santoso,BCA,0987654321,Siti Rahayu,BNI,IDR,500000,TRANSFER,salary",
    "TRX-T002,1122334455,Ahmad Fauzi,BRI,5544332211,Dewi Lestari,MANDIRI,IDR,250000,PAYMENT,invoice",
    "TRX-T003,9900112233,Rina Kusuma,DANAMON,7788990011,Yuni Astuti,BTN,IDR,100000,TOPUP,wallet",
    "TRX-T004,2233445566,Fajar Nugroho,BSI,4455667788,Indah Permata,OCBC,IDR,750000,TRANSFER,rent",
    "TRX-T005,1357924680,Wahyu Prasetyo,BCA,2468013579,Maya Sari,BRI,IDR,60000,WITHDRAWAL,cash",
    "TRX-T006,1234567890,Budi Santoso,BCA,6677889900,Rudi Hermawan,CIMB,IDR,200000,TRANSFER,gift",
    "TRX-T007,4444555566,Lina Marlina,BNI,0987654321,Siti Rahayu,BNI,IDR,100000,TRANSFER,loan",
    "TRX-T008,1234567890,Budi Santoso,BCA,3344556677,Hendra Gunawan,PERMATA,IDR,150000,TRANSFER,fee",
    "TRX-T009,1234567890,Budi Santoso,XENDIT,0987654321,Siti Rahayu,BNI,IDR,500000,TRANSFER,salary",
    "TRX-T010,1234567890,Budi Santoso,BCA,0987654321,Siti Rahayu,GOPAY,IDR,500000,TRANSFER,salary",
    "TRX-T011,1234567890,Budi Santoso,BCA,0987654321,Siti Rahayu,BNI,IDR,5000,TRANSFER,snack",
    "TRX-T012,9999999999,Ghost,BRI,1122334455,Ahmad Fauzi,BRI,IDR,100000,PAYMENT,mystery",
    "TRX-T013,1234567890,Budi Santoso,BCA,8888888888,Nobody,BNI,IDR,100000,TRANSFER,void",
];

/// Count of fixture rows expected to pass every check.
pub const FIXTURE_VALID_ROWS: usize = 5;

/// Write the fixture to a file under `dir` and return its path.
pub fn write_fixture(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("test-transactions.csv");
    let mut content = String::from(FIXTURE_HEADER);
    for row in FIXTURE_ROWS {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    std::fs::write(&path, content).unwrap();
    path
}
