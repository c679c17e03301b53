//! Transaction record model
//!
//! One [`TransactionRecord`] corresponds to one data row of the input file.
//! Records are born in the range reader, receive their verdict exactly once
//! in the validator, and die in the dual-sink writer.

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Number of columns when the optional note column is present.
pub const COLUMNS_WITH_NOTE: usize = 11;

/// Number of columns when the note column is absent.
pub const COLUMNS_WITHOUT_NOTE: usize = 10;

/// Transaction type over the downstream's known set.
///
/// Unknown tokens are preserved verbatim in [`TransactionType::Other`]; they
/// parse fine and fail later on the transaction-limit check, which is the
/// behaviour the downstream contract expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionType {
    Transfer,
    Payment,
    Topup,
    Withdrawal,
    Other(String),
}

impl TransactionType {
    pub fn parse(token: &str) -> Self {
        match token {
            "TRANSFER" => TransactionType::Transfer,
            "PAYMENT" => TransactionType::Payment,
            "TOPUP" => TransactionType::Topup,
            "WITHDRAWAL" => TransactionType::Withdrawal,
            other => TransactionType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TransactionType::Transfer => "TRANSFER",
            TransactionType::Payment => "PAYMENT",
            TransactionType::Topup => "TOPUP",
            TransactionType::Withdrawal => "WITHDRAWAL",
            TransactionType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row could not be mapped onto the transaction schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowParseError {
    #[error("expected {COLUMNS_WITHOUT_NOTE} or {COLUMNS_WITH_NOTE} columns, found {found}")]
    ColumnCount { found: usize },
}

/// In-memory representation of one transaction row plus its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub reference_id: String,
    pub source_account: String,
    pub source_account_name: String,
    pub source_bank_code: String,
    pub beneficiary_account: String,
    pub beneficiary_account_name: String,
    pub beneficiary_bank_code: String,
    pub currency: String,
    pub amount: Decimal,
    pub transaction_type: TransactionType,
    pub note: String,

    /// `true` until the validator finds at least one failing check.
    pub valid: bool,
    /// `"; "`-joined failure reasons; `None` while the record is valid.
    pub validation_errors: Option<String>,
}

impl TransactionRecord {
    /// Parse one comma-delimited data row.
    ///
    /// All fields are trimmed. The note column is optional; a 10-column row
    /// parses with an empty note. A malformed amount is not fatal: it becomes
    /// zero and the record then fails the transaction-limit check naturally.
    pub fn parse_row(line: &str) -> Result<Self, RowParseError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        if fields.len() != COLUMNS_WITH_NOTE && fields.len() != COLUMNS_WITHOUT_NOTE {
            return Err(RowParseError::ColumnCount {
                found: fields.len(),
            });
        }

        let amount = fields[8].parse::<Decimal>().unwrap_or(Decimal::ZERO);
        let note = fields.get(10).copied().unwrap_or_default();

        Ok(Self {
            reference_id: fields[0].to_string(),
            source_account: fields[1].to_string(),
            source_account_name: fields[2].to_string(),
            source_bank_code: fields[3].to_string(),
            beneficiary_account: fields[4].to_string(),
            beneficiary_account_name: fields[5].to_string(),
            beneficiary_bank_code: fields[6].to_string(),
            currency: fields[7].to_string(),
            amount,
            transaction_type: TransactionType::parse(fields[9]),
            note: note.to_string(),
            valid: true,
            validation_errors: None,
        })
    }

    /// Attach the validation verdict. Called exactly once per record.
    ///
    /// An empty reason list leaves the record valid; a non-empty list flips
    /// it to invalid with the joined reasons attached.
    pub fn attach_verdict(&mut self, reasons: Vec<String>) {
        if reasons.is_empty() {
            return;
        }
        self.valid = false;
        self.validation_errors = Some(reasons.join("; "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_row_with_note() {
        let record = TransactionRecord::parse_row(
            "TRX-T001,1234567890,Budi Santoso,BCA,0987654321,Siti Rahayu,BNI,IDR,500000,TRANSFER,salary",
        )
        .unwrap();

        assert_eq!(record.reference_id, "TRX-T001");
        assert_eq!(record.source_account, "1234567890");
        assert_eq!(record.source_account_name, "Budi Santoso");
        assert_eq!(record.source_bank_code, "BCA");
        assert_eq!(record.beneficiary_account, "0987654321");
        assert_eq!(record.beneficiary_account_name, "Siti Rahayu");
        assert_eq!(record.beneficiary_bank_code, "BNI");
        assert_eq!(record.currency, "IDR");
        assert_eq!(record.amount, dec!(500000));
        assert_eq!(record.transaction_type, TransactionType::Transfer);
        assert_eq!(record.note, "salary");
        assert!(record.valid);
        assert!(record.validation_errors.is_none());
    }

    #[test]
    fn test_parse_row_without_note() {
        let record = TransactionRecord::parse_row(
            "TRX-T002,1122334455,Ahmad Fauzi,BRI,5544332211,Dewi Lestari,MANDIRI,IDR,250000,PAYMENT",
        )
        .unwrap();

        assert_eq!(record.note, "");
        assert_eq!(record.transaction_type, TransactionType::Payment);
    }

    #[test]
    fn test_parse_row_trims_whitespace() {
        let record = TransactionRecord::parse_row(
            " TRX-T003 , 111 , Name , BCA , 222 , Other , BNI , IDR , 100 , TOPUP , hello ",
        )
        .unwrap();

        assert_eq!(record.reference_id, "TRX-T003");
        assert_eq!(record.source_account, "111");
        assert_eq!(record.note, "hello");
        assert_eq!(record.amount, dec!(100));
    }

    #[test]
    fn test_parse_row_malformed_amount_becomes_zero() {
        let record = TransactionRecord::parse_row(
            "TRX-T004,111,Name,BCA,222,Other,BNI,IDR,not-a-number,TRANSFER",
        )
        .unwrap();

        assert_eq!(record.amount, Decimal::ZERO);
    }

    #[test]
    fn test_parse_row_wrong_column_count() {
        let err = TransactionRecord::parse_row("a,b,c").unwrap_err();
        assert_eq!(err, RowParseError::ColumnCount { found: 3 });

        let err = TransactionRecord::parse_row(
            "a,b,c,d,e,f,g,h,1,TRANSFER,note,extra",
        )
        .unwrap_err();
        assert_eq!(err, RowParseError::ColumnCount { found: 12 });
    }

    #[test]
    fn test_unknown_transaction_type_is_preserved() {
        let ty = TransactionType::parse("CRYPTO_SWAP");
        assert_eq!(ty, TransactionType::Other("CRYPTO_SWAP".to_string()));
        assert_eq!(ty.to_string(), "CRYPTO_SWAP");
    }

    #[test]
    fn test_attach_verdict_empty_keeps_valid() {
        let mut record =
            TransactionRecord::parse_row("r,s,sn,BCA,b,bn,BNI,IDR,100,TRANSFER").unwrap();
        record.attach_verdict(Vec::new());
        assert!(record.valid);
        assert!(record.validation_errors.is_none());
    }

    #[test]
    fn test_attach_verdict_joins_reasons() {
        let mut record =
            TransactionRecord::parse_row("r,s,sn,BCA,b,bn,BNI,IDR,100,TRANSFER").unwrap();
        record.attach_verdict(vec!["first reason".to_string(), "second reason".to_string()]);
        assert!(!record.valid);
        assert_eq!(
            record.validation_errors.as_deref(),
            Some("first reason; second reason")
        );
    }
}
