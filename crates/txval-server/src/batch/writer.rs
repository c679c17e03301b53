//! Dual-sink result writer
//!
//! Each partition owns one pair of output files: records that passed every
//! check go to `valid-p<i>-<ms>.csv`, the rest to `invalid-p<i>-<ms>.csv`.
//! Both are truncated on open and start with a header line. Fields are
//! comma-joined without quoting; the input contract guarantees fields free of
//! commas, quotes and line breaks.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use super::record::TransactionRecord;

/// Header of the valid-records file.
pub const VALID_HEADER: &str = "referenceId,sourceAccount,sourceAccountName,sourceBankCode,beneficiaryAccount,beneficiaryAccountName,beneficiaryBankCode,currency,amount,transactionType,note";

/// Header of the invalid-records file.
pub const INVALID_HEADER: &str = "referenceId,sourceAccount,sourceBankCode,beneficiaryAccount,beneficiaryBankCode,currency,amount,transactionType,validationErrors";

/// Per-partition writer with one stream per verdict.
pub struct DualSinkWriter {
    valid: BufWriter<File>,
    invalid: BufWriter<File>,
    valid_path: PathBuf,
    invalid_path: PathBuf,
    valid_count: u64,
    invalid_count: u64,
    partition_index: usize,
}

impl DualSinkWriter {
    /// Create both output files under `output_dir`, truncating any previous
    /// run's files of the same name. The millisecond timestamp in the file
    /// names is taken once, at open.
    pub fn open(output_dir: &Path, partition_index: usize) -> io::Result<Self> {
        std::fs::create_dir_all(output_dir)?;

        let ts = chrono::Utc::now().timestamp_millis();
        let valid_path = output_dir.join(format!("valid-p{partition_index}-{ts}.csv"));
        let invalid_path = output_dir.join(format!("invalid-p{partition_index}-{ts}.csv"));

        let mut valid = BufWriter::new(File::create(&valid_path)?);
        let mut invalid = BufWriter::new(File::create(&invalid_path)?);
        writeln!(valid, "{VALID_HEADER}")?;
        writeln!(invalid, "{INVALID_HEADER}")?;

        info!(
            partition = partition_index,
            valid_file = %valid_path.display(),
            invalid_file = %invalid_path.display(),
            "opened partition output files"
        );

        Ok(Self {
            valid,
            invalid,
            valid_path,
            invalid_path,
            valid_count: 0,
            invalid_count: 0,
            partition_index,
        })
    }

    /// Append one validated chunk, preserving its order within each sink.
    pub fn write(&mut self, chunk: &[TransactionRecord]) -> io::Result<()> {
        for record in chunk {
            if record.valid {
                writeln!(self.valid, "{}", valid_row(record))?;
                self.valid_count += 1;
            } else {
                writeln!(self.invalid, "{}", invalid_row(record))?;
                self.invalid_count += 1;
            }
        }
        Ok(())
    }

    /// Flush and close both streams, reporting final per-sink counts.
    pub fn close(mut self) -> io::Result<(u64, u64)> {
        self.valid.flush()?;
        self.invalid.flush()?;

        info!(
            partition = self.partition_index,
            valid = self.valid_count,
            invalid = self.invalid_count,
            "partition output complete"
        );

        Ok((self.valid_count, self.invalid_count))
    }

    pub fn valid_path(&self) -> &Path {
        &self.valid_path
    }

    pub fn invalid_path(&self) -> &Path {
        &self.invalid_path
    }
}

fn valid_row(record: &TransactionRecord) -> String {
    [
        record.reference_id.as_str(),
        record.source_account.as_str(),
        record.source_account_name.as_str(),
        record.source_bank_code.as_str(),
        record.beneficiary_account.as_str(),
        record.beneficiary_account_name.as_str(),
        record.beneficiary_bank_code.as_str(),
        record.currency.as_str(),
        &record.amount.to_string(),
        record.transaction_type.as_str(),
        record.note.as_str(),
    ]
    .join(",")
}

fn invalid_row(record: &TransactionRecord) -> String {
    [
        record.reference_id.as_str(),
        record.source_account.as_str(),
        record.source_bank_code.as_str(),
        record.beneficiary_account.as_str(),
        record.beneficiary_bank_code.as_str(),
        record.currency.as_str(),
        &record.amount.to_string(),
        record.transaction_type.as_str(),
        record.validation_errors.as_deref().unwrap_or_default(),
    ]
    .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(reference: &str, valid: bool) -> TransactionRecord {
        let mut record = TransactionRecord::parse_row(&format!(
            "{reference},111,Src Name,BCA,222,Ben Name,BNI,IDR,50000,TRANSFER,note"
        ))
        .unwrap();
        if !valid {
            record.attach_verdict(vec!["amount 50000 is below the minimum for TRANSFER".to_string()]);
        }
        record
    }

    #[test]
    fn test_routes_records_by_verdict() {
        let dir = TempDir::new().unwrap();
        let mut writer = DualSinkWriter::open(dir.path(), 0).unwrap();

        let chunk = vec![
            sample("TRX-001", true),
            sample("TRX-002", false),
            sample("TRX-003", true),
        ];
        writer.write(&chunk).unwrap();

        let valid_path = writer.valid_path().to_path_buf();
        let invalid_path = writer.invalid_path().to_path_buf();
        let (valid_count, invalid_count) = writer.close().unwrap();
        assert_eq!((valid_count, invalid_count), (2, 1));

        let valid_content = std::fs::read_to_string(valid_path).unwrap();
        let valid_lines: Vec<&str> = valid_content.lines().collect();
        assert_eq!(valid_lines[0], VALID_HEADER);
        assert_eq!(valid_lines.len(), 3);
        assert!(valid_lines[1].starts_with("TRX-001,"));
        assert!(valid_lines[2].starts_with("TRX-003,"));

        let invalid_content = std::fs::read_to_string(invalid_path).unwrap();
        let invalid_lines: Vec<&str> = invalid_content.lines().collect();
        assert_eq!(invalid_lines[0], INVALID_HEADER);
        assert_eq!(invalid_lines.len(), 2);
        assert_eq!(
            invalid_lines[1],
            "TRX-002,111,BCA,222,BNI,IDR,50000,TRANSFER,amount 50000 is below the minimum for TRANSFER"
        );
    }

    #[test]
    fn test_file_names_carry_partition_index() {
        let dir = TempDir::new().unwrap();
        let writer = DualSinkWriter::open(dir.path(), 7).unwrap();

        let valid_name = writer.valid_path().file_name().unwrap().to_string_lossy().to_string();
        let invalid_name = writer.invalid_path().file_name().unwrap().to_string_lossy().to_string();
        writer.close().unwrap();

        assert!(valid_name.starts_with("valid-p7-"));
        assert!(valid_name.ends_with(".csv"));
        assert!(invalid_name.starts_with("invalid-p7-"));
    }

    #[test]
    fn test_row_round_trips_through_parse() {
        let record = sample("TRX-RT", true);
        let reparsed = TransactionRecord::parse_row(&valid_row(&record)).unwrap();
        assert_eq!(reparsed, record);
    }

    #[test]
    fn test_empty_partition_leaves_headers_only() {
        let dir = TempDir::new().unwrap();
        let writer = DualSinkWriter::open(dir.path(), 0).unwrap();
        let valid_path = writer.valid_path().to_path_buf();
        let (valid_count, invalid_count) = writer.close().unwrap();

        assert_eq!((valid_count, invalid_count), (0, 0));
        assert_eq!(
            std::fs::read_to_string(valid_path).unwrap(),
            format!("{VALID_HEADER}\n")
        );
    }
}
