//! Range-bounded transaction reader
//!
//! Reads exactly one partition's slice of the input file: skip everything
//! before `start_line` (header included), then yield parsed records until
//! `end_line` or end of file. Single-use; each partition worker owns its own
//! instance.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;
use tracing::{debug, warn};

use super::partition::Partition;
use super::record::TransactionRecord;

/// Reader over one partition's line range.
pub struct RangeReader {
    lines: Lines<BufReader<File>>,
    /// Lines of the assigned range not yet consumed.
    remaining: u64,
    /// Lines inside the range that failed to parse and were dropped.
    skipped: u64,
    partition_index: usize,
}

impl RangeReader {
    /// Open `path` positioned at the partition's first data line.
    pub fn open(path: &Path, partition: &Partition) -> io::Result<Self> {
        debug!(
            partition = partition.index,
            start_line = partition.start_line,
            end_line = partition.end_line,
            path = %path.display(),
            "opening range reader"
        );

        let file = File::open(path)?;
        let mut lines = BufReader::new(file).lines();

        // skip header + all lines belonging to earlier partitions
        for _ in 0..partition.start_line.saturating_sub(1) {
            if lines.next().transpose()?.is_none() {
                break;
            }
        }

        Ok(Self {
            lines,
            remaining: partition.len(),
            skipped: 0,
            partition_index: partition.index,
        })
    }

    /// Pull up to `chunk_size` records from the assigned range.
    ///
    /// An empty vec means the range is exhausted. Unparseable lines are
    /// dropped with a warning and counted via [`RangeReader::skipped`]; they
    /// consume range budget but never surface as records.
    pub fn read_chunk(&mut self, chunk_size: usize) -> io::Result<Vec<TransactionRecord>> {
        let mut records = Vec::with_capacity(chunk_size.min(self.remaining as usize));

        while records.len() < chunk_size && self.remaining > 0 {
            let line = match self.lines.next().transpose()? {
                Some(line) => line,
                None => {
                    self.remaining = 0;
                    break;
                }
            };
            self.remaining -= 1;

            match TransactionRecord::parse_row(&line) {
                Ok(record) => records.push(record),
                Err(error) => {
                    self.skipped += 1;
                    warn!(
                        partition = self.partition_index,
                        %error,
                        "skipping unparseable line"
                    );
                }
            }
        }

        Ok(records)
    }

    /// Number of unparseable lines dropped so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "referenceId,sourceAccount,sourceAccountName,sourceBankCode,beneficiaryAccount,beneficiaryAccountName,beneficiaryBankCode,currency,amount,transactionType,note";

    fn fixture(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn row(reference: &str) -> String {
        format!("{reference},111,Src Name,BCA,222,Ben Name,BNI,IDR,50000,TRANSFER,note")
    }

    #[test]
    fn test_reads_only_assigned_range() {
        let rows: Vec<String> = (1..=6).map(|i| row(&format!("TRX-{i:03}"))).collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let file = fixture(&refs);

        let partition = Partition {
            index: 1,
            start_line: 4,
            end_line: 5,
        };
        let mut reader = RangeReader::open(file.path(), &partition).unwrap();

        let chunk = reader.read_chunk(100).unwrap();
        assert_eq!(chunk.len(), 2);
        assert_eq!(chunk[0].reference_id, "TRX-003");
        assert_eq!(chunk[1].reference_id, "TRX-004");

        assert!(reader.read_chunk(100).unwrap().is_empty());
    }

    #[test]
    fn test_chunked_reads_preserve_order() {
        let rows: Vec<String> = (1..=5).map(|i| row(&format!("TRX-{i:03}"))).collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let file = fixture(&refs);

        let partition = Partition {
            index: 0,
            start_line: 2,
            end_line: 6,
        };
        let mut reader = RangeReader::open(file.path(), &partition).unwrap();

        let first = reader.read_chunk(2).unwrap();
        let second = reader.read_chunk(2).unwrap();
        let third = reader.read_chunk(2).unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(third.len(), 1);
        assert_eq!(first[0].reference_id, "TRX-001");
        assert_eq!(third[0].reference_id, "TRX-005");
        assert!(reader.read_chunk(2).unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_lines_are_skipped_and_counted() {
        let good = row("TRX-001");
        let also_good = row("TRX-002");
        let file = fixture(&[&good, "only,three,columns", &also_good]);

        let partition = Partition {
            index: 0,
            start_line: 2,
            end_line: 4,
        };
        let mut reader = RangeReader::open(file.path(), &partition).unwrap();

        let chunk = reader.read_chunk(100).unwrap();
        assert_eq!(chunk.len(), 2);
        assert_eq!(reader.skipped(), 1);
    }

    #[test]
    fn test_range_past_end_of_file() {
        let only = row("TRX-001");
        let file = fixture(&[&only]);

        let partition = Partition {
            index: 3,
            start_line: 40,
            end_line: 49,
        };
        let mut reader = RangeReader::open(file.path(), &partition).unwrap();
        assert!(reader.read_chunk(10).unwrap().is_empty());
    }
}
