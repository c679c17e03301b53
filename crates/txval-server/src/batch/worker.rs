//! Partition worker
//!
//! One worker per partition: pull a chunk from the reader, validate every
//! record, write the chunk, publish counters, repeat until the range is
//! exhausted. The worker owns its reader and writer; nothing is shared with
//! sibling partitions except the process-wide validator and the job store.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::partition::Partition;
use super::reader::RangeReader;
use super::writer::DualSinkWriter;
use crate::jobs::{JobId, JobRepository, StepStatus};
use crate::validate::{RecordValidator, ValidationOutcome};

/// Chunk-oriented step executor for one partition.
pub struct PartitionWorker {
    partition: Partition,
    input_file: PathBuf,
    output_dir: PathBuf,
    chunk_size: usize,
    validator: Arc<RecordValidator>,
    repository: JobRepository,
    job_id: JobId,
}

impl PartitionWorker {
    pub fn new(
        partition: Partition,
        input_file: PathBuf,
        output_dir: PathBuf,
        chunk_size: usize,
        validator: Arc<RecordValidator>,
        repository: JobRepository,
        job_id: JobId,
    ) -> Self {
        Self {
            partition,
            input_file,
            output_dir,
            chunk_size,
            validator,
            repository,
            job_id,
        }
    }

    /// Run the step to completion and report its terminal status.
    ///
    /// Record-level failures stay in the invalid output stream; only reader
    /// or writer I/O failures (and interruption) fail the step. A failed
    /// step keeps whatever output it managed to write.
    pub async fn run(self) -> StepStatus {
        let step_name = format!("partition-{}", self.partition.index);
        self.repository.add_step(self.job_id, &step_name);

        let mut reader = match RangeReader::open(&self.input_file, &self.partition) {
            Ok(reader) => reader,
            Err(error) => {
                error!(step = %step_name, %error, "failed to open input range");
                self.repository
                    .finish_step(self.job_id, &step_name, StepStatus::Failed);
                return StepStatus::Failed;
            }
        };

        let mut writer = match DualSinkWriter::open(&self.output_dir, self.partition.index) {
            Ok(writer) => writer,
            Err(error) => {
                error!(step = %step_name, %error, "failed to open output files");
                self.repository
                    .finish_step(self.job_id, &step_name, StepStatus::Failed);
                return StepStatus::Failed;
            }
        };

        let mut read_total: u64 = 0;
        let mut write_total: u64 = 0;
        let mut status = StepStatus::Completed;

        loop {
            let mut chunk = match reader.read_chunk(self.chunk_size) {
                Ok(chunk) => chunk,
                Err(error) => {
                    error!(step = %step_name, %error, "read failed mid-stream");
                    status = StepStatus::Failed;
                    break;
                }
            };
            if chunk.is_empty() {
                break;
            }

            let mut interrupted = false;
            for record in &mut chunk {
                if self.validator.validate(record).await == ValidationOutcome::Interrupted {
                    interrupted = true;
                }
            }

            if let Err(error) = writer.write(&chunk) {
                error!(step = %step_name, %error, "write failed mid-stream");
                status = StepStatus::Failed;
                break;
            }

            read_total += chunk.len() as u64;
            write_total += chunk.len() as u64;
            self.repository.update_step_counters(
                self.job_id,
                &step_name,
                read_total,
                write_total,
                reader.skipped(),
                0,
            );

            if interrupted {
                warn!(step = %step_name, "interrupted, stopping after current chunk");
                status = StepStatus::Failed;
                break;
            }
        }

        // a final publish covers ranges whose tail parsed to nothing
        self.repository.update_step_counters(
            self.job_id,
            &step_name,
            read_total,
            write_total,
            reader.skipped(),
            0,
        );

        match writer.close() {
            Ok((valid, invalid)) => {
                info!(
                    step = %step_name,
                    read = read_total,
                    written = write_total,
                    valid,
                    invalid,
                    "step finished"
                );
            }
            Err(error) => {
                error!(step = %step_name, %error, "failed to close output files");
                status = StepStatus::Failed;
            }
        }

        self.repository.finish_step(self.job_id, &step_name, status);
        status
    }
}
