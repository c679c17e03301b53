//! Batch pipeline core
//!
//! The partitioned read-validate-write pipeline:
//!
//! ```text
//! JobCoordinator
//!     ├── partition_lines      (total data lines → up to grid_size ranges)
//!     └── PartitionWorker × G  (one tokio task per range)
//!             ├── RangeReader      (reads the assigned line range in chunks)
//!             ├── RecordValidator  (four checks under the two bulkheads)
//!             └── DualSinkWriter   (valid / invalid output files)
//! ```

pub mod coordinator;
pub mod partition;
pub mod reader;
pub mod record;
pub mod worker;
pub mod writer;

pub use coordinator::{BatchOptions, JobCoordinator, JOB_NAME};
pub use partition::{partition_lines, Partition};
pub use reader::RangeReader;
pub use record::{TransactionRecord, TransactionType};
pub use worker::PartitionWorker;
pub use writer::{DualSinkWriter, INVALID_HEADER, VALID_HEADER};
