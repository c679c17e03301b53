//! Line-range partitioner
//!
//! Splits the data lines of the input file into up to `grid_size` contiguous,
//! disjoint ranges. Line numbers are 1-based; line 1 is always the header, so
//! data occupies `[2, n + 1]` for a file with `n` data rows.

use tracing::{debug, info};

/// A contiguous subrange of data lines assigned to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// Zero-based partition index; used for step and output file naming.
    pub index: usize,
    /// First data line of the range (1-based, inclusive, always >= 2).
    pub start_line: u64,
    /// Last data line of the range (1-based, inclusive).
    pub end_line: u64,
}

impl Partition {
    /// Number of data lines covered by this range.
    pub fn len(&self) -> u64 {
        self.end_line + 1 - self.start_line
    }

    pub fn is_empty(&self) -> bool {
        self.end_line < self.start_line
    }
}

/// Split `total_data_lines` rows into up to `grid_size` line ranges.
///
/// Each range holds `ceil(total / grid_size)` lines except possibly the last.
/// Fewer than `grid_size` partitions come back when there are fewer rows than
/// grid slots; zero rows yield zero partitions. Output is deterministic for
/// fixed inputs.
pub fn partition_lines(total_data_lines: u64, grid_size: usize) -> Vec<Partition> {
    assert!(grid_size >= 1, "grid_size must be at least 1");

    let grid = grid_size as u64;
    let per_partition = total_data_lines.div_ceil(grid);
    let mut partitions = Vec::new();

    for i in 0..grid {
        // +1 offset because line 1 is the header; data starts at line 2
        let start_line = 2 + i * per_partition;
        if start_line > total_data_lines + 1 {
            break;
        }
        let end_line = (start_line + per_partition - 1).min(total_data_lines + 1);

        debug!(partition = i, start_line, end_line, "partition range");

        partitions.push(Partition {
            index: i as usize,
            start_line,
            end_line,
        });
    }

    info!(
        partitions = partitions.len(),
        total_data_lines,
        grid_size,
        "partitioned input"
    );

    partitions
}
