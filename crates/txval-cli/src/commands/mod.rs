//! CLI command implementations

pub mod start;
pub mod status;

use colored::Colorize;

use crate::api::JobStatusProjection;

/// Colour a job or step status for terminal output.
pub(crate) fn paint_status(status: &str) -> colored::ColoredString {
    match status {
        "COMPLETED" => status.green(),
        "FAILED" => status.red(),
        _ => status.yellow(),
    }
}

/// Render the full status projection.
pub(crate) fn print_projection(projection: &JobStatusProjection) {
    println!("{}", "Job:".cyan().bold());
    println!("  ID:      {}", projection.job_id);
    println!("  Name:    {}", projection.job_name);
    println!("  Status:  {}", paint_status(&projection.status));
    println!("  Started: {}", projection.start_time);
    if let Some(end_time) = projection.end_time {
        println!("  Ended:   {}", end_time);
    }
    println!("  Elapsed: {} ms", projection.elapsed_ms);
    println!();

    if !projection.partitions.is_empty() {
        println!("{}", "Partitions:".cyan().bold());
        for partition in &projection.partitions {
            println!(
                "  {}  {}  read={} written={} skipped={} filtered={}",
                partition.name,
                paint_status(&partition.status),
                partition.read_count,
                partition.write_count,
                partition.skip_count,
                partition.filter_count,
            );
        }
        println!();
    }

    let totals = &projection.aggregate;
    println!("{}", "Totals:".cyan().bold());
    println!(
        "  partitions={} completed={} running={} failed={}",
        totals.total_partitions, totals.completed, totals.running, totals.failed
    );
    println!(
        "  read={} written={} skipped={} filtered={}",
        totals.total_read, totals.total_written, totals.total_skipped, totals.total_filtered
    );
}
