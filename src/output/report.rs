//! Human-readable summaries of a reconciliation.

use super::terminal::{marker, ranges_label, warning};
use crate::models::RangeCollection;
use crate::processing::{DiffResult, Outcome, ReconciliationResult};

/// Maximum number of added/removed ranges listed individually.
pub const MAX_LISTED: usize = 10;

/// Format a [`DiffResult`].
///
/// Every partition is always printed, even when empty, so the output has the
/// same shape on every run. Listing order follows the diff.
pub fn format(diff: &DiffResult) -> String {
    let headline = if diff.is_new {
        "New IPList"
    } else if diff.has_changes() {
        "IP ranges have changed"
    } else {
        "IP ranges are unchanged"
    };
    let mut lines = vec![format!(
        "{headline}: existing {}, new {}",
        ranges_label(diff.old_len()),
        ranges_label(diff.new_len())
    )];
    lines.extend(partition_lines("Added", '+', &diff.added));
    lines.extend(partition_lines("Removed", '-', &diff.removed));
    lines.push(format!("  Unchanged: {}", ranges_label(diff.unchanged.len())));
    lines.join("\n")
}

fn partition_lines(title: &str, sign: char, ranges: &RangeCollection) -> Vec<String> {
    let mut lines = vec![format!("  {title}: {}", ranges_label(ranges.len()))];
    lines.extend(
        ranges
            .iter()
            .take(MAX_LISTED)
            .map(|range| format!("    {sign} {range}")),
    );
    if ranges.len() > MAX_LISTED {
        lines.push(format!("    ... and {} more", ranges.len() - MAX_LISTED));
    }
    lines
}

/// Print the final result of a run to stdout.
pub fn print_result(result: &ReconciliationResult) {
    println!("{}", result.diff_summary);
    if let Some(href) = &result.href {
        println!("IPList href: {href}");
    }
    if let Some(outcome) = &result.provisioning_outcome {
        println!("Policy version: {}", outcome.version);
        println!("Workloads affected: {}", outcome.workloads_affected);
    }
    match result.outcome() {
        Outcome::UpToDate => println!(
            "\n{} Completed successfully (no changes to provision)!",
            marker(true)
        ),
        Outcome::DryRun => println!(
            "\n{} Dry run: changes detected, nothing written",
            marker(true)
        ),
        Outcome::Updated => println!("\n{} Completed successfully!", marker(true)),
        Outcome::UpdatedNotProvisioned => {
            let reason = result
                .provision_error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_default();
            println!(
                "\n{} {} IPList updated but NOT provisioned: {reason}",
                marker(false),
                warning("PARTIAL")
            );
        }
    }
}
