//! Console reporting. Informational text only; use the JSON report for
//! anything machine-read.

use std::path::{self, Path, PathBuf};

use crate::batch::{BatchFailure, BatchReport, GeneratedBarcode, ItemOutcome};

pub fn generated_line(barcode: &GeneratedBarcode, total: usize) -> String {
    format!("✓ Generated {}/{}: {}", barcode.index, total, barcode.input)
}

pub fn failure_line(failure: &BatchFailure) -> String {
    format!(
        "✗ Error generating barcode for '{}': {}",
        failure.input, failure.error
    )
}

pub fn outcome_line(outcome: ItemOutcome<'_>, total: usize) -> String {
    match outcome {
        ItemOutcome::Generated(barcode) => generated_line(barcode, total),
        ItemOutcome::Failed(failure) => failure_line(failure),
    }
}

fn absolute(dir: &Path) -> PathBuf {
    path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf())
}

/// Closing lines printed after a batch
pub fn summary(report: &BatchReport) -> Vec<String> {
    let mut lines = vec![String::new()];
    if report.has_failures() {
        lines.push(format!("⚠ Completed with {} error(s)", report.failures.len()));
    } else {
        lines.push(format!(
            "✓ Successfully generated {} barcodes!",
            report.generated.len()
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Barcodes saved to: {}",
        absolute(&report.output_dir).display()
    ));
    lines
}
