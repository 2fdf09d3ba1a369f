use colored::{ColoredString, Colorize};
use console::Emoji;
use report::Status;

use crate::convert::ConversionSummary;

pub fn print_summary(summary: &ConversionSummary) {
    eprintln!(
        "\nConverted {} files: {} tests, {} test cases",
        summary.converted_files.len().to_string().green(),
        summary.tests,
        summary.nodes,
    );

    for (status, count) in &summary.node_statuses {
        eprintln!("  {} - {}", print_status(*status), count);
    }

    if summary.failed_files.is_empty() {
        return;
    }

    eprintln!(
        "\n{} files could not be converted{}",
        summary.failed_files.len().to_string().red(),
        Emoji(" ❌", ""),
    );
    for (path, error) in &summary.failed_files {
        eprintln!("  {} - {}", path.display(), error);
    }
}

fn print_status(status: Status) -> ColoredString {
    let label = status.to_string().to_uppercase();
    match status {
        Status::Pass => label.green(),
        Status::Fail | Status::Error => label.red(),
        Status::Warning | Status::Skip => label.yellow(),
        Status::Info => label.normal(),
    }
}
