//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of an ingestion
//! run: timing, crawl totals and why the crawl stopped, and the normalized
//! corpus size.

use crate::pipeline::IngestionReport;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

/// Writes the markdown summary of a run to `output_path`
///
/// Parent directories are created as needed.
pub fn generate_markdown_summary(report: &IngestionReport, output_path: &Path) -> io::Result<()> {
    let markdown = format_markdown_summary(report);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run report as markdown
pub fn format_markdown_summary(report: &IngestionReport) -> String {
    let mut md = String::new();

    md.push_str("# Wiki-Corpus Ingestion Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        report.duration_seconds()
    ));
    md.push_str(&format!(
        "- **Clean corpus**: `{}`\n\n",
        report.clean_dir.display()
    ));

    md.push_str("## Crawl\n\n");
    match &report.crawl {
        Some(crawl) => {
            md.push_str("| Metric | Value |\n");
            md.push_str("|--------|-------|\n");
            md.push_str(&format!("| Index pages visited | {} |\n", crawl.pages_visited));
            md.push_str(&format!("| Articles captured | {} |\n", crawl.articles_written));
            md.push_str(&format!("| Articles skipped | {} |\n", crawl.articles_skipped));
            md.push_str(&format!("| Stopped because | {} |\n", crawl.stop_reason));
            md.push('\n');

            if !crawl.stop_reason.is_complete() {
                md.push_str(
                    "> **Warning**: the crawl ended before reaching the end of the index.\n\n",
                );
            }
        }
        None => md.push_str("Crawl stage disabled; existing captures were normalized.\n\n"),
    }

    md.push_str("## Normalization\n\n");
    md.push_str(&format!(
        "- **Files cleaned**: {}\n",
        report.normalize.files_cleaned
    ));

    md
}
