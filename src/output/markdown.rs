//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of a run: run
//! metadata, seed outcome totals and one table row per seed.

use crate::output::traits::{CrawlSummary, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generates a markdown summary from a crawl summary
///
/// # Arguments
///
/// * `summary` - The crawl summary data
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(summary: &CrawlSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl summary as markdown
pub fn format_markdown_summary(summary: &CrawlSummary) -> String {
    let mut md = String::new();

    md.push_str("# Site-Sift Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Run ID**: {}\n", summary.run_id));
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished));
    }
    if let Some(duration) = summary.duration_seconds {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push_str(&format!("- **Status**: {}\n", summary.status));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Seeds Processed**: {}\n", summary.seeds_total));
    md.push_str(&format!("- **Pages Visited**: {}\n", summary.pages_visited));
    md.push_str(&format!("- **Pages Fetched**: {}\n", summary.pages_fetched));
    md.push_str(&format!(
        "- **Fetch Success Rate**: {:.2}%\n",
        summary.fetch_rate()
    ));
    md.push_str(&format!(
        "- **Seeds With Contacts**: {:.2}%\n\n",
        summary.hit_rate()
    ));

    md.push_str("## Seed Outcomes\n\n");
    md.push_str("| Outcome | Seeds |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Completed | {} |\n", summary.seeds_completed));
    md.push_str(&format!("| Interrupted | {} |\n", summary.seeds_interrupted));
    md.push_str(&format!("| Failed | {} |\n", summary.seeds_failed));
    md.push_str(&format!("| With email | {} |\n", summary.seeds_with_email));
    md.push_str(&format!("| With phone | {} |\n", summary.seeds_with_phone));
    md.push_str(&format!(
        "| With social link | {} |\n\n",
        summary.seeds_with_social
    ));

    if !summary.records.is_empty() {
        md.push_str("## Results\n\n");
        md.push_str(
            "| Row | Seed | Status | Emails | Phones | Facebook | Instagram | Twitter | LinkedIn | Pages |\n",
        );
        md.push_str(
            "|-----|------|--------|--------|--------|----------|-----------|---------|----------|-------|\n",
        );
        for record in &summary.records {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {}/{} |\n",
                record.row_index,
                cell(&record.seed),
                record.status,
                cell(&record.emails),
                cell(&record.phones),
                cell(&record.facebook),
                cell(&record.instagram),
                cell(&record.twitter),
                cell(&record.linkedin),
                record.pages_fetched,
                record.pages_visited,
            ));
        }
        md.push('\n');
    }

    let errors: Vec<_> = summary
        .records
        .iter()
        .filter_map(|r| r.error_message.as_deref().map(|e| (r.row_index, e)))
        .collect();
    if !errors.is_empty() {
        md.push_str("## Errors\n\n");
        for (row, message) in errors {
            md.push_str(&format!("- Row {}: {}\n", row, message));
        }
        md.push('\n');
    }

    md
}

/// Keeps a value from breaking the table layout
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
