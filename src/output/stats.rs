//! Statistics display for `--stats`
//!
//! This module renders a [`CrawlSummary`] loaded from storage as plain text.

use crate::output::traits::CrawlSummary;

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(summary: &CrawlSummary) {
    print!("{}", format_statistics(summary));
}

/// Formats the statistics shown by `--stats`
pub fn format_statistics(summary: &CrawlSummary) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n\n");

    out.push_str(&format!("Run {} ({})\n", summary.run_id, summary.status));
    out.push_str(&format!("  Started: {}\n", summary.started_at));
    if let Some(finished) = &summary.finished_at {
        out.push_str(&format!("  Finished: {}\n", finished));
    }
    out.push('\n');

    out.push_str("Seeds:\n");
    out.push_str(&format!("  Processed: {}\n", summary.seeds_total));
    for (label, count) in [
        ("Completed", summary.seeds_completed),
        ("Interrupted", summary.seeds_interrupted),
        ("Failed", summary.seeds_failed),
    ] {
        out.push_str(&format!(
            "  {}: {} ({:.1}%)\n",
            label,
            count,
            percentage(count, summary.seeds_total)
        ));
    }
    out.push('\n');

    out.push_str("Contacts:\n");
    out.push_str(&format!("  Seeds with email: {}\n", summary.seeds_with_email));
    out.push_str(&format!("  Seeds with phone: {}\n", summary.seeds_with_phone));
    out.push_str(&format!(
        "  Seeds with social link: {}\n",
        summary.seeds_with_social
    ));
    out.push('\n');

    out.push_str(&format!(
        "Pages: {} fetched / {} visited ({:.1}%)\n",
        summary.pages_fetched,
        summary.pages_visited,
        summary.fetch_rate()
    ));

    out
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64) * 100.0
}
