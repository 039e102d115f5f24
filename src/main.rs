//! Site-Sift main entry point
//!
//! This is the command-line interface for the Site-Sift contact crawler.

use clap::Parser;
use site_sift::config::{load_config_with_hash, Config, FetcherMode};
use site_sift::crawler::{CancelFlag, CrawlSettings, RunSummary, Runner};
use site_sift::fetcher::build_factory;
use site_sift::input::load_seeds;
use site_sift::output::{
    generate_markdown_summary, generate_summary, print_statistics, summarize_run, SqliteSink,
};
use site_sift::storage::{RunStatus, SqliteStorage, Storage};
use site_sift::SiftError;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Site-Sift: a breadth-limited contact crawler
///
/// Site-Sift visits every website listed in a seed file, crawls a small number
/// of same-site pages and records the emails, phone numbers and social profile
/// links it finds.
#[derive(Parser, Debug)]
#[command(name = "site-sift")]
#[command(version)]
#[command(about = "A breadth-limited contact crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config, load the seed list and show what would be crawled
    #[arg(long, conflicts_with_all = ["stats", "export_summary"])]
    dry_run: bool,

    /// Show statistics for the latest run and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_summary"])]
    stats: bool,

    /// Regenerate the markdown summary of the latest run and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config)?;
    } else {
        handle_crawl(config, config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_sift=info,warn"),
            1 => EnvFilter::new("site_sift=debug,info"),
            2 => EnvFilter::new("site_sift=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Site-Sift Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max pages per seed: {}", config.crawler.max_depth);
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!("  Page timeout: {}ms", config.crawler.page_timeout);

    println!("\nFetcher:");
    match config.fetcher.mode {
        FetcherMode::Render => {
            println!("  Mode: render");
            println!(
                "  Endpoint: {}",
                config.fetcher.render_endpoint.as_deref().unwrap_or("-")
            );
            println!("  Ready timeout: {}ms", config.fetcher.ready_timeout);
            println!("  Settle time: {}ms", config.fetcher.settle_time);
        }
        FetcherMode::Http => println!("  Mode: http"),
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summary: {}", config.output.summary_path);

    let seeds = load_seeds(Path::new(&config.input.seeds_path), config.input.has_header)?;
    println!(
        "\nSeeds ({}) from {}:",
        seeds.len(),
        config.input.seeds_path
    );
    for seed in seeds.iter().take(20) {
        println!("  - row {}: {}", seed.row, seed.url);
    }
    if seeds.len() > 20 {
        println!("  ... and {} more", seeds.len() - 20);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} seeds", seeds.len());

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let summary = generate_summary(&storage)?;
    print_statistics(&summary);

    Ok(())
}

/// Handles the --export-summary mode: generates markdown summary
fn handle_export_summary(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Exporting Crawl Summary ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    tracing::info!("Loading crawl data from database...");
    let summary = generate_summary(&storage)?;

    tracing::info!("Generating markdown summary...");
    generate_markdown_summary(&summary, Path::new(&config.output.summary_path))?;

    println!("✓ Summary exported to: {}", config.output.summary_path);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: String) -> Result<(), Box<dyn std::error::Error>> {
    let seeds = load_seeds(Path::new(&config.input.seeds_path), config.input.has_header)?;

    let mut storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let run_id = storage.create_run(&config_hash)?;
    tracing::info!("Started run {} with {} seeds", run_id, seeds.len());

    let factory = build_factory(&config).map_err(SiftError::ResourceAcquisition)?;
    let runner = Runner::new(
        factory,
        CrawlSettings::from_config(&config),
        config.crawler.concurrency as usize,
    );

    let cancel = CancelFlag::new();
    cancel.install_ctrl_c();

    let outcome = {
        let mut sink = SqliteSink::new(&mut storage, run_id);
        runner.run(seeds, &mut sink, &cancel).await
    };

    storage.finish_run(run_id, run_status(&outcome))?;

    let summary = summarize_run(&storage, storage.get_run(run_id)?)?;
    generate_markdown_summary(&summary, Path::new(&config.output.summary_path))?;
    tracing::info!("Summary written to {}", config.output.summary_path);

    match outcome {
        Ok(totals) => {
            if totals.persist_failures > 0 {
                tracing::warn!(
                    "{} results could not be stored, see errors above",
                    totals.persist_failures
                );
            }
            if totals.lost_sessions > 0 {
                tracing::warn!(
                    "{} worker(s) stopped after their fetcher session could not be reopened",
                    totals.lost_sessions
                );
            }
            tracing::info!(
                "Crawl finished: {}/{} seeds processed",
                totals.seeds_processed(),
                totals.seeds_total
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

fn run_status(outcome: &Result<RunSummary, SiftError>) -> RunStatus {
    match outcome {
        Ok(totals) if totals.cancelled || totals.interrupted > 0 => RunStatus::Interrupted,
        Ok(_) => RunStatus::Completed,
        Err(_) => RunStatus::Failed,
    }
}
