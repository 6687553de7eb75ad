//! Catalogue Harvester main entry point
//!
//! This is the command-line interface for the parts-catalogue harvester.

use anyhow::Context;
use catalogue_harvester::config::{load_config_with_hash, Config};
use catalogue_harvester::crawler::run_harvest;
use catalogue_harvester::output::{load_statistics, print_report, print_statistics};
use catalogue_harvester::storage::{open_storage, CatalogueStore};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalogue Harvester: crawl a parts catalogue into SQLite
///
/// Walks every manufacturer of the catalogue, normalizes its parts into
/// category, model and part-category dimensions plus a manufacturer fact
/// table, and appends them to the configured database.
#[derive(Parser, Debug)]
#[command(name = "catalogue-harvester")]
#[command(version)]
#[command(about = "Crawl a parts catalogue into SQLite", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "query"])]
    dry_run: bool,

    /// Show table statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "query"])]
    stats: bool,

    /// Print the stored catalogue of one manufacturer and exit
    ///
    /// Dimension ids restart for every manufacturer, so once several
    /// manufacturers are stored the rows also pair with other manufacturers'
    /// categories, models and part categories.
    #[arg(long, value_name = "MANUFACTURER", conflicts_with_all = ["dry_run", "stats"])]
    query: Option<String>,

    /// Rows to skip when querying
    #[arg(long, default_value_t = 0, requires = "query")]
    skip: u32,

    /// Maximum rows to print when querying
    #[arg(long, default_value_t = 10, requires = "query")]
    limit: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(manufacturer) = &cli.query {
        handle_query(&config, manufacturer, cli.skip, cli.limit)?;
    } else {
        handle_harvest(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalogue_harvester=info,warn"),
            1 => EnvFilter::new("catalogue_harvester=debug,info"),
            2 => EnvFilter::new("catalogue_harvester=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Catalogue Harvester Dry Run ===\n");

    println!("Crawler:");
    println!("  Base URL: {}", config.crawler.base_url);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout);
    println!("  On failure: {:?}", config.crawler.on_failure);
    if config.crawler.manufacturers.is_empty() {
        println!("  Manufacturers: all listed in the catalogue");
    } else {
        println!("  Manufacturers: {}", config.crawler.manufacturers.join(", "));
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.value);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Atomic batches: {}", config.output.atomic_batches);

    println!("\nSelectors:");
    for (key, selector) in config.selectors.entries() {
        println!("  {}: {}", key, selector);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows row counts from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --query mode: prints joined rows for one manufacturer
fn handle_query(config: &Config, manufacturer: &str, skip: u32, limit: u32) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))?;
    let entries = storage
        .query_parts(manufacturer, skip, limit)
        .with_context(|| format!("Failed to query parts for {}", manufacturer))?;

    if entries.is_empty() {
        println!("No parts stored for {} (skip {})", manufacturer, skip);
        return Ok(());
    }

    println!("manufacturer\tcategory\tmodel\tpart\tpart_category");
    for entry in entries {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            entry.manufacturer, entry.category, entry.model, entry.part, entry.part_category
        );
    }

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting harvest of {} into {}",
        config.crawler.base_url,
        config.output.database_path
    );

    match run_harvest(config).await {
        Ok(report) => {
            tracing::info!("Harvest completed successfully");
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
