//! Crawler module for walking the parts catalogue
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a browser-like user agent
//! - The markup adapter that finds the marker containers on each page
//! - The hierarchical walk and per-manufacturer batch handling

mod extract;
mod fetcher;
mod walker;

pub use extract::{CatalogueMarkup, Container, Document, ModelListing, PartEntry};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use walker::Harvester;

use crate::config::Config;
use crate::output::CrawlReport;
use crate::storage::SqliteStorage;
use crate::CatalogueError;
use std::path::Path;

/// Runs a complete harvest
///
/// This is the main entry point for a crawl. It will:
/// 1. Open the SQLite database (held for the whole run, closed on return)
/// 2. Build the HTTP client and markup adapter
/// 3. Walk every manufacturer, loading one batch per manufacturer
///
/// # Example
///
/// ```no_run
/// use catalogue_harvester::config::load_config;
/// use catalogue_harvester::crawler::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("catalogue.toml"))?;
/// let report = run_harvest(&config).await?;
/// println!("{} parts loaded", report.parts_loaded());
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: &Config) -> Result<CrawlReport, CatalogueError> {
    let mut storage = SqliteStorage::new(Path::new(&config.output.database_path))?
        .with_atomic_batches(config.output.atomic_batches);

    let harvester = Harvester::new(config)?;
    harvester.run(&mut storage).await
}
