//! Output module for reporting harvest results
//!
//! This module handles:
//! - The per-run report of loaded and failed manufacturers
//! - Catalogue statistics read back from storage

mod report;
pub mod stats;

pub use report::{print_report, BatchOutcome, BatchStatus, CrawlReport};
pub use stats::{load_statistics, print_statistics, CatalogueStatistics};
