//! Per-run crawl report
//!
//! Every manufacturer the walker visits ends up here, either with the row
//! counts that were loaded or with the error that abandoned its batch.

use crate::storage::LoadSummary;
use chrono::{DateTime, Utc};

/// Outcome of one manufacturer batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    Loaded(LoadSummary),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub manufacturer: String,
    pub status: BatchStatus,
}

impl BatchOutcome {
    pub fn loaded(manufacturer: &str, summary: LoadSummary) -> Self {
        Self {
            manufacturer: manufacturer.to_string(),
            status: BatchStatus::Loaded(summary),
        }
    }

    pub fn failed(manufacturer: &str, error: &dyn std::error::Error) -> Self {
        Self {
            manufacturer: manufacturer.to_string(),
            status: BatchStatus::Failed(error.to_string()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.status, BatchStatus::Loaded(_))
    }
}

/// Summary of a complete harvest run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<BatchOutcome>,
}

impl CrawlReport {
    pub fn loaded(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.outcomes.iter().filter(|o| o.is_loaded())
    }

    pub fn failed(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.outcomes.iter().filter(|o| !o.is_loaded())
    }

    /// Total fact rows written during the run
    pub fn parts_loaded(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match &o.status {
                BatchStatus::Loaded(summary) => summary.facts,
                BatchStatus::Failed(_) => 0,
            })
            .sum()
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Prints the report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Harvest Report ===\n");
    println!("Started:  {}", report.started_at.to_rfc3339());
    println!("Finished: {}", report.finished_at.to_rfc3339());
    println!("Duration: {}s", report.duration_seconds());
    println!();

    println!("Manufacturers:");
    for outcome in &report.outcomes {
        match &outcome.status {
            BatchStatus::Loaded(summary) => println!(
                "  ✓ {}: {} parts, {} categories, {} models, {} part categories",
                outcome.manufacturer,
                summary.facts,
                summary.categories,
                summary.models,
                summary.part_categories
            ),
            BatchStatus::Failed(error) => println!("  ✗ {}: {}", outcome.manufacturer, error),
        }
    }
    println!();

    println!(
        "Loaded {} of {} manufacturers ({} parts)",
        report.loaded().count(),
        report.outcomes.len(),
        report.parts_loaded()
    );
}
