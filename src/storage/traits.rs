//! Storage traits and error types
//!
//! This module defines the trait interface for catalogue storage backends and
//! associated error types.

use crate::catalogue::{DimensionRow, ManufacturerFact, NormalizedBatch};
use crate::storage::{CatalogueEntry, LoadSummary, Table};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{0} is not a dimension table")]
    NotADimension(&'static str),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Append-only sink for normalized catalogue batches, plus the read queries
/// built on top of the resulting tables
pub trait CatalogueStore {
    // ===== Loading =====

    /// Appends rows to one of the three dimension tables
    ///
    /// Rows are written as given; nothing is deduplicated against earlier
    /// batches.
    fn append_dimension(&mut self, table: Table, rows: &[DimensionRow]) -> StorageResult<usize>;

    /// Appends rows to the manufacturer fact table
    fn append_facts(&mut self, rows: &[ManufacturerFact]) -> StorageResult<usize>;

    /// Appends all four tables of a batch
    ///
    /// The default writes each table on its own, so a failure part way
    /// leaves earlier tables of the batch in place.
    fn load_batch(&mut self, batch: &NormalizedBatch) -> StorageResult<LoadSummary> {
        load_tables(self, batch)
    }

    // ===== Queries =====

    /// Counts the rows of a table
    fn count_rows(&self, table: Table) -> StorageResult<u64>;

    /// Distinct manufacturer names present in the fact table
    fn manufacturers(&self) -> StorageResult<Vec<String>>;

    /// Joined catalogue rows of one manufacturer, paginated
    fn query_parts(
        &self,
        manufacturer: &str,
        skip: u32,
        limit: u32,
    ) -> StorageResult<Vec<CatalogueEntry>>;
}

/// Writes the tables of a batch one after another through `store`
pub fn load_tables<S>(store: &mut S, batch: &NormalizedBatch) -> StorageResult<LoadSummary>
where
    S: CatalogueStore + ?Sized,
{
    let facts = store.append_facts(&batch.facts)?;
    let models = store.append_dimension(Table::Model, batch.models.rows())?;
    let categories = store.append_dimension(Table::Category, batch.categories.rows())?;
    let part_categories =
        store.append_dimension(Table::PartCategory, batch.part_categories.rows())?;

    Ok(LoadSummary {
        facts,
        models,
        categories,
        part_categories,
    })
}
