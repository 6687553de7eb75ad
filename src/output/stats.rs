//! Statistics generation from the catalogue database
//!
//! This module provides functionality for extracting and displaying
//! catalogue statistics from the storage layer.

use crate::storage::{CatalogueStore, Table};
use crate::CatalogueError;

/// Catalogue statistics summary
#[derive(Debug, Clone)]
pub struct CatalogueStatistics {
    /// Row count of every table, in `Table::ALL` order
    pub rows_per_table: Vec<(Table, u64)>,

    /// Manufacturers with at least one loaded part
    pub manufacturers: Vec<String>,
}

impl CatalogueStatistics {
    pub fn rows(&self, table: Table) -> u64 {
        self.rows_per_table
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

/// Loads statistics from storage
pub fn load_statistics(store: &dyn CatalogueStore) -> Result<CatalogueStatistics, CatalogueError> {
    let mut rows_per_table = Vec::with_capacity(Table::ALL.len());
    for table in Table::ALL {
        rows_per_table.push((table, store.count_rows(table)?));
    }

    let manufacturers = store.manufacturers()?;

    Ok(CatalogueStatistics {
        rows_per_table,
        manufacturers,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CatalogueStatistics) {
    println!("=== Catalogue Statistics ===\n");

    println!("Rows per table:");
    for (table, count) in &stats.rows_per_table {
        println!("  {}: {}", table, count);
    }
    println!();

    println!("Manufacturers ({}):", stats.manufacturers.len());
    for manufacturer in &stats.manufacturers {
        println!("  - {}", manufacturer);
    }
}
