//! Storage module for persisting the normalized catalogue
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Appending dimension and fact tables one manufacturer batch at a time
//! - The joined, paginated read query over those tables

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{load_tables, CatalogueStore, StorageError, StorageResult};

use crate::CatalogueError;
use std::fmt;
use std::path::Path;

/// Initializes or opens a storage database
pub fn open_storage(path: &Path) -> Result<SqliteStorage, CatalogueError> {
    SqliteStorage::new(path)
}

/// The four persisted tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Manufacturer,
    Category,
    Model,
    PartCategory,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::Manufacturer,
        Table::Category,
        Table::Model,
        Table::PartCategory,
    ];

    /// Physical table name, as queried by the read API
    pub fn name(&self) -> &'static str {
        match self {
            Self::Manufacturer => "tbl_manufacturer",
            Self::Category => "tbl_category",
            Self::Model => "tbl_model",
            Self::PartCategory => "tbl_part_category",
        }
    }

    /// Value column of a dimension table, `None` for the fact table
    pub fn value_column(&self) -> Option<&'static str> {
        match self {
            Self::Manufacturer => None,
            Self::Category => Some("category"),
            Self::Model => Some("model"),
            Self::PartCategory => Some("part_category"),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Row counts written for one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub facts: usize,
    pub models: usize,
    pub categories: usize,
    pub part_categories: usize,
}

/// A fact row joined back to its dimension values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEntry {
    pub manufacturer: String,
    pub category: String,
    pub model: String,
    pub part: String,
    pub part_category: String,
}
