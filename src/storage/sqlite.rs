//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the CatalogueStore trait.

use crate::catalogue::{DimensionRow, ManufacturerFact, NormalizedBatch};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{load_tables, CatalogueStore, StorageError, StorageResult};
use crate::storage::{CatalogueEntry, LoadSummary, Table};
use crate::CatalogueError;
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
    atomic_batches: bool,
}

impl SqliteStorage {
    /// Opens (or creates) the database file and ensures the schema exists
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(CatalogueError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, CatalogueError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            atomic_batches: false,
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, CatalogueError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            atomic_batches: false,
        })
    }

    /// Writes all four tables of a batch in one transaction when enabled
    pub fn with_atomic_batches(mut self, atomic_batches: bool) -> Self {
        self.atomic_batches = atomic_batches;
        self
    }
}

impl CatalogueStore for SqliteStorage {
    // ===== Loading =====

    fn append_dimension(&mut self, table: Table, rows: &[DimensionRow]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        let written = insert_dimension(&tx, table, rows)?;
        tx.commit()?;
        Ok(written)
    }

    fn append_facts(&mut self, rows: &[ManufacturerFact]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        let written = insert_facts(&tx, rows)?;
        tx.commit()?;
        Ok(written)
    }

    fn load_batch(&mut self, batch: &NormalizedBatch) -> StorageResult<LoadSummary> {
        if !self.atomic_batches {
            return load_tables(self, batch);
        }

        let tx = self.conn.transaction()?;
        let summary = LoadSummary {
            facts: insert_facts(&tx, &batch.facts)?,
            models: insert_dimension(&tx, Table::Model, batch.models.rows())?,
            categories: insert_dimension(&tx, Table::Category, batch.categories.rows())?,
            part_categories: insert_dimension(
                &tx,
                Table::PartCategory,
                batch.part_categories.rows(),
            )?,
        };
        tx.commit()?;
        Ok(summary)
    }

    // ===== Queries =====

    fn count_rows(&self, table: Table) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn manufacturers(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT manufacturer FROM tbl_manufacturer ORDER BY manufacturer")?;

        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(names)
    }

    /// Joins the fact table back to its dimensions for one manufacturer
    ///
    /// Dimension ids are only unique within one manufacturer batch and the
    /// join is on id alone, so once several manufacturers are loaded a fact
    /// row also matches the dimension rows written for the others. The
    /// manufacturer filter only restricts the fact side.
    fn query_parts(
        &self,
        manufacturer: &str,
        skip: u32,
        limit: u32,
    ) -> StorageResult<Vec<CatalogueEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.manufacturer, c.category, d.model, m.part, p.part_category
             FROM tbl_manufacturer m
             INNER JOIN tbl_category c ON c.id = m.category_id
             INNER JOIN tbl_model d ON d.id = m.model_id
             INNER JOIN tbl_part_category p ON p.id = m.part_category_id
             WHERE m.manufacturer = ?1
             ORDER BY m.rowid
             LIMIT ?2 OFFSET ?3",
        )?;

        let entries = stmt
            .query_map(params![manufacturer, limit, skip], |row| {
                Ok(CatalogueEntry {
                    manufacturer: row.get(0)?,
                    category: row.get(1)?,
                    model: row.get(2)?,
                    part: row.get(3)?,
                    part_category: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}

fn insert_dimension(conn: &Connection, table: Table, rows: &[DimensionRow]) -> StorageResult<usize> {
    let column = table
        .value_column()
        .ok_or(StorageError::NotADimension(table.name()))?;

    let mut stmt = conn.prepare(&format!(
        "INSERT INTO {} (id, {}) VALUES (?1, ?2)",
        table.name(),
        column
    ))?;
    for row in rows {
        stmt.execute(params![row.id, row.value])?;
    }

    Ok(rows.len())
}

fn insert_facts(conn: &Connection, rows: &[ManufacturerFact]) -> StorageResult<usize> {
    let mut stmt = conn.prepare(
        "INSERT INTO tbl_manufacturer (manufacturer, category_id, model_id, part, part_category_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for fact in rows {
        stmt.execute(params![
            fact.manufacturer,
            fact.category_id,
            fact.model_id,
            fact.part,
            fact.part_category_id,
        ])?;
    }

    Ok(rows.len())
}
