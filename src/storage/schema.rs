//! Database schema definitions
//!
//! The tables carry no primary keys: dimension ids restart at 1 for every
//! manufacturer batch, so the same id appears once per loaded manufacturer.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per harvested part
CREATE TABLE IF NOT EXISTS tbl_manufacturer (
    manufacturer TEXT,
    category_id INTEGER,
    model_id INTEGER,
    part TEXT,
    part_category_id INTEGER
);

CREATE INDEX IF NOT EXISTS idx_manufacturer_name ON tbl_manufacturer(manufacturer);

CREATE TABLE IF NOT EXISTS tbl_model (
    id INTEGER,
    model TEXT
);

CREATE TABLE IF NOT EXISTS tbl_category (
    id INTEGER,
    category TEXT
);

CREATE TABLE IF NOT EXISTS tbl_part_category (
    id INTEGER,
    part_category TEXT
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
