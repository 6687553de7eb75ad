//! Catalogue data model and batch normalization
//!
//! The crawler produces flat [`PartRow`]s. One manufacturer's rows form a
//! batch, which [`normalize_batch`] turns into three dimension tables and one
//! fact table ready to be appended to storage.

mod dimension;
mod normalize;

pub use dimension::{Dimension, DimensionRow};
pub use normalize::{normalize_batch, strip_trailing_hyphen, UNKNOWN_PART_CATEGORY};

use thiserror::Error;

/// One part found on a leaf page of the catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartRow {
    pub manufacturer: String,
    pub category: String,
    pub model: String,
    pub part: String,
    pub part_category: Option<String>,
}

impl PartRow {
    pub fn new(
        manufacturer: impl Into<String>,
        category: impl Into<String>,
        model: impl Into<String>,
        part: impl Into<String>,
        part_category: Option<&str>,
    ) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            category: category.into(),
            model: model.into(),
            part: part.into(),
            part_category: part_category.map(str::to_string),
        }
    }
}

/// A row of the manufacturer fact table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerFact {
    pub manufacturer: String,
    pub category_id: i64,
    pub model_id: i64,
    pub part: String,
    pub part_category_id: i64,
}

/// The four tables derived from one manufacturer's batch
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub categories: Dimension,
    pub models: Dimension,
    pub part_categories: Dimension,
    pub facts: Vec<ManufacturerFact>,
}

impl NormalizedBatch {
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// Errors raised while normalizing a batch
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A row references a value its dimension does not contain
    #[error("No {dimension} id for value '{value}'")]
    UnknownValue {
        dimension: &'static str,
        value: String,
    },
}
