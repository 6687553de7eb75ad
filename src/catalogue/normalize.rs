//! Batch normalization: raw part rows into dimension and fact tables
//!
//! The steps run in a fixed order. Hyphen stripping and the "Unknown"
//! substitution happen before any dimension is built, so every value a fact
//! row refers to is guaranteed to have an id.

use crate::catalogue::{Dimension, ManufacturerFact, NormalizeError, NormalizedBatch, PartRow};

/// Part category recorded for parts listed without a label
pub const UNKNOWN_PART_CATEGORY: &str = "Unknown";

/// Removes a single trailing hyphen from a part identifier
///
/// The remainder is whitespace-trimmed. Identifiers not ending in `-` are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use catalogue_harvester::catalogue::strip_trailing_hyphen;
///
/// assert_eq!(strip_trailing_hyphen("P1-"), "P1");
/// assert_eq!(strip_trailing_hyphen("P1--"), "P1-");
/// assert_eq!(strip_trailing_hyphen("P1"), "P1");
/// ```
pub fn strip_trailing_hyphen(part: &str) -> String {
    match part.strip_suffix('-') {
        Some(rest) => rest.trim().to_string(),
        None => part.to_string(),
    }
}

/// Normalizes the raw rows of one manufacturer batch
///
/// 1. Strip one trailing hyphen from every part identifier
/// 2. Replace absent part categories with [`UNKNOWN_PART_CATEGORY`]
/// 3. Build the category, model and part-category dimensions, numbering each
///    from 1 in order of first appearance within this batch
/// 4. Emit one fact row per raw row with the looked-up ids
///
/// Ids are scoped to the batch: a second manufacturer starts again at 1.
///
/// # Errors
///
/// Returns [`NormalizeError::UnknownValue`] if a row's value has no dimension
/// id. Rows are never dropped silently.
pub fn normalize_batch(rows: Vec<PartRow>) -> Result<NormalizedBatch, NormalizeError> {
    let rows: Vec<PartRow> = rows
        .into_iter()
        .map(|mut row| {
            row.part = strip_trailing_hyphen(&row.part);
            if row.part_category.is_none() {
                row.part_category = Some(UNKNOWN_PART_CATEGORY.to_string());
            }
            row
        })
        .collect();

    let categories = Dimension::from_values(rows.iter().map(|r| r.category.as_str()));
    let models = Dimension::from_values(rows.iter().map(|r| r.model.as_str()));
    let part_categories = Dimension::from_values(rows.iter().map(part_category_of));

    let facts = rows
        .iter()
        .map(|row| {
            Ok(ManufacturerFact {
                manufacturer: row.manufacturer.clone(),
                category_id: lookup(&categories, "category", &row.category)?,
                model_id: lookup(&models, "model", &row.model)?,
                part: row.part.clone(),
                part_category_id: lookup(&part_categories, "part_category", part_category_of(row))?,
            })
        })
        .collect::<Result<Vec<_>, NormalizeError>>()?;

    Ok(NormalizedBatch {
        categories,
        models,
        part_categories,
        facts,
    })
}

fn part_category_of(row: &PartRow) -> &str {
    row.part_category.as_deref().unwrap_or(UNKNOWN_PART_CATEGORY)
}

fn lookup(dimension: &Dimension, name: &'static str, value: &str) -> Result<i64, NormalizeError> {
    dimension
        .id_of(value)
        .ok_or_else(|| NormalizeError::UnknownValue {
            dimension: name,
            value: value.to_string(),
        })
}
