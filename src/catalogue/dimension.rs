use std::collections::HashMap;

/// A row of a dimension table: surrogate id and the value it stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionRow {
    pub id: i64,
    pub value: String,
}

/// A deduplicated lookup table with dense 1-based ids
///
/// Ids are handed out in order of first appearance, so the same input order
/// always yields the same numbering.
#[derive(Debug, Clone, Default)]
pub struct Dimension {
    rows: Vec<DimensionRow>,
    ids: HashMap<String, i64>,
}

impl Dimension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dimension from values in encounter order
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut dimension = Self::new();
        for value in values {
            dimension.intern(value);
        }
        dimension
    }

    /// Returns the id of `value`, assigning the next one if it is new
    pub fn intern(&mut self, value: &str) -> i64 {
        if let Some(&id) = self.ids.get(value) {
            return id;
        }

        let id = self.rows.len() as i64 + 1;
        self.ids.insert(value.to_string(), id);
        self.rows.push(DimensionRow {
            id,
            value: value.to_string(),
        });
        id
    }

    pub fn id_of(&self, value: &str) -> Option<i64> {
        self.ids.get(value).copied()
    }

    pub fn rows(&self) -> &[DimensionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
