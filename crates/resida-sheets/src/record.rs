//! Ordered field → value records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One row of a table, keyed by column name.
///
/// All values are strings; typed interpretation is the caller's concern. An
/// absent field and an empty string read the same, mirroring how missing
/// trailing cells come back from the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record by zipping `headers` with `cells`.
    ///
    /// Missing trailing cells become empty strings; cells beyond the header
    /// width are dropped.
    pub fn from_row(headers: &[String], cells: &[String]) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let value = cells.get(idx).cloned().unwrap_or_default();
                (name.clone(), value)
            })
            .collect();
        Self { fields }
    }

    /// Flattens the record back into cells ordered by `headers`.
    ///
    /// Fields absent from the record become empty strings; fields not named
    /// in the header are not written.
    pub fn to_row(&self, headers: &[String]) -> Vec<String> {
        headers
            .iter()
            .map(|name| self.fields.get(name).cloned().unwrap_or_default())
            .collect()
    }

    /// Returns the value of `column`, or `""` when absent.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    /// Sets the value of `column`.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    /// Returns whether `column` holds a non-empty value.
    pub fn has(&self, column: &str) -> bool {
        !self.get(column).is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
