//! In-memory backend for testing.
//!
//! Implements [`SheetBackend`] over a mutexed map of table name → rows. Row
//! semantics match a real sheet service: 1-based addressing, `append` inserts
//! after the last existing row, `write` extends the table when it addresses
//! rows past the end.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{Range, SheetBackend};
use crate::error::SheetResult;

/// In-memory sheet backend backed by a table → rows map.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    tables: Mutex<HashMap<String, Vec<Vec<String>>>>,
}

impl InMemoryBackend {
    /// Creates an empty backend with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a table with `rows`, header row first.
    pub fn with_table<R, C>(self, name: impl Into<String>, rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        self.tables
            .lock()
            .expect("table map lock poisoned")
            .insert(name.into(), rows);
        self
    }

    /// Overwrites a single cell, 1-based row and column.
    ///
    /// Test hook for simulating writes that bypass the row store.
    pub fn overwrite_cell(&self, table: &str, row: u32, column: u32, value: impl Into<String>) {
        let mut tables = self.tables.lock().expect("table map lock poisoned");
        let rows = tables.entry(table.to_string()).or_default();
        let row_idx = row as usize - 1;
        let col_idx = column as usize - 1;
        if let Some(cells) = rows.get_mut(row_idx) {
            if cells.len() <= col_idx {
                cells.resize(col_idx + 1, String::new());
            }
            cells[col_idx] = value.into();
        }
    }

    /// Returns the current row count of `table`, header included.
    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .lock()
            .expect("table map lock poisoned")
            .get(table)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl SheetBackend for InMemoryBackend {
    async fn read(&self, range: &Range) -> SheetResult<Vec<Vec<String>>> {
        let tables = self.tables.lock().expect("table map lock poisoned");
        let rows = match tables.get(&range.table) {
            Some(rows) => rows,
            None => return Ok(Vec::new()),
        };

        let start = range.start_row as usize - 1;
        let end = range
            .end_row
            .map(|end| end as usize)
            .unwrap_or(rows.len())
            .min(rows.len());
        if start >= end {
            return Ok(Vec::new());
        }

        Ok(rows[start..end].to_vec())
    }

    async fn write(&self, range: &Range, new_rows: Vec<Vec<String>>) -> SheetResult<()> {
        let mut tables = self.tables.lock().expect("table map lock poisoned");
        let rows = tables.entry(range.table.clone()).or_default();

        let start = range.start_row as usize - 1;
        let needed = start + new_rows.len();
        if rows.len() < needed {
            rows.resize(needed, Vec::new());
        }
        for (offset, cells) in new_rows.into_iter().enumerate() {
            rows[start + offset] = cells;
        }
        Ok(())
    }

    async fn append(&self, range: &Range, new_rows: Vec<Vec<String>>) -> SheetResult<()> {
        let mut tables = self.tables.lock().expect("table map lock poisoned");
        let rows = tables.entry(range.table.clone()).or_default();
        rows.extend(new_rows);
        Ok(())
    }
}
