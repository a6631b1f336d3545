//! Schema-by-header row store.
//!
//! Maps named tables onto header-defined schemas: row 1 of every table is the
//! header row, rows 2..N are data records. Row position is the record's
//! storage identity as far as writes are concerned; the `ID` column is a
//! separate, caller-assigned logical identity used for lookup.

use std::sync::Arc;
use std::time::Duration;

use crate::backend::{Range, SheetBackend};
use crate::cache::{CachedValue, SheetCache};
use crate::error::{SheetError, SheetResult};
use crate::record::Record;

/// Tracing target for row store operations.
const TRACING_TARGET: &str = "resida_sheets::store";

/// How long a cached header row stays valid.
const HEADERS_TTL: Duration = Duration::from_secs(60);

/// How long a cached full-table read stays valid.
const RECORDS_TTL: Duration = Duration::from_secs(30);

/// Row store over a [`SheetBackend`], fronted by a [`SheetCache`].
///
/// `Clone` is cheap; clones share the backend and the cache. Operations are
/// not serialized relative to each other: two concurrent read-check-write
/// sequences can interleave, and callers that need uniqueness across writers
/// must accept or narrow that window themselves.
#[derive(Clone)]
pub struct RowStore {
    backend: Arc<dyn SheetBackend>,
    cache: SheetCache,
}

impl RowStore {
    /// Creates a row store over `backend` with a fresh cache.
    pub fn new(backend: Arc<dyn SheetBackend>) -> Self {
        Self {
            backend,
            cache: SheetCache::new(),
        }
    }

    /// Returns the ordered column names of `table`.
    ///
    /// Reads row 1, cached for 60 seconds.
    pub async fn headers(&self, table: &str) -> SheetResult<Vec<String>> {
        let key = SheetCache::key(table, "headers");
        if let Some(CachedValue::Headers(headers)) = self.cache.get(&key) {
            return Ok(headers);
        }

        let mut rows = self.backend.read(&Range::headers(table)).await?;
        let headers = match rows.pop() {
            Some(row) if !row.is_empty() => row,
            _ => {
                return Err(SheetError::MissingHeaders {
                    table: table.to_string(),
                });
            }
        };

        self.cache
            .put(key, CachedValue::Headers(headers.clone()), HEADERS_TTL);
        Ok(headers)
    }

    /// Returns every data record of `table` in physical row order.
    ///
    /// Reads rows 2..N and zips them with the header row; missing trailing
    /// cells become empty strings. Cached for 30 seconds under a key scoped
    /// to the table.
    pub async fn all_records(&self, table: &str) -> SheetResult<Vec<Record>> {
        let key = SheetCache::key(table, "all");
        if let Some(CachedValue::Records(records)) = self.cache.get(&key) {
            return Ok(records);
        }

        let headers = self.headers(table).await?;
        let rows = self.backend.read(&Range::data(table)).await?;
        let records: Vec<Record> = rows
            .iter()
            .map(|cells| Record::from_row(&headers, cells))
            .collect();

        tracing::debug!(
            target: TRACING_TARGET,
            table = table,
            records = records.len(),
            "table read from backend"
        );

        self.cache
            .put(key, CachedValue::Records(records.clone()), RECORDS_TTL);
        Ok(records)
    }

    /// Finds the 1-based row position of the first record whose `column`
    /// equals `value` after trimming whitespace.
    ///
    /// Scans top-to-bottom; the first match wins. Returns `None` when the
    /// column does not exist in the header or no record matches. With
    /// `case_insensitive`, both sides are case-folded before comparison.
    pub async fn find_row(
        &self,
        table: &str,
        column: &str,
        value: &str,
        case_insensitive: bool,
    ) -> SheetResult<Option<u32>> {
        let headers = self.headers(table).await?;
        if !headers.iter().any(|name| name == column) {
            return Ok(None);
        }

        let needle = value.trim();
        let needle_folded = needle.to_lowercase();
        let records = self.all_records(table).await?;

        for (idx, record) in records.iter().enumerate() {
            let cell = record.get(column).trim();
            let matched = if case_insensitive {
                cell.to_lowercase() == needle_folded
            } else {
                cell == needle
            };
            if matched {
                // First data record lives at row 2.
                return Ok(Some(idx as u32 + 2));
            }
        }

        Ok(None)
    }

    /// Reads the record at 1-based `row` directly from the backend.
    ///
    /// Bypasses the cache; the result is always current as of the read.
    pub async fn record_at(&self, table: &str, row: u32) -> SheetResult<Record> {
        if row < 2 {
            return Err(SheetError::RowOutOfRange {
                table: table.to_string(),
                row,
            });
        }

        let headers = self.headers(table).await?;
        let mut rows = self.backend.read(&Range::row(table, row)).await?;
        let cells = rows.pop().ok_or_else(|| SheetError::RowOutOfRange {
            table: table.to_string(),
            row,
        })?;

        Ok(Record::from_row(&headers, &cells))
    }

    /// Overwrites the record at 1-based `row` using the header order.
    ///
    /// Fields absent from `record` become empty strings. Every cached entry
    /// for `table` is invalidated before returning, so the next read observes
    /// this write.
    pub async fn write_record(&self, table: &str, row: u32, record: &Record) -> SheetResult<()> {
        if row < 2 {
            return Err(SheetError::RowOutOfRange {
                table: table.to_string(),
                row,
            });
        }

        let headers = self.headers(table).await?;
        let cells = record.to_row(&headers);
        self.backend.write(&Range::row(table, row), vec![cells]).await?;
        self.cache.invalidate(table);

        tracing::debug!(target: TRACING_TARGET, table = table, row = row, "record written");
        Ok(())
    }

    /// Appends one record built in header order to the end of `table`.
    ///
    /// Invalidates the table's cache entries. Not idempotent on operational
    /// failure: a partial append may or may not have taken effect, so callers
    /// must not blindly retry.
    pub async fn append_record(&self, table: &str, record: &Record) -> SheetResult<()> {
        let headers = self.headers(table).await?;
        let cells = record.to_row(&headers);
        self.backend.append(&Range::data(table), vec![cells]).await?;
        self.cache.invalidate(table);

        tracing::debug!(target: TRACING_TARGET, table = table, "record appended");
        Ok(())
    }
}

impl std::fmt::Debug for RowStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowStore").finish_non_exhaustive()
    }
}
