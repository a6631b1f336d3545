//! Tabular backend adapter seam.
//!
//! The backend exposes exactly three operations against a named, sheet-like
//! table: read a rectangular cell range, overwrite a rectangular cell range,
//! and append rows. There are no transactions, no row locks, and no
//! compare-and-swap; everything above this seam is written with that in mind.

use async_trait::async_trait;

use crate::error::SheetResult;

/// A rectangular range of cells within a named table.
///
/// Rows are 1-based; row 1 is the header row. An absent `end_row` extends the
/// range to the last row the table currently has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range {
    /// Name of the table the range addresses.
    pub table: String,
    /// First row of the range (1-based, inclusive).
    pub start_row: u32,
    /// Last row of the range (inclusive); `None` means to the end.
    pub end_row: Option<u32>,
}

impl Range {
    /// Range covering only the header row.
    pub fn headers(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            start_row: 1,
            end_row: Some(1),
        }
    }

    /// Range covering every data row (row 2 to the end).
    pub fn data(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            start_row: 2,
            end_row: None,
        }
    }

    /// Range covering a single row.
    pub fn row(table: impl Into<String>, row: u32) -> Self {
        Self {
            table: table.into(),
            start_row: row,
            end_row: Some(row),
        }
    }
}

/// Adapter over a sheet-like tabular storage backend.
///
/// Implementations map [`Range`] values onto whatever range addressing the
/// backing service uses. Read and write failures are operational errors and
/// propagate unchanged; `append` has row-insertion semantics and never
/// overwrites existing rows, but is not idempotent when it fails partway.
#[async_trait]
pub trait SheetBackend: Send + Sync {
    /// Reads the cells in `range` as rows of strings.
    ///
    /// Rows shorter than the widest row in the range may be returned with
    /// trailing cells omitted.
    async fn read(&self, range: &Range) -> SheetResult<Vec<Vec<String>>>;

    /// Overwrites the cells in `range` with `rows`.
    async fn write(&self, range: &Range, rows: Vec<Vec<String>>) -> SheetResult<()>;

    /// Appends `rows` after the last row of the table addressed by `range`.
    async fn append(&self, range: &Range, rows: Vec<Vec<String>>) -> SheetResult<()>;
}
