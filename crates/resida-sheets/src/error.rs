//! Error types for row store and backend operations.

/// Type-erased error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with [`SheetError`].
pub type SheetResult<T> = std::result::Result<T, SheetError>;

/// Error type for all tabular backend and row store operations.
///
/// Backend failures are operational: they propagate the adapter's own error
/// unchanged and are never translated into domain errors. Callers must not
/// assume an append took effect when it fails partway.
#[derive(Debug, thiserror::Error)]
#[must_use = "sheet errors should be handled appropriately"]
pub enum SheetError {
    /// The tabular backend failed to read, write, or append.
    #[error("sheet backend error: {source}")]
    Backend {
        /// Underlying backend error.
        #[source]
        source: BoxError,
    },

    /// The table has no header row to define a schema.
    #[error("table `{table}` has no header row")]
    MissingHeaders {
        /// Table whose header row is absent.
        table: String,
    },

    /// The requested row does not address a data record.
    ///
    /// Row 1 is reserved for headers; rows past the end of the table do not
    /// exist.
    #[error("row {row} is out of range for table `{table}`")]
    RowOutOfRange {
        /// Table that was addressed.
        table: String,
        /// Offending 1-based row position.
        row: u32,
    },
}

impl SheetError {
    /// Wraps an arbitrary backend failure.
    pub fn backend(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend {
            source: Box::new(source),
        }
    }
}

impl From<SheetError> for resida_core::Error {
    fn from(err: SheetError) -> Self {
        resida_core::Error::external()
            .with_reason("storage_unavailable")
            .with_source(err)
    }
}
