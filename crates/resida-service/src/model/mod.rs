//! Record models for the backing tables.
//!
//! Each model converts to and from a raw [`Record`] with `from_record` /
//! `into_record`. Cells are plain strings: an empty cell reads as an absent
//! value, and enum cells hold the SCREAMING_SNAKE string form.

mod account;
mod building;
mod invitation;
mod occupancy;
mod unit;

use std::str::FromStr;

use resida_core::{Error, Result};
use resida_sheets::Record;

pub use self::account::Account;
pub use self::building::Building;
pub use self::invitation::Invitation;
pub use self::occupancy::Occupancy;
pub use self::unit::Unit;

/// A record located at its 1-based storage row.
///
/// Row position is the record's storage identity for writes; the `ID` cell is
/// a separate logical identity used only for lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Located<T> {
    /// 1-based row the record was read from.
    pub row: u32,
    /// The parsed record.
    pub item: T,
}

/// Reads an optional cell: empty means absent.
pub(crate) fn optional(record: &Record, column: &str) -> Option<String> {
    let value = record.get(column).trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Parses an enum cell, using the default when the cell is empty.
pub(crate) fn parse_or_default<T>(record: &Record, column: &str) -> Result<T>
where
    T: FromStr + Default,
{
    let value = record.get(column).trim();
    if value.is_empty() {
        return Ok(T::default());
    }
    T::from_str(value).map_err(|_| malformed(column, value))
}

/// Parses a required enum cell.
pub(crate) fn parse_required<T>(record: &Record, column: &str) -> Result<T>
where
    T: FromStr,
{
    let value = record.get(column).trim();
    T::from_str(value).map_err(|_| malformed(column, value))
}

pub(crate) fn malformed(column: &str, value: &str) -> Error {
    Error::internal()
        .with_reason("malformed_record")
        .with_message(format!("column `{column}` holds unparseable value `{value}`"))
}
