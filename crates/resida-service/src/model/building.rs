//! Building model for the `Buildings` table.

use resida_core::Result;
use resida_sheets::Record;
use serde::{Deserialize, Serialize};

use super::{optional, parse_or_default};
use crate::types::RecordStatus;

/// A building row.
///
/// Buildings are created and mutated by their own CRUD surface; the core only
/// reads them to validate scoping and occupancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Caller-assigned logical identity.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Soft-delete status.
    pub status: RecordStatus,
    /// Account that administratively owns this building.
    pub management_user_id: Option<String>,
}

impl Building {
    /// Backing table name.
    pub const TABLE: &'static str = "Buildings";

    /// Parses a building from a raw record.
    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.get("ID").trim().to_string(),
            name: optional(record, "name"),
            status: parse_or_default(record, "status")?,
            management_user_id: optional(record, "management_user_id"),
        })
    }

    /// Returns whether `account_id` administratively owns this building.
    pub fn is_managed_by(&self, account_id: &str) -> bool {
        self.management_user_id.as_deref() == Some(account_id)
    }
}
