//! Occupancy model for the `Occupancies` table.

use resida_core::Result;
use resida_sheets::Record;
use serde::{Deserialize, Serialize};

use super::{optional, parse_or_default, parse_required};
use crate::types::{OccupancyStatus, Role};

/// An occupancy row tying a user to a unit in a role.
///
/// Maintained by an external surface; the core only reads it as the third
/// occupancy signal when validating invitation creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occupancy {
    /// Caller-assigned logical identity.
    pub id: String,
    /// Occupied unit.
    pub unit_id: Option<String>,
    /// Occupant account.
    pub user_id: Option<String>,
    /// Role the occupant holds the unit in.
    pub role: Role,
    /// Whether the occupancy is current.
    pub status: OccupancyStatus,
}

impl Occupancy {
    /// Backing table name.
    pub const TABLE: &'static str = "Occupancies";

    /// Parses an occupancy from a raw record.
    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.get("ID").trim().to_string(),
            unit_id: optional(record, "unit_id"),
            user_id: optional(record, "user_id"),
            role: parse_required(record, "role")?,
            status: parse_or_default(record, "status")?,
        })
    }

    /// Returns whether this record currently blocks (`unit_id`, `role`).
    pub fn blocks(&self, unit_id: &str, role: Role) -> bool {
        self.status.is_active() && self.role == role && self.unit_id.as_deref() == Some(unit_id)
    }
}
