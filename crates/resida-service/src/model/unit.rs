//! Unit model for the `Units` table.

use resida_core::Result;
use resida_sheets::Record;
use serde::{Deserialize, Serialize};

use super::{optional, parse_or_default};
use crate::types::{Role, UnitStatus};

/// A unit row, referencing its building and optional direct occupants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Caller-assigned logical identity.
    pub id: String,
    /// Building this unit belongs to.
    pub building_id: Option<String>,
    /// Human-facing unit number.
    pub unit_number: Option<String>,
    /// Occupancy status.
    pub status: UnitStatus,
    /// Direct reference to the current tenant account, if any.
    pub current_tenant_user_id: Option<String>,
    /// Direct reference to the current owner account, if any.
    pub current_owner_user_id: Option<String>,
}

impl Unit {
    /// Backing table name.
    pub const TABLE: &'static str = "Units";

    /// Parses a unit from a raw record.
    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.get("ID").trim().to_string(),
            building_id: optional(record, "building_id"),
            unit_number: optional(record, "unit_number"),
            status: parse_or_default(record, "status")?,
            current_tenant_user_id: optional(record, "current_tenant_user_id"),
            current_owner_user_id: optional(record, "current_owner_user_id"),
        })
    }

    /// Returns the unit's direct occupant reference for `role`, if set.
    ///
    /// Only the resident-tier roles have occupant references; other roles
    /// always read as unoccupied.
    pub fn occupant_for(&self, role: Role) -> Option<&str> {
        match role {
            Role::Tenant => self.current_tenant_user_id.as_deref(),
            Role::Owner => self.current_owner_user_id.as_deref(),
            _ => None,
        }
    }

    /// Returns whether this unit belongs to `building_id`.
    pub fn belongs_to(&self, building_id: &str) -> bool {
        self.building_id.as_deref() == Some(building_id)
    }
}
