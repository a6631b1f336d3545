//! Account role enumeration for scope evaluation.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Role bound to an account, most to least privileged.
///
/// The role decides the caller's scope: admins see everything, the management
/// tier is scoped to buildings it manages, and the resident tier is scoped
/// strictly to its own building.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full read/write over every building, unit, and account.
    Admin,
    /// Operational staff, scoped like building management.
    Staff,
    /// Administers the buildings whose `management_user_id` points at it.
    BuildingMgmt,
    /// Resident renting a unit.
    Tenant,
    /// Resident owning a unit.
    Owner,
}

impl Role {
    /// Returns whether this role belongs to the management tier.
    #[inline]
    pub fn is_management_tier(self) -> bool {
        matches!(self, Role::BuildingMgmt | Role::Staff)
    }

    /// Returns whether this role belongs to the resident tier.
    #[inline]
    pub fn is_resident_tier(self) -> bool {
        matches!(self, Role::Tenant | Role::Owner)
    }
}
