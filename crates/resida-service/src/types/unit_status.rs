//! Unit status enumeration.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Occupancy status of a unit.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitStatus {
    /// Unit can take a new tenant or owner.
    #[default]
    Available,
    /// Unit currently has an occupant.
    Occupied,
    /// Unit is withdrawn; no invitations may target it.
    Inactive,
}

impl UnitStatus {
    /// Returns whether invitations may target this unit.
    #[inline]
    pub fn accepts_invitations(self) -> bool {
        !matches!(self, UnitStatus::Inactive)
    }
}
