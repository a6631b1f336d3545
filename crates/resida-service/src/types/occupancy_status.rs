//! Occupancy record status enumeration.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Status of an occupancy record tying a user to a unit.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OccupancyStatus {
    /// Occupant currently holds the unit.
    #[default]
    Active,
    /// Occupancy has ended.
    Ended,
}

impl OccupancyStatus {
    /// Returns whether the occupancy currently blocks the unit.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, OccupancyStatus::Active)
    }
}
