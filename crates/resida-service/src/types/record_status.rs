//! Active/inactive status shared by accounts and buildings.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Soft-delete status for accounts and buildings.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    /// Record is in use.
    #[default]
    Active,
    /// Record is retired but kept for history.
    Inactive,
}

impl RecordStatus {
    /// Returns whether the record is active.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, RecordStatus::Active)
    }
}
