//! Account-side invitation progress enumeration.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Where an account stands in the invitation flow.
///
/// An `Invited` account holds a non-empty invite code and no subject id; a
/// `Registered` account holds a non-empty subject id.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InviteState {
    /// Account row is seeded and waiting for sign-up.
    #[default]
    Invited,
    /// A verified subject identity has been attached.
    Registered,
}

impl InviteState {
    /// Returns whether sign-up has completed for this account.
    #[inline]
    pub fn is_registered(self) -> bool {
        matches!(self, InviteState::Registered)
    }
}
