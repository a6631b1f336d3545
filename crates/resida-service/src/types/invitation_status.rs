//! Invitation status enumeration for invitation lifecycle tracking.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Current status of an invitation record.
///
/// Invitations are never hard-deleted; they only move between these states.
/// Linking an account leaves the invitation `Invited` unless it is explicitly
/// revoked or consumed.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    /// Invitation is outstanding and its code can be redeemed.
    #[default]
    Invited,
    /// Invitation was revoked by its issuer or an admin. Terminal.
    Cancelled,
    /// Invitation was consumed. Terminal.
    Used,
}

impl InvitationStatus {
    /// Returns whether the invitation can still be redeemed.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, InvitationStatus::Invited)
    }

    /// Returns whether the invitation reached a terminal state.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, InvitationStatus::Cancelled | InvitationStatus::Used)
    }
}
