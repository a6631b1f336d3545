//! Response payload types for the exposed operations.

use serde::{Deserialize, Serialize};

use crate::model::Invitation;

/// Result of a successful invitation create.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedInvitation {
    /// Logical id of the account seeded (or reused) for the invitee.
    pub account_id: String,
    /// The invitation record as written.
    pub invitation: Invitation,
}

/// Profile fields prefilled from an account seeded against an invite code.
///
/// Used to prepopulate the sign-up form; every field is optional.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefillProfile {
    /// Full display name, if seeded.
    pub full_name: Option<String>,
    /// Email address, if seeded.
    pub email: Option<String>,
    /// Username, if seeded.
    pub username: Option<String>,
}

/// Result of a successful public invitation lookup.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationLookup {
    /// The resolved invitation.
    pub invitation: Invitation,
    /// Sign-up form prefill from the seeded account, when one exists.
    pub profile: PrefillProfile,
}
