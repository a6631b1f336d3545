//! Request payload types for the exposed operations.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::Role;

/// Request payload for creating a new invitation.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvitation {
    /// Role the invitee will receive.
    pub role: Role,
    /// Email address to seed the account with.
    #[validate(email)]
    #[validate(length(max = 254))]
    pub email: Option<String>,
    /// Sign-in/display name for the seeded account.
    #[validate(length(min = 2, max = 64))]
    pub username: String,
    /// Full display name to seed the account with.
    #[validate(length(max = 128))]
    pub full_name: Option<String>,
    /// Target building; required for resident-tier roles.
    pub building_id: Option<String>,
    /// Target unit; required for resident-tier roles.
    pub unit_id: Option<String>,
    /// Days until the invitation expires; absent means never.
    #[validate(range(min = 1, max = 365))]
    pub expires_in_days: Option<u32>,
}

/// Request payload for linking a verified subject to its account.
#[must_use]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LinkAccount {
    /// Invite code the subject signed up with, if any.
    pub invite_code: Option<String>,
    /// Username to resolve or backfill, if any.
    #[validate(length(min = 2, max = 64))]
    pub username: Option<String>,
    /// Full name to backfill on the account, if any.
    #[validate(length(max = 128))]
    pub full_name: Option<String>,
}
