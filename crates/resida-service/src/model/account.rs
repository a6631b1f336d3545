//! Account model for the `Users` table.

use resida_core::Result;
use resida_sheets::Record;
use serde::{Deserialize, Serialize};

use super::{optional, parse_or_default, parse_required};
use crate::types::{InviteState, RecordStatus, Role};

/// An account row: identity, role, scope, and invitation lifecycle fields.
///
/// Invariants held by the lifecycle manager: a `Registered` account has a
/// non-empty subject id; an `Invited` account has a non-empty invite code and
/// no subject id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Caller-assigned logical identity.
    pub id: String,
    /// Subject id attached by the identity provider, once registered.
    pub firebase_uid: Option<String>,
    /// Email address, if known.
    pub email: Option<String>,
    /// Sign-in/display name.
    pub username: String,
    /// Full display name, if known.
    pub full_name: Option<String>,
    /// Role bound to this account.
    pub role: Role,
    /// Building the account is scoped to, if any.
    pub building_id: Option<String>,
    /// Unit the account is bound to, if any.
    pub unit_id: Option<String>,
    /// Soft-delete status.
    pub status: RecordStatus,
    /// Where the account stands in the invitation flow.
    pub invite_state: InviteState,
    /// Outstanding invite code, while still invited.
    pub invite_code: Option<String>,
    /// Creation timestamp (opaque string cell).
    pub created_at: Option<String>,
    /// When the invitation was issued.
    pub invited_at: Option<String>,
    /// When the subject identity was attached.
    pub registered_at: Option<String>,
    /// Last login timestamp, stamped by the outer layer.
    pub last_login_at: Option<String>,
}

impl Account {
    /// Backing table name.
    pub const TABLE: &'static str = "Users";

    /// Parses an account from a raw record.
    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.get("ID").trim().to_string(),
            firebase_uid: optional(record, "firebase_uid"),
            email: optional(record, "email"),
            username: record.get("username").trim().to_string(),
            full_name: optional(record, "full_name"),
            role: parse_required(record, "role")?,
            building_id: optional(record, "building_id"),
            unit_id: optional(record, "unit_id"),
            status: parse_or_default(record, "status")?,
            invite_state: parse_or_default(record, "invite_status")?,
            invite_code: optional(record, "invite_code"),
            created_at: optional(record, "created_at"),
            invited_at: optional(record, "invited_at"),
            registered_at: optional(record, "registered_at"),
            last_login_at: optional(record, "last_login_at"),
        })
    }

    /// Flattens the account back into a raw record.
    pub fn into_record(&self) -> Record {
        let mut record = Record::new();
        record
            .set("ID", &self.id)
            .set("firebase_uid", self.firebase_uid.clone().unwrap_or_default())
            .set("email", self.email.clone().unwrap_or_default())
            .set("username", &self.username)
            .set("full_name", self.full_name.clone().unwrap_or_default())
            .set("role", self.role.to_string())
            .set("building_id", self.building_id.clone().unwrap_or_default())
            .set("unit_id", self.unit_id.clone().unwrap_or_default())
            .set("status", self.status.to_string())
            .set("invite_status", self.invite_state.to_string())
            .set("invite_code", self.invite_code.clone().unwrap_or_default())
            .set("created_at", self.created_at.clone().unwrap_or_default())
            .set("invited_at", self.invited_at.clone().unwrap_or_default())
            .set("registered_at", self.registered_at.clone().unwrap_or_default())
            .set("last_login_at", self.last_login_at.clone().unwrap_or_default());
        record
    }

    /// Returns whether a subject identity has been attached.
    pub fn is_registered(&self) -> bool {
        self.invite_state.is_registered()
    }

    /// Returns whether this account occupies `unit_id` in the given role.
    ///
    /// Only registered, active accounts count as occupants.
    pub fn occupies(&self, unit_id: &str, role: Role) -> bool {
        self.is_registered()
            && self.status.is_active()
            && self.role == role
            && self.unit_id.as_deref() == Some(unit_id)
    }

    /// Returns whether `code` matches this account's invite code,
    /// case-insensitively.
    pub fn has_invite_code(&self, code: &str) -> bool {
        self.invite_code
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(code.trim()))
    }
}
