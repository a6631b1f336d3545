//! Invitation model for the `Invitations` table.

use jiff::civil::Date;
use resida_core::Result;
use resida_sheets::Record;
use serde::{Deserialize, Serialize};

use super::{optional, parse_or_default, parse_required};
use crate::types::{InvitationStatus, Role};

/// An invitation row binding a role, building, and unit to an invite code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    /// Caller-assigned logical identity.
    pub id: String,
    /// Short human-typeable code, case-insensitively unique among active
    /// invitations and account invite codes.
    pub invite_code: String,
    /// Role the invitee will receive.
    pub role: Role,
    /// Target building, if role-scoped.
    pub building_id: Option<String>,
    /// Target unit, if role-scoped.
    pub unit_id: Option<String>,
    /// Lifecycle status.
    pub status: InvitationStatus,
    /// Expiry date cell; absent means the invitation never expires.
    pub expires_at: Option<String>,
    /// Account id of the issuer.
    pub created_by_user_id: Option<String>,
    /// Creation timestamp (opaque string cell).
    pub created_at: Option<String>,
}

impl Invitation {
    /// Backing table name.
    pub const TABLE: &'static str = "Invitations";

    /// Parses an invitation from a raw record.
    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.get("ID").trim().to_string(),
            invite_code: record.get("invite_code").trim().to_string(),
            role: parse_required(record, "role")?,
            building_id: optional(record, "building_id"),
            unit_id: optional(record, "unit_id"),
            status: parse_or_default(record, "invite_status")?,
            expires_at: optional(record, "expires_at"),
            created_by_user_id: optional(record, "created_by_user_id"),
            created_at: optional(record, "created_at"),
        })
    }

    /// Flattens the invitation back into a raw record.
    pub fn into_record(&self) -> Record {
        let mut record = Record::new();
        record
            .set("ID", &self.id)
            .set("invite_code", &self.invite_code)
            .set("role", self.role.to_string())
            .set("building_id", self.building_id.clone().unwrap_or_default())
            .set("unit_id", self.unit_id.clone().unwrap_or_default())
            .set("invite_status", self.status.to_string())
            .set("expires_at", self.expires_at.clone().unwrap_or_default())
            .set(
                "created_by_user_id",
                self.created_by_user_id.clone().unwrap_or_default(),
            )
            .set("created_at", self.created_at.clone().unwrap_or_default());
        record
    }

    /// Returns the expiry as a civil date, when the cell parses as one.
    ///
    /// An absent or unparseable cell reads as "never expires", matching how
    /// the comparison has always behaved for junk cells.
    pub fn expires_on(&self) -> Option<Date> {
        self.expires_at.as_deref().and_then(|s| s.parse().ok())
    }

    /// Returns whether the invitation is past its expiry on `today`.
    ///
    /// Date-only comparison, no time-of-day precision: the invitation is
    /// usable through the whole of its expiry date.
    pub fn is_expired(&self, today: Date) -> bool {
        self.expires_on().is_some_and(|expires| expires < today)
    }

    /// Returns whether the invitation can still be redeemed on `today`.
    pub fn is_active(&self, today: Date) -> bool {
        self.status.is_active() && !self.is_expired(today)
    }

    /// Returns whether `code` matches this invitation, case-insensitively.
    pub fn matches_code(&self, code: &str) -> bool {
        self.invite_code.eq_ignore_ascii_case(code.trim())
    }
}
