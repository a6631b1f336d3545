//! Invitation repository over the `Invitations` table.

use jiff::civil::Date;
use resida_core::Result;
use resida_sheets::RowStore;

use super::TRACING_TARGET;
use crate::model::{Invitation, Located};
use crate::types::Role;

/// Repository for invitation lookups and writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct InvitationQuery;

impl InvitationQuery {
    /// Lists every parseable invitation with its storage row.
    pub async fn all(store: &RowStore) -> Result<Vec<Located<Invitation>>> {
        let records = store.all_records(Invitation::TABLE).await?;
        let mut invitations = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let row = idx as u32 + 2;
            match Invitation::from_record(record) {
                Ok(invitation) => invitations.push(Located {
                    row,
                    item: invitation,
                }),
                Err(err) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        table = Invitation::TABLE,
                        row = row,
                        reason = err.reason(),
                        "skipping malformed invitation row"
                    );
                }
            }
        }
        Ok(invitations)
    }

    /// Finds an invitation by its code, case-insensitively.
    ///
    /// The row is re-read directly from the backend before parsing so revoke
    /// and lookup act on current state.
    pub async fn find_by_code(
        store: &RowStore,
        code: &str,
    ) -> Result<Option<Located<Invitation>>> {
        if code.trim().is_empty() {
            return Ok(None);
        }
        let Some(row) = store
            .find_row(Invitation::TABLE, "invite_code", code, true)
            .await?
        else {
            return Ok(None);
        };

        let record = store.record_at(Invitation::TABLE, row).await?;
        Ok(Some(Located {
            row,
            item: Invitation::from_record(&record)?,
        }))
    }

    /// Finds an active (outstanding, unexpired) invitation for a unit and
    /// role, if one exists.
    ///
    /// At most one such invitation should exist at a time; this check is how
    /// that uniqueness is enforced, since the storage cannot enforce it.
    pub async fn find_active_for_unit(
        store: &RowStore,
        unit_id: &str,
        role: Role,
        today: Date,
    ) -> Result<Option<Located<Invitation>>> {
        let invitations = Self::all(store).await?;
        Ok(invitations.into_iter().find(|located| {
            located.item.role == role
                && located.item.unit_id.as_deref() == Some(unit_id)
                && located.item.is_active(today)
        }))
    }

    /// Appends a new invitation row.
    pub async fn append(store: &RowStore, invitation: &Invitation) -> Result<()> {
        store
            .append_record(Invitation::TABLE, &invitation.into_record())
            .await?;
        Ok(())
    }

    /// Overwrites the invitation at `row`.
    pub async fn update(store: &RowStore, row: u32, invitation: &Invitation) -> Result<()> {
        store
            .write_record(Invitation::TABLE, row, &invitation.into_record())
            .await?;
        Ok(())
    }
}
