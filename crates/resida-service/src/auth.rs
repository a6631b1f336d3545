//! Caller resolution and role-scoped authorization.
//!
//! Every resource-scoped operation decides access through [`ScopeEvaluator`]
//! instead of re-deriving role rules locally. The hierarchy, most to least
//! privileged: admin (no scoping), management tier (buildings they manage),
//! resident tier (strictly their own building).

use resida_core::{Error, Result, SubjectIdentity};
use resida_sheets::RowStore;

use crate::model::{Account, Located};
use crate::query::BuildingQuery;
use crate::types::Role;

/// A resolved caller: verified identity plus the linked account, if any.
///
/// A verified subject with no linked account is a distinct, reportable state,
/// not an error; operations that need an account reject it explicitly.
#[derive(Debug, Clone)]
pub struct Caller {
    /// Verified subject identity from the identity provider.
    pub identity: SubjectIdentity,
    /// The account linked to this subject, when one exists.
    pub account: Option<Located<Account>>,
}

impl Caller {
    /// Returns the linked account, or the canonical no-linked-account error.
    pub fn account(&self) -> Result<&Account> {
        self.account
            .as_ref()
            .map(|located| &located.item)
            .ok_or_else(|| {
                Error::authentication()
                    .with_reason("no_linked_account")
                    .with_message("verified subject has no linked account")
            })
    }
}

/// Role-scoped authorization decisions.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScopeEvaluator;

impl ScopeEvaluator {
    /// Decides whether `account` may read resources under `building_id`.
    ///
    /// A building that cannot be resolved is unreadable for everyone,
    /// including admins: not-found wins over the admin bypass.
    pub async fn can_read_building(
        store: &RowStore,
        account: &Account,
        building_id: &str,
    ) -> Result<bool> {
        let Some(building) = BuildingQuery::find_by_id(store, building_id).await? else {
            return Ok(false);
        };

        let allowed = match account.role {
            Role::Admin => true,
            Role::BuildingMgmt | Role::Staff => {
                building.is_managed_by(&account.id)
                    || account.building_id.as_deref() == Some(building_id)
            }
            Role::Tenant | Role::Owner => account.building_id.as_deref() == Some(building_id),
        };
        Ok(allowed)
    }

    /// Decides whether `caller` may issue an invitation for `target_role`
    /// under `building_id`.
    ///
    /// Admins may invite any role anywhere. The management tier may only
    /// invite tenants and owners, and only into buildings it can read. The
    /// resident tier may invite nobody.
    pub async fn can_create_invitation(
        store: &RowStore,
        caller: &Account,
        target_role: Role,
        building_id: Option<&str>,
    ) -> Result<bool> {
        match caller.role {
            Role::Admin => Ok(true),
            Role::BuildingMgmt | Role::Staff => {
                if !target_role.is_resident_tier() {
                    return Ok(false);
                }
                let Some(building_id) = building_id else {
                    return Ok(false);
                };
                Self::can_read_building(store, caller, building_id).await
            }
            Role::Tenant | Role::Owner => Ok(false),
        }
    }
}
