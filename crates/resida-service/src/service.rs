//! Invitation lifecycle orchestration.
//!
//! The service owns the exposed surface: create, revoke, lookup, list, link,
//! and caller resolution. All domain checks fail fast with a stable reason
//! code; writes go through the row store, which offers no transactions, so
//! multi-write sequences are not atomic and the documented race windows are
//! narrowed (by a re-check before the final write) rather than eliminated.

use std::collections::HashSet;
use std::sync::Arc;

use jiff::civil::Date;
use jiff::{Span, Timestamp, Zoned};
use resida_core::{Error, IdentityResolver, Result, SubjectIdentity};
use resida_sheets::RowStore;
use uuid::Uuid;
use validator::Validate;

use crate::auth::{Caller, ScopeEvaluator};
use crate::code;
use crate::model::{Account, Invitation, Located};
use crate::query::{AccountQuery, BuildingQuery, InvitationQuery, OccupancyQuery, UnitQuery};
use crate::request::{CreateInvitation, LinkAccount};
use crate::response::{InvitationLookup, IssuedInvitation, PrefillProfile};
use crate::types::{InvitationStatus, InviteState, RecordStatus, Role};

/// Tracing target for invitation lifecycle operations.
const TRACING_TARGET: &str = "resida_service::service";

/// Invitation lifecycle manager over a [`RowStore`] and an identity resolver.
///
/// `Clone` is cheap; clones share the store (and therefore its cache) and the
/// resolver. Requests are handled independently with no locking: two
/// concurrent creates for the same unit and role can both pass the checks
/// before either writes. That window is narrowed by an optimistic re-check
/// before the final append, not closed.
#[derive(Clone)]
pub struct InviteService {
    store: RowStore,
    identity: Arc<dyn IdentityResolver>,
}

impl InviteService {
    /// Creates a service over `store` and `identity`.
    pub fn new(store: RowStore, identity: Arc<dyn IdentityResolver>) -> Self {
        Self { store, identity }
    }

    /// Returns the underlying row store.
    pub fn store(&self) -> &RowStore {
        &self.store
    }

    /// Verifies a bearer token and resolves the linked account.
    ///
    /// The account is matched by subject id first, then by email. A verified
    /// subject with no linked account resolves successfully with no account
    /// attached; that state is reported, not swallowed.
    #[tracing::instrument(skip_all)]
    pub async fn resolve_caller(&self, token: &str) -> Result<Caller> {
        let identity = self.identity.verify(token).await?;

        let mut account = AccountQuery::find_by_subject(&self.store, &identity.subject_id).await?;
        if account.is_none()
            && let Some(email) = identity.email.as_deref()
        {
            account = AccountQuery::find_by_email(&self.store, email).await?;
        }

        if account.is_none() {
            tracing::debug!(
                target: TRACING_TARGET,
                subject_id = %identity.subject_id,
                "verified subject has no linked account"
            );
        }

        Ok(Caller { identity, account })
    }

    /// Creates an invitation and seeds (or reuses) the invitee's account.
    ///
    /// The account upsert and the invitation append are two independent
    /// writes; a failure between them leaves an account holding an invite
    /// code with no invitation record, and there is no compensating rollback.
    #[tracing::instrument(skip_all, fields(role = %request.role, unit_id = ?request.unit_id))]
    pub async fn create_invitation(
        &self,
        caller: &Caller,
        request: CreateInvitation,
    ) -> Result<IssuedInvitation> {
        request
            .validate()
            .map_err(|err| Error::validation().with_reason("invalid_request").with_message(err.to_string()))?;
        let caller_account = caller.account()?;

        let authorized = ScopeEvaluator::can_create_invitation(
            &self.store,
            caller_account,
            request.role,
            request.building_id.as_deref(),
        )
        .await?;
        if !authorized {
            return Err(Error::authorization()
                .with_reason("out_of_scope")
                .with_message("caller may not issue this invitation"));
        }

        let today = today();
        if request.role.is_resident_tier() {
            self.check_unit_is_free(&request, today).await?;
        }

        let invite_code = self.generate_code().await?;
        let expires_at = match request.expires_in_days {
            Some(days) => Some(expiry_date(today, days)?),
            None => None,
        };

        let account_id = self.upsert_invitee(&request, &invite_code).await?;

        // Optimistic re-check: another writer may have appended an invitation
        // for the same unit and role while this one was validating. Narrows
        // the race window; cannot close it.
        if let (true, Some(unit_id)) = (request.role.is_resident_tier(), request.unit_id.as_deref())
            && InvitationQuery::find_active_for_unit(&self.store, unit_id, request.role, today)
                .await?
                .is_some()
        {
            return Err(Error::conflict()
                .with_reason("duplicate_active_invite")
                .with_message("an active invitation already exists for this unit and role"));
        }

        let invitation = Invitation {
            id: Uuid::new_v4().to_string(),
            invite_code,
            role: request.role,
            building_id: request.building_id.clone(),
            unit_id: request.unit_id.clone(),
            status: InvitationStatus::Invited,
            expires_at: expires_at.map(|date| date.to_string()),
            created_by_user_id: Some(caller_account.id.clone()),
            created_at: Some(Timestamp::now().to_string()),
        };
        InvitationQuery::append(&self.store, &invitation).await?;

        tracing::info!(
            target: TRACING_TARGET,
            invitation_id = %invitation.id,
            account_id = %account_id,
            "invitation created"
        );

        Ok(IssuedInvitation {
            account_id,
            invitation,
        })
    }

    /// Revokes an invitation by code and frees the seeded account's code.
    #[tracing::instrument(skip_all)]
    pub async fn revoke_invitation(&self, caller: &Caller, invite_code: &str) -> Result<()> {
        let caller_account = caller.account()?;

        let Some(Located { row, item: mut invitation }) =
            InvitationQuery::find_by_code(&self.store, invite_code).await?
        else {
            return Err(Error::not_found()
                .with_reason("invite_not_found")
                .with_message("no invitation matches that code"));
        };

        if invitation.status.is_terminal() {
            return Err(Error::conflict()
                .with_reason("invite_not_active")
                .with_message("invitation is already cancelled or used"));
        }

        let in_scope = match caller_account.role {
            Role::Admin => true,
            Role::BuildingMgmt | Role::Staff => {
                invitation.role.is_resident_tier()
                    && match invitation.building_id.as_deref() {
                        Some(building_id) => {
                            ScopeEvaluator::can_read_building(
                                &self.store,
                                caller_account,
                                building_id,
                            )
                            .await?
                        }
                        None => false,
                    }
            }
            Role::Tenant | Role::Owner => false,
        };
        if !in_scope {
            return Err(Error::authorization()
                .with_reason("out_of_scope")
                .with_message("caller may not revoke this invitation"));
        }

        invitation.status = InvitationStatus::Cancelled;
        InvitationQuery::update(&self.store, row, &invitation).await?;

        // Free the code on the seeded account so the person can be re-invited.
        if let Some(Located { row, item: mut account }) =
            AccountQuery::find_by_invite_code(&self.store, invite_code).await?
            && !account.is_registered()
        {
            account.invite_code = None;
            AccountQuery::update(&self.store, row, &account).await?;
        }

        tracing::info!(
            target: TRACING_TARGET,
            invitation_id = %invitation.id,
            "invitation revoked"
        );
        Ok(())
    }

    /// Resolves an invitation by code for the public sign-up flow.
    ///
    /// Unauthenticated by design: the code itself is the credential.
    #[tracing::instrument(skip_all)]
    pub async fn lookup_invitation(&self, invite_code: &str) -> Result<InvitationLookup> {
        let Some(Located { item: invitation, .. }) =
            InvitationQuery::find_by_code(&self.store, invite_code).await?
        else {
            return Err(Error::not_found()
                .with_reason("invite_not_found")
                .with_message("no invitation matches that code"));
        };

        if invitation.status.is_terminal() {
            return Err(Error::conflict()
                .with_reason("invite_not_active")
                .with_message("invitation has been cancelled or used"));
        }
        if invitation.is_expired(today()) {
            return Err(Error::conflict()
                .with_reason("invite_expired")
                .with_message("invitation is past its expiry date"));
        }

        let profile = match AccountQuery::find_by_invite_code(&self.store, invite_code).await? {
            Some(Located { item: account, .. }) => PrefillProfile {
                full_name: account.full_name,
                email: account.email,
                username: Some(account.username).filter(|name| !name.is_empty()),
            },
            None => PrefillProfile::default(),
        };

        Ok(InvitationLookup {
            invitation,
            profile,
        })
    }

    /// Attaches a verified subject identity to its seeded account.
    ///
    /// The account is resolved by invite code, then by the subject's email,
    /// then by the requested username. Re-linking the same subject is a
    /// no-op success; linking over a different subject is a conflict.
    #[tracing::instrument(skip_all, fields(subject_id = %subject.subject_id))]
    pub async fn link_account(
        &self,
        subject: &SubjectIdentity,
        request: LinkAccount,
    ) -> Result<Account> {
        request
            .validate()
            .map_err(|err| Error::validation().with_reason("invalid_request").with_message(err.to_string()))?;

        let mut located = match request.invite_code.as_deref() {
            Some(code) => AccountQuery::find_by_invite_code(&self.store, code).await?,
            None => None,
        };
        if located.is_none()
            && let Some(email) = subject.email.as_deref()
        {
            located = AccountQuery::find_by_email(&self.store, email).await?;
        }
        if located.is_none()
            && let Some(username) = request.username.as_deref()
        {
            located = AccountQuery::find_by_username(&self.store, username).await?;
        }

        let Some(Located { row, item: mut account }) = located else {
            return Err(Error::not_found()
                .with_reason("account_not_found")
                .with_message("no account matches the code, email, or username"));
        };

        match account.firebase_uid.as_deref() {
            Some(existing) if existing == subject.subject_id => {
                // Re-linking the same subject is a no-op success.
                return Ok(account);
            }
            Some(_) => {
                return Err(Error::conflict()
                    .with_reason("subject_already_linked")
                    .with_message("account is already linked to a different subject"));
            }
            None => {}
        }

        account.firebase_uid = Some(subject.subject_id.clone());
        account.invite_state = InviteState::Registered;
        account.status = RecordStatus::Active;
        if account.email.is_none() {
            account.email = subject.email.clone();
        }
        if account.full_name.is_none() {
            account.full_name = request.full_name.clone();
        }
        if account.username.is_empty()
            && let Some(username) = request.username.as_deref()
        {
            account.username = username.to_string();
        }
        if account.registered_at.is_none() {
            account.registered_at = Some(Timestamp::now().to_string());
        }

        AccountQuery::update(&self.store, row, &account).await?;

        tracing::info!(
            target: TRACING_TARGET,
            account_id = %account.id,
            "subject linked to account"
        );
        Ok(account)
    }

    /// Lists invitations visible to the caller.
    ///
    /// Admins see everything; everyone else sees only what they created.
    #[tracing::instrument(skip_all)]
    pub async fn list_invitations(&self, caller: &Caller) -> Result<Vec<Invitation>> {
        let caller_account = caller.account()?;
        let invitations = InvitationQuery::all(&self.store).await?;

        let visible = invitations
            .into_iter()
            .map(|located| located.item)
            .filter(|invitation| {
                caller_account.role == Role::Admin
                    || invitation.created_by_user_id.as_deref() == Some(&caller_account.id)
            })
            .collect();
        Ok(visible)
    }

    /// Rejects the create when any occupancy signal or an active invitation
    /// already claims the requested unit and role.
    async fn check_unit_is_free(&self, request: &CreateInvitation, today: Date) -> Result<()> {
        let (Some(building_id), Some(unit_id)) =
            (request.building_id.as_deref(), request.unit_id.as_deref())
        else {
            return Err(Error::validation()
                .with_reason("missing_building_or_unit")
                .with_message("tenant and owner invitations need a building and a unit"));
        };

        if BuildingQuery::find_by_id(&self.store, building_id).await?.is_none() {
            return Err(Error::not_found()
                .with_reason("building_not_found")
                .with_message("referenced building does not exist"));
        }
        let Some(unit) = UnitQuery::find_by_id(&self.store, unit_id).await? else {
            return Err(Error::not_found()
                .with_reason("unit_not_found")
                .with_message("referenced unit does not exist"));
        };
        if !unit.belongs_to(building_id) {
            return Err(Error::validation()
                .with_reason("unit_not_in_building")
                .with_message("unit does not belong to the referenced building"));
        }
        if !unit.status.accepts_invitations() {
            return Err(Error::conflict()
                .with_reason("unit_inactive")
                .with_message("unit is inactive and cannot be assigned"));
        }

        // Occupancy is checked three ways; any one hit rejects the create.
        let occupied_by_account = AccountQuery::all(&self.store)
            .await?
            .iter()
            .any(|located| located.item.occupies(unit_id, request.role));
        let occupied_by_reference = unit.occupant_for(request.role).is_some();
        let occupied_by_record =
            OccupancyQuery::find_active_for_unit(&self.store, unit_id, request.role)
                .await?
                .is_some();
        if occupied_by_account || occupied_by_reference || occupied_by_record {
            return Err(Error::conflict()
                .with_reason("unit_already_assigned")
                .with_message("unit already has an occupant for this role"));
        }

        if InvitationQuery::find_active_for_unit(&self.store, unit_id, request.role, today)
            .await?
            .is_some()
        {
            return Err(Error::conflict()
                .with_reason("duplicate_active_invite")
                .with_message("an active invitation already exists for this unit and role"));
        }

        Ok(())
    }

    /// Draws a code that collides with no known invitation or account code.
    async fn generate_code(&self) -> Result<String> {
        let mut existing: HashSet<String> = InvitationQuery::all(&self.store)
            .await?
            .iter()
            .map(|located| code::fold(&located.item.invite_code))
            .collect();
        existing.extend(
            AccountQuery::all(&self.store)
                .await?
                .iter()
                .filter_map(|located| located.item.invite_code.as_deref().map(code::fold)),
        );

        Ok(code::generate_unique(&existing))
    }

    /// Seeds a new account for the invitee, or reuses a pending one.
    ///
    /// Matching goes by email first, then username, both case-insensitive. A
    /// match that already registered rejects the create.
    async fn upsert_invitee(&self, request: &CreateInvitation, invite_code: &str) -> Result<String> {
        let mut existing = match request.email.as_deref() {
            Some(email) => AccountQuery::find_by_email(&self.store, email).await?,
            None => None,
        };
        if existing.is_none() {
            existing = AccountQuery::find_by_username(&self.store, &request.username).await?;
        }

        let now = Timestamp::now().to_string();
        match existing {
            Some(Located { row, item: mut account }) => {
                if account.is_registered() {
                    return Err(Error::conflict()
                        .with_reason("already_registered")
                        .with_message("matched account has already completed sign-up"));
                }

                account.role = request.role;
                account.building_id = request.building_id.clone();
                account.unit_id = request.unit_id.clone();
                account.invite_state = InviteState::Invited;
                account.invite_code = Some(invite_code.to_string());
                account.invited_at = Some(now);
                if account.email.is_none() {
                    account.email = request.email.clone();
                }
                if account.full_name.is_none() {
                    account.full_name = request.full_name.clone();
                }
                AccountQuery::update(&self.store, row, &account).await?;
                Ok(account.id)
            }
            None => {
                let account = Account {
                    id: Uuid::new_v4().to_string(),
                    firebase_uid: None,
                    email: request.email.clone(),
                    username: request.username.clone(),
                    full_name: request.full_name.clone(),
                    role: request.role,
                    building_id: request.building_id.clone(),
                    unit_id: request.unit_id.clone(),
                    status: RecordStatus::Active,
                    invite_state: InviteState::Invited,
                    invite_code: Some(invite_code.to_string()),
                    created_at: Some(now.clone()),
                    invited_at: Some(now),
                    registered_at: None,
                    last_login_at: None,
                };
                AccountQuery::append(&self.store, &account).await?;
                Ok(account.id)
            }
        }
    }
}

impl std::fmt::Debug for InviteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InviteService").finish_non_exhaustive()
    }
}

/// Today's civil date in the system time zone.
fn today() -> Date {
    Zoned::now().date()
}

/// Computes the expiry date `days` from `today`.
fn expiry_date(today: Date, days: u32) -> Result<Date> {
    today
        .checked_add(Span::new().days(i64::from(days)))
        .map_err(|err| {
            Error::validation()
                .with_reason("invalid_request")
                .with_message(format!("expiry out of range: {err}"))
        })
}

#[cfg(test)]
mod tests {
    use resida_core::mock::StaticIdentityResolver;
    use resida_sheets::memory::InMemoryBackend;

    use super::*;

    const USERS_HEADERS: [&str; 15] = [
        "ID",
        "firebase_uid",
        "email",
        "username",
        "full_name",
        "role",
        "building_id",
        "unit_id",
        "status",
        "invite_status",
        "invite_code",
        "created_at",
        "invited_at",
        "registered_at",
        "last_login_at",
    ];

    const INVITATIONS_HEADERS: [&str; 9] = [
        "ID",
        "invite_code",
        "role",
        "building_id",
        "unit_id",
        "invite_status",
        "expires_at",
        "created_by_user_id",
        "created_at",
    ];

    fn user_row(
        id: &str,
        uid: &str,
        email: &str,
        username: &str,
        role: &str,
        building: &str,
        unit: &str,
        invite_status: &str,
        invite_code: &str,
    ) -> Vec<String> {
        vec![
            id.into(),
            uid.into(),
            email.into(),
            username.into(),
            String::new(),
            role.into(),
            building.into(),
            unit.into(),
            "ACTIVE".into(),
            invite_status.into(),
            invite_code.into(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
        ]
    }

    fn invitation_row(
        id: &str,
        code: &str,
        role: &str,
        building: &str,
        unit: &str,
        status: &str,
        expires: &str,
        created_by: &str,
    ) -> Vec<String> {
        vec![
            id.into(),
            code.into(),
            role.into(),
            building.into(),
            unit.into(),
            status.into(),
            expires.into(),
            created_by.into(),
            String::new(),
        ]
    }

    fn fixture() -> (InviteService, std::sync::Arc<InMemoryBackend>) {
        let headers =
            |cols: &[&str]| -> Vec<String> { cols.iter().map(|c| c.to_string()).collect() };

        let mut users = vec![headers(&USERS_HEADERS)];
        users.push(user_row(
            "USR_ADMIN", "fb-admin", "admin@x.com", "admin", "ADMIN", "", "", "REGISTERED", "",
        ));
        users.push(user_row(
            "USR_MGMT", "fb-mgmt", "mgmt@x.com", "mgmt", "BUILDING_MGMT", "", "", "REGISTERED", "",
        ));
        users.push(user_row(
            "USR_TEN", "fb-ten", "ten@x.com", "ten", "TENANT", "BLD_1", "UNT_2", "REGISTERED", "",
        ));
        users.push(user_row(
            "USR_PEND",
            "",
            "pending@x.com",
            "pending",
            "TENANT",
            "BLD_1",
            "UNT_8",
            "INVITED",
            "PEND-CODE",
        ));

        let mut invitations = vec![headers(&INVITATIONS_HEADERS)];
        invitations.push(invitation_row(
            "INV_7", "DUPE-UNIT", "TENANT", "BLD_1", "UNT_7", "INVITED", "", "USR_ADMIN",
        ));
        invitations.push(invitation_row(
            "INV_PEND", "PEND-CODE", "TENANT", "BLD_1", "UNT_8", "INVITED", "", "USR_ADMIN",
        ));
        invitations.push(invitation_row(
            "INV_EXP", "EXPD-CODE", "TENANT", "BLD_1", "", "INVITED", "2020-01-01", "USR_ADMIN",
        ));
        invitations.push(invitation_row(
            "INV_CANC", "CANC-CODE", "TENANT", "BLD_1", "", "CANCELLED", "", "USR_ADMIN",
        ));
        invitations.push(invitation_row(
            "INV_FAR", "FARB-CODE", "TENANT", "BLD_2", "UNT_5", "INVITED", "", "USR_OTHER",
        ));
        invitations.push(invitation_row(
            "INV_MINE", "MGMT-CODE", "OWNER", "BLD_1", "UNT_9", "INVITED", "", "USR_MGMT",
        ));

        let backend = InMemoryBackend::new()
            .with_table("Users", users)
            .with_table("Invitations", invitations)
            .with_table(
                "Buildings",
                vec![
                    vec!["ID", "name", "status", "management_user_id"],
                    vec!["BLD_1", "North Court", "ACTIVE", "USR_MGMT"],
                    vec!["BLD_2", "South Court", "ACTIVE", "USR_OTHER"],
                ],
            )
            .with_table(
                "Units",
                vec![
                    vec![
                        "ID",
                        "building_id",
                        "unit_number",
                        "status",
                        "current_tenant_user_id",
                        "current_owner_user_id",
                    ],
                    vec!["UNT_1", "BLD_1", "101", "AVAILABLE", "", ""],
                    vec!["UNT_2", "BLD_1", "102", "OCCUPIED", "", ""],
                    vec!["UNT_3", "BLD_1", "103", "OCCUPIED", "USR_X", ""],
                    vec!["UNT_4", "BLD_1", "104", "AVAILABLE", "", ""],
                    vec!["UNT_5", "BLD_2", "201", "AVAILABLE", "", ""],
                    vec!["UNT_6", "BLD_1", "106", "INACTIVE", "", ""],
                    vec!["UNT_7", "BLD_1", "107", "AVAILABLE", "", ""],
                    vec!["UNT_8", "BLD_1", "108", "AVAILABLE", "", ""],
                    vec!["UNT_9", "BLD_1", "109", "AVAILABLE", "", ""],
                ],
            )
            .with_table(
                "Occupancies",
                vec![
                    vec!["ID", "unit_id", "user_id", "role", "status"],
                    vec!["OCC_1", "UNT_4", "USR_Y", "TENANT", "ACTIVE"],
                    vec!["OCC_2", "UNT_1", "USR_Z", "TENANT", "ENDED"],
                ],
            );

        let backend = std::sync::Arc::new(backend);
        let resolver = StaticIdentityResolver::new();
        resolver.register(
            "tok-admin",
            SubjectIdentity::new("fb-admin").with_email("admin@x.com").verified(),
        );
        resolver.register(
            "tok-mgmt",
            SubjectIdentity::new("fb-mgmt").with_email("mgmt@x.com").verified(),
        );
        resolver.register(
            "tok-ten",
            SubjectIdentity::new("fb-ten").with_email("ten@x.com").verified(),
        );
        resolver.register("tok-unlinked", SubjectIdentity::new("fb-unlinked"));
        resolver.register(
            "tok-email-only",
            SubjectIdentity::new("fb-fresh").with_email("ten@x.com").verified(),
        );

        let service = InviteService::new(
            RowStore::new(backend.clone()),
            std::sync::Arc::new(resolver),
        );
        (service, backend)
    }

    async fn caller(service: &InviteService, token: &str) -> Caller {
        service.resolve_caller(token).await.unwrap()
    }

    fn tenant_request(building: &str, unit: &str) -> CreateInvitation {
        CreateInvitation {
            role: Role::Tenant,
            email: None,
            username: "jdoe".to_string(),
            full_name: None,
            building_id: Some(building.to_string()),
            unit_id: Some(unit.to_string()),
            expires_in_days: None,
        }
    }

    #[tokio::test]
    async fn resolve_caller_matches_by_subject_then_email() {
        let (service, _) = fixture();

        let by_subject = caller(&service, "tok-ten").await;
        assert_eq!(by_subject.account().unwrap().id, "USR_TEN");

        // Unknown subject id, known email: falls back to the email match.
        let by_email = caller(&service, "tok-email-only").await;
        assert_eq!(by_email.account().unwrap().id, "USR_TEN");

        let unlinked = caller(&service, "tok-unlinked").await;
        assert!(unlinked.account.is_none());
        assert_eq!(unlinked.account().unwrap_err().reason(), "no_linked_account");
    }

    #[tokio::test]
    async fn resolve_caller_rejects_bad_tokens() {
        let (service, _) = fixture();
        let err = service.resolve_caller("tok-bogus").await.unwrap_err();
        assert_eq!(err.reason(), "invalid_token");
    }

    #[tokio::test]
    async fn create_then_link_full_flow() {
        let (service, _) = fixture();
        let admin = caller(&service, "tok-admin").await;

        let mut request = tenant_request("BLD_1", "UNT_1");
        request.email = Some("jdoe@x.com".to_string());
        request.expires_in_days = Some(7);

        let issued = service.create_invitation(&admin, request).await.unwrap();
        let code = issued.invitation.invite_code.clone();
        assert_eq!(code.len(), 9);
        assert_eq!(&code[4..5], "-");
        let expected_expiry = today().checked_add(Span::new().days(7)).unwrap();
        assert_eq!(
            issued.invitation.expires_at.as_deref(),
            Some(expected_expiry.to_string().as_str())
        );

        let lookup = service.lookup_invitation(&code).await.unwrap();
        assert_eq!(lookup.invitation.status, InvitationStatus::Invited);
        assert_eq!(lookup.profile.username.as_deref(), Some("jdoe"));
        assert_eq!(lookup.profile.email.as_deref(), Some("jdoe@x.com"));

        let subject = SubjectIdentity::new("fb123").with_email("jdoe@x.com").verified();
        let linked = service
            .link_account(
                &subject,
                LinkAccount {
                    invite_code: Some(code.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(linked.firebase_uid.as_deref(), Some("fb123"));
        assert_eq!(linked.invite_state, InviteState::Registered);
        assert!(linked.registered_at.is_some());

        // The invitation row itself stays INVITED until explicitly revoked.
        let lookup = service.lookup_invitation(&code).await.unwrap();
        assert_eq!(lookup.invitation.status, InvitationStatus::Invited);

        // But the unit is now assigned, so a repeat create fails.
        let err = service
            .create_invitation(&admin, tenant_request("BLD_1", "UNT_1"))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "unit_already_assigned");
    }

    #[tokio::test]
    async fn occupancy_is_rejected_on_any_of_the_three_signals() {
        let (service, _) = fixture();
        let admin = caller(&service, "tok-admin").await;

        // Signal 1: a registered account bound to the unit and role.
        let err = service
            .create_invitation(&admin, tenant_request("BLD_1", "UNT_2"))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "unit_already_assigned");

        // Signal 2: the unit's direct occupant reference.
        let err = service
            .create_invitation(&admin, tenant_request("BLD_1", "UNT_3"))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "unit_already_assigned");

        // Signal 3: an active occupancy record.
        let err = service
            .create_invitation(&admin, tenant_request("BLD_1", "UNT_4"))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "unit_already_assigned");
    }

    #[tokio::test]
    async fn ended_occupancy_does_not_block_the_unit() {
        let (service, _) = fixture();
        let admin = caller(&service, "tok-admin").await;

        // UNT_1 has only an ENDED occupancy record.
        let issued = service
            .create_invitation(&admin, tenant_request("BLD_1", "UNT_1"))
            .await
            .unwrap();
        assert_eq!(issued.invitation.unit_id.as_deref(), Some("UNT_1"));
    }

    #[tokio::test]
    async fn duplicate_active_invitation_is_rejected() {
        let (service, _) = fixture();
        let admin = caller(&service, "tok-admin").await;

        let err = service
            .create_invitation(&admin, tenant_request("BLD_1", "UNT_7"))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "duplicate_active_invite");

        // A different role for the same unit is fine.
        let mut request = tenant_request("BLD_1", "UNT_7");
        request.role = Role::Owner;
        let issued = service.create_invitation(&admin, request).await.unwrap();
        assert_eq!(issued.invitation.role, Role::Owner);
        assert_eq!(issued.invitation.unit_id.as_deref(), Some("UNT_7"));
    }

    #[tokio::test]
    async fn management_tier_scope_is_enforced_on_create() {
        let (service, _) = fixture();
        let mgmt = caller(&service, "tok-mgmt").await;

        // In scope: tenant invitation into the managed building.
        let issued = service
            .create_invitation(&mgmt, tenant_request("BLD_1", "UNT_1"))
            .await
            .unwrap();
        assert_eq!(issued.invitation.created_by_user_id.as_deref(), Some("USR_MGMT"));

        // Out of scope: another manager's building.
        let err = service
            .create_invitation(&mgmt, tenant_request("BLD_2", "UNT_5"))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "out_of_scope");

        // Out of scope: peer roles, even inside the managed building.
        let mut request = tenant_request("BLD_1", "UNT_1");
        request.role = Role::Staff;
        request.building_id = None;
        request.unit_id = None;
        let err = service.create_invitation(&mgmt, request).await.unwrap_err();
        assert_eq!(err.reason(), "out_of_scope");
    }

    #[tokio::test]
    async fn resident_tier_cannot_create() {
        let (service, _) = fixture();
        let tenant = caller(&service, "tok-ten").await;

        let err = service
            .create_invitation(&tenant, tenant_request("BLD_1", "UNT_1"))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "out_of_scope");
    }

    #[tokio::test]
    async fn resident_invitations_validate_building_and_unit() {
        let (service, _) = fixture();
        let admin = caller(&service, "tok-admin").await;

        let mut request = tenant_request("BLD_1", "UNT_1");
        request.building_id = None;
        let err = service.create_invitation(&admin, request).await.unwrap_err();
        assert_eq!(err.reason(), "missing_building_or_unit");

        let err = service
            .create_invitation(&admin, tenant_request("BLD_404", "UNT_1"))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "building_not_found");

        let err = service
            .create_invitation(&admin, tenant_request("BLD_1", "UNT_404"))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "unit_not_found");

        // UNT_5 exists but belongs to BLD_2.
        let err = service
            .create_invitation(&admin, tenant_request("BLD_1", "UNT_5"))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "unit_not_in_building");

        let err = service
            .create_invitation(&admin, tenant_request("BLD_1", "UNT_6"))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "unit_inactive");
    }

    #[tokio::test]
    async fn create_rejects_already_registered_invitee() {
        let (service, _) = fixture();
        let admin = caller(&service, "tok-admin").await;

        let mut request = tenant_request("BLD_1", "UNT_1");
        request.email = Some("ten@x.com".to_string());
        let err = service.create_invitation(&admin, request).await.unwrap_err();
        assert_eq!(err.reason(), "already_registered");
    }

    #[tokio::test]
    async fn create_reuses_a_pending_account_row() {
        let (service, backend) = fixture();
        let admin = caller(&service, "tok-admin").await;
        let rows_before = backend.row_count("Users");

        let mut request = tenant_request("BLD_1", "UNT_1");
        request.email = Some("pending@x.com".to_string());
        request.username = "pending".to_string();
        let issued = service.create_invitation(&admin, request).await.unwrap();

        assert_eq!(issued.account_id, "USR_PEND");
        assert_eq!(backend.row_count("Users"), rows_before);

        // The reused row carries the fresh code now.
        let lookup = service
            .lookup_invitation(&issued.invitation.invite_code)
            .await
            .unwrap();
        assert_eq!(lookup.profile.username.as_deref(), Some("pending"));
    }

    #[tokio::test]
    async fn new_codes_avoid_existing_account_and_invitation_codes() {
        let (service, _) = fixture();
        let admin = caller(&service, "tok-admin").await;

        let issued = service
            .create_invitation(&admin, tenant_request("BLD_1", "UNT_1"))
            .await
            .unwrap();

        let fresh = code::fold(&issued.invitation.invite_code);
        for seeded in ["dupe-unit", "pend-code", "expd-code", "canc-code", "farb-code"] {
            assert_ne!(fresh, seeded);
        }
    }

    #[tokio::test]
    async fn revoke_cancels_and_frees_the_pending_account_code() {
        let (service, _) = fixture();
        let admin = caller(&service, "tok-admin").await;

        service.revoke_invitation(&admin, "PEND-CODE").await.unwrap();

        let err = service.lookup_invitation("PEND-CODE").await.unwrap_err();
        assert_eq!(err.reason(), "invite_not_active");

        // The seeded account lost its code and can be re-invited.
        let freed = AccountQuery::find_by_invite_code(service.store(), "PEND-CODE")
            .await
            .unwrap();
        assert!(freed.is_none());
    }

    #[tokio::test]
    async fn revoke_out_of_scope_leaves_the_invitation_unchanged() {
        let (service, _) = fixture();
        let mgmt = caller(&service, "tok-mgmt").await;

        let err = service.revoke_invitation(&mgmt, "FARB-CODE").await.unwrap_err();
        assert_eq!(err.reason(), "out_of_scope");

        let lookup = service.lookup_invitation("FARB-CODE").await.unwrap();
        assert_eq!(lookup.invitation.status, InvitationStatus::Invited);
    }

    #[tokio::test]
    async fn revoke_within_managed_building_succeeds() {
        let (service, _) = fixture();
        let mgmt = caller(&service, "tok-mgmt").await;

        service.revoke_invitation(&mgmt, "DUPE-UNIT").await.unwrap();
        let err = service.lookup_invitation("DUPE-UNIT").await.unwrap_err();
        assert_eq!(err.reason(), "invite_not_active");
    }

    #[tokio::test]
    async fn revoke_rejects_terminal_and_unknown_codes() {
        let (service, _) = fixture();
        let admin = caller(&service, "tok-admin").await;

        let err = service.revoke_invitation(&admin, "CANC-CODE").await.unwrap_err();
        assert_eq!(err.reason(), "invite_not_active");

        let err = service.revoke_invitation(&admin, "NOPE-CODE").await.unwrap_err();
        assert_eq!(err.reason(), "invite_not_found");
    }

    #[tokio::test]
    async fn lookup_rejects_unknown_terminal_and_expired_codes() {
        let (service, _) = fixture();

        let err = service.lookup_invitation("NOPE-CODE").await.unwrap_err();
        assert_eq!(err.reason(), "invite_not_found");

        let err = service.lookup_invitation("CANC-CODE").await.unwrap_err();
        assert_eq!(err.reason(), "invite_not_active");

        let err = service.lookup_invitation("EXPD-CODE").await.unwrap_err();
        assert_eq!(err.reason(), "invite_expired");
    }

    #[tokio::test]
    async fn lookup_is_case_insensitive_on_the_code() {
        let (service, _) = fixture();
        let lookup = service.lookup_invitation("pend-code").await.unwrap();
        assert_eq!(lookup.invitation.id, "INV_PEND");
        assert_eq!(lookup.profile.email.as_deref(), Some("pending@x.com"));
    }

    #[tokio::test]
    async fn link_falls_back_from_code_to_email_to_username() {
        let (service, _) = fixture();

        // By email, no code supplied.
        let subject = SubjectIdentity::new("fb-new-1").with_email("pending@x.com").verified();
        let linked = service.link_account(&subject, LinkAccount::default()).await.unwrap();
        assert_eq!(linked.id, "USR_PEND");
        assert_eq!(linked.firebase_uid.as_deref(), Some("fb-new-1"));
    }

    #[tokio::test]
    async fn link_by_username_when_subject_has_no_email() {
        let (service, _) = fixture();

        let subject = SubjectIdentity::new("fb-new-2");
        let linked = service
            .link_account(
                &subject,
                LinkAccount {
                    username: Some("pending".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(linked.id, "USR_PEND");
        assert_eq!(linked.email.as_deref(), Some("pending@x.com"));
    }

    #[tokio::test]
    async fn link_is_idempotent_for_the_same_subject_only() {
        let (service, _) = fixture();

        // Same subject again: no-op success.
        let subject = SubjectIdentity::new("fb-ten").with_email("ten@x.com").verified();
        let linked = service.link_account(&subject, LinkAccount::default()).await.unwrap();
        assert_eq!(linked.id, "USR_TEN");

        // Different subject against an already linked account: conflict.
        let intruder = SubjectIdentity::new("fb-evil").with_email("ten@x.com").verified();
        let err = service
            .link_account(&intruder, LinkAccount::default())
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "subject_already_linked");
    }

    #[tokio::test]
    async fn link_with_nothing_to_match_is_not_found() {
        let (service, _) = fixture();
        let subject = SubjectIdentity::new("fb-ghost");
        let err = service
            .link_account(&subject, LinkAccount::default())
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "account_not_found");
    }

    #[tokio::test]
    async fn list_is_scoped_to_the_creator_except_for_admins() {
        let (service, _) = fixture();

        let admin = caller(&service, "tok-admin").await;
        let all = service.list_invitations(&admin).await.unwrap();
        assert_eq!(all.len(), 6);

        let mgmt = caller(&service, "tok-mgmt").await;
        let mine = service.list_invitations(&mgmt).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "INV_MINE");
    }

    #[tokio::test]
    async fn operations_reject_callers_without_accounts() {
        let (service, _) = fixture();
        let unlinked = caller(&service, "tok-unlinked").await;

        let err = service
            .create_invitation(&unlinked, tenant_request("BLD_1", "UNT_1"))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), "no_linked_account");

        let err = service.list_invitations(&unlinked).await.unwrap_err();
        assert_eq!(err.reason(), "no_linked_account");
    }

    #[tokio::test]
    async fn invalid_requests_fail_validation_before_any_write() {
        let (service, backend) = fixture();
        let admin = caller(&service, "tok-admin").await;
        let rows_before = backend.row_count("Invitations");

        let mut request = tenant_request("BLD_1", "UNT_1");
        request.username = "j".to_string();
        let err = service.create_invitation(&admin, request).await.unwrap_err();
        assert_eq!(err.reason(), "invalid_request");

        let mut request = tenant_request("BLD_1", "UNT_1");
        request.email = Some("not-an-email".to_string());
        let err = service.create_invitation(&admin, request).await.unwrap_err();
        assert_eq!(err.reason(), "invalid_request");

        assert_eq!(backend.row_count("Invitations"), rows_before);
    }
}
