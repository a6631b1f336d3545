//! Account repository over the `Users` table.

use resida_core::Result;
use resida_sheets::RowStore;

use super::TRACING_TARGET;
use crate::model::{Account, Located};

/// Repository for account lookups and writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccountQuery;

impl AccountQuery {
    /// Lists every parseable account with its storage row.
    pub async fn all(store: &RowStore) -> Result<Vec<Located<Account>>> {
        let records = store.all_records(Account::TABLE).await?;
        let mut accounts = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let row = idx as u32 + 2;
            match Account::from_record(record) {
                Ok(account) => accounts.push(Located { row, item: account }),
                Err(err) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        table = Account::TABLE,
                        row = row,
                        reason = err.reason(),
                        "skipping malformed account row"
                    );
                }
            }
        }
        Ok(accounts)
    }

    /// Finds an account by its subject id (exact match).
    pub async fn find_by_subject(
        store: &RowStore,
        subject_id: &str,
    ) -> Result<Option<Located<Account>>> {
        Self::find_by(store, "firebase_uid", subject_id, false).await
    }

    /// Finds an account by email, case-insensitively.
    pub async fn find_by_email(store: &RowStore, email: &str) -> Result<Option<Located<Account>>> {
        Self::find_by(store, "email", email, true).await
    }

    /// Finds an account by username, case-insensitively.
    pub async fn find_by_username(
        store: &RowStore,
        username: &str,
    ) -> Result<Option<Located<Account>>> {
        Self::find_by(store, "username", username, true).await
    }

    /// Finds an account by its outstanding invite code, case-insensitively.
    pub async fn find_by_invite_code(
        store: &RowStore,
        code: &str,
    ) -> Result<Option<Located<Account>>> {
        Self::find_by(store, "invite_code", code, true).await
    }

    /// Re-reads the account at `row` directly from the backend.
    pub async fn fresh_at(store: &RowStore, row: u32) -> Result<Located<Account>> {
        let record = store.record_at(Account::TABLE, row).await?;
        Ok(Located {
            row,
            item: Account::from_record(&record)?,
        })
    }

    /// Appends a new account row.
    pub async fn append(store: &RowStore, account: &Account) -> Result<()> {
        store
            .append_record(Account::TABLE, &account.into_record())
            .await?;
        Ok(())
    }

    /// Overwrites the account at `row`.
    pub async fn update(store: &RowStore, row: u32, account: &Account) -> Result<()> {
        store
            .write_record(Account::TABLE, row, &account.into_record())
            .await?;
        Ok(())
    }

    async fn find_by(
        store: &RowStore,
        column: &str,
        value: &str,
        case_insensitive: bool,
    ) -> Result<Option<Located<Account>>> {
        if value.trim().is_empty() {
            return Ok(None);
        }
        let Some(row) = store
            .find_row(Account::TABLE, column, value, case_insensitive)
            .await?
        else {
            return Ok(None);
        };

        // The scan may have hit the cache; the record itself is read fresh.
        Self::fresh_at(store, row).await.map(Some)
    }
}
