pub mod in_memory_account_store;
pub mod pg_account_store;

use async_trait::async_trait;

use crate::models::account::{Account, AccountRecord};

#[derive(Debug, thiserror::Error)]
pub enum AccountStoreError {
    #[error("Account already exists")]
    AlreadyExists,
    #[error("Account not found")]
    NotFound,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// Repository interface over the account table. Email uniqueness is enforced
/// at this layer: a unique index in Postgres, the map key in the in-memory
/// backend.
#[async_trait]
pub trait AccountStore: std::fmt::Debug + Send + Sync {
    /// Persists a new account, assigning its id.
    async fn insert_account(&self, record: AccountRecord) -> Result<Account, AccountStoreError>;

    /// Exact-match lookup; no case folding happens here.
    async fn get_account_by_email(&self, email: &str) -> Result<Account, AccountStoreError>;

    /// Persists changed non-identity fields of an existing account.
    async fn update_account(&self, account: Account) -> Result<Account, AccountStoreError>;
}
