use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    models::account::{Account, AccountRecord},
    persistence::{AccountStore, AccountStoreError},
};

#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn insert_account(&self, record: AccountRecord) -> Result<Account, AccountStoreError> {
        sqlx::query_as::<_, Account>(
            "
            INSERT INTO accounts (email, password_hash, name, is_staff, is_superuser)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, name, is_staff, is_superuser
            ",
        )
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.name)
        .bind(record.is_staff)
        .bind(record.is_superuser)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db_err) = &err
                && db_err.is_unique_violation()
            {
                return AccountStoreError::AlreadyExists;
            }
            anyhow::Error::new(err)
                .context("Failed to insert account")
                .into()
        })
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Account, AccountStoreError> {
        sqlx::query_as::<_, Account>(
            "
            SELECT id, email, password_hash, name, is_staff, is_superuser
            FROM accounts
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get account by email")?
        .ok_or(AccountStoreError::NotFound)
    }

    async fn update_account(&self, account: Account) -> Result<Account, AccountStoreError> {
        sqlx::query_as::<_, Account>(
            "
            UPDATE accounts
            SET password_hash = $2, name = $3, is_staff = $4, is_superuser = $5
            WHERE id = $1
            RETURNING id, email, password_hash, name, is_staff, is_superuser
            ",
        )
        .bind(account.id)
        .bind(&account.password_hash)
        .bind(&account.name)
        .bind(account.is_staff)
        .bind(account.is_superuser)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update account")?
        .ok_or(AccountStoreError::NotFound)
    }
}
