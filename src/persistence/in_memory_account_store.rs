use std::collections::{HashMap, hash_map::Entry};

use async_trait::async_trait;

use crate::{
    models::account::{Account, AccountRecord},
    persistence::{AccountStore, AccountStoreError},
};

#[derive(Debug, Clone, Default)]
struct InMemoryAccountStoreState {
    accounts_by_email: HashMap<String, Account>,
    id_gen: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryAccountStore(tokio::sync::RwLock<InMemoryAccountStoreState>);

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert_account(&self, record: AccountRecord) -> Result<Account, AccountStoreError> {
        let mut guard = self.0.write().await;

        let id = guard.id_gen;
        guard.id_gen += 1;

        let account = Account {
            id,
            email: record.email,
            password_hash: record.password_hash,
            name: record.name,
            is_staff: record.is_staff,
            is_superuser: record.is_superuser,
        };

        match guard.accounts_by_email.entry(account.email.clone()) {
            Entry::Occupied(_) => Err(AccountStoreError::AlreadyExists),
            Entry::Vacant(entry) => Ok(entry.insert(account).clone()),
        }
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Account, AccountStoreError> {
        self.0
            .read()
            .await
            .accounts_by_email
            .get(email)
            .cloned()
            .ok_or(AccountStoreError::NotFound)
    }

    async fn update_account(&self, account: Account) -> Result<Account, AccountStoreError> {
        match self
            .0
            .write()
            .await
            .accounts_by_email
            .get_mut(&account.email)
        {
            Some(existing) if existing.id == account.id => {
                *existing = account.clone();
                Ok(account)
            }
            _ => Err(AccountStoreError::NotFound),
        }
    }
}
