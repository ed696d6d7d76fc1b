use std::sync::Arc;

use crate::{
    models::account::{Account, AccountRecord},
    persistence::{AccountStore, AccountStoreError},
    service::password,
};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Account email is required")]
    MissingEmail,
    #[error("Account already exists")]
    AlreadyExists,
    #[error("Account not found")]
    NotFound,
    #[error(transparent)]
    Password(#[from] password::PasswordError),
    #[error(transparent)]
    Unexpected(anyhow::Error),
}

impl From<AccountStoreError> for AccountError {
    fn from(err: AccountStoreError) -> Self {
        match err {
            AccountStoreError::AlreadyExists => Self::AlreadyExists,
            AccountStoreError::NotFound => Self::NotFound,
            AccountStoreError::Unexpected(err) => Self::Unexpected(err),
        }
    }
}

/// Recognized optional fields for account creation, with their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountProfile {
    pub name: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// A partial update to an existing account. A present password is re-hashed;
/// an absent one leaves the stored hash untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Account creation and update rules on top of the persistence layer: email
/// presence and normalization, and the hashing discipline for passwords.
#[derive(Debug, Clone)]
pub struct Accounts {
    store: Arc<dyn AccountStore>,
}

impl Accounts {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn AccountStore {
        self.store.as_ref()
    }

    /// Creates an account. The email must be non-empty and has its domain
    /// portion lower-cased before persisting; the password is stored only as
    /// a hash. Nothing is persisted on failure.
    pub async fn create(
        &self,
        email: &str,
        password: &str,
        profile: AccountProfile,
    ) -> Result<Account, AccountError> {
        if email.is_empty() {
            return Err(AccountError::MissingEmail);
        }

        let record = AccountRecord {
            email: normalize_email(email),
            password_hash: password::hash(password)?,
            name: profile.name,
            is_staff: profile.is_staff,
            is_superuser: profile.is_superuser,
        };

        Ok(self.store.insert_account(record).await?)
    }

    /// Same contract as [`Accounts::create`], but the staff and superuser
    /// flags are always set.
    pub async fn create_superuser(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Account, AccountError> {
        self.create(
            email,
            password,
            AccountProfile {
                is_staff: true,
                is_superuser: true,
                ..AccountProfile::default()
            },
        )
        .await
    }

    /// Applies a partial update. Non-password fields are applied directly;
    /// the password, when present, is re-hashed.
    pub async fn update(
        &self,
        mut account: Account,
        changes: AccountChanges,
    ) -> Result<Account, AccountError> {
        if let Some(name) = changes.name {
            account.name = Some(name);
        }
        if let Some(new_password) = changes.password {
            account.password_hash = password::hash(&new_password)?;
        }

        Ok(self.store.update_account(account).await?)
    }
}

/// Lower-cases the domain portion of an email address (everything after the
/// last `@`). The local part is preserved as given.
pub fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_owned(),
    }
}
