use serde::Serialize;

/// A persisted user account, identified by its unique email address.
///
/// The password is only ever held as a one-way hash, and the hash is
/// excluded from serialization so it cannot leak through API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// The insert payload for a new account: everything but the store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub is_staff: bool,
    pub is_superuser: bool,
}
