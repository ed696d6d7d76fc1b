use std::{collections::HashMap, ops::Add};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{models::account::Account, persistence::AccountStore, service::password};

const JWT_ISSUER: &str = "account-service";
pub const JWT_TTL: std::time::Duration = std::time::Duration::from_secs(15 * 60); // 15 minutes
const JWT_LEEWAY_SECONDS: u64 = 60;
const JWT_ALGORITHM: jsonwebtoken::Algorithm = jsonwebtoken::Algorithm::HS256;

pub const AUTH_FAILURE_CODE: &str = "authentication";
pub const AUTH_FAILURE_MESSAGE: &str = "Unable to authenticate with provided credentials";

#[derive(Clone, Deserialize, Validate)]
#[serde(from = "AuthConfigRepr")]
pub struct AuthConfig {
    #[validate(length(min = 1))]
    jwt_secrets: HashMap<u64, String>,
    decoding_keys: HashMap<u64, jsonwebtoken::DecodingKey>,
    encoding_key: jsonwebtoken::EncodingKey,
    header: jsonwebtoken::Header,
}
impl AuthConfig {
    pub fn new(jwt_secrets: HashMap<u64, String>) -> Self {
        if jwt_secrets.is_empty() {
            // Invalid state -> Invalid config
            return Self {
                jwt_secrets,
                decoding_keys: HashMap::new(),
                encoding_key: jsonwebtoken::EncodingKey::from_secret(b""),
                header: jsonwebtoken::Header::new(JWT_ALGORITHM),
            };
        }

        let kid = jwt_secrets.keys().max().unwrap();

        let decoding_keys = jwt_secrets
            .iter()
            .map(|(kid, secret)| {
                (
                    *kid,
                    jsonwebtoken::DecodingKey::from_secret(secret.as_bytes()),
                )
            })
            .collect();

        let encoding_key =
            jsonwebtoken::EncodingKey::from_secret(jwt_secrets.get(kid).unwrap().as_bytes());

        let mut header = jsonwebtoken::Header::new(JWT_ALGORITHM);
        header.kid = Some(kid.to_string());

        Self {
            jwt_secrets,
            decoding_keys,
            encoding_key,
            header,
        }
    }
}
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secrets", &self.jwt_secrets)
            .finish()
    }
}
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuthConfigRepr {
    #[serde(deserialize_with = "de_jwt_secrets")]
    jwt_secrets: HashMap<u64, String>,
}
fn de_jwt_secrets<'de, D>(deserializer: D) -> Result<HashMap<u64, String>, D::Error>
where
    D: serde::de::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MapEither {
        Map(HashMap<String, String>),
        Str(String),
    }

    match MapEither::deserialize(deserializer)? {
        MapEither::Map(m) => Ok(m
            .into_iter()
            .map(|(k, v)| Ok((k.parse().map_err(serde::de::Error::custom)?, v)))
            .collect::<Result<_, _>>()?),
        MapEither::Str(s) => {
            serde_json::from_str::<HashMap<u64, String>>(&s).map_err(serde::de::Error::custom)
        }
    }
}
impl From<AuthConfigRepr> for AuthConfig {
    fn from(AuthConfigRepr { jwt_secrets }: AuthConfigRepr) -> Self {
        AuthConfig::new(jwt_secrets)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    iss: String,
    sub: String,
    aud: String,
    iat: u64,
    nbf: u64,
    exp: u64,
    jti: String,
}

/// The authenticated identity a validated token resolves to.
#[derive(Debug, Clone)]
pub struct Principal {
    pub email: String,
}
impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self { email: claims.sub }
    }
}

/// Cloneable token-validation error, suitable for request extensions.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid authentication token: {0}")]
pub struct AuthTokenError(String);
impl From<jsonwebtoken::errors::Error> for AuthTokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self(err.to_string())
    }
}

pub fn generate_auth_token(
    config: &AuthConfig,
    email: &str,
    app: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap();

    let claims = Claims {
        iss: JWT_ISSUER.to_owned(),
        sub: email.to_owned(),
        aud: format!("{JWT_ISSUER}/{app}"),
        iat: now.as_secs(),
        nbf: now.as_secs(),
        exp: now.add(JWT_TTL).as_secs(),
        jti: uuid::Uuid::new_v4().to_string(),
    };

    jsonwebtoken::encode(&config.header, &claims, &config.encoding_key)
}

pub fn validate_auth_token(
    config: &AuthConfig,
    token: &str,
    app: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = {
        let mut v = jsonwebtoken::Validation::new(JWT_ALGORITHM);
        v.set_required_spec_claims(&["exp", "nbf", "aud", "iss", "sub"]);
        v.set_issuer(&[JWT_ISSUER]);
        v.set_audience(&[format!("{JWT_ISSUER}/{app}")]);
        v.leeway = JWT_LEEWAY_SECONDS;
        v.reject_tokens_expiring_in_less_than = 0;
        v.validate_exp = true;
        v.validate_nbf = true;
        v.validate_aud = true;
        v
    };

    let kid = jsonwebtoken::decode_header(token)?
        .kid
        .and_then(|kid| kid.parse().ok())
        .or_else(|| config.header.kid.as_ref().and_then(|kid| kid.parse().ok()))
        .ok_or_else(|| {
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidToken)
        })?;

    let decoding_key = config.decoding_keys.get(&kid).ok_or_else(|| {
        jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidKeyFormat)
    })?;

    jsonwebtoken::decode::<Claims>(token, decoding_key, &validation).map(|data| data.claims)
}

/// A credential-validation failure: a fixed user-facing message plus a code
/// identifying the failure kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub code: &'static str,
    pub message: &'static str,
}

/// Resolves a raw credential pair against the account store: exact-email
/// lookup plus password verification. Any miss resolves to `None`; this
/// never errors out.
pub async fn authenticate(
    store: &dyn AccountStore,
    email: &str,
    password: &str,
) -> Option<Account> {
    let account = store.get_account_by_email(email).await.ok()?;
    password::verify(password, &account.password_hash).then_some(account)
}

/// Turns a raw (email, password) pair into a resolved account or a reported
/// failure. Both values are handed to [`authenticate`] exactly as received:
/// no trimming, no case folding.
pub async fn validate_credentials(
    store: &dyn AccountStore,
    email: &str,
    password: &str,
) -> Result<Account, ValidationFailure> {
    authenticate(store, email, password)
        .await
        .ok_or(ValidationFailure {
            code: AUTH_FAILURE_CODE,
            message: AUTH_FAILURE_MESSAGE,
        })
}
