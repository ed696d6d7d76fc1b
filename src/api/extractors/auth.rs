use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

use crate::service::auth::{AuthTokenError, Claims, Principal};

/// Extracts the [`Principal`] resolved by the auth middleware. Rejects with
/// 400 when no token was presented and 401 when the token failed validation.
#[derive(Debug, Clone)]
pub struct Authorized(pub Principal);

impl<S: Send + Sync> FromRequestParts<S> for Authorized {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .remove::<Result<Claims, AuthTokenError>>()
            .ok_or((StatusCode::BAD_REQUEST, "Missing token".to_string()))?
            .map(|claims| Self(claims.into()))
            .map_err(|err| (StatusCode::UNAUTHORIZED, err.to_string()))
    }
}
