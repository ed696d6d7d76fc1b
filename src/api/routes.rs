use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::{CookieJar, cookie};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::{
        app_state::AppState,
        extractors::{auth::Authorized, validation::Valid},
        middleware::auth::auth_middleware,
    },
    config,
    service::{
        accounts::{AccountChanges, AccountError, AccountProfile},
        auth::{self, ValidationFailure},
    },
};

pub fn api_router(app_state: AppState) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/verify-token", post(verify_token))
        .route("/me", get(me).patch(update_me))
        .with_state(app_state.clone())
        .layer(middleware::from_fn_with_state(app_state, auth_middleware))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    MissingEmail,
    EmailTaken,
    AuthenticationFailed(ValidationFailure),
    MissingToken,
    InvalidToken,
    Unexpected,
}
impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::MissingEmail => Self::MissingEmail,
            AccountError::AlreadyExists => Self::EmailTaken,
            AccountError::NotFound
            | AccountError::Password(_)
            | AccountError::Unexpected(_) => Self::Unexpected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, code) = match self {
            ApiError::MissingEmail => (StatusCode::BAD_REQUEST, "Account email is required", None),
            ApiError::EmailTaken => (StatusCode::CONFLICT, "Account already exists", None),
            ApiError::AuthenticationFailed(failure) => {
                (StatusCode::UNAUTHORIZED, failure.message, Some(failure.code))
            }
            ApiError::MissingToken => (StatusCode::BAD_REQUEST, "Missing token", None),
            ApiError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token", None),
            ApiError::Unexpected => (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected error", None),
        };
        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            code: code.map(str::to_string),
        });
        (status, body).into_response()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 5))]
    pub password: String,
    pub name: Option<String>,
}
async fn signup(
    State(state): State<AppState>,
    Valid(Json(body)): Valid<Json<SignupRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .accounts
        .create(
            &body.email,
            &body.password,
            AccountProfile {
                name: body.name,
                ..AccountProfile::default()
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

// Login fields are deliberately unvalidated: the pair is forwarded to
// credential validation byte-for-byte, whitespace included.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = auth::validate_credentials(state.accounts.store(), &body.email, &body.password)
        .await
        .map_err(ApiError::AuthenticationFailed)?;

    let auth_token = auth::generate_auth_token(&state.config.auth, &account.email, config::APP_NAME)
        .map_err(|_| ApiError::Unexpected)?;

    let jar = jar.add(
        cookie::Cookie::build((config::AUTH_TOKEN_COOKIE_NAME, auth_token.clone()))
            .path("/")
            .http_only(true)
            .secure(true)
            .same_site(cookie::SameSite::Lax)
            .max_age(::cookie::time::Duration::seconds(
                auth::JWT_TTL.as_secs().try_into().unwrap(),
            )),
    );

    Ok((StatusCode::OK, jar, Json(TokenResponse { token: auth_token })))
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}
async fn verify_token(
    State(state): State<AppState>,
    Json(body): Json<VerifyTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    auth::validate_auth_token(&state.config.auth, &body.token, config::APP_NAME)
        .map_err(|_| ApiError::InvalidToken)?;

    Ok(StatusCode::OK)
}

async fn me(
    Authorized(principal): Authorized,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .accounts
        .store()
        .get_account_by_email(&principal.email)
        .await
        .map_err(|_| ApiError::InvalidToken)?;

    Ok(Json(account))
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    pub name: Option<String>,
    #[validate(length(min = 5))]
    pub password: Option<String>,
}
async fn update_me(
    Authorized(principal): Authorized,
    State(state): State<AppState>,
    Valid(Json(body)): Valid<Json<UpdateAccountRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .accounts
        .store()
        .get_account_by_email(&principal.email)
        .await
        .map_err(|_| ApiError::InvalidToken)?;

    let account = state
        .accounts
        .update(
            account,
            AccountChanges {
                name: body.name,
                password: body.password,
            },
        )
        .await?;

    Ok(Json(account))
}
