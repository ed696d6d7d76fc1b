use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use validator::{Validate, ValidationErrors};

/// Runs `validator` checks on top of an inner extractor, rejecting with a
/// field -> messages map on failure.
#[derive(Debug, Clone)]
pub struct Valid<T>(pub T);
impl<Extractor, T: Validate, S: Send + Sync> FromRequest<S> for Valid<Extractor>
where
    Extractor: FromRequest<S> + std::ops::Deref<Target = T>,
{
    type Rejection = ValidRejection<Extractor::Rejection>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let extractor = Extractor::from_request(req, state)
            .await
            .map_err(ValidRejection::BodyParsingError)?;

        extractor
            .deref()
            .validate()
            .map_err(|err| ValidRejection::ValidationError(err.into()))?;

        Ok(Valid(extractor))
    }
}

#[derive(Debug)]
pub enum ValidRejection<BodyRejection: IntoResponse> {
    BodyParsingError(BodyRejection),
    ValidationError(ValidationErrorResponse),
}
impl<BodyRejection: IntoResponse> IntoResponse for ValidRejection<BodyRejection> {
    fn into_response(self) -> Response {
        match self {
            ValidRejection::BodyParsingError(e) => e.into_response(),
            ValidRejection::ValidationError(e) => e.into_response(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    errors: HashMap<String, Vec<String>>,
}
impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, axum::extract::Json(self)).into_response()
    }
}
impl From<ValidationErrors> for ValidationErrorResponse {
    fn from(errs: ValidationErrors) -> Self {
        let errors = errs
            .field_errors()
            .into_iter()
            .map(|(field, field_errors)| {
                let messages = field_errors.iter().map(|e| e.to_string()).collect();
                (field.to_string(), messages)
            })
            .collect();

        ValidationErrorResponse { errors }
    }
}
