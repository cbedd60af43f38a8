//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;

use crate::types::{FormStatusError, StatusResponse};

#[derive(Serialize)]
struct ErrorList {
    errors: Vec<Value>,
}

/// A single field-level validation problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Auth error: {0}")]
    Auth(#[from] carebase_auth::AuthError),

    #[error("Form status error: {0}")]
    FormStatus(#[from] FormStatusError),
}

fn entry(code: &str, message: &str, detail: Value) -> Value {
    json!({
        "code": code,
        "message": message,
        "detail": detail
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, errors) = match &self {
            ApiError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                fields
                    .iter()
                    .map(|f| entry("VALIDATION_ERROR", &f.message, json!({ "field": f.field })))
                    .collect(),
            ),
            ApiError::Auth(e) => {
                // Only the client-facing message leaves the process; hashing
                // details stay in the log.
                let (status, message) = e.status_and_message();
                if status.is_server_error() {
                    error!("Authentication failure: {}", e);
                }
                (status, vec![entry("AUTH_ERROR", message, Value::Null)])
            }
            ApiError::FormStatus(e) => {
                error!("Inconsistent form status: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec![entry("INTERNAL_ERROR", "Internal error", Value::Null)],
                )
            }
        };

        let body = axum::Json(StatusResponse::failure(ErrorList { errors }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carebase_auth::{AuthError, HashingError};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_errors_are_listed_per_field() {
        let err = ApiError::Validation(vec![
            FieldError::new("email", "must be a valid email address"),
            FieldError::new("password", "must not be empty"),
        ]);
        assert_eq!(err.to_string(), "Validation failed for 2 field(s)");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["code"], "VALIDATION_ERROR");
        assert_eq!(errors[0]["detail"]["field"], "email");
        assert_eq!(errors[1]["message"], "must not be empty");
    }

    #[tokio::test]
    async fn test_auth_failures_do_not_leak_details() {
        let malformed = ApiError::from(AuthError::from(HashingError::MalformedCredential));
        let response = malformed.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["message"], "Internal error");
        assert!(!body.to_string().contains("Malformed"));

        let response = ApiError::from(AuthError::InvalidCredentials).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["errors"][0]["code"], "AUTH_ERROR");
        assert_eq!(body["errors"][0]["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_status_codes() {
        assert_eq!(
            ApiError::from(AuthError::MissingIdentity)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::InsufficientPermissions)
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(AuthError::UnknownTokenKind("refresh".to_string()))
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
