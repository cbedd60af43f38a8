//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::token::TokenKind;

/// Failures of the credential hashing primitive.
///
/// None of the variants carry the plaintext or the stored credential.
#[derive(Error, Debug)]
pub enum HashingError {
    #[error("Hashing primitive failed: {0}")]
    Primitive(String),

    #[error("Malformed credential")]
    MalformedCredential,

    /// The blocking worker running the hash was cancelled or panicked.
    /// The outcome of the operation is unknown.
    #[error("Hashing task did not complete")]
    Interrupted,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No authenticated identity")]
    MissingIdentity,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown token kind: {0}")]
    UnknownTokenKind(String),

    #[error("Token kind mismatch: expected {expected}, got {actual}")]
    TokenKindMismatch {
        expected: TokenKind,
        actual: TokenKind,
    },

    #[error("Hashing failure: {0}")]
    Hashing(#[from] HashingError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// HTTP status and client-facing message.
    ///
    /// Token problems collapse into one message so a caller cannot tell
    /// which check rejected it.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AuthError::MissingIdentity => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::InsufficientPermissions | AuthError::UnknownRole(_) => {
                (StatusCode::FORBIDDEN, "Insufficient permissions")
            }
            AuthError::UnknownTokenKind(_) | AuthError::TokenKindMismatch { .. } => {
                (StatusCode::UNAUTHORIZED, "Invalid token")
            }
            AuthError::Hashing(_) | AuthError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = axum::Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashing_failures_are_opaque_to_clients() {
        let err = AuthError::from(HashingError::MalformedCredential);
        let (status, message) = err.status_and_message();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Internal error");
    }

    #[test]
    fn test_token_errors_share_one_message() {
        let unknown = AuthError::UnknownTokenKind("refresh".to_string());
        let mismatch = AuthError::TokenKindMismatch {
            expected: TokenKind::PasswordReset,
            actual: TokenKind::Access,
        };

        assert_eq!(unknown.status_and_message(), mismatch.status_and_message());
        assert_eq!(
            mismatch.to_string(),
            "Token kind mismatch: expected password_reset, got access_token"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InsufficientPermissions.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::MissingIdentity.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
