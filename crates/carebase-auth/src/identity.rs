//! Authenticated identity access for request handlers
//!
//! An upstream authentication layer verifies the caller and inserts an
//! [`AuthUser`] into the request extensions. Everything here only reads
//! that value back; nothing in this module verifies credentials or tokens.

use axum::{
    extract::FromRequestParts,
    http::{Extensions, request::Parts},
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::AuthError;

/// User role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    Admin,
    Clinician,
    Staff,
    Patient,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Clinician => "clinician",
            UserRole::Staff => "staff",
            UserRole::Patient => "patient",
        }
    }

    /// Whether the role may read and edit other people's patient records
    pub fn can_manage_patients(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Clinician | UserRole::Staff)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "clinician" => Ok(UserRole::Clinician),
            "staff" => Ok(UserRole::Staff),
            "patient" => Ok(UserRole::Patient),
            _ => Err(AuthError::UnknownRole(s.to_string())),
        }
    }
}

/// Authenticated user information attached to a single request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
}

impl AuthUser {
    /// Fail with `InsufficientPermissions` unless the user may manage patients
    pub fn require_patient_access(&self) -> Result<(), AuthError> {
        if !self.role.can_manage_patients() {
            return Err(AuthError::InsufficientPermissions);
        }
        Ok(())
    }
}

/// Identity attached to the request, if any
pub fn current_user(extensions: &Extensions) -> Option<&AuthUser> {
    extensions.get::<AuthUser>()
}

/// Extractor for the authenticated user on routes where authentication is optional
///
/// Never rejects: a request without an identity yields `CurrentUser(None)`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(current_user(&parts.extensions).cloned()))
    }
}

/// Extractor for the authenticated user (required)
#[derive(Debug, Clone)]
pub struct RequireUser(pub AuthUser);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(&parts.extensions)
            .cloned()
            .ok_or(AuthError::MissingIdentity)?;

        debug!("Request identity: {} ({})", user.id, user.role.as_str());
        Ok(RequireUser(user))
    }
}
