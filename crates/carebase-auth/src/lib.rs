//! Carebase Authentication and Authorization
//!
//! This crate provides credential hashing, token purpose classification
//! and request-scoped identity access for the Carebase backend.

pub mod config;
pub mod error;
pub mod identity;
pub mod password;
pub mod token;

pub use config::{AuthConfig, DEFAULT_COST, HashingConfig};
pub use error::{AuthError, HashingError};
pub use identity::{AuthUser, CurrentUser, RequireUser, UserRole, current_user};
pub use password::{Argon2Hasher, Credential, CredentialHasher, hash_password, verify_password};
pub use token::TokenKind;
