//! Token purpose classification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// Purpose an issued token was minted for.
///
/// The set is closed. Issuers tag every token with exactly one kind and
/// verifiers must check it before trusting the token for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Short-lived session proof
    #[serde(rename = "access_token")]
    Access,
    /// Single-purpose proof for resetting a password
    #[serde(rename = "password_reset")]
    PasswordReset,
}

impl TokenKind {
    pub const ALL: [TokenKind; 2] = [TokenKind::Access, TokenKind::PasswordReset];

    /// Wire literal
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access_token",
            TokenKind::PasswordReset => "password_reset",
        }
    }

    /// Whether a token of this kind is consumed by its first successful use
    pub fn is_single_use(&self) -> bool {
        match self {
            TokenKind::Access => false,
            TokenKind::PasswordReset => true,
        }
    }

    /// Reject a token presented for an operation that needs another kind
    pub fn ensure(self, required: TokenKind) -> Result<(), AuthError> {
        if self != required {
            return Err(AuthError::TokenKindMismatch {
                expected: required,
                actual: self,
            });
        }
        Ok(())
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenKind {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access_token" => Ok(TokenKind::Access),
            "password_reset" => Ok(TokenKind::PasswordReset),
            _ => Err(AuthError::UnknownTokenKind(s.to_string())),
        }
    }
}
