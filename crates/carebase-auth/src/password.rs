//! Credential hashing and verification
//!
//! Credentials are Argon2id PHC strings. The algorithm parameters and the
//! salt travel inside the credential, so verification never needs to know
//! what configuration produced it.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::HashingConfig;
use crate::error::{AuthError, HashingError};

const SALT_LEN: usize = 16;

/// Stored, irreversible form of a secret
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Wrap a credential read back from storage
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Work factor embedded in the credential
    pub fn work_factor(&self) -> Result<u32, HashingError> {
        Ok(self.params()?.t_cost())
    }

    fn parsed(&self) -> Result<PasswordHash<'_>, HashingError> {
        let parsed = PasswordHash::new(&self.0).map_err(|_| HashingError::MalformedCredential)?;
        if parsed.salt.is_none() || parsed.hash.is_none() {
            return Err(HashingError::MalformedCredential);
        }
        Ok(parsed)
    }

    fn params(&self) -> Result<Params, HashingError> {
        let parsed = self.parsed()?;
        Params::try_from(&parsed).map_err(|_| HashingError::MalformedCredential)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Credential hashing capability
///
/// Both operations are CPU-bound and are expected to run off the async
/// executor. A mismatch is `Ok(false)`; errors are reserved for failures
/// of the primitive and for malformed credentials.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext secret with a fresh salt
    async fn hash(&self, plaintext: &str) -> Result<Credential, AuthError>;

    /// Check a plaintext secret against a stored credential
    async fn compare(&self, plaintext: &str, credential: &Credential) -> Result<bool, AuthError>;
}

/// Argon2id credential hasher
#[derive(Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(config: &HashingConfig) -> Result<Self, AuthError> {
        let params = config.params()?;
        debug!(
            "Credential hasher configured (cost={}, memory_kib={}, parallelism={})",
            params.t_cost(),
            params.m_cost(),
            params.p_cost()
        );
        Ok(Self { params })
    }

    /// Share as a trait object
    pub fn into_shared(self) -> Arc<dyn CredentialHasher> {
        Arc::new(self)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash on the current thread
    pub fn hash_blocking(&self, plaintext: &str) -> Result<Credential, HashingError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| HashingError::Primitive(format!("Salt generation failed: {}", e)))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| HashingError::Primitive(e.to_string()))?;

        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| HashingError::Primitive(e.to_string()))?;

        Ok(Credential(hash.to_string()))
    }

    /// Compare on the current thread
    pub fn compare_blocking(
        &self,
        plaintext: &str,
        credential: &Credential,
    ) -> Result<bool, HashingError> {
        let parsed = credential.parsed()?;

        // Parameters come from `parsed`, not from `self.params`.
        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(password_hash::Error::Crypto) => {
                Err(HashingError::Primitive("Argon2 computation failed".to_string()))
            }
            Err(_) => Err(HashingError::MalformedCredential),
        }
    }

    /// Whether a credential was produced with parameters other than the configured ones
    ///
    /// Callers rehash and store a fresh credential after a successful
    /// comparison when this returns true.
    pub fn needs_rehash(&self, credential: &Credential) -> Result<bool, HashingError> {
        let parsed = credential.parsed()?;
        if parsed.algorithm != Algorithm::Argon2id.ident()
            || parsed.version != Some(u32::from(Version::V0x13))
        {
            return Ok(true);
        }

        let stored = credential.params()?;
        Ok(stored.t_cost() != self.params.t_cost()
            || stored.m_cost() != self.params.m_cost()
            || stored.p_cost() != self.params.p_cost())
    }

    /// Compare against a credential that may not exist
    ///
    /// When `credential` is `None` the plaintext is hashed with the current
    /// parameters and discarded, so an unknown account costs the same as a
    /// wrong secret. The result is then always `false`.
    pub async fn compare_or_dummy(
        &self,
        plaintext: &str,
        credential: Option<&Credential>,
    ) -> Result<bool, AuthError> {
        match credential {
            Some(credential) => self.compare(plaintext, credential).await,
            None => {
                self.hash(plaintext).await?;
                Ok(false)
            }
        }
    }
}

/// Run hashing work on the blocking pool
///
/// A worker that panics or is cancelled yields `Interrupted`, never a result.
async fn run_blocking<T, F>(work: F) -> Result<T, AuthError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, HashingError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(work)
        .await
        .map_err(|_| HashingError::Interrupted)??;
    Ok(result)
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, plaintext: &str) -> Result<Credential, AuthError> {
        let hasher = self.clone();
        let plaintext = Zeroizing::new(plaintext.to_owned());

        run_blocking(move || hasher.hash_blocking(&plaintext)).await
    }

    async fn compare(&self, plaintext: &str, credential: &Credential) -> Result<bool, AuthError> {
        let hasher = self.clone();
        let plaintext = Zeroizing::new(plaintext.to_owned());
        let credential = credential.clone();

        run_blocking(move || hasher.compare_blocking(&plaintext, &credential)).await
    }
}

/// Hash a password with the given configuration on the current thread
pub fn hash_password(password: &str, config: &HashingConfig) -> Result<Credential, AuthError> {
    Ok(Argon2Hasher::new(config)?.hash_blocking(password)?)
}

/// Verify a password against a stored credential on the current thread
///
/// The parameters embedded in `credential` are used, whatever the
/// current configuration is.
pub fn verify_password(password: &str, credential: &Credential) -> Result<bool, AuthError> {
    let hasher = Argon2Hasher {
        params: Params::default(),
    };
    Ok(hasher.compare_blocking(password, credential)?)
}
