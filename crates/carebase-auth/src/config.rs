//! Authentication configuration

use argon2::Params;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::AuthError;

/// Work factor used when none is configured
pub const DEFAULT_COST: u32 = 10;

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub hashing: HashingConfig,
}

/// Credential hashing parameters
///
/// `cost` is the number of passes over the work buffer. All three values
/// are embedded in every credential produced with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingConfig {
    #[serde(default = "default_cost")]
    pub cost: u32,
    /// Work buffer size in KiB
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_cost() -> u32 {
    DEFAULT_COST
}

fn default_memory_kib() -> u32 {
    19 * 1024
}

fn default_parallelism() -> u32 {
    1
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            cost: default_cost(),
            memory_kib: default_memory_kib(),
            parallelism: default_parallelism(),
        }
    }
}

impl HashingConfig {
    /// Build primitive parameters, rejecting sets it cannot run
    pub fn params(&self) -> Result<Params, AuthError> {
        Params::new(self.memory_kib, self.cost, self.parallelism, None)
            .map_err(|e| AuthError::Config(format!("Invalid hashing parameters: {}", e)))
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        self.params().map(|_| ())
    }
}

impl AuthConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, AuthError> {
        let config: AuthConfig = toml::from_str(content)
            .map_err(|e| AuthError::Config(format!("Failed to parse configuration: {}", e)))?;
        config.hashing.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults when it is absent
    pub fn load(path: &str) -> Result<Self, AuthError> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path).map_err(|e| {
            AuthError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;

        let config = Self::from_toml_str(&content)?;

        info!(
            "Loaded auth configuration from {} (cost={}, memory_kib={}, parallelism={})",
            path, config.hashing.cost, config.hashing.memory_kib, config.hashing.parallelism
        );
        Ok(config)
    }
}
