//! Token service configuration

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use jsonwebtoken::Algorithm;
use thiserror::Error;

/// Configuration errors, reported at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Secret key must not be empty")]
    EmptySecret,

    #[error("Unknown JWT algorithm '{0}'")]
    UnknownAlgorithm(String),

    #[error("JWT algorithm {0:?} is not supported, expected one of HS256, HS384, HS512")]
    UnsupportedAlgorithm(Algorithm),
}

/// Immutable settings shared by every token operation
///
/// Built once at startup and handed to [`crate::TokenService::new`].
#[derive(Clone)]
pub struct TokenConfig {
    secret_key: Vec<u8>,
    algorithm: Algorithm,
    expire_minutes: u32,
}

impl TokenConfig {
    /// Create a configuration for a shared-secret (HMAC) algorithm
    ///
    /// An `expire_minutes` of zero yields tokens that are already expired
    /// when issued.
    pub fn new(
        secret_key: impl Into<Vec<u8>>,
        algorithm: Algorithm,
        expire_minutes: u32,
    ) -> Result<Self, ConfigError> {
        let secret_key = secret_key.into();
        if secret_key.is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {}
            other => return Err(ConfigError::UnsupportedAlgorithm(other)),
        }

        Ok(Self {
            secret_key,
            algorithm,
            expire_minutes,
        })
    }

    /// Same as [`TokenConfig::new`] with the algorithm given by name, e.g. `"HS256"`
    pub fn from_parts(
        secret_key: impl Into<Vec<u8>>,
        algorithm: &str,
        expire_minutes: u32,
    ) -> Result<Self, ConfigError> {
        let algorithm = Algorithm::from_str(algorithm.trim())
            .map_err(|_| ConfigError::UnknownAlgorithm(algorithm.to_string()))?;

        Self::new(secret_key, algorithm, expire_minutes)
    }

    pub fn secret_key(&self) -> &[u8] {
        &self.secret_key
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn expire_minutes(&self) -> u32 {
        self.expire_minutes
    }

    pub fn expire_after(&self) -> Duration {
        Duration::minutes(i64::from(self.expire_minutes))
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret_key", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("expire_minutes", &self.expire_minutes)
            .finish()
    }
}
