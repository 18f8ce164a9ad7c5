//! JWT (JSON Web Token) handling

use chrono::{DateTime, Utc};
use cinema_errors::{ErrorKind, ServerError};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{Claims, EXP_CLAIM};
use crate::config::TokenConfig;

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, malformed token, algorithm mismatch or unusable `exp`
    #[error("Invalid token")]
    Decode(#[source] jsonwebtoken::errors::Error),

    /// Signature is valid but `exp` has passed
    #[error("Token expired")]
    Expired,

    #[error("Failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenError::Decode(_) => ErrorKind::TokenDecode,
            TokenError::Expired => ErrorKind::TokenExpired,
            TokenError::Encode(_) => ErrorKind::Internal,
        }
    }
}

impl From<TokenError> for ServerError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encode(e) => ServerError::internal(format!("Failed to sign token: {}", e)),
            other => ServerError::new(other.kind()),
        }
    }
}

/// Issues and verifies session tokens
///
/// Holds only keys derived from an immutable [`TokenConfig`], so a single
/// instance can be shared across request handlers behind an `Arc`.
pub struct TokenService {
    config: TokenConfig,
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        // Expiry is checked here against the caller's clock, after the
        // signature has been accepted, so the library check stays off.
        // `exp` is optional; only a present one is enforced.
        let mut validation = Validation::new(config.algorithm());
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            header: Header::new(config.algorithm()),
            encoding_key: EncodingKey::from_secret(config.secret_key()),
            decoding_key: DecodingKey::from_secret(config.secret_key()),
            validation,
            config,
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    /// Sign `claims` with an `exp` of now plus the configured lifetime
    pub fn issue(&self, claims: impl Into<Claims>) -> Result<String, TokenError> {
        self.issue_at(claims, Utc::now())
    }

    /// Sign `claims` as if issued at `now`
    ///
    /// Any `exp` already present in `claims` is overwritten.
    pub fn issue_at(
        &self,
        claims: impl Into<Claims>,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let mut claims = claims.into();
        let expire_at = now + self.config.expire_after();
        claims.insert(EXP_CLAIM, expire_at.timestamp());

        encode(&self.header, &claims, &self.encoding_key).map_err(TokenError::Encode)
    }

    /// Verify signature and expiry, returning the decoded claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature, then check `exp` against `now`
    ///
    /// # Errors
    /// - [`TokenError::Decode`] if the signature, format or algorithm is wrong,
    ///   or `exp` is present but not numeric
    /// - [`TokenError::Expired`] if the token is well-signed and `now >= exp`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let claims = self.decode_claims(token)?;

        if claims.contains_key(EXP_CLAIM) && claims.exp().is_none() {
            return Err(TokenError::Decode(
                jsonwebtoken::errors::ErrorKind::InvalidToken.into(),
            ));
        }

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Verify the signature only, ignoring `exp`
    ///
    /// Used to read the claims of an expired token, e.g. to refresh it.
    /// Never returns [`TokenError::Expired`].
    pub fn verify_relaxed(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode_claims(token)
    }

    /// Reissue a token from the claims of a well-signed, possibly expired one
    pub fn refresh(&self, token: &str) -> Result<String, TokenError> {
        self.refresh_at(token, Utc::now())
    }

    pub fn refresh_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let mut claims = self.verify_relaxed(token)?;
        claims.remove(EXP_CLAIM);
        self.issue_at(claims, now)
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Decode)
    }
}
