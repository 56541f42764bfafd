//! Login and verification flows over the credential registry and token codec.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::credentials::CredentialRegistry;
use crate::error::AuthError;
use crate::jwt::{AccessToken, TokenCodec};

/// Lifetime of every issued access token.
pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Explicit context holding everything a request needs.
///
/// Built once at startup and shared behind an `Arc`; nothing in it is
/// mutated afterwards.
#[derive(Debug)]
pub struct AuthService {
    registry: CredentialRegistry,
    codec: TokenCodec,
}

impl AuthService {
    /// Creates a service over the given registry and codec.
    #[must_use]
    pub fn new(registry: CredentialRegistry, codec: TokenCodec) -> Self {
        Self { registry, codec }
    }

    /// Check credentials and, on success, issue an access token.
    ///
    /// Unknown identity and wrong secret both yield `InvalidCredentials`.
    pub fn login(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, AuthError> {
        if !self.registry.check(username, password) {
            warn!(
                error_code = AuthError::InvalidCredentials.code().as_str(),
                "Login rejected"
            );
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.codec.issue(username, now, ACCESS_TOKEN_TTL)?;
        info!(
            user = %username,
            expires_at = %token.expires_at.to_rfc3339(),
            "Access token issued"
        );
        Ok(token)
    }

    /// Verify a presented token, returning the identity it carries.
    pub fn verify(&self, token: Option<&str>, now: DateTime<Utc>) -> Result<String, AuthError> {
        match self.codec.verify(token, now) {
            Ok(identity) => {
                info!(user = %identity, "Token validated successfully");
                Ok(identity)
            }
            Err(error) => {
                match &error {
                    AuthError::TokenInvalid { reason } => warn!(
                        error_code = error.code().as_str(),
                        reason = reason.as_str(),
                        "Token validation failed"
                    ),
                    _ => warn!(error_code = error.code().as_str(), "Token validation failed"),
                }
                Err(error)
            }
        }
    }
}
