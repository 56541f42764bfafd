use crate::error::AuthError;
use crate::jwt::claims::Claims;
use crate::jwt::token::{Token, TOKEN_ALGORITHM};
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, DecodingKey, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// A freshly issued access token.
#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    /// Compact JWS string handed to the client
    pub token: String,
    /// When the token stops verifying
    #[serde(skip)]
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HS256 access tokens under a single signing secret.
///
/// Keys are derived once at construction; the codec is read-only afterwards
/// and can be shared between requests without locking.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    /// Derive signing and verification keys from the shared secret.
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        TokenCodec {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a token for an already authenticated identity, valid until `now + ttl`.
    pub fn issue(
        &self,
        identity: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<AccessToken, AuthError> {
        let claims = Claims::new(identity, now, ttl);
        let expires_at = claims.expires_at();

        let token = encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(anyhow::anyhow!("JWT encoding error: {e}")))?;

        Ok(AccessToken { token, expires_at })
    }

    /// Verify a presented token and return the identity it asserts.
    ///
    /// Checks run in order: presence, shape and algorithm, signature,
    /// identity, expiration.
    pub fn verify(&self, token: Option<&str>, now: DateTime<Utc>) -> Result<String, AuthError> {
        let raw = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::TokenMissing)?;

        let validated = Token::parse(raw)?
            .validate_signature(&self.decoding_key)?
            .validate_claims(now)?;

        Ok(validated.into_identity())
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &TOKEN_ALGORITHM)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidTokenReason;

    const HOUR: Duration = Duration::from_secs(3600);

    fn codec() -> TokenCodec {
        TokenCodec::new(&SecretString::from("test-secret-key-for-testing-only".to_string()))
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_round_trip_hs256() {
        let codec = codec();
        let now = at(1_700_000_000);

        let issued = codec.issue("admin", now, HOUR).unwrap();

        assert_eq!(issued.expires_at, at(1_700_003_600));
        assert_eq!(codec.verify(Some(&issued.token), now).unwrap(), "admin");
    }

    #[test]
    fn test_scenario_half_hour_and_past_hour() {
        let codec = codec();
        let t = at(1_700_000_000);
        let issued = codec.issue("admin", t, HOUR).unwrap();

        let half_hour = t + chrono::Duration::minutes(30);
        assert_eq!(codec.verify(Some(&issued.token), half_hour).unwrap(), "admin");

        let past_hour = t + chrono::Duration::minutes(61);
        assert!(matches!(
            codec.verify(Some(&issued.token), past_hour),
            Err(AuthError::TokenExpired { expired_at }) if expired_at == at(1_700_003_600)
        ));
    }

    #[test]
    fn test_missing_token() {
        let codec = codec();
        let now = Utc::now();

        assert!(matches!(codec.verify(None, now), Err(AuthError::TokenMissing)));
        assert!(matches!(codec.verify(Some(""), now), Err(AuthError::TokenMissing)));
        assert!(matches!(codec.verify(Some("   "), now), Err(AuthError::TokenMissing)));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let result = codec().verify(Some("not-a-token"), Utc::now());
        assert!(matches!(
            result,
            Err(AuthError::TokenInvalid {
                reason: InvalidTokenReason::Malformed
            })
        ));
    }

    #[test]
    fn test_token_from_other_secret_is_invalid_even_when_expired() {
        let other = TokenCodec::new(&SecretString::from("some-other-deployment-secret".to_string()));
        let t = at(1_700_000_000);
        let issued = other.issue("admin", t, HOUR).unwrap();

        for now in [t, t + chrono::Duration::hours(2)] {
            assert!(matches!(
                codec().verify(Some(&issued.token), now),
                Err(AuthError::TokenInvalid {
                    reason: InvalidTokenReason::BadSignature
                })
            ));
        }
    }

    #[test]
    fn test_two_issues_differ_but_both_verify() {
        let codec = codec();
        let now = at(1_700_000_000);

        let a = codec.issue("admin", now, HOUR).unwrap();
        let b = codec.issue("admin", now, HOUR).unwrap();

        assert_ne!(a.token, b.token);
        assert_eq!(codec.verify(Some(&a.token), now).unwrap(), "admin");
        assert_eq!(codec.verify(Some(&b.token), now).unwrap(), "admin");
    }

    #[test]
    fn test_debug_does_not_expose_keys() {
        let rendered = format!("{:?}", codec());
        assert!(!rendered.contains("test-secret"));
    }
}
