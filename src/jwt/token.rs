//! Type-State access token with compile-time validation ordering
//!
//! A presented token moves `Unvalidated` -> `SignatureValidated` -> `Validated`.
//! Expiration is only reachable from `SignatureValidated`, so a forged token
//! can never report anything but `TokenInvalid`.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Header, Validation};

use crate::error::{AuthError, InvalidTokenReason};
use crate::jwt::claims::Claims;

/// The only algorithm tokens are signed and accepted with.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Sealed Trait Pattern for Token States
// ============================================================================

mod private {
    /// Sealed trait to prevent external implementations
    pub trait Sealed {}
}

/// Marker trait for token validation states
pub trait TokenState: private::Sealed {
    /// Human-readable state name for debugging
    fn state_name() -> &'static str;
}

/// Unvalidated token - header parsed, nothing verified
#[derive(Debug)]
pub struct Unvalidated {
    raw: String,
}
impl private::Sealed for Unvalidated {}
impl TokenState for Unvalidated {
    fn state_name() -> &'static str {
        "Unvalidated"
    }
}

/// Signature validated - cryptographic verification passed
#[derive(Debug)]
pub struct SignatureValidated {
    claims: Claims,
}
impl private::Sealed for SignatureValidated {}
impl TokenState for SignatureValidated {
    fn state_name() -> &'static str {
        "SignatureValidated"
    }
}

/// Fully validated - signature, identity and expiration verified
#[derive(Debug)]
pub struct Validated {
    identity: String,
}
impl private::Sealed for Validated {}
impl TokenState for Validated {
    fn state_name() -> &'static str {
        "Validated"
    }
}

// ============================================================================
// Type-State Token Wrapper
// ============================================================================

/// Type-state token wrapper that enforces validation order at compile time
#[derive(Debug)]
pub struct Token<State: TokenState> {
    header: Header,
    state: State,
}

impl Token<Unvalidated> {
    /// Parse a raw compact token, checking its shape and header only.
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        if raw.split('.').count() != 3 {
            return Err(AuthError::invalid(InvalidTokenReason::Malformed));
        }

        let header =
            decode_header(raw).map_err(|_| AuthError::invalid(InvalidTokenReason::Malformed))?;

        if header.alg != TOKEN_ALGORITHM {
            return Err(AuthError::invalid(InvalidTokenReason::AlgorithmMismatch));
        }

        Ok(Token {
            header,
            state: Unvalidated {
                raw: raw.to_string(),
            },
        })
    }

    /// Get the algorithm from the token header
    pub fn algorithm(&self) -> Algorithm {
        self.header.alg
    }

    /// Verify the signature and decode the claims.
    ///
    /// Time-based claims are not looked at here.
    pub fn validate_signature(
        self,
        key: &DecodingKey,
    ) -> Result<Token<SignatureValidated>, AuthError> {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Claims>(&self.state.raw, key, &validation).map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::InvalidSignature => InvalidTokenReason::BadSignature,
                ErrorKind::InvalidAlgorithm => InvalidTokenReason::AlgorithmMismatch,
                _ => InvalidTokenReason::Malformed,
            };
            AuthError::invalid(reason)
        })?;

        Ok(Token {
            header: self.header,
            state: SignatureValidated {
                claims: token_data.claims,
            },
        })
    }
}

impl Token<SignatureValidated> {
    /// Check identity presence and expiration against `now`.
    pub fn validate_claims(self, now: DateTime<Utc>) -> Result<Token<Validated>, AuthError> {
        let claims = self.state.claims;

        let identity = claims
            .identity()
            .ok_or_else(|| AuthError::invalid(InvalidTokenReason::MissingIdentity))?
            .to_string();

        if claims.is_expired_at(now) {
            return Err(AuthError::TokenExpired {
                expired_at: claims.expires_at(),
            });
        }

        Ok(Token {
            header: self.header,
            state: Validated { identity },
        })
    }
}

impl Token<Validated> {
    /// The authenticated identity
    pub fn identity(&self) -> &str {
        &self.state.identity
    }

    /// Consume the token, keeping only the identity
    pub fn into_identity(self) -> String {
        self.state.identity
    }
}

// Common methods for all states
impl<S: TokenState> Token<S> {
    /// Get the current state name
    pub fn state_name(&self) -> &'static str {
        S::state_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey};
    use std::time::Duration;

    const SECRET: &[u8] = b"token-state-test-secret";

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn sign<T: serde::Serialize>(alg: Algorithm, claims: &T) -> String {
        encode(&Header::new(alg), claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    #[test]
    fn test_state_transitions() {
        let raw = sign(
            TOKEN_ALGORITHM,
            &Claims::new("admin", at(1_000), Duration::from_secs(60)),
        );

        let token = Token::parse(&raw).unwrap();
        assert_eq!(token.state_name(), "Unvalidated");
        assert_eq!(token.algorithm(), Algorithm::HS256);

        let token = token
            .validate_signature(&DecodingKey::from_secret(SECRET))
            .unwrap();
        assert_eq!(token.state_name(), "SignatureValidated");

        let token = token.validate_claims(at(1_030)).unwrap();
        assert_eq!(token.state_name(), "Validated");
        assert_eq!(token.identity(), "admin");
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        for raw in ["", "abc", "a.b", "a.b.c.d", "!!!.###.$$$"] {
            assert!(matches!(
                Token::parse(raw),
                Err(AuthError::TokenInvalid {
                    reason: InvalidTokenReason::Malformed
                })
            ));
        }
    }

    #[test]
    fn test_parse_rejects_other_algorithms() {
        let raw = sign(
            Algorithm::HS512,
            &Claims::new("admin", at(1_000), Duration::from_secs(60)),
        );

        assert!(matches!(
            Token::parse(&raw),
            Err(AuthError::TokenInvalid {
                reason: InvalidTokenReason::AlgorithmMismatch
            })
        ));
    }

    #[test]
    fn test_wrong_key_is_bad_signature() {
        let raw = sign(
            TOKEN_ALGORITHM,
            &Claims::new("admin", at(1_000), Duration::from_secs(60)),
        );

        let result = Token::parse(&raw)
            .unwrap()
            .validate_signature(&DecodingKey::from_secret(b"another-secret"));

        assert!(matches!(
            result,
            Err(AuthError::TokenInvalid {
                reason: InvalidTokenReason::BadSignature
            })
        ));
    }

    #[test]
    fn test_signed_token_without_identity() {
        let raw = sign(TOKEN_ALGORITHM, &serde_json::json!({ "exp": 1_060 }));

        let result = Token::parse(&raw)
            .unwrap()
            .validate_signature(&DecodingKey::from_secret(SECRET))
            .unwrap()
            .validate_claims(at(1_000));

        assert!(matches!(
            result,
            Err(AuthError::TokenInvalid {
                reason: InvalidTokenReason::MissingIdentity
            })
        ));
    }

    #[test]
    fn test_signed_token_without_expiration() {
        let raw = sign(TOKEN_ALGORITHM, &serde_json::json!({ "user": "admin" }));

        let result = Token::parse(&raw)
            .unwrap()
            .validate_signature(&DecodingKey::from_secret(SECRET));

        assert!(matches!(
            result,
            Err(AuthError::TokenInvalid {
                reason: InvalidTokenReason::Malformed
            })
        ));
    }
}
