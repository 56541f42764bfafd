use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Access token payload.
///
/// `user` is optional on the decode side so a correctly signed token without
/// an identity is reported as such instead of as a generic decode failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Authenticated identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Expiration, unix seconds
    pub exp: i64,
    /// Issued at, unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Unique token id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Claims for `identity` issued at `now`, expiring `ttl` later.
    ///
    /// Both instants are whole unix seconds: `now` is truncated, so the token
    /// can lapse up to one second before `now + ttl`.
    pub fn new(identity: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        let iat = now.timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Claims {
            user: Some(identity.into()),
            exp: iat.saturating_add(ttl_secs),
            iat: Some(iat),
            jti: Some(uuid::Uuid::new_v4().to_string()),
        }
    }

    /// The identity this token asserts, if it names a non-empty one.
    pub fn identity(&self) -> Option<&str> {
        self.user.as_deref().filter(|u| !u.is_empty())
    }

    /// `exp` as an instant.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Expired once `exp` is at or before `now`, at whole-second resolution.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}
