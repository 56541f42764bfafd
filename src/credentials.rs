//! Credential registry and login check.
//!
//! Secrets are compared with `subtle::ConstantTimeEq`. Unknown identities
//! still pay for one comparison so they are not cheaper to probe than
//! known ones.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::fmt;
use subtle::ConstantTimeEq;

/// Compared against when the identity is unknown.
const DUMMY_SECRET: &[u8] = b"no-such-identity-placeholder-secret";

/// Fixed identity -> secret table, immutable once built.
pub struct CredentialRegistry {
    entries: HashMap<String, SecretString>,
}

impl CredentialRegistry {
    /// Builds a registry from `(identity, secret)` pairs.
    ///
    /// Empty identities are skipped; later duplicates replace earlier ones.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(identity, secret)| (identity.into(), SecretString::from(secret.into())))
            .filter(|(identity, _)| !identity.is_empty())
            .collect();

        Self { entries }
    }

    /// Returns true iff `identity` is registered and `secret` matches exactly.
    #[must_use]
    pub fn check(&self, identity: &str, secret: &str) -> bool {
        if identity.is_empty() || secret.is_empty() {
            return false;
        }

        match self.entries.get(identity) {
            Some(stored) => stored
                .expose_secret()
                .as_bytes()
                .ct_eq(secret.as_bytes())
                .into(),
            None => {
                let _ = DUMMY_SECRET.ct_eq(secret.as_bytes());
                false
            }
        }
    }

    /// Number of registered identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no identities at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CredentialRegistry {
    /// The built-in single-entry table.
    fn default() -> Self {
        Self::from_entries([("admin", "password123")])
    }
}

impl fmt::Debug for CredentialRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRegistry")
            .field("identities", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_scenario() {
        let registry = CredentialRegistry::default();

        assert!(registry.check("admin", "password123"));
        assert!(!registry.check("admin", "wrong"));
        assert!(!registry.check("ghost", "x"));
    }

    #[test]
    fn test_missing_fields_never_match() {
        let registry = CredentialRegistry::default();

        assert!(!registry.check("", ""));
        assert!(!registry.check("admin", ""));
        assert!(!registry.check("", "password123"));
    }

    #[test]
    fn test_comparison_is_exact() {
        let registry = CredentialRegistry::default();

        assert!(!registry.check("Admin", "password123"));
        assert!(!registry.check("admin", "Password123"));
        assert!(!registry.check("admin", "password1234"));
        assert!(!registry.check("admin", "password12"));
        assert!(!registry.check("admin ", "password123"));
    }

    #[test]
    fn test_empty_identities_are_not_registered() {
        let registry = CredentialRegistry::from_entries([("", "secret"), ("alice", "pw")]);

        assert_eq!(registry.len(), 1);
        assert!(!registry.check("", "secret"));
        assert!(registry.check("alice", "pw"));
    }

    #[test]
    fn test_debug_hides_contents() {
        let rendered = format!("{:?}", CredentialRegistry::default());

        assert!(!rendered.contains("admin"));
        assert!(!rendered.contains("password123"));
    }
}
