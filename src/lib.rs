//! Auth Service library.
//!
//! Checks submitted credentials against a fixed registry, issues HS256
//! access tokens on success and verifies previously issued tokens.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod jwt;
pub mod observability;
pub mod service;
pub mod shutdown;

// Re-exports for convenience
pub use config::Config;
pub use credentials::CredentialRegistry;
pub use error::{AuthError, ErrorCode, ErrorResponse, InvalidTokenReason};
pub use jwt::{AccessToken, TokenCodec};
pub use service::{AuthService, ACCESS_TOKEN_TTL};
