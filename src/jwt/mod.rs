//! HS256 access tokens: payload, type-state validation and the issue/verify codec.

/// Token payload
pub mod claims;
/// Issuing and verifying tokens under one signing secret
pub mod codec;
/// Type-state validation pipeline
pub mod token;

pub use claims::Claims;
pub use codec::{AccessToken, TokenCodec};
pub use token::{SignatureValidated, Token, TokenState, Unvalidated, Validated, TOKEN_ALGORITHM};
