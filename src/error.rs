//! Error taxonomy for credential checks and token verification.
//!
//! Every expected failure is an `AuthError` variant. Rendering to the wire
//! goes through `ErrorResponse`, which only ever carries fixed messages:
//! token reasons, expiry instants and internal error chains stay in the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Why a presented token was rejected as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidTokenReason {
    /// Wrong segment count, undecodable header or undecodable claims
    Malformed,
    /// Header names an algorithm other than the one tokens are signed with
    AlgorithmMismatch,
    /// Signature does not verify under the signing secret
    BadSignature,
    /// Signature verifies but the token names no identity
    MissingIdentity,
}

impl InvalidTokenReason {
    /// Short label used in log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::AlgorithmMismatch => "algorithm_mismatch",
            Self::BadSignature => "bad_signature",
            Self::MissingIdentity => "missing_identity",
        }
    }
}

/// Authentication and token errors.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AuthError {
    /// Identity unknown or secret mismatch. Deliberately carries no detail.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No token supplied where one was required
    #[error("Token missing from request")]
    TokenMissing,

    /// Token is malformed, uses the wrong algorithm or fails signature checks
    #[error("Token invalid: {}", .reason.as_str())]
    TokenInvalid {
        /// Which check rejected the token
        reason: InvalidTokenReason,
    },

    /// Token is well-formed and correctly signed but past its expiration
    #[error("Token expired at {expired_at}")]
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },

    /// Infrastructure failure (details sanitized in responses)
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    /// Shorthand for a `TokenInvalid` with the given reason.
    #[must_use]
    pub const fn invalid(reason: InvalidTokenReason) -> Self {
        Self::TokenInvalid { reason }
    }

    /// Get the error code for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidCredentials => ErrorCode::InvalidCredentials,
            Self::TokenMissing => ErrorCode::TokenMissing,
            Self::TokenInvalid { .. } => ErrorCode::TokenInvalid,
            Self::TokenExpired { .. } => ErrorCode::TokenExpired,
            Self::Internal(_) => ErrorCode::Internal,
        }
    }
}

/// Stable error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// `AUTH_INVALID_CREDENTIALS`
    InvalidCredentials,
    /// `AUTH_TOKEN_MISSING`
    TokenMissing,
    /// `AUTH_TOKEN_INVALID`
    TokenInvalid,
    /// `AUTH_TOKEN_EXPIRED`
    TokenExpired,
    /// `BAD_REQUEST`, request body could not be read
    BadRequest,
    /// `INTERNAL_ERROR`
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "AUTH_INVALID_CREDENTIALS",
            Self::TokenMissing => "AUTH_TOKEN_MISSING",
            Self::TokenInvalid => "AUTH_TOKEN_INVALID",
            Self::TokenExpired => "AUTH_TOKEN_EXPIRED",
            Self::BadRequest => "BAD_REQUEST",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials
            | Self::TokenMissing
            | Self::TokenInvalid
            | Self::TokenExpired => StatusCode::UNAUTHORIZED,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Fixed per code so nothing internal leaks.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid credentials",
            Self::TokenMissing => "Token missing",
            Self::TokenInvalid => "Invalid token",
            Self::TokenExpired => "Token expired",
            Self::BadRequest => "Invalid request body",
            Self::Internal => "Internal error",
        }
    }
}

/// Structured error body: `{"code": ..., "message": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: &'static str,
    /// Human-readable message (sanitized)
    pub message: &'static str,
    #[serde(skip)]
    status: StatusCode,
}

impl ErrorResponse {
    /// Build the response for an error code.
    #[must_use]
    pub const fn from_code(code: ErrorCode) -> Self {
        Self {
            code: code.as_str(),
            message: code.message(),
            status: code.status(),
        }
    }

    /// Build the response for an `AuthError`.
    #[must_use]
    pub const fn from_error(error: &AuthError) -> Self {
        Self::from_code(error.code())
    }

    /// HTTP status this response is sent with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let Self::Internal(err) = &self {
            tracing::error!(error = %err, "Internal error while handling request");
        }
        ErrorResponse::from_error(&self).into_response()
    }
}
