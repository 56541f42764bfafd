//! HTTP API handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::{AuthError, ErrorCode, ErrorResponse, InvalidTokenReason};
use crate::jwt::AccessToken;

const BEARER_PREFIX: &str = "Bearer ";

/// Login request body. Absent or `null` fields are treated as empty and never match.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    /// Identity to authenticate
    #[serde(default)]
    pub username: Option<String>,
    /// Secret presented for that identity
    #[serde(default)]
    pub password: Option<String>,
}

/// Successful verification body.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    /// Identity carried by the verified token
    pub user: String,
}

/// `POST /login`
pub async fn login_handler(
    State(service): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AccessToken>, Response> {
    let Json(request) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected login body");
        ErrorResponse::from_code(ErrorCode::BadRequest).into_response()
    })?;

    service
        .login(
            request.username.as_deref().unwrap_or_default(),
            request.password.as_deref().unwrap_or_default(),
            Utc::now(),
        )
        .map(Json)
        .map_err(IntoResponse::into_response)
}

/// `POST /verify`
pub async fn verify_handler(
    State(service): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponse>, AuthError> {
    let token = match headers.get(AUTHORIZATION) {
        None => None,
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AuthError::invalid(InvalidTokenReason::Malformed))?,
        ),
    };

    let user = service.verify(token.map(strip_bearer), Utc::now())?;
    Ok(Json(VerifyResponse { user }))
}

/// `GET /health`
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "Auth service is healthy!")
}

/// Accepts both a raw token and `Bearer <token>`.
fn strip_bearer(value: &str) -> &str {
    let value = value.trim();
    if value.eq_ignore_ascii_case(BEARER_PREFIX.trim_end()) {
        return "";
    }
    match value.get(..BEARER_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_PREFIX) => {
            value[BEARER_PREFIX.len()..].trim_start()
        }
        _ => value,
    }
}
