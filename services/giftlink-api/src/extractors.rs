//! Axum extractors for caller identity
//!
//! The upstream session provider authenticates the caller and injects the
//! user and session references as trusted headers; these extractors only
//! parse them. A request without them never reaches the core.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use giftlink_types::{SessionId, UserId};

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's session reference
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Authenticated user extracted from request
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: UserId,
}

/// Caller session extracted from request
#[derive(Debug, Clone, Copy)]
pub struct CallerSession {
    pub session_id: SessionId,
}

/// Error response for identity failures
#[derive(Debug, Serialize)]
struct IdentityErrorResponse {
    error: IdentityErrorDetail,
}

#[derive(Debug, Serialize)]
struct IdentityErrorDetail {
    code: &'static str,
    message: &'static str,
}

/// Identity rejection type
pub struct IdentityRejection {
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let body = IdentityErrorResponse {
            error: IdentityErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

fn header_uuid(parts: &Parts, name: &str) -> Option<uuid::Uuid> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| uuid::Uuid::parse_str(value.trim()).ok())
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_uuid(parts, USER_ID_HEADER)
            .map(|id| Self {
                user_id: UserId(id),
            })
            .ok_or(IdentityRejection {
                code: "MISSING_USER",
                message: "missing or malformed x-user-id header",
            })
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CallerSession {
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_uuid(parts, SESSION_ID_HEADER)
            .map(|id| Self {
                session_id: SessionId(id),
            })
            .ok_or(IdentityRejection {
                code: "MISSING_SESSION",
                message: "missing or malformed x-session-id header",
            })
    }
}
