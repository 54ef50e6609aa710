//! # Principal Extraction
//!
//! Authentication itself happens upstream (a gateway validates credentials
//! and forwards the caller's identity). This module turns the forwarded
//! `X-User-Id` / `X-User-Role` headers into an explicit [`Principal`] value
//! that handlers receive as a parameter. Core logic never reads identity
//! from ambient request state; the principal travels as an argument.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use pitstop_core::errors::BookingError;
use pitstop_core::models::user::{Principal, Role};
use uuid::Uuid;

use crate::middleware::error_handling::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Axum extractor producing the acting principal for a request.
///
/// Missing or malformed identity headers reject the request with 401
/// before the handler body runs.
#[derive(Debug, Clone, Copy)]
pub struct ExtractPrincipal(pub Principal);

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

#[async_trait]
impl<S> FromRequestParts<S> for ExtractPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header_str(parts, USER_ID_HEADER)
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or_else(|| {
                AppError(BookingError::Unauthenticated(
                    "Missing or invalid caller identity".to_string(),
                ))
            })?;

        let role = header_str(parts, USER_ROLE_HEADER)
            .and_then(|v| v.parse::<Role>().ok())
            .ok_or_else(|| {
                AppError(BookingError::Unauthenticated(
                    "Missing or invalid caller role".to_string(),
                ))
            })?;

        Ok(ExtractPrincipal(Principal { id, role }))
    }
}

/// Rejects callers without staff/admin privileges.
pub fn require_staff(principal: &Principal) -> Result<(), AppError> {
    if principal.is_staff() {
        Ok(())
    } else {
        Err(AppError(BookingError::Forbidden(
            "Staff role required".to_string(),
        )))
    }
}
