//! Request extractors.
//!
//! `CurrentUser` is the verified request identity: it reads the bearer
//! credential, verifies the token, and carries the embedded user id. Handlers
//! taking it as an argument cannot run without a valid credential, and request
//! bodies are never trusted to self-report identity.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use mealshare_core::auth::jwt;

use crate::AppState;
use crate::error::AppError;

/// The authenticated user id, taken from a verified bearer token.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

impl CurrentUser {
    pub fn id(self) -> i64 {
        self.0
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized("Unauthorized: Missing or invalid token".into())
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Unauthorized: Missing or invalid token".into())
        })?;

        let user_id = jwt::verify(token, state.config.jwt_secret.as_bytes())
            .map_err(|_| AppError::Unauthorized("Unauthorized: Invalid token".into()))?;

        Ok(CurrentUser(user_id))
    }
}
