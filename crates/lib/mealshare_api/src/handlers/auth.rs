//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum_extra::extract::WithRejection;

use crate::AppState;
use crate::error::{AppResult, ValidatedJson};
use crate::models::LoginRequest;
use crate::response::reply;
use crate::services::auth;

/// `POST /api/login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    WithRejection(Json(body), _): ValidatedJson<LoginRequest>,
) -> AppResult<Response> {
    body.validate()?;
    let data = auth::login(&state.pool, &body, state.config.jwt_secret.as_bytes()).await?;
    Ok(reply(StatusCode::OK, "Login successful", data))
}
