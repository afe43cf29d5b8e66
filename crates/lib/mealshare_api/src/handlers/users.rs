//! User request handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum_extra::extract::WithRejection;

use mealshare_core::auth::password;
use mealshare_core::users::UserError;
use mealshare_core::users::queries;

use crate::AppState;
use crate::error::{AppResult, NumericPath, ValidatedJson, ValidatedQuery};
use crate::extractor::CurrentUser;
use crate::models::{RegisterRequest, UpdateUserRequest, UserFilterQuery};
use crate::response::{reply, reply_empty};
use crate::services::auth;

/// `POST /api/users` — register a new account.
pub async fn register_handler(
    State(state): State<AppState>,
    WithRejection(Json(body), _): ValidatedJson<RegisterRequest>,
) -> AppResult<Response> {
    let user = auth::register(&state.pool, body).await?;
    Ok(reply(StatusCode::CREATED, "User created successfully", user))
}

/// `GET /api/users` — directory listing, optionally filtered.
pub async fn list_users_handler(
    State(state): State<AppState>,
    WithRejection(Query(filter), _): ValidatedQuery<UserFilterQuery>,
) -> AppResult<Response> {
    let users = queries::list_users(&state.pool, &filter.into()).await?;
    Ok(reply(
        StatusCode::OK,
        "Users retrieved successfully",
        users,
    ))
}

/// `GET /api/users/profile` — the authenticated user's own profile.
pub async fn profile_handler(
    user: CurrentUser,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let profile = queries::fetch_user(&state.pool, user.id())
        .await?
        .ok_or(UserError::NotFound(user.id()))?;
    Ok(reply(
        StatusCode::OK,
        "User profile retrieved successfully",
        profile,
    ))
}

/// `GET /api/users/{userId}` — fetch a user by id.
pub async fn get_user_handler(
    _user: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): NumericPath<i64>,
) -> AppResult<Response> {
    let user = queries::fetch_user(&state.pool, user_id)
        .await?
        .ok_or(UserError::NotFound(user_id))?;
    Ok(reply(
        StatusCode::OK,
        "User retrieved by id successfully",
        user,
    ))
}

/// `PUT /api/users/{userId}` — update one's own account.
pub async fn update_user_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): NumericPath<i64>,
    WithRejection(Json(body), _): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Response> {
    body.validate()?;

    let password_hash = match &body.password {
        Some(password) => Some(password::hash_password(password).await?),
        None => None,
    };
    let update = body.into_update(password_hash);

    let updated = queries::update_user(&state.pool, user_id, user.id(), update).await?;
    Ok(reply(StatusCode::OK, "User info updated", updated))
}

/// `DELETE /api/users/{userId}` — delete one's own account.
pub async fn delete_user_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): NumericPath<i64>,
) -> AppResult<Response> {
    queries::delete_user(&state.pool, user_id, user.id()).await?;
    Ok(reply_empty(
        StatusCode::OK,
        format!("User with Id {user_id} is deleted"),
    ))
}
