//! Roster request handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum_extra::extract::WithRejection;

use mealshare_core::participation::queries;

use crate::AppState;
use crate::error::{AppResult, NumericPath};
use crate::extractor::CurrentUser;
use crate::response::{reply, reply_empty};

/// `POST /api/meals/{mealId}/participate` — sign the authenticated user up.
pub async fn sign_up_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(meal_id), _): NumericPath<i64>,
) -> AppResult<Response> {
    queries::sign_up(&state.pool, meal_id, user.id()).await?;
    Ok(reply_empty(
        StatusCode::OK,
        format!(
            "User with Id {} has been signed up for meal with Id {meal_id}",
            user.id()
        ),
    ))
}

/// `DELETE /api/meals/{mealId}/participate` — withdraw the authenticated user.
pub async fn unregister_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(meal_id), _): NumericPath<i64>,
) -> AppResult<Response> {
    queries::unregister(&state.pool, meal_id, user.id()).await?;
    Ok(reply_empty(
        StatusCode::OK,
        format!(
            "User with Id {} has been unregistered for meal with Id {meal_id}",
            user.id()
        ),
    ))
}

/// `GET /api/meals/{mealId}/participants` — the meal's roster, public fields only.
pub async fn list_participants_handler(
    State(state): State<AppState>,
    WithRejection(Path(meal_id), _): NumericPath<i64>,
) -> AppResult<Response> {
    let participants = queries::list_participants(&state.pool, meal_id).await?;
    Ok(reply(
        StatusCode::OK,
        "Participants retrieved successfully",
        participants,
    ))
}

/// `GET /api/meals/{mealId}/participants/{participantId}` — one roster entry.
pub async fn get_participant_handler(
    State(state): State<AppState>,
    WithRejection(Path((meal_id, participant_id)), _): NumericPath<(i64, i64)>,
) -> AppResult<Response> {
    let participant = queries::get_participant(&state.pool, meal_id, participant_id).await?;
    Ok(reply(
        StatusCode::OK,
        "Participant details retrieved successfully",
        participant,
    ))
}
