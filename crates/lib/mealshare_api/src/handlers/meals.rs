//! Meal request handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum_extra::extract::WithRejection;

use mealshare_core::meals::MealError;
use mealshare_core::meals::queries;

use crate::AppState;
use crate::error::{AppResult, NumericPath, ValidatedJson};
use crate::extractor::CurrentUser;
use crate::models::{CreateMealRequest, UpdateMealRequest};
use crate::response::{reply, reply_empty};

/// `POST /api/meals` — create a meal owned by the authenticated user.
pub async fn create_meal_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Json(body), _): ValidatedJson<CreateMealRequest>,
) -> AppResult<Response> {
    body.validate()?;
    let meal = queries::insert_meal(&state.pool, body.into_new_meal(), user.id()).await?;
    Ok(reply(StatusCode::CREATED, "Meal created successfully", meal))
}

/// `GET /api/meals` — every meal with its cook and roster.
pub async fn list_meals_handler(State(state): State<AppState>) -> AppResult<Response> {
    let meals = queries::list_with_details(&state.pool).await?;
    Ok(reply(
        StatusCode::OK,
        "Successfully fetched all meals",
        meals,
    ))
}

/// `GET /api/meals/{mealId}` — one meal with its cook and roster.
pub async fn get_meal_handler(
    State(state): State<AppState>,
    WithRejection(Path(meal_id), _): NumericPath<i64>,
) -> AppResult<Response> {
    let details = queries::fetch_details(&state.pool, meal_id)
        .await?
        .ok_or(MealError::NotFound(meal_id))?;
    Ok(reply(
        StatusCode::OK,
        "Meal details retrieved successfully",
        details,
    ))
}

/// `PUT /api/meals/{mealId}` — owner-only partial update.
pub async fn update_meal_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(meal_id), _): NumericPath<i64>,
    WithRejection(Json(body), _): ValidatedJson<UpdateMealRequest>,
) -> AppResult<Response> {
    body.validate()?;
    let meal = queries::update_meal(&state.pool, meal_id, user.id(), body.into_update()).await?;
    Ok(reply(StatusCode::OK, "Updated meal successfully", meal))
}

/// `DELETE /api/meals/{mealId}` — owner-only delete.
pub async fn delete_meal_handler(
    user: CurrentUser,
    State(state): State<AppState>,
    WithRejection(Path(meal_id), _): NumericPath<i64>,
) -> AppResult<Response> {
    queries::delete_meal(&state.pool, meal_id, user.id()).await?;
    Ok(reply_empty(
        StatusCode::OK,
        format!("Meal with Id {meal_id} is deleted"),
    ))
}
