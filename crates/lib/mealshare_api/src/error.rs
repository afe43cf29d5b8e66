//! Application error types.
//!
//! Each core error converts into exactly one `AppError` variant, and each
//! variant maps to exactly one status code. Store failure details are logged
//! here and never serialized to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::WithRejection;
use thiserror::Error;

use mealshare_core::auth::AuthError;
use mealshare_core::meals::MealError;
use mealshare_core::participation::ParticipationError;
use mealshare_core::store::StoreError;
use mealshare_core::users::UserError;

use crate::response::reply_empty;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Rejection-mapped extractors: bad JSON bodies, non-numeric path ids, and
/// malformed query strings surface as `Validation`, in the envelope, instead
/// of a framework default.
pub type ValidatedJson<T> = WithRejection<axum::Json<T>, AppError>;
pub type NumericPath<T> = WithRejection<axum::extract::Path<T>, AppError>;
pub type ValidatedQuery<T> = WithRejection<axum::extract::Query<T>, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Service temporarily unavailable")]
    Unavailable,

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        reply_empty(self.status(), self.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict { constraint } => {
                AppError::Conflict(format!("Duplicate entry ({constraint})"))
            }
            StoreError::Unavailable => AppError::Unavailable,
            StoreError::Failure(cause) => {
                tracing::error!(error = %cause, "store failure");
                AppError::Internal
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidToken => {
                AppError::Unauthorized("Unauthorized: Invalid token".into())
            }
            AuthError::TokenError(msg) | AuthError::Internal(msg) => {
                tracing::error!(error = %msg, "auth failure");
                AppError::Internal
            }
        }
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound(id) => AppError::NotFound(format!("No user found with Id {id}")),
            UserError::Forbidden(_) => {
                AppError::Forbidden("You are not authorized to modify this user's data".into())
            }
            UserError::EmailTaken => AppError::Conflict("Email address already registered".into()),
            UserError::Store(store) => AppError::from(store),
        }
    }
}

impl From<MealError> for AppError {
    fn from(e: MealError) -> Self {
        match e {
            MealError::NotFound(id) => AppError::NotFound(format!("No meal found with Id {id}")),
            MealError::Forbidden(id) => {
                AppError::Forbidden(format!("Not authorized to modify meal with Id {id}"))
            }
            MealError::Store(store) => AppError::from(store),
        }
    }
}

impl From<ParticipationError> for AppError {
    fn from(e: ParticipationError) -> Self {
        match e {
            ParticipationError::MealNotFound(id) => {
                AppError::NotFound(format!("No meal found with Id {id}"))
            }
            ParticipationError::NotSignedUp { meal_id, user_id } => AppError::NotFound(format!(
                "No participation found for user with Id {user_id} for meal {meal_id}"
            )),
            ParticipationError::ParticipantNotFound { meal_id, user_id } => AppError::NotFound(
                format!("No participant found with Id {user_id} for meal {meal_id}"),
            ),
            ParticipationError::AlreadySignedUp { meal_id, user_id } => AppError::Conflict(
                format!("User with Id {user_id} is already signed up for meal {meal_id}"),
            ),
            ParticipationError::MealFull(id) => {
                AppError::Conflict(format!("Meal with Id {id} is full"))
            }
            ParticipationError::Store(store) => AppError::from(store),
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<axum::extract::rejection::PathRejection> for AppError {
    fn from(rejection: axum::extract::rejection::PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(rejection: axum::extract::rejection::QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
