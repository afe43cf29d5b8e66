//! # mealshare_api
//!
//! HTTP API library for Mealshare.

pub mod config;
pub mod error;
pub mod extractor;
pub mod handlers;
pub mod models;
pub mod response;
pub mod services;
pub mod validate;

use axum::Router;
use axum::routing::get;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, info, meals, participation, users};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// API configuration.
    pub config: ApiConfig,
}

/// Run embedded database migrations.
///
/// Delegates to `mealshare_core::migrate::migrate()` which owns the files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    mealshare_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
///
/// Protected operations take [`extractor::CurrentUser`], so the credential is
/// verified before any handler logic runs; routes without it are public.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/info", get(info::info_handler))
        .route("/api/login", axum::routing::post(auth::login_handler))
        .route(
            "/api/users",
            get(users::list_users_handler).post(users::register_handler),
        )
        .route("/api/users/profile", get(users::profile_handler))
        .route(
            "/api/users/{user_id}",
            get(users::get_user_handler)
                .put(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        .route(
            "/api/meals",
            get(meals::list_meals_handler).post(meals::create_meal_handler),
        )
        .route(
            "/api/meals/{meal_id}",
            get(meals::get_meal_handler)
                .put(meals::update_meal_handler)
                .delete(meals::delete_meal_handler),
        )
        .route(
            "/api/meals/{meal_id}/participate",
            axum::routing::post(participation::sign_up_handler)
                .delete(participation::unregister_handler),
        )
        .route(
            "/api/meals/{meal_id}/participants",
            get(participation::list_participants_handler),
        )
        .route(
            "/api/meals/{meal_id}/participants/{participant_id}",
            get(participation::get_participant_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
