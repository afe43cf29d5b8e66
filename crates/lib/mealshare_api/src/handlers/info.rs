//! Service info endpoint — bootstrap health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

use crate::AppState;
use crate::response::reply;

/// `GET /api/info` — service identity and store connectivity.
pub async fn info_handler(State(state): State<AppState>) -> Response {
    let db_connected = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    reply(
        StatusCode::OK,
        "Mealshare service info",
        serde_json::json!({
            "service": "mealshare",
            "version": mealshare_core::version(),
            "dbConnected": db_connected,
        }),
    )
}
