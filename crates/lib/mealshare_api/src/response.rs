//! Uniform response envelope.
//!
//! Every success and error path answers `{status, message, data}`; `data` is
//! `{}` — never `null` — when there is nothing to return.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// The envelope every endpoint answers with.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub message: String,
    pub data: T,
}

/// Build an envelope response with a payload.
pub fn reply<T: Serialize>(
    status: StatusCode,
    message: impl Into<String>,
    data: T,
) -> Response {
    let body = Envelope {
        status: status.as_u16(),
        message: message.into(),
        data,
    };
    (status, Json(body)).into_response()
}

/// Build an envelope response with empty data (`{}`).
pub fn reply_empty(status: StatusCode, message: impl Into<String>) -> Response {
    reply(status, message, serde_json::json!({}))
}
