pub mod articles;
pub mod comments;
pub mod health;
pub mod likes;
pub mod session;
pub mod users;

use axum::Json;
use axum::extract::rejection::JsonRejection;

use crate::domain::RecordId;
use crate::error::ApiError;

/// Malformed ids are rejected here so they never reach the store.
pub(crate) fn parse_id(raw: &str, message: &str) -> Result<RecordId, ApiError> {
    raw.parse::<RecordId>()
        .map_err(|_| ApiError::BadRequest(message.to_string()))
}

/// Unwrap a JSON body, turning axum's rejection into a 400 with a JSON message.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Query-string values like `?email=` count as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
