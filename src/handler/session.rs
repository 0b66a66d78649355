use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Map, Value, json};
use tracing::{info, instrument};

use super::json_body;
use crate::app::state::AppState;
use crate::error::ApiError;

/// Handler for POST /jwt. Signs the posted claims and sets the session cookie.
#[instrument(skip(state, jar, payload))]
pub async fn issue_token(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let claims = json_body(payload)?;
    let token = state.sessions.issue(claims)?;
    info!("Session token issued");

    Ok((
        jar.add(state.sessions.session_cookie(token)),
        Json(json!({ "success": true })),
    ))
}

/// Handler for POST /logout. The expired cookie is sent whether or not the
/// request carried a session.
#[instrument(skip(state, jar))]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    (
        jar.add(state.sessions.removal_cookie()),
        Json(json!({ "success": true })),
    )
}
