use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::{info, instrument};

use super::{json_body, non_empty};
use crate::app::state::AppState;
use crate::domain::{InsertOutcome, NewUser, User};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub email: Option<String>,
}

/// Handler for POST /users
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<InsertOutcome>, ApiError> {
    let user = json_body(payload)?;
    if user.email.trim().is_empty() {
        return Err(ApiError::BadRequest("email is required".into()));
    }

    let outcome = state.users.insert_user(user.sanitized()).await?;
    info!(user_id = %outcome.inserted_id, "User registered");
    Ok(Json(outcome))
}

/// Handler for GET /users?email=
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    let email = non_empty(query.email);
    Ok(Json(state.users.list_users(email.as_deref()).await?))
}
