use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::Deserialize;
use tracing::instrument;

use super::{json_body, parse_id};
use crate::app::state::AppState;
use crate::auth::AuthenticatedUser;
use crate::domain::{DEFAULT_TOP_LIKED_LIMIT, LikeStatus, RankedArticle};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Handler for PATCH /like/{article_id}
#[instrument(skip(_user, state, payload))]
pub async fn toggle_like(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(article_id): Path<String>,
    payload: Result<Json<LikeRequest>, JsonRejection>,
) -> Result<Json<LikeStatus>, ApiError> {
    let email = json_body(payload)?
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Email is required in request body".into()))?;
    let id = parse_id(&article_id, "Invalid article ID")?;

    Ok(Json(state.articles.toggle_like(id, &email).await?))
}

/// Handler for GET /topLikes
#[instrument(skip(state))]
pub async fn top_likes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RankedArticle>>, ApiError> {
    Ok(Json(state.articles.top_liked(DEFAULT_TOP_LIKED_LIMIT).await?))
}
