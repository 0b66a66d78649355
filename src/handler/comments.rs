use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::{info, instrument};

use super::{json_body, non_empty};
use crate::app::state::AppState;
use crate::auth::AuthenticatedUser;
use crate::domain::{Comment, InsertOutcome, NewComment};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CommentQuery {
    pub article_id: Option<String>,
}

/// Handler for POST /comments
#[instrument(skip(_user, state, payload))]
pub async fn create_comment(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    payload: Result<Json<NewComment>, JsonRejection>,
) -> Result<Json<InsertOutcome>, ApiError> {
    let comment = json_body(payload)?;
    if comment.article_id.trim().is_empty() {
        return Err(ApiError::BadRequest("article_id is required".into()));
    }

    let outcome = state.comments.insert_comment(comment.sanitized()).await?;
    info!(comment_id = %outcome.inserted_id, "Comment created");
    Ok(Json(outcome))
}

/// Handler for GET /comments?article_id=
#[instrument(skip(state))]
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentQuery>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let article_id = non_empty(query.article_id)
        .ok_or_else(|| ApiError::BadRequest("article_id is required".into()))?;

    Ok(Json(state.comments.comments_for_article(&article_id).await?))
}
