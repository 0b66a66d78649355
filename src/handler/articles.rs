use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::{info, instrument};

use super::{json_body, non_empty, parse_id};
use crate::app::state::AppState;
use crate::auth::AuthenticatedUser;
use crate::domain::{
    Article, ArticleFilter, DeleteOutcome, InsertOutcome, NewArticle, SortOrder, UpdateOutcome,
};
use crate::error::ApiError;

const INVALID_ARTICLE_ID: &str = "Invalid article ID";

#[derive(Debug, Default, Deserialize)]
pub struct ArticleQuery {
    pub email: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SortQuery {
    pub sort: Option<String>,
}

/// Handler for POST /articles
#[instrument(skip(state, payload))]
pub async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<NewArticle>, JsonRejection>,
) -> Result<Json<InsertOutcome>, ApiError> {
    let article = json_body(payload)?;
    Ok(Json(state.articles.create(article).await?))
}

/// Handler for GET /articles?email=&category=&sort=
#[instrument(skip(state))]
pub async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ArticleQuery>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let filter = ArticleFilter {
        author_email: non_empty(query.email),
        category: non_empty(query.category),
    };
    let sort = SortOrder::from_query(query.sort.as_deref());

    let articles = state.articles.list(&filter, sort).await?;
    info!(count = articles.len(), "Listed articles");
    Ok(Json(articles))
}

/// Handler for GET /myArticles. Defaults to the signed-in user's email.
#[instrument(skip(state, user))]
pub async fn my_articles(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<ArticleQuery>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let AuthenticatedUser(claims) = user;
    let email = non_empty(query.email)
        .or(claims.email)
        .ok_or_else(|| ApiError::BadRequest("email is required".into()))?;

    let sort = SortOrder::from_query(query.sort.as_deref());
    let articles = state
        .articles
        .list(&ArticleFilter::by_author(email), sort)
        .await?;
    Ok(Json(articles))
}

/// Handler for GET /articles/{id}. An unknown id yields `null`.
#[instrument(skip(state))]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Article>>, ApiError> {
    let id = parse_id(&id, INVALID_ARTICLE_ID)?;
    Ok(Json(state.articles.get(id).await?))
}

/// Handler for PUT /articles/{id}
#[instrument(skip(state, payload))]
pub async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NewArticle>, JsonRejection>,
) -> Result<Json<UpdateOutcome>, ApiError> {
    let id = parse_id(&id, INVALID_ARTICLE_ID)?;
    let article = json_body(payload)?;
    Ok(Json(state.articles.update(id, article).await?))
}

/// Handler for DELETE /articles/{id}
#[instrument(skip(state))]
pub async fn delete_article(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let id = parse_id(&id, INVALID_ARTICLE_ID)?;
    Ok(Json(state.articles.delete(id).await?))
}

/// Handler for GET /categories/{category}
#[instrument(skip(state))]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<SortQuery>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let sort = SortOrder::from_query(query.sort.as_deref());
    let articles = state
        .articles
        .list(&ArticleFilter::by_category(category), sort)
        .await?;
    Ok(Json(articles))
}
