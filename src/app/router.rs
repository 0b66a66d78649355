use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use axum::routing::{get, patch, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::state::AppState;
use crate::handler::{articles, comments, health, likes, session, users};

/// Build the API router. CORS and request tracing are layered on by
/// [`with_layers`].
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/jwt", post(session::issue_token))
        .route("/logout", post(session::logout))
        .route("/users", post(users::create_user).get(users::list_users))
        .route(
            "/articles",
            post(articles::create_article).get(articles::list_articles),
        )
        .route("/myArticles", get(articles::my_articles))
        .route(
            "/articles/{id}",
            get(articles::get_article)
                .put(articles::update_article)
                .delete(articles::delete_article),
        )
        .route("/like/{article_id}", patch(likes::toggle_like))
        .route("/topLikes", get(likes::top_likes))
        .route("/categories/{category}", get(articles::list_by_category))
        .route(
            "/comments",
            post(comments::create_comment).get(comments::list_comments),
        )
        .with_state(state)
}

/// Credentialed CORS for the configured origins plus per-request spans.
pub fn with_layers(router: Router, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Skipping unusable CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    router.layer(cors).layer(TraceLayer::new_for_http())
}
