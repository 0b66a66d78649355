use std::sync::Arc;

use crate::adapter::mongo::MongoConnection;
use crate::auth::SessionIssuer;
use crate::config::Settings;
use crate::port::{CommentStore, UserStore};
use crate::service::ArticleService;

/// Shared application state, cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub articles: ArticleService,
    pub users: Arc<dyn UserStore>,
    pub comments: Arc<dyn CommentStore>,
    pub sessions: Arc<SessionIssuer>,
}

impl AppState {
    #[must_use]
    pub fn new(
        articles: ArticleService,
        users: Arc<dyn UserStore>,
        comments: Arc<dyn CommentStore>,
        sessions: Arc<SessionIssuer>,
    ) -> Self {
        Self {
            articles,
            users,
            comments,
            sessions,
        }
    }

    /// Wire the MongoDB-backed stores. The connection itself stays with the
    /// caller so it can be shut down after the server drains.
    #[must_use]
    pub fn from_connection(connection: &MongoConnection, settings: &Settings) -> Self {
        Self::new(
            ArticleService::new(Arc::new(connection.articles())),
            Arc::new(connection.users()),
            Arc::new(connection.comments()),
            Arc::new(SessionIssuer::new(&settings.jwt_secret, settings.production)),
        )
    }
}
