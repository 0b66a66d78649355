//! Article interaction service.
//!
//! Owns the only decision logic in the system: the like toggle. Everything
//! else is a validated pass-through to the [`ArticleStore`].
//!
//! The toggle reads the article, decides, then issues one atomic
//! `$addToSet`/`$pull`. The triplet is not transactional. Two users toggling
//! the same article commute because they touch different set members; the
//! same user racing themselves is last-write-wins.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{
    Article, ArticleFilter, DeleteOutcome, InsertOutcome, LikeStatus, NewArticle, RankedArticle,
    RecordId, SortOrder, UpdateOutcome,
};
use crate::error::ApiError;
use crate::port::ArticleStore;

#[derive(Clone)]
pub struct ArticleService {
    store: Arc<dyn ArticleStore>,
}

impl ArticleService {
    #[must_use]
    pub fn new(store: Arc<dyn ArticleStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, article: NewArticle) -> Result<InsertOutcome, ApiError> {
        let mut article = validate(article)?;
        if !article.has_date() {
            article.date = Some(Utc::now());
        }
        let outcome = self.store.insert_article(article).await?;
        info!(article_id = %outcome.inserted_id, "Article created");
        Ok(outcome)
    }

    pub async fn get(&self, id: RecordId) -> Result<Option<Article>, ApiError> {
        Ok(self.store.find_article(id).await?)
    }

    pub async fn list(
        &self,
        filter: &ArticleFilter,
        sort: SortOrder,
    ) -> Result<Vec<Article>, ApiError> {
        Ok(self.store.list_articles(filter, sort).await?)
    }

    pub async fn update(
        &self,
        id: RecordId,
        article: NewArticle,
    ) -> Result<UpdateOutcome, ApiError> {
        let article = validate(article)?;
        let outcome = self.store.update_article(id, article).await?;
        info!(
            article_id = %id,
            matched = outcome.matched_count,
            modified = outcome.modified_count,
            "Article updated"
        );
        Ok(outcome)
    }

    /// Comments referencing the article are left in place.
    pub async fn delete(&self, id: RecordId) -> Result<DeleteOutcome, ApiError> {
        let outcome = self.store.delete_article(id).await?;
        info!(article_id = %id, deleted = outcome.deleted_count, "Article deleted");
        Ok(outcome)
    }

    /// Flip `email`'s membership in the article's like set and report the
    /// resulting state.
    pub async fn toggle_like(&self, id: RecordId, email: &str) -> Result<LikeStatus, ApiError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ApiError::BadRequest(
                "Email is required in request body".into(),
            ));
        }

        let article = self
            .store
            .find_article(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Article not found".into()))?;

        let already_liked = article.is_liked_by(email);
        let outcome = if already_liked {
            self.store.remove_like(id, email).await?
        } else {
            self.store.add_like(id, email).await?
        };

        if outcome.modified_count == 0 {
            warn!(
                article_id = %id,
                matched = outcome.matched_count,
                "Like toggle modified no document"
            );
            return Err(ApiError::Internal("Failed to update like status".into()));
        }

        let status = LikeStatus {
            liked: !already_liked,
        };
        info!(article_id = %id, liked = status.liked, "Like toggled");
        Ok(status)
    }

    /// Articles with the most likes first, never more than `limit`.
    pub async fn top_liked(&self, limit: u32) -> Result<Vec<RankedArticle>, ApiError> {
        let mut ranked = self.store.top_liked(limit).await?;
        ranked.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(ranked)
    }
}

fn validate(article: NewArticle) -> Result<NewArticle, ApiError> {
    if article.author_email.trim().is_empty() {
        return Err(ApiError::BadRequest("author_email is required".into()));
    }
    if article.category.trim().is_empty() {
        return Err(ApiError::BadRequest("category is required".into()));
    }
    Ok(article.sanitized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryStore, article_fixture};
    use chrono::TimeZone;
    use serde_json::Map;
    use tracing_test::traced_test;

    fn service_with(store: &Arc<InMemoryStore>) -> ArticleService {
        ArticleService::new(store.clone())
    }

    fn new_article(author: &str, category: &str) -> NewArticle {
        NewArticle {
            author_email: author.into(),
            category: category.into(),
            date: None,
            fields: Map::new(),
        }
    }

    #[tokio::test]
    async fn test_toggle_like_round_trip() {
        let store = Arc::new(InMemoryStore::new());
        let id = store.seed_article(article_fixture("a@x.com", "tech", 1, &[]));
        let service = service_with(&store);

        let first = service.toggle_like(id, "u@x.com").await.unwrap();
        assert!(first.liked);
        assert!(store.article(id).unwrap().is_liked_by("u@x.com"));

        let second = service.toggle_like(id, "u@x.com").await.unwrap();
        assert!(!second.liked);
        assert!(store.article(id).unwrap().liked_by.is_empty());
    }

    #[traced_test]
    #[tokio::test]
    async fn test_toggle_like_is_logged() {
        let store = Arc::new(InMemoryStore::new());
        let id = store.seed_article(article_fixture("a@x.com", "tech", 1, &[]));
        let service = service_with(&store);

        service.toggle_like(id, "u@x.com").await.unwrap();

        assert!(logs_contain("Like toggled"));
        assert!(logs_contain(&id.to_string()));
    }

    #[tokio::test]
    async fn test_toggle_like_other_users_are_untouched() {
        let store = Arc::new(InMemoryStore::new());
        let id = store.seed_article(article_fixture("a@x.com", "tech", 1, &["v@x.com"]));
        let service = service_with(&store);

        service.toggle_like(id, "u@x.com").await.unwrap();
        service.toggle_like(id, "u@x.com").await.unwrap();

        let article = store.article(id).unwrap();
        assert_eq!(article.like_count(), 1);
        assert!(article.is_liked_by("v@x.com"));
    }

    #[tokio::test]
    async fn test_toggle_like_missing_article_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let service = service_with(&store);

        let err = service
            .toggle_like(RecordId::generate(), "u@x.com")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_toggle_like_requires_email() {
        let store = Arc::new(InMemoryStore::new());
        let id = store.seed_article(article_fixture("a@x.com", "tech", 1, &[]));
        let service = service_with(&store);

        let err = service.toggle_like(id, "  ").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert!(store.article(id).unwrap().liked_by.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_like_unmodified_write_is_internal_error() {
        let store = Arc::new(InMemoryStore::new());
        let id = store.seed_article(article_fixture("a@x.com", "tech", 1, &[]));
        store.set_stale_writes(true);
        let service = service_with(&store);

        let err = service.toggle_like(id, "u@x.com").await.unwrap_err();
        match err {
            ApiError::Internal(message) => assert_eq!(message, "Failed to update like status"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_defaults_date_and_rejects_blank_author() {
        let store = Arc::new(InMemoryStore::new());
        let service = service_with(&store);

        let outcome = service.create(new_article("a@x.com", "tech")).await.unwrap();
        let stored = store.article(outcome.inserted_id).unwrap();
        assert!(stored.date.is_some());
        assert!(stored.liked_by.is_empty());

        let err = service.create(new_article(" ", "tech")).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_likes() {
        let store = Arc::new(InMemoryStore::new());
        let id = store.seed_article(article_fixture("a@x.com", "tech", 1, &["u@x.com"]));
        let service = service_with(&store);

        let mut edit = new_article("a@x.com", "travel");
        edit.fields
            .insert("likedBy".into(), serde_json::json!([]));
        let outcome = service.update(id, edit).await.unwrap();

        assert_eq!(outcome.matched_count, 1);
        assert_eq!(outcome.modified_count, 1);
        let article = store.article(id).unwrap();
        assert_eq!(article.category, "travel");
        assert!(article.is_liked_by("u@x.com"));
    }

    #[tokio::test]
    async fn test_list_sorts_by_date() {
        let store = Arc::new(InMemoryStore::new());
        for day in [3, 1, 2] {
            store.seed_article(article_fixture("a@x.com", "tech", day, &[]));
        }
        let service = service_with(&store);

        let newest = service
            .list(&ArticleFilter::default(), SortOrder::Newest)
            .await
            .unwrap();
        let days: Vec<_> = newest.iter().map(|a| a.date.unwrap()).collect();
        assert_eq!(
            days,
            vec![
                Utc.with_ymd_and_hms(2025, 1, 3, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            ]
        );
    }

    #[tokio::test]
    async fn test_top_liked_orders_and_limits() {
        let store = Arc::new(InMemoryStore::new());
        store.seed_article(article_fixture("a@x.com", "tech", 1, &["1"]));
        store.seed_article(article_fixture("a@x.com", "tech", 2, &["1", "2", "3"]));
        store.seed_article(article_fixture("a@x.com", "tech", 3, &[]));
        store.seed_article(article_fixture("a@x.com", "tech", 4, &["1", "2"]));
        let service = service_with(&store);

        let ranked = service.top_liked(2).await.unwrap();

        let counts: Vec<_> = ranked.iter().map(|r| r.like_count).collect();
        assert_eq!(counts, vec![3, 2]);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let store = Arc::new(InMemoryStore::new());
        store.set_should_fail(true);
        let service = service_with(&store);

        let err = service.top_liked(6).await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
