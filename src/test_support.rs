//! Shared test support utilities
//!
//! Provides `InMemoryStore`, implementing every store port over plain vectors
//! with the same write semantics as the MongoDB adapter, for use in unit and
//! integration tests.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::Map;

use crate::auth::SessionIssuer;
use crate::domain::{
    Article, ArticleFilter, Comment, DeleteOutcome, InsertOutcome, NewArticle, NewComment,
    NewUser, RankedArticle, RecordId, SortOrder, UpdateOutcome, User,
};
use crate::error::StoreError;
use crate::port::{ArticleStore, CommentStore, UserStore};

pub const TEST_JWT_SECRET: &str = "test-secret";

/// Article dated 2025-01-`day` with the given likers.
pub fn article_fixture(author: &str, category: &str, day: u32, likers: &[&str]) -> Article {
    Article {
        id: RecordId::generate(),
        author_email: author.to_string(),
        category: category.to_string(),
        date: Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).single(),
        liked_by: likers.iter().map(|email| (*email).to_string()).collect(),
        fields: Map::new(),
    }
}

#[must_use]
pub fn test_sessions() -> Arc<SessionIssuer> {
    Arc::new(SessionIssuer::new(TEST_JWT_SECRET, false))
}

#[derive(Default)]
pub struct InMemoryStore {
    articles: Mutex<Vec<Article>>,
    users: Mutex<Vec<User>>,
    comments: Mutex<Vec<Comment>>,
    should_fail: AtomicBool,
    stale_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation fails with `StoreError::Unavailable`.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Like updates match but report zero modified documents.
    pub fn set_stale_writes(&self, stale: bool) {
        self.stale_writes.store(stale, Ordering::SeqCst);
    }

    pub fn seed_article(&self, article: Article) -> RecordId {
        let id = article.id;
        self.articles.lock().unwrap().push(article);
        id
    }

    pub fn article(&self, id: RecordId) -> Option<Article> {
        self.articles
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    pub fn articles(&self) -> Vec<Article> {
        self.articles.lock().unwrap().clone()
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.comments.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("Mock store failure".to_string()));
        }
        Ok(())
    }

    fn mutate_likes(
        &self,
        id: RecordId,
        apply: impl FnOnce(&mut BTreeSet<String>) -> bool,
    ) -> Result<UpdateOutcome, StoreError> {
        self.check()?;
        let mut articles = self.articles.lock().unwrap();
        let Some(article) = articles.iter_mut().find(|a| a.id == id) else {
            return Ok(UpdateOutcome::new(0, 0));
        };
        if self.stale_writes.load(Ordering::SeqCst) {
            return Ok(UpdateOutcome::new(1, 0));
        }
        let changed = apply(&mut article.liked_by);
        Ok(UpdateOutcome::new(1, u64::from(changed)))
    }
}

#[async_trait]
impl ArticleStore for InMemoryStore {
    async fn insert_article(&self, article: NewArticle) -> Result<InsertOutcome, StoreError> {
        self.check()?;
        let id = RecordId::generate();
        self.articles.lock().unwrap().push(Article {
            id,
            author_email: article.author_email,
            category: article.category,
            date: article.date,
            liked_by: BTreeSet::new(),
            fields: article.fields,
        });
        Ok(InsertOutcome::new(id))
    }

    async fn find_article(&self, id: RecordId) -> Result<Option<Article>, StoreError> {
        self.check()?;
        Ok(self.article(id))
    }

    async fn list_articles(
        &self,
        filter: &ArticleFilter,
        sort: SortOrder,
    ) -> Result<Vec<Article>, StoreError> {
        self.check()?;
        let mut found: Vec<Article> = self
            .articles
            .lock()
            .unwrap()
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        // Absent dates order before any date, as BSON null does.
        match sort {
            SortOrder::Newest => found.sort_by(|a, b| b.date.cmp(&a.date)),
            SortOrder::Oldest => found.sort_by(|a, b| a.date.cmp(&b.date)),
        }
        Ok(found)
    }

    async fn update_article(
        &self,
        id: RecordId,
        article: NewArticle,
    ) -> Result<UpdateOutcome, StoreError> {
        self.check()?;
        let mut articles = self.articles.lock().unwrap();
        let Some(existing) = articles.iter_mut().find(|a| a.id == id) else {
            return Ok(UpdateOutcome::new(0, 0));
        };
        let before = existing.clone();
        existing.author_email = article.author_email;
        existing.category = article.category;
        if article.date.is_some() {
            existing.date = article.date;
        }
        existing.fields.extend(article.fields);
        let modified = u64::from(*existing != before);
        Ok(UpdateOutcome::new(1, modified))
    }

    async fn delete_article(&self, id: RecordId) -> Result<DeleteOutcome, StoreError> {
        self.check()?;
        let mut articles = self.articles.lock().unwrap();
        let before = articles.len();
        articles.retain(|a| a.id != id);
        Ok(DeleteOutcome::new((before - articles.len()) as u64))
    }

    async fn add_like(&self, id: RecordId, email: &str) -> Result<UpdateOutcome, StoreError> {
        self.mutate_likes(id, |liked_by| liked_by.insert(email.to_string()))
    }

    async fn remove_like(&self, id: RecordId, email: &str) -> Result<UpdateOutcome, StoreError> {
        self.mutate_likes(id, |liked_by| liked_by.remove(email))
    }

    async fn top_liked(&self, limit: u32) -> Result<Vec<RankedArticle>, StoreError> {
        self.check()?;
        let mut ranked: Vec<RankedArticle> = self
            .articles
            .lock()
            .unwrap()
            .iter()
            .map(|article| RankedArticle {
                like_count: article.like_count(),
                article: article.clone(),
            })
            .collect();
        ranked.sort_by(|a, b| b.like_count.cmp(&a.like_count));
        ranked.truncate(limit as usize);
        Ok(ranked)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<InsertOutcome, StoreError> {
        self.check()?;
        let id = RecordId::generate();
        self.users.lock().unwrap().push(User {
            id,
            email: user.email,
            fields: user.fields,
        });
        Ok(InsertOutcome::new(id))
    }

    async fn list_users(&self, email: Option<&str>) -> Result<Vec<User>, StoreError> {
        self.check()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| email.is_none_or(|email| u.email == email))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentStore for InMemoryStore {
    async fn insert_comment(&self, comment: NewComment) -> Result<InsertOutcome, StoreError> {
        self.check()?;
        let id = RecordId::generate();
        self.comments.lock().unwrap().push(Comment {
            id,
            article_id: comment.article_id,
            fields: comment.fields,
        });
        Ok(InsertOutcome::new(id))
    }

    async fn comments_for_article(&self, article_id: &str) -> Result<Vec<Comment>, StoreError> {
        self.check()?;
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect())
    }
}
