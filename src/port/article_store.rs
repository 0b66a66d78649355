use async_trait::async_trait;

use crate::domain::{
    Article, ArticleFilter, DeleteOutcome, InsertOutcome, NewArticle, RankedArticle, RecordId,
    SortOrder, UpdateOutcome,
};
use crate::error::StoreError;

/// Persistence for articles and their like sets.
///
/// Every method is a single store operation; callers compose them.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Insert a new article with an empty like set.
    async fn insert_article(&self, article: NewArticle) -> Result<InsertOutcome, StoreError>;

    async fn find_article(&self, id: RecordId) -> Result<Option<Article>, StoreError>;

    async fn list_articles(
        &self,
        filter: &ArticleFilter,
        sort: SortOrder,
    ) -> Result<Vec<Article>, StoreError>;

    /// Overwrite the supplied fields of an article. The like set is untouched.
    async fn update_article(
        &self,
        id: RecordId,
        article: NewArticle,
    ) -> Result<UpdateOutcome, StoreError>;

    async fn delete_article(&self, id: RecordId) -> Result<DeleteOutcome, StoreError>;

    /// Add `email` to the like set. Adding a present member modifies nothing.
    async fn add_like(&self, id: RecordId, email: &str) -> Result<UpdateOutcome, StoreError>;

    /// Remove `email` from the like set.
    async fn remove_like(&self, id: RecordId, email: &str) -> Result<UpdateOutcome, StoreError>;

    /// Articles ordered by descending like count, at most `limit` of them.
    async fn top_liked(&self, limit: u32) -> Result<Vec<RankedArticle>, StoreError>;
}
