use async_trait::async_trait;

use crate::domain::{Comment, InsertOutcome, NewComment};
use crate::error::StoreError;

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert_comment(&self, comment: NewComment) -> Result<InsertOutcome, StoreError>;

    async fn comments_for_article(&self, article_id: &str) -> Result<Vec<Comment>, StoreError>;
}
