use async_trait::async_trait;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::Collection;

use super::document::{comment_from_document, insert_outcome, new_comment_document};
use crate::domain::{Comment, InsertOutcome, NewComment};
use crate::error::StoreError;
use crate::port::CommentStore;

pub struct MongoCommentStore {
    collection: Collection<Document>,
}

impl MongoCommentStore {
    #[must_use]
    pub fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl CommentStore for MongoCommentStore {
    async fn insert_comment(&self, comment: NewComment) -> Result<InsertOutcome, StoreError> {
        let document = new_comment_document(comment)?;
        let result = self.collection.insert_one(document).await?;
        insert_outcome(result)
    }

    async fn comments_for_article(&self, article_id: &str) -> Result<Vec<Comment>, StoreError> {
        let cursor = self
            .collection
            .find(doc! { "article_id": article_id })
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        documents.into_iter().map(comment_from_document).collect()
    }
}
