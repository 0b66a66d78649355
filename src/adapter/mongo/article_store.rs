use async_trait::async_trait;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::Collection;
use tracing::debug;

use super::document::{
    article_fields_document, article_filter_document, article_from_document, id_filter,
    insert_outcome, new_article_document, ranked_from_document, update_outcome,
};
use crate::domain::{
    Article, ArticleFilter, DeleteOutcome, InsertOutcome, NewArticle, RankedArticle, RecordId,
    SortOrder, UpdateOutcome,
};
use crate::error::StoreError;
use crate::port::ArticleStore;

pub struct MongoArticleStore {
    collection: Collection<Document>,
}

impl MongoArticleStore {
    #[must_use]
    pub fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }
}

/// `$size` on a missing array is an aggregation error, so absent `likedBy`
/// is coalesced to `[]` first.
fn top_liked_pipeline(limit: u32) -> Vec<Document> {
    vec![
        doc! {
            "$addFields": {
                "likeCount": { "$size": { "$ifNull": ["$likedBy", []] } }
            }
        },
        doc! { "$sort": { "likeCount": -1 } },
        doc! { "$limit": i64::from(limit) },
    ]
}

#[async_trait]
impl ArticleStore for MongoArticleStore {
    async fn insert_article(&self, article: NewArticle) -> Result<InsertOutcome, StoreError> {
        let document = new_article_document(article)?;
        let result = self.collection.insert_one(document).await?;
        insert_outcome(result)
    }

    async fn find_article(&self, id: RecordId) -> Result<Option<Article>, StoreError> {
        self.collection
            .find_one(id_filter(id))
            .await?
            .map(article_from_document)
            .transpose()
    }

    async fn list_articles(
        &self,
        filter: &ArticleFilter,
        sort: SortOrder,
    ) -> Result<Vec<Article>, StoreError> {
        let cursor = self
            .collection
            .find(article_filter_document(filter))
            .sort(doc! { "date": sort.direction() })
            .await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        debug!(count = documents.len(), "Fetched articles");

        documents.into_iter().map(article_from_document).collect()
    }

    async fn update_article(
        &self,
        id: RecordId,
        article: NewArticle,
    ) -> Result<UpdateOutcome, StoreError> {
        let fields = article_fields_document(article)?;
        let result = self
            .collection
            .update_one(id_filter(id), doc! { "$set": fields })
            .await?;
        Ok(update_outcome(result))
    }

    async fn delete_article(&self, id: RecordId) -> Result<DeleteOutcome, StoreError> {
        let result = self.collection.delete_one(id_filter(id)).await?;
        Ok(DeleteOutcome::new(result.deleted_count))
    }

    async fn add_like(&self, id: RecordId, email: &str) -> Result<UpdateOutcome, StoreError> {
        let result = self
            .collection
            .update_one(id_filter(id), doc! { "$addToSet": { "likedBy": email } })
            .await?;
        Ok(update_outcome(result))
    }

    async fn remove_like(&self, id: RecordId, email: &str) -> Result<UpdateOutcome, StoreError> {
        let result = self
            .collection
            .update_one(id_filter(id), doc! { "$pull": { "likedBy": email } })
            .await?;
        Ok(update_outcome(result))
    }

    async fn top_liked(&self, limit: u32) -> Result<Vec<RankedArticle>, StoreError> {
        let cursor = self.collection.aggregate(top_liked_pipeline(limit)).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        documents.into_iter().map(ranked_from_document).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_liked_pipeline_shape() {
        let pipeline = top_liked_pipeline(6);

        assert_eq!(pipeline.len(), 3);
        assert!(pipeline[0].contains_key("$addFields"));
        assert_eq!(pipeline[1], doc! { "$sort": { "likeCount": -1 } });
        assert_eq!(pipeline[2], doc! { "$limit": 6_i64 });
    }
}
