use async_trait::async_trait;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::Collection;

use super::document::{insert_outcome, new_user_document, user_from_document};
use crate::domain::{InsertOutcome, NewUser, User};
use crate::error::StoreError;
use crate::port::UserStore;

pub struct MongoUserStore {
    collection: Collection<Document>,
}

impl MongoUserStore {
    #[must_use]
    pub fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert_user(&self, user: NewUser) -> Result<InsertOutcome, StoreError> {
        let document = new_user_document(user)?;
        let result = self.collection.insert_one(document).await?;
        insert_outcome(result)
    }

    async fn list_users(&self, email: Option<&str>) -> Result<Vec<User>, StoreError> {
        let filter = match email {
            Some(email) => doc! { "email": email },
            None => Document::new(),
        };
        let cursor = self.collection.find(filter).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;

        documents.into_iter().map(user_from_document).collect()
    }
}
