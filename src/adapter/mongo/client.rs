use bson::{Document, doc};
use mongodb::{
    Client, Database,
    options::{ClientOptions, ServerApi, ServerApiVersion},
};
use tracing::info;

use super::{
    ARTICLES_COLLECTION, COMMENTS_COLLECTION, MongoArticleStore, MongoCommentStore,
    MongoUserStore, USERS_COLLECTION,
};
use crate::error::StoreError;

const APP_NAME: &str = "sharewave";

/// Process-wide MongoDB connection. Opened once at boot, shut down after the
/// HTTP server has drained.
pub struct MongoConnection {
    client: Client,
    database: Database,
}

impl MongoConnection {
    /// Connect with the stable server API and ping the deployment so a bad
    /// URI fails at startup instead of on the first request.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );

        let client = Client::with_options(options)?;
        let database = client.database(database);
        database.run_command(doc! { "ping": 1 }).await?;
        info!(database = database.name(), "Connected to MongoDB");

        Ok(Self { client, database })
    }

    #[must_use]
    pub fn articles(&self) -> MongoArticleStore {
        MongoArticleStore::new(self.database.collection::<Document>(ARTICLES_COLLECTION))
    }

    #[must_use]
    pub fn users(&self) -> MongoUserStore {
        MongoUserStore::new(self.database.collection::<Document>(USERS_COLLECTION))
    }

    #[must_use]
    pub fn comments(&self) -> MongoCommentStore {
        MongoCommentStore::new(self.database.collection::<Document>(COMMENTS_COLLECTION))
    }

    /// Close pooled connections and wait for in-flight operations to finish.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB client shut down");
    }
}
