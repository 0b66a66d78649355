pub mod article_store;
pub mod client;
pub mod comment_store;
pub mod document;
pub mod user_store;

pub use article_store::MongoArticleStore;
pub use client::MongoConnection;
pub use comment_store::MongoCommentStore;
pub use user_store::MongoUserStore;

pub const USERS_COLLECTION: &str = "users";
pub const ARTICLES_COLLECTION: &str = "articles";
pub const COMMENTS_COLLECTION: &str = "comments";
