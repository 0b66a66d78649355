pub mod article_store;
pub mod comment_store;
pub mod user_store;

pub use article_store::ArticleStore;
pub use comment_store::CommentStore;
pub use user_store::UserStore;
