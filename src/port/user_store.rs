use async_trait::async_trait;

use crate::domain::{InsertOutcome, NewUser, User};
use crate::error::StoreError;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: NewUser) -> Result<InsertOutcome, StoreError>;

    /// All users, or only those with the given email.
    async fn list_users(&self, email: Option<&str>) -> Result<Vec<User>, StoreError>;
}
