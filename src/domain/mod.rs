pub mod article;
pub mod comment;
pub mod id;
pub mod outcome;
pub mod user;

pub use article::{
    Article, ArticleFilter, LikeStatus, NewArticle, RankedArticle, SortOrder,
    DEFAULT_TOP_LIKED_LIMIT,
};
pub use comment::{Comment, NewComment};
pub use id::{InvalidRecordId, RecordId};
pub use outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
pub use user::{NewUser, User};

use serde_json::{Map, Value};

/// Drop keys a client may not write through an opaque payload.
pub(crate) fn strip_reserved(fields: &mut Map<String, Value>, reserved: &[&str]) {
    for key in reserved {
        fields.remove(*key);
    }
}
