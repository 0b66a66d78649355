use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RecordId;

pub const ARTICLE_ID_FIELD: &str = "article_id";

/// Comment on an article. `article_id` is a plain string reference; nothing
/// removes comments when their article is deleted.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub article_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct NewComment {
    pub article_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NewComment {
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        super::strip_reserved(&mut self.fields, &["_id"]);
        self
    }
}
