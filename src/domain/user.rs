use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RecordId;

pub const EMAIL_FIELD: &str = "email";

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub email: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct NewUser {
    pub email: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NewUser {
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        super::strip_reserved(&mut self.fields, &["_id"]);
        self
    }
}
