//! Conversions between BSON documents and domain records.
//!
//! Stored records are schemaless, so reads are lenient: known fields are
//! pulled out with defaults and everything else is carried through as
//! relaxed extended JSON.

use std::collections::BTreeSet;

use bson::{Bson, Document, doc};
use chrono::{DateTime, Utc};
use mongodb::results::{InsertOneResult, UpdateResult};
use serde_json::{Map, Value};

use crate::domain::article::{
    AUTHOR_EMAIL_FIELD, CATEGORY_FIELD, DATE_FIELD, ID_FIELD, LIKE_COUNT_FIELD, LIKED_BY_FIELD,
    parse_date,
};
use crate::domain::comment::ARTICLE_ID_FIELD;
use crate::domain::user::EMAIL_FIELD;
use crate::domain::{
    Article, ArticleFilter, Comment, InsertOutcome, NewArticle, NewComment, NewUser,
    RankedArticle, RecordId, UpdateOutcome, User,
};
use crate::error::StoreError;

pub fn article_from_document(mut doc: Document) -> Result<Article, StoreError> {
    let id = take_id(&mut doc)?;
    let author_email = take_string(&mut doc, AUTHOR_EMAIL_FIELD);
    let category = take_string(&mut doc, CATEGORY_FIELD);
    let date = take_date(&mut doc);
    let liked_by = take_liked_by(&mut doc);

    Ok(Article {
        id,
        author_email,
        category,
        date,
        liked_by,
        fields: into_fields(doc),
    })
}

/// Leaderboard rows carry the computed `likeCount` next to the article.
pub fn ranked_from_document(mut doc: Document) -> Result<RankedArticle, StoreError> {
    let computed = match doc.remove(LIKE_COUNT_FIELD) {
        Some(Bson::Int32(n)) => u64::try_from(n).ok(),
        Some(Bson::Int64(n)) => u64::try_from(n).ok(),
        _ => None,
    };
    let article = article_from_document(doc)?;
    let like_count = computed.unwrap_or_else(|| article.like_count());

    Ok(RankedArticle {
        article,
        like_count,
    })
}

pub fn user_from_document(mut doc: Document) -> Result<User, StoreError> {
    let id = take_id(&mut doc)?;
    let email = take_string(&mut doc, EMAIL_FIELD);

    Ok(User {
        id,
        email,
        fields: into_fields(doc),
    })
}

pub fn comment_from_document(mut doc: Document) -> Result<Comment, StoreError> {
    let id = take_id(&mut doc)?;
    let article_id = take_string(&mut doc, ARTICLE_ID_FIELD);

    Ok(Comment {
        id,
        article_id,
        fields: into_fields(doc),
    })
}

/// New articles always carry an empty `likedBy` array.
pub fn new_article_document(article: NewArticle) -> Result<Document, StoreError> {
    let mut doc = article_fields_document(article)?;
    doc.insert(LIKED_BY_FIELD, Bson::Array(Vec::new()));
    Ok(doc)
}

/// Body of the `$set` applied on edit.
pub fn article_fields_document(article: NewArticle) -> Result<Document, StoreError> {
    let mut doc = fields_to_document(article.fields)?;
    doc.insert(AUTHOR_EMAIL_FIELD, article.author_email);
    doc.insert(CATEGORY_FIELD, article.category);
    if let Some(date) = article.date {
        doc.insert(DATE_FIELD, bson::DateTime::from_chrono(date));
    }
    Ok(doc)
}

pub fn new_user_document(user: NewUser) -> Result<Document, StoreError> {
    let mut doc = fields_to_document(user.fields)?;
    doc.insert(EMAIL_FIELD, user.email);
    Ok(doc)
}

pub fn new_comment_document(comment: NewComment) -> Result<Document, StoreError> {
    let mut doc = fields_to_document(comment.fields)?;
    doc.insert(ARTICLE_ID_FIELD, comment.article_id);
    Ok(doc)
}

pub fn article_filter_document(filter: &ArticleFilter) -> Document {
    let mut doc = Document::new();
    if let Some(email) = &filter.author_email {
        doc.insert(AUTHOR_EMAIL_FIELD, email.as_str());
    }
    if let Some(category) = &filter.category {
        doc.insert(CATEGORY_FIELD, category.as_str());
    }
    doc
}

pub fn id_filter(id: RecordId) -> Document {
    doc! { "_id": id.object_id() }
}

pub fn insert_outcome(result: InsertOneResult) -> Result<InsertOutcome, StoreError> {
    result
        .inserted_id
        .as_object_id()
        .map(|oid| InsertOutcome::new(oid.into()))
        .ok_or_else(|| {
            StoreError::Malformed(format!(
                "inserted id is not an ObjectId: {}",
                result.inserted_id
            ))
        })
}

pub fn update_outcome(result: UpdateResult) -> UpdateOutcome {
    UpdateOutcome {
        acknowledged: true,
        matched_count: result.matched_count,
        modified_count: result.modified_count,
        upserted_id: result
            .upserted_id
            .and_then(|id| id.as_object_id())
            .map(RecordId::from),
    }
}

fn take_id(doc: &mut Document) -> Result<RecordId, StoreError> {
    match doc.remove(ID_FIELD) {
        Some(Bson::ObjectId(oid)) => Ok(oid.into()),
        Some(other) => Err(StoreError::Malformed(format!(
            "expected ObjectId in _id, found {other}"
        ))),
        None => Err(StoreError::Malformed("document has no _id".into())),
    }
}

fn take_string(doc: &mut Document, key: &str) -> String {
    match doc.remove(key) {
        Some(Bson::String(value)) => value,
        Some(Bson::Null) | None => String::new(),
        Some(other) => other.into_relaxed_extjson().to_string(),
    }
}

/// Dates written by this service are BSON datetimes; older records may hold
/// an RFC 3339 or `YYYY-MM-DD` string. Anything else stays in the document
/// and is returned untouched with the other fields.
fn take_date(doc: &mut Document) -> Option<DateTime<Utc>> {
    match doc.remove(DATE_FIELD)? {
        Bson::DateTime(date) => Some(date.to_chrono()),
        Bson::String(raw) => parse_date(&raw).or_else(|| {
            doc.insert(DATE_FIELD, raw);
            None
        }),
        Bson::Null => None,
        other => {
            doc.insert(DATE_FIELD, other);
            None
        }
    }
}

/// Missing or non-array `likedBy` reads as nobody.
fn take_liked_by(doc: &mut Document) -> BTreeSet<String> {
    match doc.remove(LIKED_BY_FIELD) {
        Some(Bson::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Bson::String(email) => Some(email),
                _ => None,
            })
            .collect(),
        _ => BTreeSet::new(),
    }
}

fn into_fields(doc: Document) -> Map<String, Value> {
    doc.into_iter()
        .map(|(key, value)| (key, value.into_relaxed_extjson()))
        .collect()
}

fn fields_to_document(fields: Map<String, Value>) -> Result<Document, StoreError> {
    let mut doc = Document::new();
    for (key, value) in fields {
        let value = bson::to_bson(&value)
            .map_err(|e| StoreError::Malformed(format!("field {key}: {e}")))?;
        doc.insert(key, value);
    }
    Ok(doc)
}
