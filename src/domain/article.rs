use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RecordId;

/// Number of articles returned by the leaderboard query.
pub const DEFAULT_TOP_LIKED_LIMIT: u32 = 6;

pub const ID_FIELD: &str = "_id";
pub const AUTHOR_EMAIL_FIELD: &str = "author_email";
pub const CATEGORY_FIELD: &str = "category";
pub const DATE_FIELD: &str = "date";
pub const LIKED_BY_FIELD: &str = "likedBy";
pub const LIKE_COUNT_FIELD: &str = "likeCount";

const RESERVED_FIELDS: [&str; 3] = [ID_FIELD, LIKED_BY_FIELD, LIKE_COUNT_FIELD];

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub author_email: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Emails of the users who like this article
    #[serde(rename = "likedBy")]
    pub liked_by: BTreeSet<String>,
    /// Remaining submitted fields (title, body, thumbnail, ...)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Article {
    /// Like count is derived from the set, never stored.
    #[must_use]
    pub fn like_count(&self) -> u64 {
        self.liked_by.len() as u64
    }

    #[must_use]
    pub fn is_liked_by(&self, email: &str) -> bool {
        self.liked_by.contains(email)
    }
}

/// Parse an article date: RFC 3339, or a bare `YYYY-MM-DD` read as midnight UTC.
#[must_use]
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Article payload accepted on create and edit. A `date` that does not parse
/// is kept verbatim in `fields`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(from = "ArticlePayload")]
pub struct NewArticle {
    pub author_email: String,
    pub category: String,
    pub date: Option<DateTime<Utc>>,
    pub fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct ArticlePayload {
    author_email: String,
    category: String,
    #[serde(default)]
    date: Option<Value>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl From<ArticlePayload> for NewArticle {
    fn from(payload: ArticlePayload) -> Self {
        let mut fields = payload.fields;
        let date = match payload.date {
            Some(Value::String(raw)) => parse_date(&raw).or_else(|| {
                fields.insert(DATE_FIELD.to_string(), Value::String(raw));
                None
            }),
            Some(Value::Null) | None => None,
            Some(other) => {
                fields.insert(DATE_FIELD.to_string(), other);
                None
            }
        };

        Self {
            author_email: payload.author_email,
            category: payload.category,
            date,
            fields,
        }
    }
}

impl NewArticle {
    /// True when the payload carried any `date`, parsed or not.
    #[must_use]
    pub fn has_date(&self) -> bool {
        self.date.is_some() || self.fields.contains_key(DATE_FIELD)
    }

    /// Removes keys owned by the store or the like toggle.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        super::strip_reserved(&mut self.fields, &RESERVED_FIELDS);
        self
    }
}

/// Article plus its derived like count, as returned by the leaderboard.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RankedArticle {
    #[serde(flatten)]
    pub article: Article,
    #[serde(rename = "likeCount")]
    pub like_count: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub author_email: Option<String>,
    pub category: Option<String>,
}

impl ArticleFilter {
    #[must_use]
    pub fn by_author(email: impl Into<String>) -> Self {
        Self {
            author_email: Some(email.into()),
            category: None,
        }
    }

    #[must_use]
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            author_email: None,
            category: Some(category.into()),
        }
    }

    #[must_use]
    pub fn matches(&self, article: &Article) -> bool {
        self.author_email
            .as_deref()
            .is_none_or(|email| article.author_email == email)
            && self
                .category
                .as_deref()
                .is_none_or(|category| article.category == category)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    /// Only the exact value `oldest` flips the order; anything else means
    /// newest first.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw {
            Some("oldest") => SortOrder::Oldest,
            _ => SortOrder::Newest,
        }
    }

    /// Direction for the `date` sort key.
    #[must_use]
    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Newest => -1,
            SortOrder::Oldest => 1,
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LikeStatus {
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_order_from_query() {
        assert_eq!(SortOrder::from_query(None), SortOrder::Newest);
        assert_eq!(SortOrder::from_query(Some("newest")), SortOrder::Newest);
        assert_eq!(SortOrder::from_query(Some("oldest")), SortOrder::Oldest);
        assert_eq!(SortOrder::from_query(Some("sideways")), SortOrder::Newest);
        assert_eq!(SortOrder::from_query(Some("OLDEST")), SortOrder::Newest);
        assert_eq!(SortOrder::from_query(Some("Oldest")), SortOrder::Newest);
    }

    #[test]
    fn test_parse_date_accepts_calendar_dates() {
        use chrono::TimeZone;

        assert_eq!(
            parse_date("2025-06-20"),
            Utc.with_ymd_and_hms(2025, 6, 20, 0, 0, 0).single()
        );
        assert_eq!(
            parse_date("2025-06-20T08:30:00+02:00"),
            Utc.with_ymd_and_hms(2025, 6, 20, 6, 30, 0).single()
        );
        assert_eq!(parse_date("June 20th"), None);
        assert_eq!(parse_date("2025-13-40"), None);
    }

    #[test]
    fn test_new_article_date_payloads() {
        let calendar: NewArticle = serde_json::from_value(json!({
            "author_email": "a@x.com",
            "category": "tech",
            "date": "2025-06-20"
        }))
        .unwrap();
        assert_eq!(calendar.date, parse_date("2025-06-20T00:00:00Z"));
        assert!(!calendar.fields.contains_key("date"));

        let free_form: NewArticle = serde_json::from_value(json!({
            "author_email": "a@x.com",
            "category": "tech",
            "date": "last tuesday"
        }))
        .unwrap();
        assert_eq!(free_form.date, None);
        assert_eq!(free_form.fields.get("date"), Some(&json!("last tuesday")));
        assert!(free_form.has_date());

        let absent: NewArticle = serde_json::from_value(json!({
            "author_email": "a@x.com",
            "category": "tech"
        }))
        .unwrap();
        assert!(!absent.has_date());
    }

    #[test]
    fn test_new_article_collects_extra_fields_and_strips_reserved() {
        let payload = json!({
            "author_email": "a@x.com",
            "category": "tech",
            "title": "Hello",
            "_id": "forged",
            "likedBy": ["mallory@x.com"],
            "likeCount": 99
        });
        let article: NewArticle = serde_json::from_value(payload).unwrap();
        let article = article.sanitized();

        assert_eq!(article.author_email, "a@x.com");
        assert_eq!(article.fields.get("title"), Some(&json!("Hello")));
        assert!(!article.fields.contains_key("_id"));
        assert!(!article.fields.contains_key("likedBy"));
        assert!(!article.fields.contains_key("likeCount"));
    }

    #[test]
    fn test_article_serializes_flat() {
        let mut fields = Map::new();
        fields.insert("title".into(), json!("Hello"));
        let article = Article {
            id: RecordId::generate(),
            author_email: "a@x.com".into(),
            category: "tech".into(),
            date: None,
            liked_by: BTreeSet::from(["u@x.com".to_string()]),
            fields,
        };

        let ranked = RankedArticle {
            like_count: article.like_count(),
            article,
        };
        let value = serde_json::to_value(&ranked).unwrap();

        assert_eq!(value["title"], json!("Hello"));
        assert_eq!(value["likedBy"], json!(["u@x.com"]));
        assert_eq!(value["likeCount"], json!(1));
        assert!(value.get("date").is_none());
    }

    #[test]
    fn test_filter_matches_composes() {
        let article = Article {
            id: RecordId::generate(),
            author_email: "a@x.com".into(),
            category: "tech".into(),
            date: None,
            liked_by: BTreeSet::new(),
            fields: Map::new(),
        };

        assert!(ArticleFilter::default().matches(&article));
        assert!(ArticleFilter::by_author("a@x.com").matches(&article));
        assert!(!ArticleFilter::by_category("travel").matches(&article));
        let both = ArticleFilter {
            author_email: Some("a@x.com".into()),
            category: Some("travel".into()),
        };
        assert!(!both.matches(&article));
    }
}
