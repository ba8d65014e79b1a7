use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A row of the `questions` table.
///
/// Timestamps decode from `TIMESTAMPTZ` columns only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Stamped by the application at insert time.
    pub created_at: DateTime<Utc>,
    /// Stamped by the application on every write.
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /questions` and `PUT /questions/:id`.
///
/// Fields are deliberately optional: an absent field is written as SQL `NULL`
/// and it is the schema's `NOT NULL` constraint that rejects it. An update
/// always writes all three columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Optional equality filters for listing questions, applied conjunctively.
///
/// `None` matches any row. Empty strings in the query string deserialize to
/// `None`, so `?title=` behaves exactly like omitting `title`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuestionFilter {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<String>,
}

impl QuestionFilter {
    pub fn new(title: Option<String>, category: Option<String>) -> Self {
        Self {
            title: title.filter(|t| !t.is_empty()),
            category: category.filter(|c| !c.is_empty()),
        }
    }

    /// True when neither filter is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.category.is_none()
    }

    /// Evaluates the filter against a row the same way the SQL predicate does.
    pub fn matches(&self, question: &Question) -> bool {
        let title_ok = self.title.as_deref().is_none_or(|t| question.title == t);
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|c| question.category == c);
        title_ok && category_ok
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}
