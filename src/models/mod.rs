use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Store-assigned note identifier, either numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum NoteId {
    Int(i64),
    Text(String),
}

/// A note row as the store returns it. Columns beyond the known ones are
/// kept in `extra` and `created_at` keeps the store's own formatting, so the
/// row goes back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Note {
    /// Note ID
    pub id: NoteId,
    /// Owning user
    pub user_id: String,
    /// Optional note title
    pub title: Option<String>,
    /// Note content
    pub content: String,
    /// Note tags
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Any other columns of the row
    #[serde(flatten)]
    #[schema(ignore)]
    pub extra: Map<String, Value>,
}

impl Note {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// `created_at` as a UTC instant, if the store sent RFC 3339.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

/// Row sent to the store on creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNote {
    pub user_id: String,
    pub title: Option<String>,
    pub content: String,
    pub tags: Vec<String>,
}

/// Caller identity resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
