use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::{error::ApiError, models::Note};

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateNoteRequest {
    /// Optional note title
    #[serde(default)]
    pub title: Option<String>,
    /// Note content
    #[serde(default)]
    #[schema(value_type = String)]
    pub content: Option<Value>,
    /// Optional note tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// A create request that passed content validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedNote {
    pub title: Option<String>,
    pub content: String,
    pub tags: Vec<String>,
}

impl CreateNoteRequest {
    pub fn validate(self) -> Result<ValidatedNote, ApiError> {
        let content = match self.content {
            Some(value) if is_truthy(&value) => value,
            _ => return Err(ApiError::InvalidInput("Content is required".to_string())),
        };
        let Value::String(content) = content else {
            return Err(ApiError::InvalidInput(
                "Content must be a string".to_string(),
            ));
        };

        Ok(ValidatedNote {
            title: self.title.filter(|title| !title.is_empty()),
            content,
            tags: self.tags.unwrap_or_default(),
        })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListNotesQuery {
    /// Only return notes carrying this exact tag
    pub tag: Option<String>,
}

impl ListNotesQuery {
    /// First occurrence of each parameter wins; an empty `tag` means no filter.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let tag = pairs
            .into_iter()
            .find(|(key, _)| key == "tag")
            .map(|(_, value)| value)
            .filter(|value| !value.is_empty());

        Self { tag }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotesResponse {
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}
