use async_trait::async_trait;

use crate::models::{NewNote, Note};

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Error reported by the store itself; `message` is shown to the caller.
    #[error("{message}")]
    Backend {
        message: String,
        code: Option<String>,
    },

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Decode(String),
}

/// Selection applied when listing notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFilter {
    pub user_id: String,
    pub tag: Option<String>,
}

/// Note persistence, always acting on behalf of the caller whose
/// `access_token` is passed through.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Notes matching `filter`, newest first.
    async fn query(&self, access_token: &str, filter: &NoteFilter)
    -> Result<Vec<Note>, StoreError>;

    /// Inserts `note` and returns the stored row.
    async fn insert(&self, access_token: &str, note: &NewNote) -> Result<Note, StoreError>;
}
