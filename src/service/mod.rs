use axum::http::HeaderMap;

use std::sync::Arc;

use crate::{
    auth::{AuthVerifier, extract_bearer_token},
    dto::ValidatedNote,
    error::ApiError,
    models::{NewNote, Note, UserIdentity},
    repository::{NoteFilter, NoteStore},
};

/// A verified caller and the token it presented.
#[derive(Debug, Clone)]
pub struct Caller {
    pub identity: UserIdentity,
    pub access_token: String,
}

#[derive(Clone)]
pub struct NoteService {
    auth: Arc<dyn AuthVerifier>,
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(auth: Arc<dyn AuthVerifier>, store: Arc<dyn NoteStore>) -> Self {
        Self { auth, store }
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Caller, ApiError> {
        let token = extract_bearer_token(headers)?;

        match self.auth.verify(token).await {
            Ok(identity) => Ok(Caller {
                identity,
                access_token: token.to_string(),
            }),
            Err(e) => {
                tracing::warn!("token verification failed: {e}");
                Err(ApiError::InvalidToken)
            }
        }
    }

    pub async fn list_notes(
        &self,
        caller: &Caller,
        tag: Option<String>,
    ) -> Result<Vec<Note>, ApiError> {
        let filter = NoteFilter {
            user_id: caller.identity.id.clone(),
            tag,
        };

        let mut notes = self.store.query(&caller.access_token, &filter).await?;

        let fetched = notes.len();
        notes.retain(|note| {
            note.user_id == filter.user_id
                && filter.tag.as_deref().is_none_or(|tag| note.has_tag(tag))
        });
        if notes.len() != fetched {
            tracing::warn!(
                "store returned {} rows outside the requested filter",
                fetched - notes.len()
            );
        }

        Ok(notes)
    }

    pub async fn create_note(&self, caller: &Caller, note: ValidatedNote) -> Result<Note, ApiError> {
        let new_note = NewNote {
            user_id: caller.identity.id.clone(),
            title: note.title,
            content: note.content,
            tags: note.tags,
        };

        Ok(self.store.insert(&caller.access_token, &new_note).await?)
    }
}
