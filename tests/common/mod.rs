//! Stub auth provider and in-memory store shared by the integration tests.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use chrono::{DateTime, Duration, Utc};
use notes_api::{
    AppState,
    auth::{AuthError, AuthVerifier},
    models::{NewNote, Note, NoteId, UserIdentity},
    repository::{NoteFilter, NoteStore, StoreError},
    router,
    service::NoteService,
};
use serde_json::Map;

pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";
pub const ALICE: &str = "11111111-1111-1111-1111-111111111111";
pub const BOB: &str = "22222222-2222-2222-2222-222222222222";

/// Accepts a fixed set of tokens.
pub struct StubAuth {
    users: HashMap<String, String>,
}

impl StubAuth {
    pub fn new() -> Self {
        let users = [(ALICE_TOKEN, ALICE), (BOB_TOKEN, BOB)]
            .into_iter()
            .map(|(token, id)| (token.to_string(), id.to_string()))
            .collect();
        Self { users }
    }
}

#[async_trait]
impl AuthVerifier for StubAuth {
    async fn verify(&self, token: &str) -> Result<UserIdentity, AuthError> {
        self.users
            .get(token)
            .map(|id| UserIdentity {
                id: id.clone(),
                email: None,
                role: Some("authenticated".to_string()),
            })
            .ok_or(AuthError::Rejected(401))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    notes: Mutex<Vec<Note>>,
    failure: Option<String>,
    unfiltered: bool,
    pub inserted: Mutex<Vec<NewNote>>,
    pub queried: Mutex<Vec<NoteFilter>>,
}

impl MemoryStore {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// A store that returns every row regardless of owner or tag.
    pub fn ignoring_filters() -> Self {
        Self {
            unfiltered: true,
            ..Self::default()
        }
    }

    /// Seeds a note; later seeds are newer.
    pub fn seed(&self, user_id: &str, title: Option<&str>, content: &str, tags: &[&str]) -> Note {
        let mut notes = self.notes.lock().unwrap();
        let note = Note {
            id: NoteId::Int(notes.len() as i64 + 1),
            user_id: user_id.to_string(),
            title: title.map(str::to_string),
            content: content.to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            created_at: (base_time() + Duration::minutes(notes.len() as i64)).to_rfc3339(),
            extra: Map::new(),
        };
        notes.push(note.clone());
        note
    }

    fn fail(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(message) => Err(StoreError::Backend {
                message: message.clone(),
                code: Some("XX000".to_string()),
            }),
            None => Ok(()),
        }
    }
}

fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn query(
        &self,
        _access_token: &str,
        filter: &NoteFilter,
    ) -> Result<Vec<Note>, StoreError> {
        self.queried.lock().unwrap().push(filter.clone());
        self.fail()?;

        let mut notes: Vec<Note> = self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| self.unfiltered || n.user_id == filter.user_id)
            .filter(|n| self.unfiltered || filter.tag.as_deref().is_none_or(|tag| n.has_tag(tag)))
            .cloned()
            .collect();
        notes.sort_by_key(|n| std::cmp::Reverse(n.created_at_utc()));
        Ok(notes)
    }

    async fn insert(&self, _access_token: &str, note: &NewNote) -> Result<Note, StoreError> {
        self.inserted.lock().unwrap().push(note.clone());
        self.fail()?;

        Ok(self.seed(
            &note.user_id,
            note.title.as_deref(),
            &note.content,
            &note.tags.iter().map(String::as_str).collect::<Vec<_>>(),
        ))
    }
}

pub fn app(store: Arc<MemoryStore>, enforce_list_method: bool) -> Router {
    let service = NoteService::new(Arc::new(StubAuth::new()), store);
    router(Arc::new(AppState::new(service, enforce_list_method)))
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}
