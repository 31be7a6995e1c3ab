//! HTTP client for the managed backend: GoTrue-style auth under `/auth/v1`
//! and PostgREST-style tables under `/rest/v1`.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode, header::ACCEPT};
use serde::Deserialize;

use crate::{
    auth::{AuthError, AuthVerifier},
    config,
    models::{NewNote, Note, UserIdentity},
    repository::{NoteFilter, NoteStore, StoreError},
};

const API_KEY_HEADER: &str = "apikey";
const PREFER_HEADER: &str = "Prefer";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

pub struct BackendClient {
    base_url: String,
    anon_key: String,
    notes_table: String,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(backend: &config::Backend) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(backend.request_timeout)
            .build()?;

        Ok(Self {
            base_url: backend.url.trim_end_matches('/').to_string(),
            anon_key: backend.anon_key.clone(),
            notes_table: backend.notes_table.clone(),
            client,
        })
    }

    fn auth_url(&self) -> String {
        format!("{}/auth/v1/user", self.base_url)
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.notes_table)
    }

    fn authorized(&self, request: RequestBuilder, access_token: &str) -> RequestBuilder {
        request
            .header(API_KEY_HEADER, &self.anon_key)
            .bearer_auth(access_token)
    }
}

/// PostgREST array literal for a `cs` (contains) filter on a single tag.
pub fn tag_contains_filter(tag: &str) -> String {
    let escaped = tag.replace('\\', "\\\\").replace('"', "\\\"");
    format!("cs.{{\"{escaped}\"}}")
}

/// Query parameters selecting a user's notes, newest first.
pub fn query_params(filter: &NoteFilter) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("select", "*".to_string()),
        ("user_id", format!("eq.{}", filter.user_id)),
        ("order", "created_at.desc".to_string()),
    ];
    if let Some(tag) = filter.tag.as_deref().filter(|tag| !tag.is_empty()) {
        params.push(("tags", tag_contains_filter(tag)));
    }
    params
}

async fn store_error(response: Response) -> StoreError {
    let status = response.status();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return StoreError::Transport(e.to_string()),
    };

    match serde_json::from_str::<PostgrestError>(&body) {
        Ok(err) => StoreError::Backend {
            message: err.message,
            code: err.code,
        },
        Err(_) if body.trim().is_empty() => StoreError::Backend {
            message: status.to_string(),
            code: None,
        },
        Err(_) => StoreError::Backend {
            message: body,
            code: None,
        },
    }
}

fn transport_error(e: &reqwest::Error) -> StoreError {
    if e.is_decode() {
        StoreError::Decode(e.to_string())
    } else {
        StoreError::Transport(e.to_string())
    }
}

#[async_trait]
impl AuthVerifier for BackendClient {
    async fn verify(&self, token: &str) -> Result<UserIdentity, AuthError> {
        let response = self
            .authorized(self.client.get(self.auth_url()), token)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .json::<UserIdentity>()
                .await
                .map_err(|e| AuthError::Decode(e.to_string())),
            status => Err(AuthError::Rejected(status.as_u16())),
        }
    }
}

#[async_trait]
impl NoteStore for BackendClient {
    async fn query(
        &self,
        access_token: &str,
        filter: &NoteFilter,
    ) -> Result<Vec<Note>, StoreError> {
        let url = self.table_url();
        tracing::debug!("Querying notes at {}", url);

        let response = self
            .authorized(self.client.get(&url), access_token)
            .query(&query_params(filter))
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if !response.status().is_success() {
            return Err(store_error(response).await);
        }

        response
            .json::<Vec<Note>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn insert(&self, access_token: &str, note: &NewNote) -> Result<Note, StoreError> {
        let url = self.table_url();
        tracing::debug!("Inserting note at {}", url);

        let response = self
            .authorized(self.client.post(&url), access_token)
            .query(&[("select", "*")])
            .header(PREFER_HEADER, "return=representation")
            .header(ACCEPT, SINGLE_OBJECT)
            .json(note)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        match response.status() {
            StatusCode::CREATED | StatusCode::OK => response
                .json::<Note>()
                .await
                .map_err(|e| StoreError::Decode(e.to_string())),
            _ => Err(store_error(response).await),
        }
    }
}
