use axum::{
    Json,
    body::Bytes,
    extract::{
        Query, State,
        rejection::{BytesRejection, QueryRejection},
    },
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    AppState,
    dto::{CreateNoteRequest, ErrorResponse, ListNotesQuery, NotesResponse},
    error::ApiError,
    models::{Note, NoteId},
};

#[derive(OpenApi)]
#[openapi(
    paths(list_notes, create_note),
    components(schemas(Note, NoteId, NotesResponse, CreateNoteRequest, ErrorResponse)),
    tags(
        (name = "notes", description = "Authenticated notes API")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/notes",
    params(ListNotesQuery),
    responses(
        (status = 200, description = "Caller's notes, newest first", body = NotesResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, ApiError> {
    if state.enforce_list_method && method != Method::GET && method != Method::HEAD {
        return Err(ApiError::MethodNotAllowed);
    }

    let Query(pairs) = query.map_err(|e| ApiError::Unexpected(e.body_text()))?;
    let query = ListNotesQuery::from_pairs(pairs);

    let caller = state.service.authenticate(&headers).await?;
    let notes = state.service.list_notes(&caller, query.tag).await?;

    tracing::info!(
        "listed {} notes for user {}",
        notes.len(),
        caller.identity.id
    );
    Ok((StatusCode::OK, Json(NotesResponse { notes })).into_response())
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = Note),
        (status = 400, description = "Content is missing", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Malformed body or store failure", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    if method != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    let body = body.map_err(|e| ApiError::Unexpected(e.body_text()))?;
    let request: CreateNoteRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::Unexpected(e.to_string()))?;

    // content is checked before the caller is authenticated
    let note = request.validate()?;

    let caller = state.service.authenticate(&headers).await?;
    let created = state.service.create_note(&caller, note).await?;

    tracing::info!(
        "created note {:?} for user {}",
        created.id,
        caller.identity.id
    );
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn root() -> Response {
    (StatusCode::OK, "Hello from notes api!").into_response()
}
