pub mod auth;
pub mod backend;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

use axum::{
    Router,
    routing::{any, get},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use handlers::rest;
use service::NoteService;

/// State shared by every request. Built once at startup.
pub struct AppState {
    pub service: NoteService,
    pub enforce_list_method: bool,
}

impl AppState {
    pub const fn new(service: NoteService, enforce_list_method: bool) -> Self {
        Self {
            service,
            enforce_list_method,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(rest::root))
        .route(
            "/notes",
            get(rest::list_notes)
                .post(rest::create_note)
                .fallback(rest::method_not_allowed),
        )
        .route("/functions/v1/get_notes", any(rest::list_notes))
        .route("/functions/v1/post_notes", any(rest::create_note))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", rest::ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
