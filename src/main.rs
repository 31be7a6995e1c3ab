use std::sync::Arc;

use notes_api::{AppState, backend::BackendClient, config, service::NoteService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load config
    let cfg = config::load_config().expect("failed to locate or load config file");
    tracing::info!("Successfully loaded notes api config");
    tracing::info!(
        "Configured backend: {} (table '{}')",
        cfg.backend.url,
        cfg.backend.notes_table
    );

    // One backend client serves both auth and storage for the whole process
    let backend = Arc::new(BackendClient::new(&cfg.backend).unwrap_or_else(|e| {
        tracing::error!("Failed to create backend client: {e}");
        panic!("failed to create backend client: {e}");
    }));

    let service = NoteService::new(backend.clone(), backend);
    let state = Arc::new(AppState::new(service, cfg.enforce_list_method));

    let router = notes_api::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port))
        .await
        .expect("Failed to bind to address");
    let addr = listener.local_addr().expect("listener has no local address");

    tracing::info!("Notes api starting, listening on {}", addr);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}
