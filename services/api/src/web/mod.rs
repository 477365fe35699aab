pub mod export;
pub mod middleware;
pub mod page;
pub mod preview;
pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use state::AppState;

/// Builds the API router. Swagger UI and CORS are layered on by the binary;
/// state-changing requests from foreign origins are rejected here.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(page::index_handler))
        .route("/frameworks", get(rest::list_frameworks_handler))
        .route("/sessions", post(rest::create_session_handler))
        .route(
            "/sessions/{id}",
            get(rest::get_session_handler).delete(rest::delete_session_handler),
        )
        .route("/sessions/{id}/generate", post(rest::generate_handler))
        .route("/sessions/{id}/reset", post(rest::reset_handler))
        .route("/sessions/{id}/preview/editor", get(preview::editor_handler))
        .route("/sessions/{id}/preview/surface", get(preview::surface_handler))
        .route("/sessions/{id}/preview/refresh", post(preview::refresh_handler))
        .route(
            "/sessions/{id}/preview/fullscreen",
            post(preview::fullscreen_handler),
        )
        .route("/sessions/{id}/preview/tab", put(preview::tab_handler))
        .route("/sessions/{id}/export/copy", post(export::copy_handler))
        .route("/sessions/{id}/export/download", get(export::download_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::reject_foreign_origin,
        ))
        .with_state(app_state)
}
