//! services/api/src/web/preview.rs
//!
//! Handlers for the two views of the generated code: the highlighted editor
//! fragment and the sandboxed rendering surface, plus refresh/fullscreen/tab.

use crate::error::{ErrorBody, HttpError};
use crate::web::{
    protocol::{FullscreenRequest, RefreshResponse, SessionSnapshot, SurfaceQuery, TabRequest},
    rest::load_session,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use genui_core::preview::{highlight_html, SURFACE_SANDBOX_POLICY};
use genui_core::SurfaceKey;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Highlighted, escaped view of the current code.
#[utoipa::path(
    get,
    path = "/sessions/{id}/preview/editor",
    params(("id" = Uuid, Path, description = "The session ID.")),
    responses(
        (status = 200, description = "HTML fragment with the highlighted code", content_type = "text/html"),
        (status = 404, description = "Unknown session", body = ErrorBody)
    )
)]
pub async fn editor_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Html<String>, HttpError> {
    let session = load_session(&app_state, session_id).await?;
    let code = session.lock().await.result().extracted_code().to_string();
    Ok(Html(format!(
        "<pre class=\"hl\"><code>{}</code></pre>",
        highlight_html(&code)
    )))
}

/// The rendering surface: the generated document served on its own, sandboxed.
///
/// Only the session's current surface key is served; older keys answer 410 so a
/// refreshed or replaced surface can never come back.
#[utoipa::path(
    get,
    path = "/sessions/{id}/preview/surface",
    params(
        ("id" = Uuid, Path, description = "The session ID."),
        ("key" = u64, Query, description = "The surface key from the session snapshot.")
    ),
    responses(
        (status = 200, description = "The generated document", content_type = "text/html"),
        (status = 404, description = "Unknown session", body = ErrorBody),
        (status = 410, description = "The surface has been replaced", body = ErrorBody)
    )
)]
pub async fn surface_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<SurfaceQuery>,
) -> Result<Response, HttpError> {
    let session = load_session(&app_state, session_id).await?;
    let code = {
        let session = session.lock().await;
        if !session.preview().is_live(SurfaceKey(query.key)) {
            return Err(HttpError::new(
                StatusCode::GONE,
                "This preview has been replaced; reload it",
            ));
        }
        session.result().extracted_code().to_string()
    };
    debug!(session = %session_id, key = query.key, "Serving rendering surface");

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            ),
            (
                header::CONTENT_SECURITY_POLICY,
                HeaderValue::from_static(SURFACE_SANDBOX_POLICY),
            ),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
        ],
        code,
    )
        .into_response())
}

/// Discard the current surface and issue a new one.
#[utoipa::path(
    post,
    path = "/sessions/{id}/preview/refresh",
    params(("id" = Uuid, Path, description = "The session ID.")),
    responses(
        (status = 200, description = "New surface key", body = RefreshResponse),
        (status = 404, description = "Unknown session", body = ErrorBody)
    )
)]
pub async fn refresh_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<RefreshResponse>, HttpError> {
    let session = load_session(&app_state, session_id).await?;
    let key = session.lock().await.preview_mut().refresh();
    Ok(Json(RefreshResponse { surface_key: key.0 }))
}

/// Open or close the fullscreen preview.
#[utoipa::path(
    post,
    path = "/sessions/{id}/preview/fullscreen",
    params(("id" = Uuid, Path, description = "The session ID.")),
    request_body = FullscreenRequest,
    responses(
        (status = 200, description = "Updated session state", body = SessionSnapshot),
        (status = 404, description = "Unknown session", body = ErrorBody)
    )
)]
pub async fn fullscreen_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<FullscreenRequest>,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let session = load_session(&app_state, session_id).await?;
    let mut session = session.lock().await;
    if payload.open {
        session.preview_mut().open_fullscreen();
    } else {
        session.preview_mut().close_fullscreen();
    }
    Ok(Json(SessionSnapshot::from(&*session)))
}

/// Switch between the code and the live preview tab.
#[utoipa::path(
    put,
    path = "/sessions/{id}/preview/tab",
    params(("id" = Uuid, Path, description = "The session ID.")),
    request_body = TabRequest,
    responses(
        (status = 200, description = "Updated session state", body = SessionSnapshot),
        (status = 404, description = "Unknown session", body = ErrorBody)
    )
)]
pub async fn tab_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<TabRequest>,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let session = load_session(&app_state, session_id).await?;
    let mut session = session.lock().await;
    session.preview_mut().select_tab(payload.tab);
    Ok(Json(SessionSnapshot::from(&*session)))
}
