//! services/api/src/web/export.rs
//!
//! Copy and download handlers. Both read the current code and leave the session
//! as it is.

use crate::error::{ErrorBody, HttpError};
use crate::web::{protocol::Notice, rest::load_session, state::AppState};
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use genui_core::export;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Copy the generated code to the clipboard of the machine running the server.
///
/// This is the user's clipboard only while the server is bound to a loopback
/// address; on any other bind the page's copy lands on the remote host.
#[utoipa::path(
    post,
    path = "/sessions/{id}/export/copy",
    params(("id" = Uuid, Path, description = "The session ID.")),
    responses(
        (status = 200, description = "Code copied to the server host clipboard", body = Notice),
        (status = 400, description = "There is no code to copy", body = ErrorBody),
        (status = 404, description = "Unknown session", body = ErrorBody),
        (status = 503, description = "The clipboard refused the write", body = ErrorBody)
    )
)]
pub async fn copy_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Notice>, HttpError> {
    let session = load_session(&app_state, session_id).await?;
    let code = session.lock().await.result().extracted_code().to_string();

    export::copy(app_state.clipboard.as_ref(), &code).await?;
    Ok(Json(Notice {
        message: "Code copied to clipboard".to_string(),
    }))
}

/// Download the generated code as a single HTML file.
#[utoipa::path(
    get,
    path = "/sessions/{id}/export/download",
    params(("id" = Uuid, Path, description = "The session ID.")),
    responses(
        (status = 200, description = "The file, as an attachment", content_type = "text/html"),
        (status = 400, description = "There is no code to download", body = ErrorBody),
        (status = 404, description = "Unknown session", body = ErrorBody)
    )
)]
pub async fn download_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, HttpError> {
    let session = load_session(&app_state, session_id).await?;
    let code = session.lock().await.result().extracted_code().to_string();

    let file = export::download(&code)?;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|e| HttpError::new(axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    info!(session = %session_id, len = file.contents.len(), "Serving download");

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(file.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(file.contents),
    )
        .into_response())
}
