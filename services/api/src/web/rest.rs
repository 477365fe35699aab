//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the session and generation endpoints and the
//! master definition for the OpenAPI specification.

use crate::error::{ErrorBody, HttpError};
use crate::web::{
    export, preview,
    protocol::{
        CreateSessionResponse, FrameworkOption, FullscreenRequest, GenerateRequest, Notice,
        PreviewSnapshot, RefreshResponse, SessionSnapshot, TabRequest,
    },
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use genui_core::{Framework, GenerateError, GenerationOutcome, GenerationRequest, Session};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_frameworks_handler,
        create_session_handler,
        get_session_handler,
        delete_session_handler,
        generate_handler,
        reset_handler,
        preview::editor_handler,
        preview::surface_handler,
        preview::refresh_handler,
        preview::fullscreen_handler,
        preview::tab_handler,
        export::copy_handler,
        export::download_handler,
    ),
    components(
        schemas(
            FrameworkOption,
            CreateSessionResponse,
            SessionSnapshot,
            PreviewSnapshot,
            GenerateRequest,
            FullscreenRequest,
            TabRequest,
            RefreshResponse,
            Notice,
            ErrorBody,
        )
    ),
    tags(
        (name = "GenUI API", description = "Generate UI components from a description and preview them.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Helpers
//=========================================================================================

/// Looks up a live session and marks it as used.
pub(crate) async fn load_session(
    app_state: &AppState,
    session_id: Uuid,
) -> Result<Arc<Mutex<Session>>, HttpError> {
    let session = app_state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(HttpError::session_not_found)?;
    session.lock().await.touch();
    Ok(session)
}

pub(crate) async fn snapshot(session: &Mutex<Session>) -> SessionSnapshot {
    SessionSnapshot::from(&*session.lock().await)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the frameworks a component can be generated in. The first one is the default.
#[utoipa::path(
    get,
    path = "/frameworks",
    responses(
        (status = 200, description = "Available frameworks", body = [FrameworkOption])
    )
)]
pub async fn list_frameworks_handler() -> Json<Vec<FrameworkOption>> {
    Json(Framework::ALL.into_iter().map(FrameworkOption::from).collect())
}

/// Create a session for a freshly loaded page.
#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created successfully", body = CreateSessionResponse)
    )
)]
pub async fn create_session_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let session_id = app_state.sessions.create().await;
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// Fetch the current state of a session.
#[utoipa::path(
    get,
    path = "/sessions/{id}",
    params(("id" = Uuid, Path, description = "The session ID.")),
    responses(
        (status = 200, description = "Current session state", body = SessionSnapshot),
        (status = 404, description = "Unknown session", body = ErrorBody)
    )
)]
pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let session = load_session(&app_state, session_id).await?;
    Ok(Json(snapshot(&session).await))
}

/// Discard a session when its page goes away.
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    params(("id" = Uuid, Path, description = "The session ID.")),
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Unknown session", body = ErrorBody)
    )
)]
pub async fn delete_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, HttpError> {
    if app_state.sessions.remove(session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(HttpError::session_not_found())
    }
}

/// Generate a component and wait for the result.
///
/// Only one generation may run per session; a second submission while one is in
/// flight is rejected with 409. The generation finishes and settles the session
/// even if the caller goes away.
#[utoipa::path(
    post,
    path = "/sessions/{id}/generate",
    params(("id" = Uuid, Path, description = "The session ID.")),
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Component generated", body = SessionSnapshot),
        (status = 400, description = "Invalid description or framework", body = ErrorBody),
        (status = 404, description = "Unknown session", body = ErrorBody),
        (status = 409, description = "A generation is already running, or this one was superseded", body = ErrorBody),
        (status = 502, description = "The completion service failed", body = ErrorBody)
    )
)]
pub async fn generate_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let session = load_session(&app_state, session_id).await?;

    let framework = match payload.framework.as_deref() {
        Some(value) => value
            .parse::<Framework>()
            .map_err(|e| HttpError::from(GenerateError::from(e)))?,
        None => Framework::default(),
    };
    let request = GenerationRequest::new(payload.description, framework);

    // Detached from the request: a dropped client still settles the session.
    let generator = app_state.generator.clone();
    let pipeline_session = session.clone();
    let pipeline =
        tokio::spawn(async move { generator.generate(&pipeline_session, request).await });
    let outcome = pipeline.await.map_err(|e| {
        error!(session = %session_id, "Generation task failed: {}", e);
        HttpError::new(StatusCode::INTERNAL_SERVER_ERROR, "Generation task failed")
    })?;

    match outcome {
        Ok(GenerationOutcome::Completed(result)) => {
            info!(
                session = %session_id,
                code_len = result.extracted_code().len(),
                "Component generated"
            );
            Ok(Json(snapshot(&session).await))
        }
        Ok(GenerationOutcome::Discarded(request_id)) => Err(HttpError::new(
            StatusCode::CONFLICT,
            format!("Generation {} was superseded by a reset", request_id),
        )),
        Err(e) => {
            warn!(session = %session_id, "Generation rejected: {}", e);
            Err(e.into())
        }
    }
}

/// Return the session to idle, dropping any running generation.
#[utoipa::path(
    post,
    path = "/sessions/{id}/reset",
    params(("id" = Uuid, Path, description = "The session ID.")),
    responses(
        (status = 200, description = "Session reset", body = SessionSnapshot),
        (status = 404, description = "Unknown session", body = ErrorBody)
    )
)]
pub async fn reset_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let session = load_session(&app_state, session_id).await?;
    let mut session = session.lock().await;
    session.reset();
    Ok(Json(SessionSnapshot::from(&*session)))
}
