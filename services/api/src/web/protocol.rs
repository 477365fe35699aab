//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the page and the API server.

use chrono::{DateTime, Utc};
use genui_core::{Framework, GenerationStatus, PreviewMode, PreviewTab, Session};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Payloads Sent FROM the Page TO the Server
//=========================================================================================

/// Body of `POST /sessions/{id}/generate`.
#[derive(Deserialize, Debug, ToSchema)]
pub struct GenerateRequest {
    /// The component to build, in plain language.
    pub description: String,
    /// Wire value of the framework; the first framework is used when omitted.
    #[serde(default)]
    pub framework: Option<String>,
}

/// Body of `POST /sessions/{id}/preview/fullscreen`.
#[derive(Deserialize, Debug, ToSchema)]
pub struct FullscreenRequest {
    pub open: bool,
}

/// Body of `PUT /sessions/{id}/preview/tab`.
#[derive(Deserialize, Debug, ToSchema)]
pub struct TabRequest {
    #[schema(value_type = String, example = "preview")]
    pub tab: PreviewTab,
}

/// Query of `GET /sessions/{id}/preview/surface`.
#[derive(Deserialize, Debug)]
pub struct SurfaceQuery {
    pub key: u64,
}

//=========================================================================================
// Payloads Sent FROM the Server TO the Page
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct FrameworkOption {
    pub value: String,
    pub label: String,
}

impl From<Framework> for FrameworkOption {
    fn from(framework: Framework) -> Self {
        Self {
            value: framework.as_str().to_string(),
            label: framework.label().to_string(),
        }
    }
}

/// The response payload sent after successfully creating a session.
#[derive(Serialize, ToSchema)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Serialize, ToSchema)]
pub struct PreviewSnapshot {
    #[schema(value_type = String, example = "code")]
    pub tab: PreviewTab,
    #[schema(value_type = String, example = "split")]
    pub mode: PreviewMode,
    pub surface_key: u64,
}

/// Everything the page needs to redraw itself.
#[derive(Serialize, ToSchema)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    #[schema(value_type = String, example = "success")]
    pub status: GenerationStatus,
    pub description: Option<String>,
    pub framework: Option<String>,
    pub extracted_code: String,
    pub error_message: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub preview: PreviewSnapshot,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        let result = session.result();
        let preview = session.preview();
        Self {
            session_id: session.id(),
            status: result.status(),
            description: session.request().map(|r| r.description.clone()),
            framework: session.request().map(|r| r.framework.as_str().to_string()),
            extracted_code: result.extracted_code().to_string(),
            error_message: result.error_message().map(str::to_string),
            completed_at: result.completed_at(),
            preview: PreviewSnapshot {
                tab: preview.tab(),
                mode: preview.mode(),
                surface_key: preview.surface().0,
            },
        }
    }
}

/// Returned by `POST /sessions/{id}/preview/refresh`.
#[derive(Serialize, ToSchema)]
pub struct RefreshResponse {
    pub surface_key: u64,
}

/// Confirmation for actions that only need a toast.
#[derive(Serialize, ToSchema)]
pub struct Notice {
    pub message: String,
}
