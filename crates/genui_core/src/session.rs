//! crates/genui_core/src/session.rs
//!
//! The generation session: one user's input and result for the lifetime of a page,
//! driven by a small state machine.
//!
//! ```text
//! idle ──submit──▶ loading ──on_success──▶ success
//!                     │                       │
//!                     └──on_failure──▶ error  │
//!                                        │    │
//!         loading ◀──────submit──────────┴────┘
//! ```
//!
//! `reset` is legal from every state and returns to `idle`.

use crate::domain::{GenerationRequest, GenerationResult, GenerationStatus, RequestId};
use crate::error::SessionError;
use crate::preview::PreviewState;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

/// A submission that was accepted by [`Session::submit`].
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: RequestId,
    /// Cancelled when the session is reset while this request is in flight.
    pub cancellation: CancellationToken,
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    request: Option<GenerationRequest>,
    result: GenerationResult,
    preview: PreviewState,
    in_flight: Option<Ticket>,
    next_request: u64,
    created_at: DateTime<Utc>,
    last_accessed_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            request: None,
            result: GenerationResult::idle(),
            preview: PreviewState::new(),
            in_flight: None,
            next_request: 1,
            created_at: now,
            last_accessed_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn request(&self) -> Option<&GenerationRequest> {
        self.request.as_ref()
    }

    pub fn result(&self) -> &GenerationResult {
        &self.result
    }

    pub fn status(&self) -> GenerationStatus {
        self.result.status()
    }

    pub fn preview(&self) -> &PreviewState {
        &self.preview
    }

    /// Preview changes never touch the generation result.
    pub fn preview_mut(&mut self) -> &mut PreviewState {
        &mut self.preview
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight.as_ref().map(|ticket| ticket.id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_accessed_at(&self) -> DateTime<Utc> {
        self.last_accessed_at
    }

    pub fn touch(&mut self) {
        self.last_accessed_at = Utc::now();
    }

    //=====================================================================================
    // Transitions
    //=====================================================================================

    /// Accepts a new request unless one is already in flight.
    pub fn submit(&mut self, request: GenerationRequest) -> Result<Ticket, SessionError> {
        if self.status() == GenerationStatus::Loading {
            return Err(SessionError::Busy);
        }

        let ticket = Ticket {
            id: RequestId(self.next_request),
            cancellation: CancellationToken::new(),
        };
        self.next_request += 1;

        info!(
            session = %self.id,
            request = %ticket.id,
            framework = %request.framework,
            "Generation submitted"
        );
        self.request = Some(request);
        self.result = GenerationResult::loading();
        self.in_flight = Some(ticket.clone());
        self.touch();
        Ok(ticket)
    }

    /// Stores a completion for the in-flight request and moves to `success`.
    pub fn on_success(&mut self, id: RequestId, raw_text: &str) -> Result<(), SessionError> {
        self.accept_completion(id)?;
        self.result = GenerationResult::succeeded(raw_text);
        let surface = self.preview.refresh();
        debug!(
            session = %self.id,
            request = %id,
            code_len = self.result.extracted_code().len(),
            surface = surface.0,
            "Generation succeeded"
        );
        Ok(())
    }

    /// Stores a failure for the in-flight request and moves to `error`.
    pub fn on_failure(&mut self, id: RequestId, message: &str) -> Result<(), SessionError> {
        self.accept_completion(id)?;
        self.result = GenerationResult::failed(message);
        info!(session = %self.id, request = %id, "Generation failed: {}", message);
        Ok(())
    }

    /// Back to `idle` from any state. An in-flight request is cancelled and its
    /// completion will be treated as stale.
    pub fn reset(&mut self) {
        if let Some(ticket) = self.in_flight.take() {
            ticket.cancellation.cancel();
            info!(session = %self.id, request = %ticket.id, "In-flight generation cancelled");
        }
        self.request = None;
        self.result = GenerationResult::idle();
        self.preview.reset();
        self.touch();
    }

    fn accept_completion(&mut self, id: RequestId) -> Result<(), SessionError> {
        match &self.in_flight {
            Some(ticket) if ticket.id == id => {}
            _ if self.status() != GenerationStatus::Loading => {
                return Err(SessionError::NotLoading(self.status()));
            }
            _ => return Err(SessionError::Stale { received: id }),
        }
        self.in_flight = None;
        self.touch();
        Ok(())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Framework;

    fn request(description: &str) -> GenerationRequest {
        GenerationRequest::new(description, Framework::HtmlCss)
    }

    #[test]
    fn new_session_is_idle_and_empty() {
        let session = Session::new();
        assert_eq!(session.status(), GenerationStatus::Idle);
        assert!(session.request().is_none());
        assert!(session.result().extracted_code().is_empty());
        assert!(session.in_flight().is_none());
    }

    #[test]
    fn submit_then_success_extracts_code() {
        let mut session = Session::new();
        let ticket = session.submit(request("a button")).unwrap();
        assert_eq!(session.status(), GenerationStatus::Loading);
        assert_eq!(session.in_flight(), Some(ticket.id));

        session
            .on_success(ticket.id, "```html\n<button>Go</button>\n```")
            .unwrap();
        assert_eq!(session.status(), GenerationStatus::Success);
        assert_eq!(session.result().extracted_code(), "<button>Go</button>");
        assert!(session.in_flight().is_none());
    }

    #[test]
    fn submit_while_loading_is_rejected() {
        let mut session = Session::new();
        let first = session.submit(request("first")).unwrap();
        assert_eq!(session.submit(request("second")).unwrap_err(), SessionError::Busy);
        assert_eq!(session.in_flight(), Some(first.id));
        assert_eq!(session.request().unwrap().description, "first");
    }

    #[test]
    fn failure_then_resubmit_is_allowed() {
        let mut session = Session::new();
        let ticket = session.submit(request("x")).unwrap();
        session.on_failure(ticket.id, "network down").unwrap();
        assert_eq!(session.status(), GenerationStatus::Error);
        assert_eq!(session.result().error_message(), Some("network down"));

        let retry = session.submit(request("x")).unwrap();
        assert_eq!(session.status(), GenerationStatus::Loading);
        assert!(retry.id > ticket.id);
        assert!(session.result().error_message().is_none());
    }

    #[test]
    fn resubmit_from_success_clears_prior_result() {
        let mut session = Session::new();
        let ticket = session.submit(request("x")).unwrap();
        session.on_success(ticket.id, "<p>old</p>").unwrap();
        session.submit(request("y")).unwrap();
        assert!(session.result().extracted_code().is_empty());
        assert_eq!(session.status(), GenerationStatus::Loading);
    }

    #[test]
    fn completions_outside_loading_are_rejected() {
        let mut session = Session::new();
        assert_eq!(
            session.on_success(RequestId(1), "x"),
            Err(SessionError::NotLoading(GenerationStatus::Idle))
        );
        assert_eq!(
            session.on_failure(RequestId(1), "x"),
            Err(SessionError::NotLoading(GenerationStatus::Idle))
        );
    }

    #[test]
    fn reset_cancels_and_turns_late_completion_stale() {
        let mut session = Session::new();
        let a = session.submit(request("a")).unwrap();
        session.reset();
        assert!(a.cancellation.is_cancelled());
        assert_eq!(session.status(), GenerationStatus::Idle);
        assert!(session.request().is_none());

        let b = session.submit(request("b")).unwrap();
        assert_eq!(
            session.on_success(a.id, "<p>A</p>"),
            Err(SessionError::Stale { received: a.id })
        );
        session.on_success(b.id, "<p>B</p>").unwrap();
        assert_eq!(
            session.on_success(a.id, "<p>A</p>"),
            Err(SessionError::NotLoading(GenerationStatus::Success))
        );
        assert_eq!(session.result().extracted_code(), "<p>B</p>");
    }

    #[test]
    fn success_replaces_the_preview_surface() {
        let mut session = Session::new();
        let before = session.preview().surface();
        let ticket = session.submit(request("x")).unwrap();
        session.on_success(ticket.id, "<p>x</p>").unwrap();
        assert!(!session.preview().is_live(before));
    }

    #[test]
    fn preview_changes_leave_result_untouched() {
        let mut session = Session::new();
        let ticket = session.submit(request("x")).unwrap();
        session.on_success(ticket.id, "<p>x</p>").unwrap();
        session.preview_mut().open_fullscreen();
        session.preview_mut().refresh();
        session.preview_mut().close_fullscreen();
        assert_eq!(session.status(), GenerationStatus::Success);
        assert_eq!(session.result().extracted_code(), "<p>x</p>");
    }
}
