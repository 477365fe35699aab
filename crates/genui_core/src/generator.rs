//! crates/genui_core/src/generator.rs
//!
//! The generation pipeline: validate and build the prompt, claim the session,
//! call the completion port, then fold the outcome back into the session.
//!
//! The session lock is only held for the two state transitions, never across the
//! network call. Each call is tagged with the `RequestId` issued by `submit`, so a
//! response that arrives after a reset can never overwrite a newer result.

use crate::domain::{GenerationRequest, GenerationResult, RequestId};
use crate::error::{GenerateError, SessionError};
use crate::ports::{CompletionService, PortResult};
use crate::prompt::build_prompt;
use crate::session::Session;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// What happened to an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The session now holds this successful result.
    Completed(GenerationResult),
    /// The session was reset while the call was in flight; the response was dropped.
    Discarded(RequestId),
}

#[derive(Clone)]
pub struct Generator {
    completion: Arc<dyn CompletionService>,
}

impl Generator {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    /// Runs one submission end to end against `session`.
    ///
    /// Validation and `Busy` errors leave the session untouched. A completion
    /// failure moves the session to `error` and is returned as
    /// [`GenerateError::Generation`].
    pub async fn generate(
        &self,
        session: &Mutex<Session>,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, GenerateError> {
        let prompt = build_prompt(&request)?;

        let ticket = session.lock().await.submit(request)?;
        let started = Instant::now();

        let response: Option<PortResult<String>> = tokio::select! {
            _ = ticket.cancellation.cancelled() => None,
            result = self.completion.complete(&prompt) => Some(result),
        };

        let Some(response) = response else {
            info!(request = %ticket.id, "Generation cancelled before the response arrived");
            return Ok(GenerationOutcome::Discarded(ticket.id));
        };
        info!(request = %ticket.id, elapsed = ?started.elapsed(), "Completion call finished");

        let mut session = session.lock().await;
        match response {
            Ok(raw_text) => match session.on_success(ticket.id, &raw_text) {
                Ok(()) => Ok(GenerationOutcome::Completed(session.result().clone())),
                Err(e) => Ok(discard(ticket.id, e)),
            },
            Err(port_error) => {
                error!(request = %ticket.id, "Completion call failed: {}", port_error);
                match session.on_failure(ticket.id, &port_error.to_string()) {
                    Ok(()) => Err(GenerateError::Generation(port_error)),
                    Err(e) => Ok(discard(ticket.id, e)),
                }
            }
        }
    }
}

fn discard(id: RequestId, reason: SessionError) -> GenerationOutcome {
    warn!(request = %id, "Discarding completion: {}", reason);
    GenerationOutcome::Discarded(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Framework, GenerationStatus};
    use crate::error::ValidationError;
    use crate::ports::PortError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    /// Completion fake whose responses are released by the test, keyed by a word
    /// that appears in the prompt.
    #[derive(Default)]
    struct GatedCompletion {
        gates: std::sync::Mutex<HashMap<String, oneshot::Receiver<PortResult<String>>>>,
        calls: AtomicUsize,
    }

    impl GatedCompletion {
        fn gate(&self, key: &str) -> oneshot::Sender<PortResult<String>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(key.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl CompletionService for GatedCompletion {
        async fn complete(&self, prompt: &str) -> PortResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let rx = {
                let mut gates = self.gates.lock().unwrap();
                let key = gates
                    .keys()
                    .find(|key| prompt.contains(key.as_str()))
                    .cloned()
                    .expect("a gate for this prompt");
                gates.remove(&key).unwrap()
            };
            rx.await
                .unwrap_or_else(|_| Err(PortError::Unexpected("gate dropped".to_string())))
        }
    }

    fn setup() -> (Arc<GatedCompletion>, Generator, Arc<Mutex<Session>>) {
        let completion = Arc::new(GatedCompletion::default());
        let generator = Generator::new(completion.clone());
        (completion, generator, Arc::new(Mutex::new(Session::new())))
    }

    async fn wait_for_calls(completion: &GatedCompletion, n: usize) {
        while completion.calls.load(Ordering::SeqCst) < n {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn successful_generation_stores_extracted_code() {
        let (completion, generator, session) = setup();
        let tx = completion.gate("rounded");
        tx.send(Ok("Here is your code:\n```html\n<div>Hi</div>\n```\nEnjoy!".to_string()))
            .unwrap();

        let outcome = generator
            .generate(&session, GenerationRequest::new("rounded button", Framework::HtmlTailwind))
            .await
            .unwrap();

        let result = match outcome {
            GenerationOutcome::Completed(result) => result,
            other => panic!("expected a completed outcome, got {other:?}"),
        };
        assert_eq!(result.extracted_code(), "<div>Hi</div>");
        let session = session.lock().await;
        assert_eq!(session.status(), GenerationStatus::Success);
        assert_eq!(session.result().extracted_code(), "<div>Hi</div>");
    }

    #[tokio::test]
    async fn empty_description_makes_no_call() {
        let (completion, generator, session) = setup();
        let err = generator
            .generate(&session, GenerationRequest::new("   ", Framework::HtmlCss))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Validation(ValidationError::EmptyDescription)
        ));
        assert_eq!(completion.calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.lock().await.status(), GenerationStatus::Idle);
    }

    #[tokio::test]
    async fn failure_moves_to_error_and_allows_resubmit() {
        let (completion, generator, session) = setup();
        completion
            .gate("card")
            .send(Err(PortError::Network("connection refused".to_string())))
            .unwrap();

        let err = generator
            .generate(&session, GenerationRequest::new("a card", Framework::HtmlCss))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Generation(PortError::Network(_))));
        {
            let session = session.lock().await;
            assert_eq!(session.status(), GenerationStatus::Error);
            assert!(session
                .result()
                .error_message()
                .is_some_and(|m| m.contains("connection refused")));
        }

        let retry = session
            .lock()
            .await
            .submit(GenerationRequest::new("a card", Framework::HtmlCss));
        assert!(retry.is_ok());
        assert_eq!(session.lock().await.status(), GenerationStatus::Loading);
    }

    #[tokio::test]
    async fn concurrent_submission_is_rejected_without_a_call() {
        let (completion, generator, session) = setup();
        let tx = completion.gate("first");

        let first = tokio::spawn({
            let generator = generator.clone();
            let session = session.clone();
            async move {
                generator
                    .generate(&session, GenerationRequest::new("first", Framework::HtmlCss))
                    .await
            }
        });
        wait_for_calls(&completion, 1).await;

        let err = generator
            .generate(&session, GenerationRequest::new("second", Framework::HtmlCss))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Session(SessionError::Busy)));
        assert_eq!(completion.calls.load(Ordering::SeqCst), 1);

        tx.send(Ok("<p>first</p>".to_string())).unwrap();
        let outcome = first.await.unwrap().unwrap();
        assert!(matches!(outcome, GenerationOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn late_response_from_reset_request_never_wins() {
        let (completion, generator, session) = setup();
        let tx_a = completion.gate("alpha");
        let tx_b = completion.gate("bravo");

        let task_a = tokio::spawn({
            let generator = generator.clone();
            let session = session.clone();
            async move {
                generator
                    .generate(&session, GenerationRequest::new("alpha", Framework::HtmlCss))
                    .await
            }
        });
        wait_for_calls(&completion, 1).await;
        session.lock().await.reset();

        let task_b = tokio::spawn({
            let generator = generator.clone();
            let session = session.clone();
            async move {
                generator
                    .generate(&session, GenerationRequest::new("bravo", Framework::HtmlCss))
                    .await
            }
        });
        wait_for_calls(&completion, 2).await;

        tx_b.send(Ok("```html\n<p>B</p>\n```".to_string())).unwrap();
        let outcome_b = task_b.await.unwrap().unwrap();
        assert!(matches!(outcome_b, GenerationOutcome::Completed(_)));

        // The receiver may already be gone once A observed its cancellation.
        let _ = tx_a.send(Ok("```html\n<p>A</p>\n```".to_string()));
        let outcome_a = task_a.await.unwrap().unwrap();
        assert!(matches!(outcome_a, GenerationOutcome::Discarded(_)));

        let session = session.lock().await;
        assert_eq!(session.status(), GenerationStatus::Success);
        assert_eq!(session.result().extracted_code(), "<p>B</p>");
    }
}
