//! crates/genui_core/src/error.rs
//!
//! Error types raised by the core pipeline. Every one of them is recoverable:
//! callers turn them into user-visible notifications.

use crate::domain::{GenerationStatus, RequestId};
use crate::ports::PortError;

/// Input rejected before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please describe your component first")]
    EmptyDescription,
    #[error("Description is {0} characters long; the limit is {1}")]
    DescriptionTooLong(usize, usize),
    #[error("Unknown framework '{0}'")]
    UnknownFramework(String),
}

/// An illegal transition of the generation state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("A generation is already in progress")]
    Busy,
    #[error("Cannot apply a completion while the session is {0:?}")]
    NotLoading(GenerationStatus),
    #[error("Completion for request {received} is stale")]
    Stale { received: RequestId },
}

/// Failure of a copy or download action. Never alters session state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("No code to copy")]
    NothingToCopy,
    #[error("No code to download")]
    NothingToDownload,
    #[error("Failed to copy: {0}")]
    Clipboard(String),
}

/// Everything that can stop a submission from producing a result.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// The completion call failed; the session is now in the `error` state.
    #[error("Something went wrong while generating code: {0}")]
    Generation(#[from] PortError),
}
