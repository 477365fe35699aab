//! crates/genui_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the completion API and of the host platform.

use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, clipboard).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Service error: {0}")]
    Service(String),
    #[error("The completion service rejected the request and no API key is configured")]
    MissingCredential,
    #[error("Platform service unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends one prompt to the remote completion endpoint and returns its raw text.
    async fn complete(&self, prompt: &str) -> PortResult<String>;
}

#[async_trait]
pub trait ClipboardService: Send + Sync {
    /// Writes the exact text to the system clipboard.
    async fn write_text(&self, text: &str) -> PortResult<()>;
}
