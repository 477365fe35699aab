//! services/api/src/adapters/completion_llm.rs
//!
//! This module contains the adapter for the component-generating LLM.
//! It implements the `CompletionService` port from the `core` crate against an
//! OpenAI-compatible chat completions endpoint (Gemini by default).

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use genui_core::ports::{CompletionService, PortError, PortResult};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct LlmCompletionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    has_credential: bool,
}

impl LlmCompletionAdapter {
    /// Creates a new `LlmCompletionAdapter`.
    ///
    /// A missing key does not prevent construction: the call is still attempted
    /// and the endpoint's rejection is reported as `PortError::MissingCredential`.
    pub fn new(api_base: &str, api_key: Option<&str>, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_base(api_base)
            .with_api_key(api_key.unwrap_or_default());
        Self {
            client: Client::with_config(config),
            model,
            has_credential: api_key.is_some(),
        }
    }

    fn map_error(&self, e: OpenAIError) -> PortError {
        match e {
            OpenAIError::Reqwest(e) => PortError::Network(e.to_string()),
            OpenAIError::ApiError(_) if !self.has_credential => PortError::MissingCredential,
            OpenAIError::ApiError(e) => PortError::Service(e.to_string()),
            other => PortError::Unexpected(other.to_string()),
        }
    }
}

//=========================================================================================
// `CompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionService for LlmCompletionAdapter {
    /// Sends the prompt as a single user message and returns the first choice's text.
    async fn complete(&self, prompt: &str) -> PortResult<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending completion request");

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| self.map_error(e))?;

        // Extract the text content from the first choice in the response.
        match response.choices.into_iter().next() {
            Some(choice) => choice.message.content.ok_or_else(|| {
                PortError::Service("Completion response contained no text content.".to_string())
            }),
            None => Err(PortError::Service(
                "Completion service returned no choices in its response.".to_string(),
            )),
        }
    }
}
