//! crates/genui_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

use crate::error::ValidationError;
use crate::extract::extract_code;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Framework
//=========================================================================================

/// The markup/styling stack the generated component must be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framework {
    #[default]
    HtmlCss,
    HtmlTailwind,
    HtmlBootstrap,
    HtmlCssJs,
    HtmlTailwindBootstrap,
}

impl Framework {
    /// Every framework, in the order they are offered to the user.
    pub const ALL: [Framework; 5] = [
        Framework::HtmlCss,
        Framework::HtmlTailwind,
        Framework::HtmlBootstrap,
        Framework::HtmlCssJs,
        Framework::HtmlTailwindBootstrap,
    ];

    /// The wire value, e.g. `html-tailwind`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Framework::HtmlCss => "html-css",
            Framework::HtmlTailwind => "html-tailwind",
            Framework::HtmlBootstrap => "html-bootstrap",
            Framework::HtmlCssJs => "html-css-js",
            Framework::HtmlTailwindBootstrap => "html-tailwind-bootstrap",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Framework::HtmlCss => "HTML + CSS",
            Framework::HtmlTailwind => "HTML + Tailwind CSS",
            Framework::HtmlBootstrap => "HTML + Bootstrap",
            Framework::HtmlCssJs => "HTML + CSS + JS",
            Framework::HtmlTailwindBootstrap => "HTML + Tailwind + Bootstrap",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Framework {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Framework::ALL
            .into_iter()
            .find(|framework| framework.as_str() == s.trim())
            .ok_or_else(|| ValidationError::UnknownFramework(s.to_string()))
    }
}

//=========================================================================================
// Requests and Results
//=========================================================================================

/// What the user asked for. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub description: String,
    pub framework: Framework,
}

impl GenerationRequest {
    pub fn new(description: impl Into<String>, framework: Framework) -> Self {
        Self {
            description: description.into(),
            framework,
        }
    }
}

/// Identifies one submission within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// The outcome of the latest submission.
///
/// Results are replaced wholesale on every transition. The extracted code has no
/// setter: it is always computed from the raw response text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    raw_response_text: String,
    extracted_code: String,
    status: GenerationStatus,
    error_message: Option<String>,
    completed_at: Option<DateTime<Utc>>,
}

impl GenerationResult {
    /// The result every session starts with.
    pub fn idle() -> Self {
        Self {
            raw_response_text: String::new(),
            extracted_code: String::new(),
            status: GenerationStatus::Idle,
            error_message: None,
            completed_at: None,
        }
    }

    pub fn loading() -> Self {
        Self {
            status: GenerationStatus::Loading,
            ..Self::idle()
        }
    }

    /// Builds a successful result, extracting the code payload from the raw completion.
    pub fn succeeded(raw_response_text: impl Into<String>) -> Self {
        let raw_response_text = raw_response_text.into();
        let extracted_code = extract_code(&raw_response_text);
        Self {
            raw_response_text,
            extracted_code,
            status: GenerationStatus::Success,
            error_message: None,
            completed_at: Some(Utc::now()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: GenerationStatus::Error,
            error_message: Some(message.into()),
            completed_at: Some(Utc::now()),
            ..Self::idle()
        }
    }

    pub fn raw_response_text(&self) -> &str {
        &self.raw_response_text
    }

    pub fn extracted_code(&self) -> &str {
        &self.extracted_code
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

impl Default for GenerationResult {
    fn default() -> Self {
        Self::idle()
    }
}
