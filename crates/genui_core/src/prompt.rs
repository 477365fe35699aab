//! crates/genui_core/src/prompt.rs
//!
//! Turns a user's component description into the instruction text sent to the
//! completion endpoint.

use crate::domain::GenerationRequest;
use crate::error::ValidationError;

/// Longest description accepted from the user, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 2000;

const PROMPT_TEMPLATE: &str = r#"You are an experienced front-end engineer and UI/UX designer. You build modern, animated and fully responsive UI components.

Generate a UI component for the following description:
{description}

Framework to use: {framework} ({label})

Requirements:
- Clean, well-structured code that is easy to read.
- SEO-friendly markup where it applies.
- A modern, animated and responsive design with polished hover effects, shadows, colors and typography.
- Return ONLY code. No explanations, no prose, no comments outside the code.
- Wrap the code in a single Markdown fenced code block tagged `html`.
- Produce ONE self-contained HTML document: inline every style and script, and load any framework from a CDN."#;

/// Checks a request before it is allowed anywhere near the network.
pub fn validate(request: &GenerationRequest) -> Result<(), ValidationError> {
    if request.description.trim().is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    let length = request.description.chars().count();
    if length > MAX_DESCRIPTION_CHARS {
        return Err(ValidationError::DescriptionTooLong(
            length,
            MAX_DESCRIPTION_CHARS,
        ));
    }
    Ok(())
}

/// Builds the prompt for a request. The description is embedded verbatim.
pub fn build_prompt(request: &GenerationRequest) -> Result<String, ValidationError> {
    validate(request)?;

    Ok(PROMPT_TEMPLATE
        .replace("{framework}", request.framework.as_str())
        .replace("{label}", request.framework.label())
        .replace("{description}", &request.description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Framework;

    #[test]
    fn prompt_contains_description_and_framework() {
        let request =
            GenerationRequest::new("a blue button with rounded corners", Framework::HtmlTailwind);
        let prompt = build_prompt(&request).unwrap();
        assert!(prompt.contains("a blue button with rounded corners"));
        assert!(prompt.contains("html-tailwind"));
        assert!(prompt.contains("HTML + Tailwind CSS"));
    }

    #[test]
    fn prompt_asks_for_fenced_self_contained_code() {
        let prompt =
            build_prompt(&GenerationRequest::new("a card", Framework::HtmlCss)).unwrap();
        assert!(prompt.contains("ONLY code"));
        assert!(prompt.contains("fenced code block"));
        assert!(prompt.contains("self-contained HTML document"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let request = GenerationRequest::new("a navbar", Framework::HtmlBootstrap);
        assert_eq!(build_prompt(&request), build_prompt(&request));
    }

    #[test]
    fn description_placeholders_are_not_expanded() {
        let request = GenerationRequest::new("show {framework} literally", Framework::HtmlCssJs);
        let prompt = build_prompt(&request).unwrap();
        assert!(prompt.contains("show {framework} literally"));
    }

    #[test]
    fn blank_description_is_rejected() {
        for description in ["", "   ", "\n\t"] {
            let request = GenerationRequest::new(description, Framework::HtmlCss);
            assert_eq!(build_prompt(&request), Err(ValidationError::EmptyDescription));
        }
    }

    #[test]
    fn overlong_description_is_rejected() {
        let request = GenerationRequest::new("x".repeat(MAX_DESCRIPTION_CHARS + 1), Framework::HtmlCss);
        assert_eq!(
            build_prompt(&request),
            Err(ValidationError::DescriptionTooLong(
                MAX_DESCRIPTION_CHARS + 1,
                MAX_DESCRIPTION_CHARS
            ))
        );
    }
}
