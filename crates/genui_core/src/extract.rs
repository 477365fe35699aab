//! crates/genui_core/src/extract.rs
//!
//! Pulls the code payload out of free-form completion text.
//!
//! Completion models do not always honour formatting instructions, so a missing
//! fence is not an error: the whole response becomes the payload.

use regex::Regex;
use std::sync::OnceLock;

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        // Opening fence, optional language tag, optional newline, lazily captured body,
        // closing fence.
        Regex::new(r"```(?:[\w+#.-]+)?[ \t]*\r?\n?([\s\S]*?)```")
            .expect("fence pattern is a valid regex")
    })
}

/// Returns the trimmed body of the first fenced block, or the whole input trimmed.
///
/// Never fails; empty input yields an empty string.
pub fn extract_code(raw: &str) -> String {
    match fence_regex().captures(raw).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim().to_string(),
        None => raw.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_tagged_block_from_chatty_response() {
        let raw = "Here is your code:\n```html\n<div>Hi</div>\n```\nEnjoy!";
        assert_eq!(extract_code(raw), "<div>Hi</div>");
    }

    #[test]
    fn unfenced_text_is_returned_trimmed() {
        assert_eq!(extract_code("<div>Hi</div>"), "<div>Hi</div>");
        assert_eq!(extract_code("  \n<div>Hi</div>\n\n"), "<div>Hi</div>");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(extract_code(""), "");
        assert_eq!(extract_code(" \n\t "), "");
    }

    #[test]
    fn only_the_first_block_is_used() {
        let raw = "```html\n<p>first</p>\n```\ntext\n```css\np { color: red; }\n```";
        assert_eq!(extract_code(raw), "<p>first</p>");
    }

    #[test]
    fn untagged_fence_is_accepted() {
        assert_eq!(extract_code("```\n<span>x</span>\n```"), "<span>x</span>");
    }

    #[test]
    fn single_line_fence_is_accepted() {
        assert_eq!(extract_code("```<b>bold</b>```"), "<b>bold</b>");
    }

    #[test]
    fn unterminated_fence_falls_back_to_whole_input() {
        let raw = "```html\n<div>cut off";
        assert_eq!(extract_code(raw), raw);
    }

    #[test]
    fn inner_whitespace_and_blank_lines_are_preserved() {
        let raw = "```html\n\n<ul>\n  <li>a</li>\n\n  <li>b</li>\n</ul>\n\n```";
        assert_eq!(extract_code(raw), "<ul>\n  <li>a</li>\n\n  <li>b</li>\n</ul>");
    }

    #[test]
    fn extraction_is_idempotent_on_unfenced_output() {
        let once = extract_code("Intro\n```html\n<main>body</main>\n```");
        assert_eq!(extract_code(&once), once);
    }

    #[test]
    fn crlf_line_endings_are_handled() {
        let raw = "```html\r\n<div>win</div>\r\n```";
        assert_eq!(extract_code(raw), "<div>win</div>");
    }
}
