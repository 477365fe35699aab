//! crates/genui_core/src/preview.rs
//!
//! Preview state for a session and the two views of the extracted code: the
//! highlighted editor view and the isolated rendering surface.

use serde::{Deserialize, Serialize};

/// Sandbox policy applied to every rendering surface. Without `allow-same-origin`
/// the document runs in an opaque origin and cannot reach the host page.
pub const SURFACE_SANDBOX_POLICY: &str =
    "sandbox allow-scripts allow-forms allow-popups allow-modals";

/// Which view is in front in the split layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewTab {
    #[default]
    Code,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewMode {
    #[default]
    Split,
    Fullscreen,
}

/// Identifies the single live rendering surface of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceKey(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewState {
    tab: PreviewTab,
    mode: PreviewMode,
    surface: SurfaceKey,
}

impl PreviewState {
    pub fn new() -> Self {
        Self {
            tab: PreviewTab::default(),
            mode: PreviewMode::default(),
            surface: SurfaceKey(0),
        }
    }

    pub fn tab(&self) -> PreviewTab {
        self.tab
    }

    pub fn mode(&self) -> PreviewMode {
        self.mode
    }

    pub fn surface(&self) -> SurfaceKey {
        self.surface
    }

    /// Only the current surface may be served; anything older has been discarded.
    pub fn is_live(&self, key: SurfaceKey) -> bool {
        self.surface == key
    }

    /// Discards the current surface and issues the key of its replacement.
    pub fn refresh(&mut self) -> SurfaceKey {
        self.surface = SurfaceKey(self.surface.0.wrapping_add(1));
        self.surface
    }

    pub fn select_tab(&mut self, tab: PreviewTab) {
        self.tab = tab;
    }

    pub fn open_fullscreen(&mut self) {
        self.mode = PreviewMode::Fullscreen;
    }

    pub fn close_fullscreen(&mut self) {
        self.mode = PreviewMode::Split;
    }

    /// Back to the split code view. The surface key keeps counting so a surface
    /// served before the reset can never become live again.
    pub fn reset(&mut self) {
        self.tab = PreviewTab::default();
        self.mode = PreviewMode::default();
        self.refresh();
    }
}

impl Default for PreviewState {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================================
// Editor View
//=========================================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum Token {
    Text,
    Tag,
    Attr,
    Value,
    Comment,
    Doctype,
}

impl Token {
    fn class(self) -> Option<&'static str> {
        match self {
            Token::Text => None,
            Token::Tag => Some("hl-tag"),
            Token::Attr => Some("hl-attr"),
            Token::Value => Some("hl-value"),
            Token::Comment => Some("hl-comment"),
            Token::Doctype => Some("hl-doctype"),
        }
    }
}

fn escape_into(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

struct Highlighter {
    out: String,
    current: Token,
    open: bool,
}

impl Highlighter {
    fn push(&mut self, token: Token, c: char) {
        if token != self.current || !self.open {
            self.close();
            if let Some(class) = token.class() {
                self.out.push_str("<span class=\"");
                self.out.push_str(class);
                self.out.push_str("\">");
                self.open = true;
            }
            self.current = token;
        }
        escape_into(&mut self.out, c);
    }

    fn close(&mut self) {
        if self.open {
            self.out.push_str("</span>");
            self.open = false;
        }
    }
}

/// Renders markup as escaped HTML with `hl-*` spans around tags, attribute names,
/// attribute values, comments and the doctype.
///
/// The payload may be malformed; the scanner never fails and every input
/// character appears (escaped) in the output exactly once.
pub fn highlight_html(code: &str) -> String {
    let mut hl = Highlighter {
        out: String::with_capacity(code.len() * 2),
        current: Token::Text,
        open: false,
    };
    let chars: Vec<char> = code.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let rest = &chars[i..];
        if rest.starts_with(&['<', '!', '-', '-']) {
            let mut j = i;
            while j < chars.len() {
                hl.push(Token::Comment, chars[j]);
                if j >= i + 6 && chars[j - 2] == '-' && chars[j - 1] == '-' && chars[j] == '>' {
                    j += 1;
                    break;
                }
                j += 1;
            }
            i = j;
        } else if rest.starts_with(&['<', '!']) {
            while i < chars.len() {
                hl.push(Token::Doctype, chars[i]);
                i += 1;
                if chars[i - 1] == '>' {
                    break;
                }
            }
        } else if chars[i] == '<'
            && rest
                .get(1)
                .is_some_and(|c| c.is_ascii_alphabetic() || *c == '/')
        {
            i = highlight_tag(&mut hl, &chars, i);
        } else {
            hl.push(Token::Text, chars[i]);
            i += 1;
        }
    }

    hl.close();
    hl.out
}

/// Highlights one start or end tag beginning at `start`; returns the index after it.
fn highlight_tag(hl: &mut Highlighter, chars: &[char], start: usize) -> usize {
    let mut i = start;
    // `<`, optional `/`, then the tag name.
    while i < chars.len() && !chars[i].is_whitespace() && chars[i] != '>' {
        if i > start && chars[i] == '/' && chars.get(i + 1) == Some(&'>') {
            break;
        }
        hl.push(Token::Tag, chars[i]);
        i += 1;
    }

    let mut quote: Option<char> = None;
    while i < chars.len() {
        let c = chars[i];
        match quote {
            Some(q) => {
                hl.push(Token::Value, c);
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '>' => {
                    hl.push(Token::Tag, c);
                    return i + 1;
                }
                '/' if chars.get(i + 1) == Some(&'>') => hl.push(Token::Tag, c),
                '"' | '\'' => {
                    quote = Some(c);
                    hl.push(Token::Value, c);
                }
                '=' => hl.push(Token::Text, c),
                c if c.is_whitespace() => hl.push(Token::Text, c),
                _ => {
                    let after_equals = chars[..i]
                        .iter()
                        .rev()
                        .find(|c| !c.is_whitespace())
                        .is_some_and(|c| *c == '=');
                    let token = if after_equals || hl.current == Token::Value {
                        Token::Value
                    } else {
                        Token::Attr
                    };
                    hl.push(token, c);
                }
            },
        }
        i += 1;
    }
    i
}
