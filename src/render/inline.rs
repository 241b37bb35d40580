//! Inline formatting: escaping plus `**bold**` / `*italic*` emphasis.
//!
//! Escaping always runs first, so the only literal markup in the output is
//! the `<strong>` and `<em>` tags introduced here.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").unwrap());

/// Which emphasis spans get rendered as tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// `<strong>` and `<em>`.
    Full,
    /// `<strong>` only; single stars stay literal.
    BoldOnly,
    /// Paired markers are removed and their text kept, with no tags.
    Stripped,
}

/// Escape the markup-significant characters of `text`.
///
/// `'` is only escaped when `escape_apostrophe` is set; some feed consumers
/// reject `&apos;` inside HTML payloads.
pub fn escape_markup(text: &str, escape_apostrophe: bool) -> Cow<'_, str> {
    let needs_escape =
        |c: char| matches!(c, '&' | '<' | '>' | '"') || (escape_apostrophe && c == '\'');
    if !text.contains(needs_escape) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' if escape_apostrophe => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Escape `text` and apply emphasis. Never fails; anything that does not
/// pair up is left as literal escaped text.
pub fn format_inline(text: &str, emphasis: Emphasis, escape_apostrophe: bool) -> String {
    let escaped = escape_markup(text, escape_apostrophe);

    match emphasis {
        Emphasis::Full => bold_then_italic(&escaped),
        Emphasis::BoldOnly => BOLD.replace_all(&escaped, "<strong>${1}</strong>").into_owned(),
        Emphasis::Stripped => strip_emphasis(&escaped),
    }
}

/// Bold spans first; italics are then paired only inside a single bold
/// span or inside the text between spans, so tags always nest.
fn bold_then_italic(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    let mut last = 0;
    for caps in BOLD.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&ITALIC.replace_all(&text[last..whole.start()], "<em>${1}</em>"));
        out.push_str("<strong>");
        out.push_str(&ITALIC.replace_all(inner.as_str(), "<em>${1}</em>"));
        out.push_str("</strong>");
        last = whole.end();
    }
    out.push_str(&ITALIC.replace_all(&text[last..], "<em>${1}</em>"));
    out
}

/// Remove paired `**`/`*` markers, keeping the text between them. No
/// escaping is done.
pub fn strip_emphasis(text: &str) -> String {
    let bold = BOLD.replace_all(text, "${1}");
    ITALIC.replace_all(&bold, "${1}").into_owned()
}
