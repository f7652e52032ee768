//! HTML escaping for untrusted text.
//!
//! [`EscapedText`] can only be built by [`escape_html`], which takes raw
//! `&str`. Any text inside a [`crate::RenderOp`] has been escaped exactly once.

use std::fmt;

use serde::Serialize;

/// Text that is safe to insert into markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EscapedText(String);

impl EscapedText {
    /// The escaped text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EscapedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(raw: &str) -> EscapedText {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    EscapedText(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_tags_become_literal_text() {
        assert_eq!(
            escape_html("<script>alert('x')</script>").as_str(),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn existing_entities_are_escaped_again() {
        assert_eq!(escape_html("a & b &lt;").as_str(), "a &amp; b &amp;lt;");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(escape_html("привет, bob").as_str(), "привет, bob");
    }
}
