//! Rendering assistant replies for the chat widget.
//!
//! The model writes Markdown; the widget needs HTML it can inject without
//! further sanitization. Raw HTML in the model's output is escaped rather
//! than passed through.

use comrak::{Options, markdown_to_html};
use serde::Serialize;

/// A rendered assistant reply, ready for the chat widget.
#[derive(Debug, Clone, Serialize)]
pub struct RenderableDocument {
    /// Sanitized HTML.
    pub html: String,
}

/// Render assistant Markdown to HTML.
///
/// Strikethrough and autolinking are enabled since models use them freely;
/// tables stay off because the chat bubble is too narrow to render them.
/// `render.unsafe_` stays at its default (off), so any raw HTML the model
/// emits is escaped.
#[must_use]
pub fn render_reply(markdown: &str) -> RenderableDocument {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.autolink = true;

    RenderableDocument {
        html: markdown_to_html(markdown, &options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_emphasis_and_lists() {
        let doc = render_reply("Here are **two** options:\n\n- Sneakers\n- Boots");
        assert!(doc.html.contains("<strong>two</strong>"));
        assert!(doc.html.contains("<li>Sneakers</li>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let doc = render_reply("hello <script>alert(1)</script>");
        assert!(!doc.html.contains("<script>"));
    }

    #[test]
    fn test_autolink() {
        let doc = render_reply("see https://example.com/shop");
        assert!(doc.html.contains("<a href=\"https://example.com/shop\""));
    }

    #[test]
    fn test_plain_text_becomes_paragraph() {
        let doc = render_reply("Just checking in");
        assert_eq!(doc.html.trim(), "<p>Just checking in</p>");
    }
}
