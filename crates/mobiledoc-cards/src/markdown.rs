//! Markdown card.
//!
//! Markdown is converted with pulldown-cmark using GitHub-flavored extensions
//! and inserted as raw HTML. Headings inside the card are not visible to the
//! heading normalizer.

use mobiledoc_dom::{DomError, NodeId};
use mobiledoc_renderer::{Card, CardOptions, RenderEnv};
use pulldown_cmark::{Options, Parser, html};
use serde::Deserialize;
use serde_json::Value;

use crate::payload::{decode, non_blank};

/// Wrapper class emitted for version 1 output.
pub const MARKDOWN_WRAPPER_CLASS: &str = "kg-card-markdown";

#[derive(Debug, Default, Deserialize)]
struct MarkdownPayload {
    markdown: Option<String>,
}

/// Renders a `markdown` payload as HTML.
///
/// Version 1 wraps the output in `<div class="kg-card-markdown">`, later
/// versions emit it bare.
#[derive(Debug, Clone)]
pub struct MarkdownCard {
    name: &'static str,
}

impl MarkdownCard {
    /// Card registered as `markdown`.
    #[must_use]
    pub fn new() -> Self {
        Self { name: "markdown" }
    }

    /// Same renderer under another registry name (legacy `card-markdown`).
    #[must_use]
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }
}

impl Default for MarkdownCard {
    fn default() -> Self {
        Self::new()
    }
}

impl Card for MarkdownCard {
    fn name(&self) -> &str {
        self.name
    }

    fn render(
        &self,
        env: &mut RenderEnv<'_>,
        options: &CardOptions,
        payload: &Value,
    ) -> Result<Option<NodeId>, DomError> {
        let Some(source) = decode::<MarkdownPayload>(env.name, payload)
            .and_then(|p| non_blank(p.markdown))
        else {
            return Ok(None);
        };

        let content = env.dom.create_raw_html(render_markdown(&source));
        if options.version > 1 {
            return Ok(Some(content));
        }

        let wrapper = env.dom.create_element("div");
        env.dom.set_attribute(wrapper, "class", MARKDOWN_WRAPPER_CLASS)?;
        env.dom.append_child(wrapper, content)?;
        Ok(Some(wrapper))
    }
}

/// Convert markdown source to an HTML string.
#[must_use]
pub fn render_markdown(source: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobiledoc_dom::{Document, HtmlSerializer};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(card: &MarkdownCard, version: u32, payload: &Value) -> String {
        let mut dom = Document::new();
        let mut env = RenderEnv {
            name: card.name(),
            dom: &mut dom,
        };
        let node = card
            .render(&mut env, &CardOptions { version }, payload)
            .unwrap();
        node.map(|n| HtmlSerializer::new().serialize(&dom, n))
            .unwrap_or_default()
    }

    #[test]
    fn test_render_markdown_basic() {
        assert_eq!(render_markdown("# Title\n"), "<h1>Title</h1>\n");
        assert_eq!(
            render_markdown("some *em* text"),
            "<p>some <em>em</em> text</p>\n"
        );
    }

    #[test]
    fn test_render_markdown_strikethrough() {
        assert_eq!(render_markdown("~~gone~~"), "<p><del>gone</del></p>\n");
    }

    #[test]
    fn test_render_markdown_table() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.starts_with("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_version_one_wraps_output() {
        let html = render(&MarkdownCard::new(), 1, &json!({"markdown": "hi"}));
        assert_eq!(html, "<div class=\"kg-card-markdown\"><p>hi</p>\n</div>");
    }

    #[test]
    fn test_version_two_is_bare() {
        let html = render(&MarkdownCard::new(), 2, &json!({"markdown": "hi"}));
        assert_eq!(html, "<p>hi</p>\n");
    }

    #[test]
    fn test_blank_or_missing_markdown_renders_nothing() {
        let card = MarkdownCard::new();
        assert_eq!(render(&card, 1, &json!({})), "");
        assert_eq!(render(&card, 1, &json!({"markdown": "  \n"})), "");
        assert_eq!(render(&card, 1, &json!({"markdown": 42})), "");
    }

    #[test]
    fn test_named() {
        assert_eq!(MarkdownCard::named("card-markdown").name(), "card-markdown");
        assert_eq!(MarkdownCard::default().name(), "markdown");
    }
}
