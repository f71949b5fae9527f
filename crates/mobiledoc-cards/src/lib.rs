//! Built-in mobiledoc cards and atoms.
//!
//! | Name | Output |
//! |------|--------|
//! | `markdown`, `card-markdown` | Markdown converted to HTML (wrapped in `div.kg-card-markdown` for version 1) |
//! | `html` | Raw HTML |
//! | `hr` | `<hr>` |
//! | `image` | `figure.kg-card.kg-image-card` with `img.kg-image` |
//! | `code` | `<pre><code class="language-X">` |
//! | `embed` | `figure.kg-card.kg-embed-card` around raw HTML |
//! | `soft-return` (atom) | `<br>` |
//!
//! A card with an empty or missing payload renders nothing.

mod atoms;
mod code;
mod divider;
mod embed;
mod image;
mod markdown;
mod payload;

pub use atoms::SoftReturnAtom;
pub use code::CodeCard;
pub use divider::HrCard;
pub use embed::{EmbedCard, HtmlCard};
pub use image::ImageCard;
pub use markdown::{MARKDOWN_WRAPPER_CLASS, MarkdownCard, render_markdown};

use mobiledoc_renderer::{AtomRegistry, CardRegistry, RendererOptions};

/// Registry with every built-in card.
#[must_use]
pub fn default_cards() -> CardRegistry {
    CardRegistry::new()
        .with(MarkdownCard::new())
        .with(MarkdownCard::named("card-markdown"))
        .with(HtmlCard)
        .with(HrCard)
        .with(ImageCard)
        .with(CodeCard)
        .with(EmbedCard)
}

/// Registry with every built-in atom.
#[must_use]
pub fn default_atoms() -> AtomRegistry {
    AtomRegistry::new().with(SoftReturnAtom)
}

/// Renderer options using the built-in cards and atoms.
#[must_use]
pub fn default_options() -> RendererOptions {
    RendererOptions::new(default_cards(), default_atoms())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobiledoc_renderer::{Mobiledoc, MobiledocConverter};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn render(doc: Value, version: Option<u32>) -> String {
        let doc = Mobiledoc::from_value(doc).unwrap();
        MobiledocConverter::new(default_options())
            .render(&doc, version)
            .unwrap()
    }

    fn markdown_doc(markdown: &str) -> Value {
        json!({
            "version": "0.3.1",
            "cards": [["card-markdown", {"markdown": markdown}]],
            "sections": [[10, 0], [1, "p", []]]
        })
    }

    #[test]
    fn test_default_registries() {
        assert_eq!(
            default_cards().names(),
            vec!["card-markdown", "code", "embed", "hr", "html", "image", "markdown"]
        );
        assert_eq!(default_atoms().names(), vec!["soft-return"]);
    }

    #[test]
    fn test_markdown_document_version_one() {
        assert_eq!(
            render(markdown_doc("Hello"), None),
            "<div class=\"kg-card-markdown\"><p>Hello</p>\n</div>"
        );
    }

    #[test]
    fn test_markdown_document_version_two() {
        assert_eq!(render(markdown_doc("Hello"), Some(2)), "<p>Hello</p>\n");
    }

    #[test]
    fn test_mixed_document() {
        let html = render(
            json!({
                "version": "0.3.1",
                "atoms": [["soft-return", "", {}]],
                "cards": [
                    ["hr", {}],
                    ["image", {"src": "/cat.jpg", "caption": "Cat"}]
                ],
                "markups": [["strong"]],
                "sections": [
                    [1, "h1", [[0, [], 0, "Intro"]]],
                    [1, "p", [[0, [0], 1, "Line"], [1, [], 0, 0], [0, [], 0, "next"]]],
                    [10, 0],
                    [1, "h1", [[0, [], 0, "Intro"]]],
                    [10, 1]
                ]
            }),
            Some(2),
        );
        assert_eq!(
            html,
            concat!(
                r#"<h1 id="intro">Intro</h1>"#,
                "<p><strong>Line</strong><br>next</p>",
                "<hr>",
                r#"<h1 id="intro-1">Intro</h1>"#,
                r#"<figure class="kg-card kg-image-card"><img src="/cat.jpg" class="kg-image">"#,
                "<figcaption>Cat</figcaption></figure>"
            )
        );
    }

    #[test]
    fn test_markdown_headings_are_untouched() {
        let html = render(markdown_doc("# Title"), Some(2));
        assert_eq!(html, "<h1>Title</h1>\n");
    }

    #[test]
    fn test_empty_payload_card_renders_nothing() {
        let html = render(
            json!({
                "version": "0.3.1",
                "cards": [["image", {}], ["html", {"html": "<b>x</b>"}]],
                "sections": [[10, 0], [10, 1]]
            }),
            Some(2),
        );
        assert_eq!(html, "<b>x</b>");
    }
}
