//! Tree construction: mobiledoc sections to DOM nodes.
//!
//! [`TreeRenderer`] is the seam between the converter and whatever builds the
//! DOM. [`DomRenderer`] is the built-in implementation for mobiledoc 0.3.

use mobiledoc_dom::{Document, NodeId};

use crate::document::{Marker, MarkerValue, MarkupEntry, Mobiledoc, Section, pairs};
use crate::error::RenderError;
use crate::options::{RendererOptions, UnknownAtomArgs, UnknownCardArgs};
use crate::registry::RenderEnv;

/// Block tags a markup section may render as.
const MARKUP_SECTION_TAG_NAMES: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "aside",
];

/// Markup section rendered as `<div class="pull-quote">`.
const PULL_QUOTE_TAG_NAME: &str = "pull-quote";

const LIST_SECTION_TAG_NAMES: &[&str] = &["ul", "ol"];

/// Inline tags a marker markup may render as.
const MARKUP_TAG_NAMES: &[&str] = &["a", "b", "code", "em", "i", "s", "strong", "sub", "sup", "u"];

/// Section attributes copied onto the section element.
const SECTION_ATTRIBUTE_NAMES: &[&str] = &["data-md-text-align"];

/// Maximum number of markups open at once inside one section.
///
/// Normalization and serialization recurse per element, so the tree depth
/// must stay bounded.
pub const MAX_MARKUP_DEPTH: usize = 512;

/// Output of a tree renderer: the arena and the fragment holding the sections.
#[derive(Debug)]
pub struct RenderedTree {
    /// Arena owning every rendered node.
    pub dom: Document,
    /// Fragment whose children are the rendered sections.
    pub root: NodeId,
}

/// Builds a DOM tree from a document.
pub trait TreeRenderer: Send + Sync {
    /// Render `mobiledoc` with the given per-call options.
    fn render(
        &self,
        mobiledoc: &Mobiledoc,
        options: &RendererOptions,
    ) -> Result<RenderedTree, RenderError>;
}

/// Built-in mobiledoc 0.3 tree renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct DomRenderer;

impl TreeRenderer for DomRenderer {
    fn render(
        &self,
        mobiledoc: &Mobiledoc,
        options: &RendererOptions,
    ) -> Result<RenderedTree, RenderError> {
        mobiledoc.check_version()?;
        RenderSession::new(mobiledoc, options).render()
    }
}

/// State of one render: the document being read and the arena being built.
struct RenderSession<'a> {
    doc: &'a Mobiledoc,
    options: &'a RendererOptions,
    dom: Document,
}

impl<'a> RenderSession<'a> {
    fn new(doc: &'a Mobiledoc, options: &'a RendererOptions) -> Self {
        Self {
            doc,
            options,
            dom: Document::new(),
        }
    }

    fn render(mut self) -> Result<RenderedTree, RenderError> {
        let root = self.dom.create_fragment();
        let doc = self.doc;
        for section in &doc.sections {
            if let Some(node) = self.render_section(section)? {
                self.dom.append_child(root, node)?;
            }
        }
        Ok(RenderedTree {
            dom: self.dom,
            root,
        })
    }

    fn render_section(&mut self, section: &Section) -> Result<Option<NodeId>, RenderError> {
        match section {
            Section::Markup {
                tag_name,
                markers,
                attributes,
            } => self.render_markup_section(tag_name, markers, attributes),
            Section::Image { src } => {
                let img = self.dom.create_element("img");
                self.dom.set_attribute(img, "src", src.as_str())?;
                Ok(Some(img))
            }
            Section::List {
                tag_name,
                items,
                attributes,
            } => self.render_list_section(tag_name, items, attributes),
            Section::Card { index } => self.render_card(*index),
        }
    }

    fn render_markup_section(
        &mut self,
        tag_name: &str,
        markers: &[Marker],
        attributes: &[String],
    ) -> Result<Option<NodeId>, RenderError> {
        let tag_name = tag_name.to_ascii_lowercase();
        let element = if MARKUP_SECTION_TAG_NAMES.contains(&tag_name.as_str()) {
            self.dom.create_element(&tag_name)
        } else if tag_name == PULL_QUOTE_TAG_NAME {
            let div = self.dom.create_element("div");
            self.dom.set_attribute(div, "class", PULL_QUOTE_TAG_NAME)?;
            div
        } else {
            tracing::debug!(tag = %tag_name, "Skipping markup section with unsupported tag");
            return Ok(None);
        };

        self.apply_section_attributes(element, attributes)?;
        self.render_markers(element, markers)?;
        Ok(Some(element))
    }

    fn render_list_section(
        &mut self,
        tag_name: &str,
        items: &[Vec<Marker>],
        attributes: &[String],
    ) -> Result<Option<NodeId>, RenderError> {
        let tag_name = tag_name.to_ascii_lowercase();
        if !LIST_SECTION_TAG_NAMES.contains(&tag_name.as_str()) {
            tracing::debug!(tag = %tag_name, "Skipping list section with unsupported tag");
            return Ok(None);
        }

        let list = self.dom.create_element(&tag_name);
        self.apply_section_attributes(list, attributes)?;
        for markers in items {
            let item = self.dom.create_element("li");
            self.render_markers(item, markers)?;
            self.dom.append_child(list, item)?;
        }
        Ok(Some(list))
    }

    fn apply_section_attributes(
        &mut self,
        element: NodeId,
        attributes: &[String],
    ) -> Result<(), RenderError> {
        for (name, value) in pairs(attributes) {
            if SECTION_ATTRIBUTE_NAMES.contains(&name) {
                self.dom.set_attribute(element, name, value)?;
            }
        }
        Ok(())
    }

    /// Render markers into `parent`, maintaining the stack of open markups.
    fn render_markers(&mut self, parent: NodeId, markers: &[Marker]) -> Result<(), RenderError> {
        let doc = self.doc;
        let mut open = vec![parent];

        for marker in markers {
            for &index in &marker.open_markups {
                let markup = doc
                    .markups
                    .get(index)
                    .ok_or(RenderError::MissingMarkup { index })?;
                if open.len() > MAX_MARKUP_DEPTH {
                    return Err(RenderError::NestingTooDeep {
                        limit: MAX_MARKUP_DEPTH,
                    });
                }
                let current = open.last().copied().unwrap_or(parent);
                match self.render_markup(markup)? {
                    Some(element) => {
                        self.dom.append_child(current, element)?;
                        open.push(element);
                    }
                    // Unsupported tag: keep the content, drop the wrapper.
                    None => open.push(current),
                }
            }

            let current = open.last().copied().unwrap_or(parent);
            let content = match &marker.value {
                MarkerValue::Text(text) => Some(self.dom.create_text_node(text.as_str())),
                MarkerValue::Atom(index) => self.render_atom(*index)?,
            };
            if let Some(node) = content {
                self.dom.append_child(current, node)?;
            }

            for _ in 0..marker.close_count {
                if open.len() <= 1 {
                    return Err(RenderError::UnbalancedMarkup);
                }
                open.pop();
            }
        }
        Ok(())
    }

    fn render_markup(&mut self, markup: &MarkupEntry) -> Result<Option<NodeId>, RenderError> {
        let tag_name = markup.tag_name.to_ascii_lowercase();
        if !MARKUP_TAG_NAMES.contains(&tag_name.as_str()) {
            tracing::debug!(tag = %tag_name, "Dropping unsupported markup tag");
            return Ok(None);
        }
        let element = self.dom.create_element(&tag_name);
        for (name, value) in markup.attribute_pairs() {
            self.dom.set_attribute(element, name, value)?;
        }
        Ok(Some(element))
    }

    fn render_card(&mut self, index: usize) -> Result<Option<NodeId>, RenderError> {
        let doc = self.doc;
        let options = self.options;
        let entry = doc
            .cards
            .get(index)
            .ok_or(RenderError::MissingCard { index })?;

        let Some(card) = options.cards.get(&entry.name) else {
            (options.unknown_card_handler)(&UnknownCardArgs {
                name: &entry.name,
                payload: &entry.payload,
            });
            return Ok(None);
        };

        let mut env = RenderEnv {
            name: &entry.name,
            dom: &mut self.dom,
        };
        Ok(card.render(&mut env, &options.card_options, &entry.payload)?)
    }

    fn render_atom(&mut self, index: usize) -> Result<Option<NodeId>, RenderError> {
        let doc = self.doc;
        let options = self.options;
        let entry = doc
            .atoms
            .get(index)
            .ok_or(RenderError::MissingAtom { index })?;

        let Some(atom) = options.atoms.get(&entry.name) else {
            (options.unknown_atom_handler)(&UnknownAtomArgs {
                name: &entry.name,
                value: &entry.value,
                payload: &entry.payload,
            });
            return Ok(None);
        };

        let mut env = RenderEnv {
            name: &entry.name,
            dom: &mut self.dom,
        };
        Ok(atom.render(
            &mut env,
            &options.card_options,
            &entry.value,
            &entry.payload,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use mobiledoc_dom::{DomError, HtmlSerializer};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::options::CardOptions;
    use crate::registry::{Atom, AtomRegistry, Card, CardRegistry};

    struct VersionCard;

    impl Card for VersionCard {
        fn name(&self) -> &str {
            "version"
        }

        fn render(
            &self,
            env: &mut RenderEnv<'_>,
            options: &CardOptions,
            _payload: &Value,
        ) -> Result<Option<NodeId>, DomError> {
            let div = env.dom.create_element("div");
            env.dom
                .set_attribute(div, "data-version", options.version.to_string())?;
            Ok(Some(div))
        }
    }

    struct EmptyCard;

    impl Card for EmptyCard {
        fn name(&self) -> &str {
            "empty"
        }

        fn render(
            &self,
            _env: &mut RenderEnv<'_>,
            _options: &CardOptions,
            _payload: &Value,
        ) -> Result<Option<NodeId>, DomError> {
            Ok(None)
        }
    }

    struct Mention;

    impl Atom for Mention {
        fn name(&self) -> &str {
            "mention"
        }

        fn render(
            &self,
            env: &mut RenderEnv<'_>,
            _options: &CardOptions,
            value: &str,
            _payload: &Value,
        ) -> Result<Option<NodeId>, DomError> {
            let span = env.dom.create_element("span");
            env.dom.set_attribute(span, "class", "mention")?;
            let text = env.dom.create_text_node(value);
            env.dom.append_child(span, text)?;
            Ok(Some(span))
        }
    }

    fn options() -> RendererOptions {
        RendererOptions::new(
            CardRegistry::new().with(VersionCard).with(EmptyCard),
            AtomRegistry::new().with(Mention),
        )
    }

    fn render_with(options: &RendererOptions, value: Value) -> Result<String, RenderError> {
        let doc = Mobiledoc::from_value(value)?;
        let tree = DomRenderer.render(&doc, options)?;
        Ok(HtmlSerializer::new().serialize_children(&tree.dom, tree.root))
    }

    fn render(value: Value) -> String {
        render_with(&options(), value).unwrap()
    }

    #[test]
    fn test_markup_sections() {
        let html = render(json!({
            "version": "0.3.1",
            "sections": [
                [1, "H2", [[0, [], 0, "Title"]]],
                [1, "p", [[0, [], 0, "Body"]]],
                [1, "blockquote", [[0, [], 0, "Quote"]]]
            ]
        }));
        assert_eq!(
            html,
            "<h2>Title</h2><p>Body</p><blockquote>Quote</blockquote>"
        );
    }

    #[test]
    fn test_pull_quote_and_unsupported_section_tag() {
        let html = render(json!({
            "version": "0.3.1",
            "sections": [
                [1, "pull-quote", [[0, [], 0, "Pulled"]]],
                [1, "marquee", [[0, [], 0, "Dropped"]]]
            ]
        }));
        assert_eq!(html, r#"<div class="pull-quote">Pulled</div>"#);
    }

    #[test]
    fn test_nested_markups() {
        let html = render(json!({
            "version": "0.3.1",
            "markups": [["a", ["href", "https://example.com", "rel", "noopener"]], ["strong"]],
            "sections": [[1, "p", [
                [0, [0], 0, "link "],
                [0, [1], 2, "bold"],
                [0, [], 0, " tail"]
            ]]]
        }));
        assert_eq!(
            html,
            r#"<p><a href="https://example.com" rel="noopener">link <strong>bold</strong></a> tail</p>"#
        );
    }

    #[test]
    fn test_unsupported_markup_keeps_text() {
        let html = render(json!({
            "version": "0.3.1",
            "markups": [["blink"], ["em"]],
            "sections": [[1, "p", [[0, [0, 1], 2, "x"], [0, [], 0, "y"]]]]
        }));
        assert_eq!(html, "<p><em>x</em>y</p>");
    }

    #[test]
    fn test_image_and_list_sections() {
        let html = render(json!({
            "version": "0.3.1",
            "sections": [
                [2, "/a.png"],
                [3, "ol", [[[0, [], 0, "one"]], [[0, [], 0, "two"]]]],
                [3, "dl", [[[0, [], 0, "dropped"]]]]
            ]
        }));
        assert_eq!(html, r#"<img src="/a.png"><ol><li>one</li><li>two</li></ol>"#);
    }

    #[test]
    fn test_section_attribute_allowlist() {
        let html = render(json!({
            "version": "0.3.2",
            "sections": [[1, "p", [[0, [], 0, "x"]], ["data-md-text-align", "center", "onclick", "x()"]]]
        }));
        assert_eq!(html, r#"<p data-md-text-align="center">x</p>"#);
    }

    #[test]
    fn test_cards_receive_card_options() {
        let options = options().with_card_options(CardOptions { version: 2 });
        let html = render_with(
            &options,
            json!({
                "version": "0.3.1",
                "cards": [["version", {}], ["empty", {}]],
                "sections": [[10, 0], [10, 1]]
            }),
        )
        .unwrap();
        assert_eq!(html, r#"<div data-version="2"></div>"#);
    }

    #[test]
    fn test_atoms() {
        let html = render(json!({
            "version": "0.3.1",
            "atoms": [["mention", "@bob", {}]],
            "sections": [[1, "p", [[0, [], 0, "hi "], [1, [], 0, 0]]]]
        }));
        assert_eq!(html, r#"<p>hi <span class="mention">@bob</span></p>"#);
    }

    #[test]
    fn test_unknown_card_reported_once_and_skipped() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let options =
            options().with_unknown_card_handler(move |args| sink.lock().unwrap().push(args.name.to_owned()));

        let html = render_with(
            &options,
            json!({
                "version": "0.3.1",
                "cards": [["gallery", {"images": []}]],
                "sections": [[1, "p", [[0, [], 0, "before"]]], [10, 0], [1, "p", [[0, [], 0, "after"]]]]
            }),
        )
        .unwrap();

        assert_eq!(html, "<p>before</p><p>after</p>");
        assert_eq!(*calls.lock().unwrap(), vec!["gallery".to_owned()]);
    }

    #[test]
    fn test_unknown_atom_reported_and_skipped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let options = options().with_unknown_atom_handler(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let html = render_with(
            &options,
            json!({
                "version": "0.3.1",
                "atoms": [["emoji", ":)", {}]],
                "sections": [[1, "p", [[0, [], 0, "a"], [1, [], 0, 0]]]]
            }),
        )
        .unwrap();

        assert_eq!(html, "<p>a</p>");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_card_index_is_an_error() {
        let err = render_with(
            &options(),
            json!({"version": "0.3.1", "sections": [[10, 3]]}),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::MissingCard { index: 3 }));
    }

    #[test]
    fn test_missing_markup_index_is_an_error() {
        let err = render_with(
            &options(),
            json!({"version": "0.3.1", "sections": [[1, "p", [[0, [4], 1, "x"]]]]}),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::MissingMarkup { index: 4 }));
    }

    #[test]
    fn test_missing_atom_index_is_an_error() {
        let err = render_with(
            &options(),
            json!({"version": "0.3.1", "sections": [[1, "p", [[1, [], 0, 9]]]]}),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::MissingAtom { index: 9 }));
    }

    #[test]
    fn test_unbalanced_close_is_an_error() {
        let err = render_with(
            &options(),
            json!({"version": "0.3.1", "sections": [[1, "p", [[0, [], 1, "x"]]]]}),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::UnbalancedMarkup));
    }

    fn nested_em(depth: usize) -> Value {
        json!({
            "version": "0.3.1",
            "markups": [["em"]],
            "sections": [[1, "h2", [[0, vec![0; depth], depth, "deep"]]]]
        })
    }

    #[test]
    fn test_markup_nesting_at_limit_renders() {
        let html = render(nested_em(MAX_MARKUP_DEPTH));
        assert!(html.starts_with("<h2><em><em>"));
        assert!(html.contains("deep"));
    }

    #[test]
    fn test_markup_nesting_past_limit_is_an_error() {
        let err = render_with(&options(), nested_em(20_000)).unwrap_err();
        assert!(matches!(
            err,
            RenderError::NestingTooDeep {
                limit: MAX_MARKUP_DEPTH
            }
        ));
    }

    #[test]
    fn test_unsupported_document_version() {
        let mut doc = Mobiledoc::new("0.2.0");
        doc.sections.push(Section::Image {
            src: "/x.png".to_owned(),
        });
        let err = DomRenderer.render(&doc, &options()).unwrap_err();
        assert!(matches!(err, RenderError::Document(_)));
    }
}
