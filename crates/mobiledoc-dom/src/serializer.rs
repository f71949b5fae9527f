//! HTML serializer for arena trees.

use crate::document::Document;
use crate::node::{NodeData, NodeId};

/// Standard void elements: serialized without a closing tag or children.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Serialize a [`Document`] subtree to an HTML string.
///
/// Text escapes `&`, `<` and `>`; attribute values escape `&` and `"`.
/// Raw HTML nodes are written verbatim.
#[derive(Debug, Clone, Copy)]
pub struct HtmlSerializer<'v> {
    void_map: &'v [&'v str],
}

impl HtmlSerializer<'static> {
    /// Create a serializer using [`VOID_ELEMENTS`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            void_map: VOID_ELEMENTS,
        }
    }
}

impl Default for HtmlSerializer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'v> HtmlSerializer<'v> {
    /// Create a serializer with a custom void element list (lower-case names).
    #[must_use]
    pub fn with_void_map(void_map: &'v [&'v str]) -> Self {
        Self { void_map }
    }

    /// Whether `tag_name` is serialized as a void element.
    #[must_use]
    pub fn is_void(&self, tag_name: &str) -> bool {
        self.void_map
            .iter()
            .any(|void| void.eq_ignore_ascii_case(tag_name))
    }

    /// Serialize `node` itself (fragments serialize as their children).
    #[must_use]
    pub fn serialize(&self, dom: &Document, node: NodeId) -> String {
        let mut out = String::with_capacity(1024);
        self.write_node(dom, node, &mut out);
        out
    }

    /// Serialize the children of `node`, without the node's own tags.
    #[must_use]
    pub fn serialize_children(&self, dom: &Document, node: NodeId) -> String {
        let mut out = String::with_capacity(1024);
        for child in dom.children(node) {
            self.write_node(dom, child, &mut out);
        }
        out
    }

    fn write_node(&self, dom: &Document, id: NodeId, out: &mut String) {
        let Some(node) = dom.get(id) else {
            return;
        };
        match node.data() {
            NodeData::Fragment => {
                for child in dom.children(id) {
                    self.write_node(dom, child, out);
                }
            }
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag_name);
                for (key, value) in &el.attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    push_escaped_attr(value, out);
                    out.push('"');
                }
                out.push('>');

                if self.is_void(&el.tag_name) {
                    return;
                }

                for child in dom.children(id) {
                    self.write_node(dom, child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag_name);
                out.push('>');
            }
            NodeData::Text(text) => push_escaped_text(text, out),
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeData::RawHtml(html) => out.push_str(html),
        }
    }
}

/// Escape text content (`&`, `<`, `>`).
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped_text(text, &mut out);
    out
}

/// Escape an attribute value (`&`, `"`).
#[must_use]
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    push_escaped_attr(value, &mut out);
    out
}

fn push_escaped_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
