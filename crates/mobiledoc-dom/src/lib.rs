//! Minimal DOM for rendered mobiledoc trees.
//!
//! The renderer builds its output into an arena-backed [`Document`] instead of
//! a full HTML DOM. The tree only ever comes from the renderer, so no HTML
//! parser is involved: nodes are created, linked, mutated in place and finally
//! written out by [`HtmlSerializer`].
//!
//! # Example
//!
//! ```
//! use mobiledoc_dom::{Document, HtmlSerializer};
//!
//! let mut dom = Document::new();
//! let root = dom.create_fragment();
//! let h2 = dom.create_element("h2");
//! let text = dom.create_text_node("Hello");
//! dom.append_child(h2, text).unwrap();
//! dom.append_child(root, h2).unwrap();
//! dom.set_attribute(h2, "id", "hello").unwrap();
//!
//! let html = HtmlSerializer::new().serialize_children(&dom, root);
//! assert_eq!(html, r#"<h2 id="hello">Hello</h2>"#);
//! ```

mod document;
mod error;
mod node;
mod serializer;

pub use document::{Children, Document};
pub use error::DomError;
pub use node::{ElementData, Node, NodeData, NodeId, NodeType};
pub use serializer::{HtmlSerializer, VOID_ELEMENTS, escape_attr, escape_text};
