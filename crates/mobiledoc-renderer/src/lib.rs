//! Mobiledoc to HTML renderer.
//!
//! This crate turns a mobiledoc document (sections of text markup, block-level
//! cards and inline atoms) into HTML. Cards and atoms are resolved through
//! name-keyed registries supplied by the caller.
//!
//! # Architecture
//!
//! - [`TreeRenderer`]: builds a DOM tree from a document ([`DomRenderer`] is the
//!   built-in mobiledoc 0.3 implementation)
//! - [`DomModifier`]: post-render pass that gives every heading a unique slug id
//! - [`MobiledocConverter`]: runs render, normalization, trailing-paragraph
//!   trimming and serialization for one call
//!
//! Base [`RendererOptions`] are shared read-only; each render overlays its own
//! [`CardOptions`] on a copy.
//!
//! # Example
//!
//! ```
//! use mobiledoc_renderer::{Mobiledoc, MobiledocConverter, RendererOptions};
//!
//! let doc = Mobiledoc::from_json(
//!     r#"{"version": "0.3.1", "sections": [[1, "h2", [[0, [], 0, "FAQ"]]], [1, "h2", [[0, [], 0, "FAQ"]]]]}"#,
//! )
//! .unwrap();
//! let converter = MobiledocConverter::new(RendererOptions::default());
//! let html = converter.render(&doc, Some(2)).unwrap();
//! assert_eq!(html, r#"<h2 id="faq">FAQ</h2><h2 id="faq-1">FAQ</h2>"#);
//! ```

mod converter;
mod document;
mod error;
mod modifier;
mod options;
mod registry;
mod tree;

pub use converter::{
    DEFAULT_VERSION, MobiledocConverter, RenderOutput, resolve_version, strip_trailing_paragraph,
};
pub use document::{
    AtomEntry, CardEntry, Marker, MarkerValue, MarkupEntry, Mobiledoc, SUPPORTED_VERSION_PREFIX,
    Section,
};
pub use error::{DocumentError, RenderError};
pub use modifier::{DomModifier, SlugRegistry, TocEntry, slugify, text_value};
pub use options::{
    CardOptions, RendererOptions, UnknownAtomArgs, UnknownAtomHandler, UnknownCardArgs,
    UnknownCardHandler, log_unknown_atom, log_unknown_card,
};
pub use registry::{Atom, AtomRegistry, Card, CardRegistry, Registry, RenderEnv};
pub use tree::{DomRenderer, MAX_MARKUP_DEPTH, RenderedTree, TreeRenderer};
