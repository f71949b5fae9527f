//! Mobiledoc to HTML conversion.
//!
//! [`MobiledocConverter`] ties the pieces together for one render call:
//!
//! 1. derive per-call options from the shared base with the version overlaid
//! 2. build the tree with a [`TreeRenderer`]
//! 3. assign heading ids with [`DomModifier`]
//! 4. drop the trailing empty paragraph the editor leaves behind
//! 5. serialize to HTML

use mobiledoc_dom::{Document, DomError, HtmlSerializer, NodeId};

use crate::document::Mobiledoc;
use crate::error::RenderError;
use crate::modifier::{DomModifier, TocEntry};
use crate::options::{CardOptions, RendererOptions};
use crate::tree::{DomRenderer, RenderedTree, TreeRenderer};

/// Render profile used when no version (or `0`) is requested.
pub const DEFAULT_VERSION: u32 = 1;

/// Result of a render call.
#[derive(Clone, Debug)]
pub struct RenderOutput {
    /// Serialized HTML.
    pub html: String,
    /// Headings with their anchor ids, in document order.
    pub toc: Vec<TocEntry>,
}

/// Converts mobiledoc documents to HTML.
///
/// The converter holds the base [`RendererOptions`] and never mutates them,
/// so a single instance can serve concurrent renders with different versions.
///
/// # Example
///
/// ```
/// use mobiledoc_renderer::{MobiledocConverter, RendererOptions};
///
/// let converter = MobiledocConverter::new(RendererOptions::default());
/// let html = converter
///     .render_json(
///         r#"{"version": "0.3.1", "sections": [[1, "h2", [[0, [], 0, "Hello World"]]], [1, "p", []]]}"#,
///         None,
///     )
///     .unwrap();
/// assert_eq!(html, r#"<h2 id="hello-world">Hello World</h2>"#);
/// ```
#[derive(Debug)]
pub struct MobiledocConverter<R: TreeRenderer = DomRenderer> {
    options: RendererOptions,
    renderer: R,
    serializer: HtmlSerializer<'static>,
}

impl MobiledocConverter<DomRenderer> {
    /// Create a converter using the built-in [`DomRenderer`].
    #[must_use]
    pub fn new(options: RendererOptions) -> Self {
        Self::with_renderer(options, DomRenderer)
    }
}

impl<R: TreeRenderer> MobiledocConverter<R> {
    /// Create a converter with a custom tree renderer.
    #[must_use]
    pub fn with_renderer(options: RendererOptions, renderer: R) -> Self {
        Self {
            options,
            renderer,
            serializer: HtmlSerializer::new(),
        }
    }

    /// Base options shared by every render.
    #[must_use]
    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    /// Render a document to HTML.
    ///
    /// `version` selects the card render profile; `None` and `Some(0)` mean
    /// [`DEFAULT_VERSION`].
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be rendered at all (unsupported
    /// format version, dangling card/atom/markup references). Unknown card and
    /// atom names are reported through the option handlers instead.
    pub fn render(
        &self,
        mobiledoc: &Mobiledoc,
        version: Option<u32>,
    ) -> Result<String, RenderError> {
        Ok(self.render_output(mobiledoc, version)?.html)
    }

    /// Parse a JSON document and render it to HTML.
    pub fn render_json(&self, json: &str, version: Option<u32>) -> Result<String, RenderError> {
        let mobiledoc = Mobiledoc::from_json(json)?;
        self.render(&mobiledoc, version)
    }

    /// Render a document to HTML and collect its headings.
    pub fn render_output(
        &self,
        mobiledoc: &Mobiledoc,
        version: Option<u32>,
    ) -> Result<RenderOutput, RenderError> {
        let (tree, toc) = self.normalize(mobiledoc, version)?;
        let html = self.serializer.serialize_children(&tree.dom, tree.root);
        Ok(RenderOutput { html, toc })
    }

    /// Render a document to a normalized tree without serializing it.
    pub fn render_tree(
        &self,
        mobiledoc: &Mobiledoc,
        version: Option<u32>,
    ) -> Result<RenderedTree, RenderError> {
        Ok(self.normalize(mobiledoc, version)?.0)
    }

    fn normalize(
        &self,
        mobiledoc: &Mobiledoc,
        version: Option<u32>,
    ) -> Result<(RenderedTree, Vec<TocEntry>), RenderError> {
        let version = resolve_version(version);
        let options = self.options.with_card_options(CardOptions { version });

        let RenderedTree { mut dom, root } = self.renderer.render(mobiledoc, &options)?;

        let mut modifier = DomModifier::new();
        modifier.modify_children(&mut dom, root);
        let toc = modifier.into_toc();

        let stripped = strip_trailing_paragraph(&mut dom, root)?;

        tracing::debug!(
            version,
            sections = mobiledoc.sections.len(),
            headings = toc.len(),
            stripped_trailing_paragraph = stripped,
            "Rendered mobiledoc"
        );

        Ok((RenderedTree { dom, root }, toc))
    }
}

/// Map a requested version to the render profile actually used.
#[must_use]
pub fn resolve_version(version: Option<u32>) -> u32 {
    match version {
        None | Some(0) => DEFAULT_VERSION,
        Some(version) => version,
    }
}

/// Remove the last child of `root` if it is a `<p>` without children.
///
/// Returns whether a paragraph was removed.
pub fn strip_trailing_paragraph(dom: &mut Document, root: NodeId) -> Result<bool, DomError> {
    let Some(last) = dom.last_child(root) else {
        return Ok(false);
    };
    if !dom.is_element(last, "p") || dom.first_child(last).is_some() {
        return Ok(false);
    }
    dom.remove_child(root, last)?;
    Ok(true)
}
