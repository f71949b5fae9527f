//! Post-render DOM normalization.
//!
//! Walks the rendered tree once, in document order, and gives every heading a
//! slug `id` for deep linking. The tree comes from the renderer rather than
//! from external HTML, so this works directly on the arena instead of going
//! through an HTML parser.

use std::collections::HashMap;

use mobiledoc_dom::{Document, NodeId, NodeType};

/// Characters removed before slugifying heading text.
const STRIPPED_CHARS: &[char] = &['<', '>', '&', '"', '?'];

/// Heading anchor collected while normalizing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text, trimmed.
    pub title: String,
    /// Anchor id (generated or pre-existing).
    pub id: String,
}

/// Slugs handed out during one normalization pass.
///
/// The first request for a slug returns it unchanged; later requests append
/// `-1`, `-2`, ... Suffixed ids are recorded too, so a later heading whose own
/// slug equals an earlier suffixed id is disambiguated instead of colliding.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    counts: HashMap<String, usize>,
}

impl SlugRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a unique id for `slug` and record it.
    pub fn claim(&mut self, slug: String) -> String {
        let Some(&seen) = self.counts.get(&slug) else {
            self.counts.insert(slug.clone(), 0);
            return slug;
        };

        let mut count = seen;
        let id = loop {
            count += 1;
            let candidate = format!("{slug}-{count}");
            if !self.counts.contains_key(&candidate) {
                break candidate;
            }
        };
        self.counts.insert(slug, count);
        self.counts.insert(id.clone(), 0);
        id
    }

    /// Whether `id` has been handed out.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.counts.contains_key(id)
    }
}

/// Heading-id assigner for one rendered tree.
///
/// Create one per render; the slug registry must not outlive the document.
#[derive(Debug, Default)]
pub struct DomModifier {
    slugs: SlugRegistry,
    toc: Vec<TocEntry>,
}

impl DomModifier {
    /// Create a modifier with an empty slug registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit `node`, then its descendants.
    pub fn modify(&mut self, dom: &mut Document, node: NodeId) {
        if let Some(level) = dom.tag_name(node).and_then(heading_level) {
            self.add_heading_id(dom, node, level);
        }
        self.modify_children(dom, node);
    }

    /// Visit the children of `node` in sibling order.
    pub fn modify_children(&mut self, dom: &mut Document, node: NodeId) {
        let mut next = dom.first_child(node);
        while let Some(child) = next {
            self.modify(dom, child);
            next = dom.next_sibling(child);
        }
    }

    /// Headings seen so far, in document order.
    #[must_use]
    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    /// Consume the modifier and return the collected headings.
    #[must_use]
    pub fn into_toc(self) -> Vec<TocEntry> {
        self.toc
    }

    fn add_heading_id(&mut self, dom: &mut Document, node: NodeId, level: u8) {
        if dom.first_child(node).is_none() {
            return;
        }

        let text = text_value(dom, node);
        if let Some(existing) = dom.get_attribute(node, "id").filter(|id| !id.is_empty()) {
            self.toc.push(TocEntry {
                level,
                title: text.trim().to_owned(),
                id: existing.to_owned(),
            });
            return;
        }

        let id = self.slugs.claim(slugify(&text));
        if let Err(e) = dom.set_attribute(node, "id", id.as_str()) {
            tracing::debug!(error = %e, "Failed to set heading id");
            return;
        }
        self.toc.push(TocEntry {
            level,
            title: text.trim().to_owned(),
            id,
        });
    }
}

/// Heading level for `h1`..`h6` (ASCII case-insensitive).
fn heading_level(tag_name: &str) -> Option<u8> {
    match tag_name.as_bytes() {
        [h, level @ b'1'..=b'6'] if h.eq_ignore_ascii_case(&b'h') => Some(level - b'0'),
        _ => None,
    }
}

/// Concatenate the values of all descendant text nodes in document order.
///
/// Element boundaries are ignored; comments and raw HTML contribute nothing.
#[must_use]
pub fn text_value(dom: &Document, node: NodeId) -> String {
    let mut buffer = String::new();
    push_text_value(dom, node, &mut buffer);
    buffer
}

fn push_text_value(dom: &Document, node: NodeId, buffer: &mut String) {
    for child in dom.children(node) {
        if dom.node_type(child) == Some(NodeType::Text)
            && let Some(text) = dom.text(child)
        {
            buffer.push_str(text);
        }
        push_text_value(dom, child, buffer);
    }
}

/// Convert heading text to an anchor slug.
///
/// Strips `< > & " ?`, trims surrounding whitespace, turns every run of
/// non-word characters (anything but ASCII letters, digits and `_`) into a
/// single `-`, and lower-cases the result. Trimming happens first, so text
/// with leading or trailing punctuation keeps a leading or trailing `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !STRIPPED_CHARS.contains(c))
        .collect();

    let mut slug = String::with_capacity(stripped.len());
    for c in stripped
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
        .chars()
    {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug
}
