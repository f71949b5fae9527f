//! Arena-backed document tree.
//!
//! All nodes created for one render live in a single [`Document`]. Tree links
//! (`parent`, `first_child`, `next_sibling`, ...) are stored as [`NodeId`]
//! indices into the arena, so traversal never needs shared ownership.

use crate::error::DomError;
use crate::node::{ElementData, Node, NodeData, NodeId, NodeType};

/// Arena owning every node of one rendered tree.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node::new(data));
        id
    }

    /// Create a detached element. The tag name is stored lower-cased.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeData::Element(ElementData {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: Vec::new(),
        }))
    }

    /// Create a detached text node.
    pub fn create_text_node(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(text.into()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Comment(text.into()))
    }

    /// Create a detached raw HTML node, serialized verbatim.
    pub fn create_raw_html(&mut self, html: impl Into<String>) -> NodeId {
        self.alloc(NodeData::RawHtml(html.into()))
    }

    /// Create an empty document fragment.
    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeData::Fragment)
    }

    /// Number of nodes allocated in the arena (attached or not).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by handle.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes.get(id.index()).ok_or(DomError::InvalidNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(DomError::InvalidNode(id))
    }

    /// Node type of `id`.
    #[must_use]
    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.get(id).map(Node::node_type)
    }

    /// Lower-cased tag name if `id` is an element.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Element(el) => Some(el.tag_name.as_str()),
            _ => None,
        }
    }

    /// Whether `id` is an element named `tag` (ASCII case-insensitive).
    #[must_use]
    pub fn is_element(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    /// Value of a text node.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// First child of `id`.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.first_child
    }

    /// Last child of `id`.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.last_child
    }

    /// Next sibling of `id`.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.next_sibling
    }

    /// Previous sibling of `id`.
    #[must_use]
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.previous_sibling
    }

    /// Iterate over the children of `id` in sibling order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            dom: self,
            next: self.first_child(id),
        }
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A child attached elsewhere is moved. Appending a fragment moves the
    /// fragment's children and leaves the fragment empty.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference` (append when `None`).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        if !self.node(parent)?.data.can_have_children() {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        let child_is_fragment = matches!(self.node(child)?.data, NodeData::Fragment);
        if let Some(reference) = reference
            && self.node(reference)?.parent != Some(parent)
        {
            return Err(DomError::NotAChild {
                parent,
                child: reference,
            });
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        if child_is_fragment {
            while let Some(grandchild) = self.first_child(child) {
                self.detach(grandchild);
                self.link(parent, grandchild, reference);
            }
            return Ok(());
        }

        if reference == Some(child) {
            return Ok(());
        }
        self.detach(child);
        self.link(parent, child, reference);
        Ok(())
    }

    /// Remove `child` from `parent` and return it detached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        self.node(parent)?;
        if self.node(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(child)
    }

    /// Attribute value of element `id`.
    #[must_use]
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attributes of `id` in insertion order (empty for non-elements).
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        match self.get(id).map(|node| &node.data) {
            Some(NodeData::Element(el)) => &el.attrs,
            _ => &[],
        }
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let NodeData::Element(el) = &mut self.node_mut(id)?.data else {
            return Err(DomError::NotAnElement(id));
        };
        let value = value.into();
        match el.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => el.attrs.push((name.to_owned(), value)),
        }
        Ok(())
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<String>, DomError> {
        let NodeData::Element(el) = &mut self.node_mut(id)?.data else {
            return Err(DomError::NotAnElement(id));
        };
        let position = el.attrs.iter().position(|(key, _)| key == name);
        Ok(position.map(|index| el.attrs.remove(index).1))
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Unlink `id` from its parent and siblings. Ids must be valid.
    fn detach(&mut self, id: NodeId) {
        let node = &self.nodes[id.index()];
        let Some(parent) = node.parent else {
            return;
        };
        let (previous, next) = (node.previous_sibling, node.next_sibling);

        match previous {
            Some(prev) => self.nodes[prev.index()].next_sibling = next,
            None => self.nodes[parent.index()].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next.index()].previous_sibling = previous,
            None => self.nodes[parent.index()].last_child = previous,
        }

        let node = &mut self.nodes[id.index()];
        node.parent = None;
        node.previous_sibling = None;
        node.next_sibling = None;
    }

    /// Link a detached `child` under `parent` before `reference`. Ids must be valid.
    fn link(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let previous = match reference {
            Some(reference) => self.nodes[reference.index()].previous_sibling,
            None => self.nodes[parent.index()].last_child,
        };

        {
            let node = &mut self.nodes[child.index()];
            node.parent = Some(parent);
            node.previous_sibling = previous;
            node.next_sibling = reference;
        }

        match previous {
            Some(prev) => self.nodes[prev.index()].next_sibling = Some(child),
            None => self.nodes[parent.index()].first_child = Some(child),
        }
        match reference {
            Some(reference) => self.nodes[reference.index()].previous_sibling = Some(child),
            None => self.nodes[parent.index()].last_child = Some(child),
        }
    }
}

/// Iterator over a node's children, following `next_sibling` links.
pub struct Children<'a> {
    dom: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.dom.next_sibling(current);
        Some(current)
    }
}
