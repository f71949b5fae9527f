//! Node storage for the arena DOM.

use std::fmt;

/// Handle to a node in a [`Document`](crate::Document).
///
/// Handles are only meaningful for the document that created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of a node, mirroring the DOM `nodeType` discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (`nodeType` 1).
    Element,
    /// Text node (`nodeType` 3).
    Text,
    /// Comment node (`nodeType` 8).
    Comment,
    /// Document fragment (`nodeType` 11).
    Fragment,
    /// Pre-serialized HTML inserted verbatim.
    RawHtml,
}

impl NodeType {
    /// Numeric DOM `nodeType` value. Raw HTML has no DOM counterpart and reports `-1`.
    #[must_use]
    pub fn code(self) -> i16 {
        match self {
            Self::Element => 1,
            Self::Text => 3,
            Self::Comment => 8,
            Self::Fragment => 11,
            Self::RawHtml => -1,
        }
    }
}

/// Element name and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Lower-cased tag name.
    pub tag_name: String,
    /// Attributes in insertion order.
    pub attrs: Vec<(String, String)>,
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Document fragment (children only).
    Fragment,
    /// Element with tag name and attributes.
    Element(ElementData),
    /// Text content.
    Text(String),
    /// Comment content.
    Comment(String),
    /// Opaque HTML emitted as-is by the serializer.
    RawHtml(String),
}

impl NodeData {
    /// Node type of this payload.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Fragment => NodeType::Fragment,
            Self::Element(_) => NodeType::Element,
            Self::Text(_) => NodeType::Text,
            Self::Comment(_) => NodeType::Comment,
            Self::RawHtml(_) => NodeType::RawHtml,
        }
    }

    /// Whether nodes of this kind may have children.
    pub(crate) fn can_have_children(&self) -> bool {
        matches!(self, Self::Fragment | Self::Element(_))
    }
}

/// A node in the arena with its tree links.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) last_child: Option<NodeId>,
    pub(crate) previous_sibling: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            previous_sibling: None,
            next_sibling: None,
        }
    }

    /// Node payload.
    #[must_use]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Node type.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    /// Parent node, if attached.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// First child.
    #[must_use]
    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    /// Last child.
    #[must_use]
    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    /// Previous sibling.
    #[must_use]
    pub fn previous_sibling(&self) -> Option<NodeId> {
        self.previous_sibling
    }

    /// Next sibling.
    #[must_use]
    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }
}
