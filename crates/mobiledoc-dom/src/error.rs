//! Error types for DOM mutation.

use crate::node::NodeId;

/// Error returned by tree mutation operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DomError {
    /// Node handle does not belong to this document.
    #[error("invalid node handle {0}")]
    InvalidNode(NodeId),

    /// Node is not a child of the given parent.
    #[error("node {child} is not a child of {parent}")]
    NotAChild {
        /// Expected parent.
        parent: NodeId,
        /// Node that was not found among the parent's children.
        child: NodeId,
    },

    /// Insertion would create a cycle or target a node that cannot have children.
    #[error("cannot insert {child} into {parent}")]
    HierarchyRequest {
        /// Target parent.
        parent: NodeId,
        /// Node being inserted.
        child: NodeId,
    },

    /// Attribute operation on a node that is not an element.
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
}
