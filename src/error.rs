use thiserror::Error;

use crate::node::NodeId;

/// Errors returned by the tree API when a caller addresses the wrong kind of node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The node is a leaf; only branches have children and expansion state.
    #[error("node {0:?} is a leaf and has no children")]
    NotABranch(NodeId),
    /// The id does not belong to this tree.
    #[error("node {0:?} does not exist in this tree")]
    UnknownNode(NodeId),
}

/// Reasons a preview could not be drawn. These never reach the user.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PreviewError {
    /// The key no longer resolves to an item of the catalog.
    #[error("key no longer resolves to a catalog item")]
    StaleKey,
    /// A resource the preview needs (image, cardset, ...) is missing.
    #[error("preview resource unavailable: {0}")]
    Unavailable(String),
}
