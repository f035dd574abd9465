use std::result::Result as StdResult;

use thiserror::Error;

use crate::id::NodeId;

/// Result type for arbor operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The node id does not refer to a live node.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),
    /// The node is already attached to a parent.
    #[error("node {node:?} is already attached to a parent")]
    AlreadyAttached {
        /// The node that was being attached.
        node: NodeId,
    },
    /// The attachment would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// The prospective parent.
        parent: NodeId,
        /// The node that was being attached.
        child: NodeId,
    },
    /// The node is not a direct child of the designated parent.
    #[error("{node:?} is not a child of {parent:?}")]
    NotAChild {
        /// The parent whose child list was consulted.
        parent: NodeId,
        /// The node that was expected in it.
        node: NodeId,
    },
    /// The operation is not permitted on the root node.
    #[error("operation not permitted on the root node")]
    RootNode,
    /// A resource (image, font, texture) could not be loaded.
    ///
    /// Returned from widget hooks; the render traversal converts it into the
    /// node's failed state instead of aborting the frame.
    #[error("resource unavailable: {0}")]
    Resource(String),
    /// Rendering failure.
    #[error("render: {0}")]
    Render(String),
    /// An internal inconsistency.
    #[error("internal error: {0}")]
    Internal(String),
}
