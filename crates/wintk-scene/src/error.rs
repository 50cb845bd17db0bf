#![forbid(unsafe_code)]

//! Tree and compositor errors.

use wintk_core::{Rect, Size};

use crate::tree::NodeId;

/// Error produced by tree operations.
///
/// Everything here is recoverable for the tree as a whole. A stale
/// [`NodeId`] means the caller should refresh its handle; a bounds failure
/// means the caller should skip the paint. Contract violations are fatal to
/// the offending drawable only: the tree detaches it and reports what
/// happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// The node id does not name a live node.
    NodeNotFound(NodeId),
    /// The operation needs a container node.
    NotABranch(NodeId),
    /// The root surface cannot be detached, restacked or resized away.
    IsRoot(NodeId),
    /// Strict bounds are enabled and the rectangle does not fit the parent.
    OutOfBounds {
        /// The offending rectangle, in the parent's coordinates.
        rect: Rect,
        /// The parent's own bounds.
        bounds: Rect,
    },
    /// The drawable is already attached to this tree as the given node.
    AlreadyAttached(NodeId),
    /// The node's drawable does not accept focus.
    NotFocusable(NodeId),
    /// The producer dropped its drawable; the node has been detached.
    DrawableGone(NodeId),
    /// A drawable produced a grid that does not match its declared rect.
    /// The drawable has been detached.
    ContractViolation {
        /// The node that was detached.
        node: NodeId,
        /// The size its rect declared.
        expected: Size,
        /// The size its grid actually had.
        got: Size,
    },
}

impl core::fmt::Display for TreeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node {id:?} not found"),
            Self::NotABranch(id) => write!(f, "node {id:?} is not a container"),
            Self::IsRoot(id) => write!(f, "node {id:?} is the root surface"),
            Self::OutOfBounds { rect, bounds } => {
                write!(f, "rect {rect:?} does not fit within {bounds:?}")
            }
            Self::AlreadyAttached(id) => {
                write!(f, "drawable is already attached as node {id:?}")
            }
            Self::NotFocusable(id) => write!(f, "node {id:?} does not accept focus"),
            Self::DrawableGone(id) => {
                write!(f, "drawable for node {id:?} was dropped by its owner")
            }
            Self::ContractViolation { node, expected, got } => write!(
                f,
                "node {node:?} produced a {}x{} grid for a {}x{} rect",
                got.width(),
                got.height(),
                expected.width(),
                expected.height()
            ),
        }
    }
}

impl std::error::Error for TreeError {}
