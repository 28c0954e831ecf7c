#![forbid(unsafe_code)]

//! Error taxonomy for trap activation.
//!
//! Only conditions that indicate a programming error in the collaborating
//! rendering layer surface as errors. Runtime conditions with a documented
//! fallback (empty focusable set, stale restoration target) are recovered
//! silently so the "focus is always somewhere sane" invariant holds.

use std::fmt;

use keytrap_core::NodeId;

/// Activation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapError {
    /// The container is not attached to the document and cannot host a trap.
    EmptyContainer(NodeId),
    /// Another live session already holds the document's key listener slot.
    RouterContended,
}

impl fmt::Display for TrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContainer(id) => {
                write!(f, "container {} is not attached to the document", id.id())
            }
            Self::RouterContended => {
                write!(f, "the document key listener is held by another trap")
            }
        }
    }
}

impl std::error::Error for TrapError {}
