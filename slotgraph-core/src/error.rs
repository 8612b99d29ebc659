//! Result codes for graph operations.
//!
//! Every fallible operation in the crate returns [`Result`]. `Ok(())` is the
//! success code; each [`GraphError`] variant is one of the failure codes a
//! caller is expected to check.

use thiserror::Error;

/// Type alias for Results carrying a [`GraphError`].
pub type Result<T> = std::result::Result<T, GraphError>;

/// Failure codes returned by node, slot and graph operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphError {
    /// Generic failure with nothing more specific to report.
    #[error("operation failed")]
    Failed,

    /// A node handle did not resolve to a live node.
    #[error("node handle does not resolve to a live node")]
    NodeNull,

    /// The node is already present where it was being inserted.
    #[error("node already exists")]
    NodeAlreadyExists,

    /// The node is not an owned child of the receiver.
    #[error("node not found")]
    NodeNotFound,

    /// Evaluation was requested on a node with neither a kind nor a functor.
    #[error("node has no functor to evaluate")]
    NodeNoFunctor,

    /// A slot handle did not resolve to a live slot.
    #[error("slot handle does not resolve to a live slot")]
    SlotNull,

    /// The exact same slot is already owned by the node.
    #[error("slot already exists")]
    SlotAlreadyExists,

    /// The slot (or connection) is not present.
    #[error("slot not found")]
    SlotNotFound,
}

impl GraphError {
    /// Stable snake_case name of the code, for callers that log or persist it.
    pub fn code(&self) -> &'static str {
        match self {
            GraphError::Failed => "failed",
            GraphError::NodeNull => "node_null",
            GraphError::NodeAlreadyExists => "node_already_exists",
            GraphError::NodeNotFound => "node_not_found",
            GraphError::NodeNoFunctor => "node_no_functor",
            GraphError::SlotNull => "slot_null",
            GraphError::SlotAlreadyExists => "slot_already_exists",
            GraphError::SlotNotFound => "slot_not_found",
        }
    }
}
