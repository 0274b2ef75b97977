//! Error types for graph operations.
//!
//! Every fallible operation returns [`Result<T>`]. Mutating
//! operations validate their inputs before touching the graph, so an
//! `Err` means the graph was left exactly as it was.

use bstr::BString;
use thiserror::Error;

use crate::handle::NodeId;
use crate::pathhandlegraph::PathId;

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    /// No node with the given ID exists
    #[error("node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// No path with the given ID exists
    #[error("path not found: {id}")]
    PathNotFound { id: PathId },

    /// No path with the given name exists
    #[error("path name not found: {name}")]
    PathNameNotFound { name: BString },

    /// The step handle refers to a step that has been removed, or to
    /// a path that no longer exists
    #[error("step not found on path {path}")]
    StepNotFound { path: PathId },

    #[error("a node with ID {id} already exists")]
    DuplicateId { id: NodeId },

    #[error("a path named {name} already exists")]
    DuplicatePathName { name: BString },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("precondition violated: {message}")]
    PreconditionViolation { message: String },

    /// The serialized graph could not be decoded
    #[error("corrupt graph data: {message}")]
    CorruptData { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    pub(crate) fn invalid<S: Into<String>>(message: S) -> Self {
        GraphError::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn precondition<S: Into<String>>(message: S) -> Self {
        GraphError::PreconditionViolation {
            message: message.into(),
        }
    }

    pub(crate) fn corrupt<S: Into<String>>(message: S) -> Self {
        GraphError::CorruptData {
            message: message.into(),
        }
    }
}
