//! Internal errors
//!
//! These are defects in the pipeline itself, not problems in the user's
//! source. They are never folded into the diagnostics list; they abort the
//! current pass and surface to the caller.

use crate::ast::NodeId;
use crate::position::FilePosition;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, InternalError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("node {0:?} is already present in the symbol table")]
    DuplicateSymbol(NodeId),

    #[error("span of node {node:?} starts at {start} but ends at {end}")]
    InvalidSpan {
        node: NodeId,
        start: FilePosition,
        end: FilePosition,
    },

    #[error("node {0:?} has no recorded source span")]
    MissingSymbol(NodeId),

    #[error("cannot derive a span from an empty set of nodes")]
    EmptyNodeRange,

    #[error("node {node:?} is not a {expected}")]
    UnexpectedNode { node: NodeId, expected: &'static str },
}

impl InternalError {
    pub fn unexpected_node(node: NodeId, expected: &'static str) -> Self {
        Self::UnexpectedNode { node, expected }
    }
}
