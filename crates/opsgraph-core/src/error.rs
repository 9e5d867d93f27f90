//! Core error types for opsgraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of graph mutation. None of them is fatal: callers decide
//! whether to surface, log, or absorb them depending on where the mutation
//! came from.

use thiserror::Error;

use crate::validator::ConnectionRejection;

/// Which kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Node,
    Edge,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Node => f.write_str("node"),
            EntityKind::Edge => f.write_str("edge"),
        }
    }
}

/// Core errors produced by the opsgraph-core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Inserting a node or edge whose id is already live.
    #[error("duplicate {kind} id: '{id}'")]
    DuplicateId { kind: EntityKind, id: String },

    /// The proposed edge was rejected by the connection rules.
    #[error("invalid connection {source_id} -> {target_id}: {reason}")]
    InvalidConnection {
        source_id: String,
        target_id: String,
        reason: ConnectionRejection,
    },

    /// Mutating a node or edge that does not exist.
    #[error("{kind} not found: '{id}'")]
    NotFound { kind: EntityKind, id: String },
}

impl CoreError {
    /// Returns `true` for [`CoreError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}
