//! Connections between resource nodes.
//!
//! An [`Edge`] serializes to the wire record
//! `{id, source, target, sourceHandle, targetHandle}`. Handles name the
//! attachment point on each node; the canonical model has exactly one
//! connectable point per node, so handles default to the center pair and
//! play no part in uniqueness unless a [`HandlePolicy`] says otherwise.
//!
//! [`HandlePolicy`]: crate::validator::HandlePolicy

use serde::{Deserialize, Serialize};

use crate::id::{EdgeId, NodeId};

/// Canonical source handle id.
pub const SOURCE_CENTER_HANDLE: &str = "sourceCenterHandle";
/// Canonical target handle id.
pub const TARGET_CENTER_HANDLE: &str = "targetCenterHandle";

fn default_source_handle() -> String {
    SOURCE_CENTER_HANDLE.to_string()
}

fn default_target_handle() -> String {
    TARGET_CENTER_HANDLE.to_string()
}

fn empty_edge_id() -> EdgeId {
    EdgeId(String::new())
}

/// A stored connection between two distinct nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Empty means "not yet assigned"; the store mints one on insert.
    #[serde(default = "empty_edge_id")]
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default = "default_source_handle")]
    pub source_handle: String,
    #[serde(default = "default_target_handle")]
    pub target_handle: String,
}

impl Edge {
    /// An edge with an explicit id and the canonical handle pair.
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Edge {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: default_source_handle(),
            target_handle: default_target_handle(),
        }
    }

    /// An edge whose id the store assigns on insert.
    pub fn unassigned(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Edge::new(empty_edge_id(), source, target)
    }

    /// The connection this edge realizes, for validation against others.
    pub fn connection(&self) -> Connection {
        Connection {
            source: self.source.clone(),
            target: self.target.clone(),
            source_handle: Some(self.source_handle.clone()),
            target_handle: Some(self.target_handle.clone()),
        }
    }

    /// Returns `true` if `node` is either endpoint.
    pub fn touches(&self, node: &NodeId) -> bool {
        self.source == *node || self.target == *node
    }

    /// Returns `true` if this edge joins `a` and `b` in either direction.
    pub fn joins(&self, a: &NodeId, b: &NodeId) -> bool {
        (self.source == *a && self.target == *b) || (self.source == *b && self.target == *a)
    }
}

/// A proposed connection, as produced by a completed connect gesture.
///
/// Missing handles mean the canonical center handle for that role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Connection {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn with_handles(mut self, source_handle: &str, target_handle: &str) -> Self {
        self.source_handle = Some(source_handle.to_string());
        self.target_handle = Some(target_handle.to_string());
        self
    }

    pub fn source_handle(&self) -> &str {
        self.source_handle.as_deref().unwrap_or(SOURCE_CENTER_HANDLE)
    }

    pub fn target_handle(&self) -> &str {
        self.target_handle.as_deref().unwrap_or(TARGET_CENTER_HANDLE)
    }

    /// Turns the proposal into an edge with an unassigned id.
    pub fn into_edge(self) -> Edge {
        let source_handle = self.source_handle().to_string();
        let target_handle = self.target_handle().to_string();
        Edge {
            id: empty_edge_id(),
            source: self.source,
            target: self.target,
            source_handle,
            target_handle,
        }
    }
}
