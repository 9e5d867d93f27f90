//! Schema types for node endpoints.

use opsgraph_core::{EdgeId, Node, NodeId, NodeStatus, Position};
use serde::{Deserialize, Serialize};

/// Request to create a node. Every field is optional: omitted ones take the
/// values of the "add new node" gesture (generated id, `New Node` label,
/// idle, random placement).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateNodeRequest {
    pub id: Option<NodeId>,
    pub label: Option<String>,
    pub status: Option<NodeStatus>,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeResponse {
    pub node: Node,
    pub revision: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetStatusRequest {
    pub status: NodeStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteNodeResponse {
    pub success: bool,
    pub node_id: NodeId,
    /// Edges removed along with the node.
    pub removed_edges: Vec<EdgeId>,
    pub revision: u64,
}
