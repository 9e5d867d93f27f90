//! Schema types for edge endpoints.

use opsgraph_core::{Connection, Edge, EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// Request to connect two nodes. Field names follow the edge wire format.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEdgeRequest {
    pub id: Option<EdgeId>,
    pub source: NodeId,
    pub target: NodeId,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

impl CreateEdgeRequest {
    pub fn into_edge(self) -> Edge {
        let mut edge = Connection {
            source: self.source,
            target: self.target,
            source_handle: self.source_handle,
            target_handle: self.target_handle,
        }
        .into_edge();
        if let Some(id) = self.id {
            edge.id = id;
        }
        edge
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeResponse {
    pub edge: Edge,
    /// Whether both endpoints are running right now.
    pub active: bool,
    pub revision: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteEdgeResponse {
    pub success: bool,
    pub edge_id: EdgeId,
    pub revision: u64,
}
