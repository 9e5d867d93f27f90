//! GraphService: the authority's copy of the graph plus its event fan-out.
//!
//! All business logic flows through [`GraphService`]; HTTP and WebSocket
//! handlers are thin wrappers around it. Every successful mutation is
//! broadcast to connected peers as the inbound message that reproduces it,
//! while the service lock is still held, so peers observe mutations in the
//! same order the store applied them.

use opsgraph_core::{
    EdgeId, GraphSnapshot, GraphStore, Node, NodeAction, NodeId, NodePatch, NodeStatus,
};
use opsgraph_sync::InboundMessage;
use tokio::sync::broadcast;

use crate::error::ApiError;
use crate::schema::edges::{CreateEdgeRequest, DeleteEdgeResponse, EdgeResponse};
use crate::schema::nodes::{CreateNodeRequest, DeleteNodeResponse, NodeResponse};

/// Frames buffered per peer before a slow peer starts lagging.
pub const EVENT_CAPACITY: usize = 256;

/// Status a `node_action` drives its node to.
///
/// `configure` and `status` re-announce `current`; unknown actions yield
/// `None` and change nothing.
pub fn status_for_action(action: &NodeAction, current: NodeStatus) -> Option<NodeStatus> {
    match action {
        NodeAction::Launch | NodeAction::Provision | NodeAction::Start | NodeAction::Reboot => {
            Some(NodeStatus::Running)
        }
        NodeAction::Stop => Some(NodeStatus::Idle),
        NodeAction::Configure | NodeAction::Status => Some(current),
        NodeAction::Other(_) => None,
    }
}

pub struct GraphService {
    store: GraphStore,
    events: broadcast::Sender<String>,
}

impl GraphService {
    pub fn new(store: GraphStore) -> Self {
        Self::with_capacity(store, EVENT_CAPACITY)
    }

    /// Like [`new`](Self::new) with `capacity` frames buffered per peer.
    /// Panics if `capacity` is zero, as [`broadcast::channel`] does.
    pub fn with_capacity(store: GraphStore, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        GraphService { store, events }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.store.snapshot()
    }

    /// Greeting frames for a new peer (every node, then every edge) and a
    /// subscription to everything broadcast afterwards. Taken under one
    /// borrow, so no mutation falls between the two.
    pub fn join(&self) -> (Vec<String>, broadcast::Receiver<String>) {
        let greeting = InboundMessage::replay(&self.store)
            .iter()
            .filter_map(encode)
            .collect();
        (greeting, self.events.subscribe())
    }

    /// Receives every broadcast frame from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.events.subscribe()
    }

    // -----------------------------------------------------------------------
    // Node operations
    // -----------------------------------------------------------------------

    pub fn create_node(&mut self, req: CreateNodeRequest) -> Result<NodeResponse, ApiError> {
        let mut node = Node::placed(&mut rand::thread_rng());
        if let Some(id) = req.id {
            node.id = id;
        }
        if let Some(label) = req.label {
            node.data.label = label;
        }
        if let Some(status) = req.status {
            node.data.status = status;
        }
        if let Some(position) = req.position {
            node.position = position;
        }

        let id = self.store.add_node(node)?;
        let node = self.node(&id)?;
        tracing::info!(node = %id, "node added");
        self.broadcast(InboundMessage::AddNode { node: node.clone() });
        Ok(NodeResponse {
            node,
            revision: self.store.revision(),
        })
    }

    pub fn delete_node(&mut self, id: &NodeId) -> Result<DeleteNodeResponse, ApiError> {
        let removed_edges: Vec<EdgeId> =
            self.store.edges_of(id).into_iter().map(|e| e.id.clone()).collect();
        if self.store.remove_node(id).is_none() {
            return Err(ApiError::NotFound(format!("node not found: '{}'", id)));
        }
        tracing::info!(node = %id, edges = removed_edges.len(), "node removed");
        self.broadcast(InboundMessage::RemoveNode { node_id: id.clone() });
        Ok(DeleteNodeResponse {
            success: true,
            node_id: id.clone(),
            removed_edges,
            revision: self.store.revision(),
        })
    }

    /// Sets a node's status (and its conventional label) and announces it.
    /// Announced even when unchanged, so peers can resynchronize.
    pub fn set_status(
        &mut self,
        id: &NodeId,
        status: NodeStatus,
    ) -> Result<NodeResponse, ApiError> {
        self.store
            .update_node(id, &NodePatch::status_with_label(status))?;
        self.broadcast(InboundMessage::SetStatus {
            id: id.clone(),
            status,
        });
        Ok(NodeResponse {
            node: self.node(id)?,
            revision: self.store.revision(),
        })
    }

    /// Handles a `node_action` request from a peer. Returns the announced
    /// status, or `None` for an action with no status effect.
    pub fn apply_action(
        &mut self,
        id: &NodeId,
        action: &NodeAction,
    ) -> Result<Option<NodeStatus>, ApiError> {
        let current = self.node(id)?.status();
        let Some(status) = status_for_action(action, current) else {
            tracing::warn!(node = %id, %action, "unknown node action");
            return Ok(None);
        };
        tracing::info!(node = %id, %action, %status, "node action");
        self.set_status(id, status)?;
        Ok(Some(status))
    }

    // -----------------------------------------------------------------------
    // Edge operations
    // -----------------------------------------------------------------------

    pub fn create_edge(&mut self, req: CreateEdgeRequest) -> Result<EdgeResponse, ApiError> {
        let id = self.store.add_edge(req.into_edge())?;
        let edge = self
            .store
            .edge(&id)
            .cloned()
            .ok_or_else(|| ApiError::InternalError(format!("edge '{}' vanished", id)))?;
        tracing::info!(edge = %id, source = %edge.source, target = %edge.target, "edge added");
        self.broadcast(InboundMessage::AddEdge { edge: edge.clone() });
        Ok(EdgeResponse {
            active: self.store.is_edge_active(&id).unwrap_or(false),
            edge,
            revision: self.store.revision(),
        })
    }

    pub fn delete_edge(&mut self, id: &EdgeId) -> Result<DeleteEdgeResponse, ApiError> {
        if self.store.remove_edge(id).is_none() {
            return Err(ApiError::NotFound(format!("edge not found: '{}'", id)));
        }
        tracing::info!(edge = %id, "edge removed");
        self.broadcast(InboundMessage::RemoveEdge { edge_id: id.clone() });
        Ok(DeleteEdgeResponse {
            success: true,
            edge_id: id.clone(),
            revision: self.store.revision(),
        })
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn node(&self, id: &NodeId) -> Result<Node, ApiError> {
        self.store
            .node(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("node not found: '{}'", id)))
    }

    fn broadcast(&self, msg: InboundMessage) {
        let Some(frame) = encode(&msg) else { return };
        // No receivers is fine: nobody is connected.
        let peers = self.events.send(frame).unwrap_or(0);
        tracing::debug!(tag = msg.tag(), peers, "broadcast");
    }
}

fn encode(msg: &InboundMessage) -> Option<String> {
    match msg.to_json() {
        Ok(frame) => Some(frame),
        Err(err) => {
            tracing::error!(tag = msg.tag(), error = %err, "failed to encode message");
            None
        }
    }
}
