//! GraphStore: the canonical node/edge container.
//!
//! [`GraphStore`] is the single entry point for mutating the canvas graph.
//! Local gestures and inbound protocol messages both go through the same
//! methods, so the invariants hold no matter where a change came from:
//!
//! - node and edge ids are unique among live entities;
//! - every edge joins two distinct live nodes;
//! - at most one edge joins any unordered pair of nodes (per the configured
//!   [`HandlePolicy`]);
//! - removing a node removes every incident edge in the same call.
//!
//! Storage is a private `StableGraph` (indices stay valid across removals)
//! plus insertion-ordered maps from wire ids to graph indices. Every mutator
//! takes `&mut self` and completes before returning, so a reader can never
//! observe a half-applied cascade.

use indexmap::IndexMap;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use crate::edge::{Connection, Edge};
use crate::error::{CoreError, EntityKind};
use crate::id::{EdgeId, NodeId};
use crate::node::{Node, NodePatch, Position};
use crate::snapshot::{EdgeView, GraphSnapshot};
use crate::status::{self, EdgeIndicator, NodeStatus};
use crate::validator::{ConnectionRejection, ConnectionValidator, HandlePolicy};

/// The canonical set of nodes and edges.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    graph: StableGraph<Node, Edge, Directed, u32>,
    node_index: IndexMap<NodeId, NodeIndex<u32>>,
    edge_index: IndexMap<EdgeId, EdgeIndex<u32>>,
    validator: ConnectionValidator,
    /// Bumped once per state-changing mutation.
    revision: u64,
}

impl GraphStore {
    /// Creates an empty store with handle-agnostic connection rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given handle policy.
    pub fn with_policy(policy: HandlePolicy) -> Self {
        GraphStore {
            validator: ConnectionValidator::new(policy),
            ..Self::default()
        }
    }

    /// The four-node demo canvas: one node per status plus two edges.
    pub fn demo() -> Self {
        let mut store = GraphStore::new();
        let seed = [
            ("idle-1", "Idle Node", NodeStatus::Idle, 50.0),
            ("running-2", "Running Node", NodeStatus::Running, 250.0),
            ("warning-3", "Warning Node", NodeStatus::Running, 450.0),
            ("error-4", "Error Node", NodeStatus::Error, 650.0),
        ];
        for (id, label, status, x) in seed {
            let node = Node::new(id, label, Position::new(x, 100.0)).with_status(status);
            store
                .add_node(node)
                .expect("demo node ids are distinct");
        }
        store
            .add_edge(Edge::new("e1-2", "idle-1", "running-2"))
            .expect("demo edge is valid");
        store
            .add_edge(Edge::new("e3-1", "warning-3", "idle-1"))
            .expect("demo edge is valid");
        store
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_index
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edge_index
            .get(id)
            .and_then(|&idx| self.graph.edge_weight(idx))
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edge_index.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.node_index
            .values()
            .filter_map(move |&idx| self.graph.node_weight(idx))
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edge_index
            .values()
            .filter_map(move |&idx| self.graph.edge_weight(idx))
    }

    /// Every edge with `id` as source or target.
    pub fn edges_of(&self, id: &NodeId) -> Vec<&Edge> {
        match self.node_index.get(id) {
            Some(&idx) => self.incident_edges(idx).into_iter().map(|e| &self.graph[e]).collect(),
            None => Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_index.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_index.is_empty()
    }

    /// Monotonic change counter, usable as a Renderer dirty flag.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn handle_policy(&self) -> HandlePolicy {
        self.validator.policy()
    }

    // -----------------------------------------------------------------------
    // Node mutations
    // -----------------------------------------------------------------------

    /// Inserts a node, minting an id if it has none.
    pub fn add_node(&mut self, mut node: Node) -> Result<NodeId, CoreError> {
        if node.id.is_unset() {
            node.id = NodeId::generate();
        }
        if self.node_index.contains_key(&node.id) {
            return Err(CoreError::DuplicateId {
                kind: EntityKind::Node,
                id: node.id.0,
            });
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_index.insert(id.clone(), idx);
        self.bump();
        Ok(id)
    }

    /// Merges `patch` into the node's label/status/position.
    ///
    /// Returns whether anything changed; the revision is only bumped then.
    pub fn update_node(&mut self, id: &NodeId, patch: &NodePatch) -> Result<bool, CoreError> {
        let idx = *self.node_index.get(id).ok_or_else(|| CoreError::NotFound {
            kind: EntityKind::Node,
            id: id.0.clone(),
        })?;
        let node = self
            .graph
            .node_weight_mut(idx)
            .ok_or_else(|| CoreError::NotFound {
                kind: EntityKind::Node,
                id: id.0.clone(),
            })?;
        let changed = patch.apply_to(node);
        if changed {
            self.bump();
        }
        Ok(changed)
    }

    /// Advances the node to the next status in the demo cycle and relabels it
    /// with the capitalized status name. Returns the new status.
    pub fn cycle_status(&mut self, id: &NodeId) -> Result<NodeStatus, CoreError> {
        let current = self
            .node(id)
            .map(Node::status)
            .ok_or_else(|| CoreError::NotFound {
                kind: EntityKind::Node,
                id: id.0.clone(),
            })?;
        let next = current.next();
        self.update_node(id, &NodePatch::status_with_label(next))?;
        Ok(next)
    }

    /// Removes a node and every edge touching it.
    ///
    /// Absent ids are a no-op (`None`): remote removals may race with local
    /// ones.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let idx = self.node_index.shift_remove(id)?;
        for edge_idx in self.incident_edges(idx) {
            if let Some(edge) = self.graph.edge_weight(edge_idx) {
                self.edge_index.shift_remove(&edge.id);
            }
        }
        // StableGraph drops the incident edges along with the node.
        let removed = self.graph.remove_node(idx);
        self.bump();
        removed
    }

    /// Drops every node and edge, keeping the handle policy. The revision
    /// still moves forward so readers see the change.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_index.clear();
        self.edge_index.clear();
        self.bump();
    }

    // -----------------------------------------------------------------------
    // Edge mutations
    // -----------------------------------------------------------------------

    /// Checks a proposed connection without inserting anything.
    pub fn check_connection(&self, proposed: &Connection) -> Result<(), ConnectionRejection> {
        self.validator.check(proposed, self.edges())?;
        if !self.contains_node(&proposed.source) || !self.contains_node(&proposed.target) {
            return Err(ConnectionRejection::MissingEndpoint);
        }
        Ok(())
    }

    /// Inserts an edge after validating it, minting an id if it has none.
    pub fn add_edge(&mut self, mut edge: Edge) -> Result<EdgeId, CoreError> {
        if let Err(reason) = self.check_connection(&edge.connection()) {
            return Err(CoreError::InvalidConnection {
                source_id: edge.source.0,
                target_id: edge.target.0,
                reason,
            });
        }
        if edge.id.is_unset() {
            edge.id = EdgeId::generate();
        }
        if self.edge_index.contains_key(&edge.id) {
            return Err(CoreError::DuplicateId {
                kind: EntityKind::Edge,
                id: edge.id.0,
            });
        }
        let from = self.node_index[&edge.source];
        let to = self.node_index[&edge.target];
        let id = edge.id.clone();
        let idx = self.graph.add_edge(from, to, edge);
        self.edge_index.insert(id.clone(), idx);
        self.bump();
        Ok(id)
    }

    /// Convenience for a completed connect gesture.
    pub fn connect(&mut self, proposed: Connection) -> Result<EdgeId, CoreError> {
        self.add_edge(proposed.into_edge())
    }

    /// Removes an edge. Absent ids are a no-op.
    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let idx = self.edge_index.shift_remove(id)?;
        let removed = self.graph.remove_edge(idx);
        self.bump();
        removed
    }

    // -----------------------------------------------------------------------
    // Derived edge state
    // -----------------------------------------------------------------------

    fn endpoint_statuses(&self, edge: &Edge) -> Option<(NodeStatus, NodeStatus)> {
        let source = self.node(&edge.source)?.status();
        let target = self.node(&edge.target)?.status();
        Some((source, target))
    }

    /// `Some(true)` iff both endpoints are running; `None` for unknown edges.
    pub fn is_edge_active(&self, id: &EdgeId) -> Option<bool> {
        let edge = self.edge(id)?;
        self.endpoint_statuses(edge)
            .map(|(s, t)| status::is_active(s, t))
    }

    /// Combined indicator for an edge; `None` for unknown edges.
    pub fn edge_indicator(&self, id: &EdgeId) -> Option<EdgeIndicator> {
        let edge = self.edge(id)?;
        self.endpoint_statuses(edge)
            .map(|(s, t)| EdgeIndicator::from_endpoints(s, t))
    }

    /// Owned copy of the current state with derived edge fields filled in.
    pub fn snapshot(&self) -> GraphSnapshot {
        let edges = self
            .edges()
            .filter_map(|edge| {
                let (s, t) = self.endpoint_statuses(edge)?;
                Some(EdgeView {
                    edge: edge.clone(),
                    active: status::is_active(s, t),
                    indicator: EdgeIndicator::from_endpoints(s, t),
                })
            })
            .collect();
        GraphSnapshot {
            revision: self.revision,
            nodes: self.nodes().cloned().collect(),
            edges,
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn incident_edges(&self, idx: NodeIndex<u32>) -> Vec<EdgeIndex<u32>> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.id())
            .collect()
    }

    fn bump(&mut self) {
        self.revision += 1;
        #[cfg(debug_assertions)]
        self.assert_consistency();
    }

    /// Verifies that the id maps and the graph agree and that no edge dangles.
    ///
    /// Only called in debug builds (via `cfg(debug_assertions)`).
    #[cfg(debug_assertions)]
    fn assert_consistency(&self) {
        assert_eq!(self.graph.node_count(), self.node_index.len());
        assert_eq!(self.graph.edge_count(), self.edge_index.len());
        for (id, &idx) in &self.node_index {
            assert_eq!(&self.graph[idx].id, id, "node index map out of sync");
        }
        for (id, &idx) in &self.edge_index {
            let edge = &self.graph[idx];
            assert_eq!(&edge.id, id, "edge index map out of sync");
            assert!(self.node_index.contains_key(&edge.source), "dangling source");
            assert!(self.node_index.contains_key(&edge.target), "dangling target");
        }
    }
}
