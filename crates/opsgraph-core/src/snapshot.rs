//! Read-only views handed to the Renderer.
//!
//! A [`GraphSnapshot`] is an owned copy: the Renderer can hold it across
//! frames and never sees, or causes, a mutation. All writes go back through
//! [`GraphStore`](crate::graph::GraphStore).

use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::id::{EdgeId, NodeId};
use crate::node::Node;
use crate::status::EdgeIndicator;

/// An edge plus the state derived from its endpoints at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeView {
    #[serde(flatten)]
    pub edge: Edge,
    pub active: bool,
    pub indicator: EdgeIndicator,
}

/// The whole graph at one revision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub revision: u64,
    pub nodes: Vec<Node>,
    pub edges: Vec<EdgeView>,
}

impl GraphSnapshot {
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&EdgeView> {
        self.edges.iter().find(|e| e.edge.id == *id)
    }

    /// Edges whose endpoints are both running.
    pub fn active_edges(&self) -> impl Iterator<Item = &EdgeView> + '_ {
        self.edges.iter().filter(|e| e.active)
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::GraphStore;
    use crate::id::EdgeId;
    use crate::node::NodePatch;
    use crate::status::{EdgeIndicator, NodeStatus};

    #[test]
    fn edge_view_flattens_wire_record() {
        let snap = GraphStore::demo().snapshot();
        let json = serde_json::to_value(&snap.edges[0]).unwrap();
        assert_eq!(json["id"], "e1-2");
        assert_eq!(json["sourceHandle"], "sourceCenterHandle");
        assert_eq!(json["active"], false);
        assert_eq!(json["indicator"], "idle");
    }

    #[test]
    fn edge_wire_format() {
        let snap = GraphStore::demo().snapshot();
        insta::assert_json_snapshot!(snap.edges[1], @r###"
        {
          "id": "e3-1",
          "source": "warning-3",
          "target": "idle-1",
          "sourceHandle": "sourceCenterHandle",
          "targetHandle": "targetCenterHandle",
          "active": false,
          "indicator": "idle"
        }
        "###);
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let mut store = GraphStore::demo();
        let before = store.snapshot();
        store
            .update_node(&"error-4".into(), &NodePatch::status(NodeStatus::Idle))
            .unwrap();
        store.remove_node(&"idle-1".into());

        assert_eq!(before.nodes.len(), 4);
        assert!(before.edge(&EdgeId::from("e1-2")).is_some());
        assert_eq!(
            before.node(&"error-4".into()).unwrap().status(),
            NodeStatus::Error
        );
        assert_eq!(store.snapshot().edges.len(), 0);
    }

    #[test]
    fn active_edges_filter() {
        let mut store = GraphStore::demo();
        assert_eq!(store.snapshot().active_edges().count(), 0);
        store
            .update_node(&"idle-1".into(), &NodePatch::status(NodeStatus::Running))
            .unwrap();
        let snap = store.snapshot();
        assert_eq!(snap.active_edges().count(), 2);
        assert!(snap
            .active_edges()
            .all(|e| e.indicator == EdgeIndicator::Running));
    }
}
