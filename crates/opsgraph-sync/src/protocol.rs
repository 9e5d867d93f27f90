//! Wire protocol: one JSON object per logical event, tagged by `type`.
//!
//! Inbound (remote → local): `add_node{node}`, `update_node{node}`,
//! `add_edge{edge}`, `remove_node{nodeId}`, `remove_edge{edgeId}`,
//! `set_status{id, status}`.
//!
//! Outbound (local → remote): `node_action{id, message}`.
//!
//! Decoding is two-step so that an unknown `type` can be told apart from a
//! known one with a broken payload: the first is ignored, the second is a
//! malformed message. Both are dropped without affecting later frames.

use opsgraph_core::{
    Edge, EdgeId, GraphStore, Node, NodeAction, NodeId, NodePatch, NodeStatus, Position,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SyncError;

/// Partial node data carried by `update_node`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDataUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
}

/// Node record of an `update_node` message: an id plus whichever fields
/// changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeUpdate {
    pub id: NodeId,
    #[serde(default)]
    pub data: NodeDataUpdate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl NodeUpdate {
    pub fn patch(&self) -> NodePatch {
        NodePatch {
            label: self.data.label.clone(),
            status: self.data.status,
            position: self.position,
        }
    }

    pub fn from_patch(id: NodeId, patch: &NodePatch) -> Self {
        NodeUpdate {
            id,
            data: NodeDataUpdate {
                label: patch.label.clone(),
                status: patch.status,
            },
            position: patch.position,
        }
    }
}

/// Messages that mutate the local graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    AddNode {
        node: Node,
    },
    UpdateNode {
        node: NodeUpdate,
    },
    AddEdge {
        edge: Edge,
    },
    RemoveNode {
        #[serde(rename = "nodeId")]
        node_id: NodeId,
    },
    RemoveEdge {
        #[serde(rename = "edgeId")]
        edge_id: EdgeId,
    },
    SetStatus {
        id: NodeId,
        status: NodeStatus,
    },
}

impl InboundMessage {
    pub const TAGS: [&'static str; 6] = [
        "add_node",
        "update_node",
        "add_edge",
        "remove_node",
        "remove_edge",
        "set_status",
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            InboundMessage::AddNode { .. } => "add_node",
            InboundMessage::UpdateNode { .. } => "update_node",
            InboundMessage::AddEdge { .. } => "add_edge",
            InboundMessage::RemoveNode { .. } => "remove_node",
            InboundMessage::RemoveEdge { .. } => "remove_edge",
            InboundMessage::SetStatus { .. } => "set_status",
        }
    }

    /// The message sequence that rebuilds `store` on an empty peer: every
    /// node first, then every edge, so no edge precedes its endpoints.
    pub fn replay(store: &GraphStore) -> Vec<InboundMessage> {
        store
            .nodes()
            .map(|node| InboundMessage::AddNode { node: node.clone() })
            .chain(
                store
                    .edges()
                    .map(|edge| InboundMessage::AddEdge { edge: edge.clone() }),
            )
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Messages sent to the remote peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Ask the remote to perform `message` on node `id`.
    NodeAction { id: NodeId, message: NodeAction },
}

impl OutboundMessage {
    pub const TAGS: [&'static str; 1] = ["node_action"];

    pub fn node_action(id: NodeId, action: NodeAction) -> Self {
        OutboundMessage::NodeAction {
            id,
            message: action,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Result of decoding one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<M> {
    Message(M),
    /// Well-formed envelope with a `type` this side does not handle.
    Unrecognized(String),
}

fn decode<M: DeserializeOwned>(raw: &str, known: &[&str]) -> Result<Decoded<M>, SyncError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| SyncError::malformed(e.to_string()))?;
    let tag = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| SyncError::malformed("missing `type` tag"))?
        .to_string();
    if !known.contains(&tag.as_str()) {
        return Ok(Decoded::Unrecognized(tag));
    }
    serde_json::from_value(value)
        .map(Decoded::Message)
        .map_err(|e| SyncError::malformed(format!("{}: {}", tag, e)))
}

/// Decodes a frame received from the remote authority.
pub fn decode_inbound(raw: &str) -> Result<Decoded<InboundMessage>, SyncError> {
    decode(raw, &InboundMessage::TAGS)
}

/// Decodes a frame received from a canvas client (used by the authority).
pub fn decode_outbound(raw: &str) -> Result<Decoded<OutboundMessage>, SyncError> {
    decode(raw, &OutboundMessage::TAGS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_message(raw: &str) -> InboundMessage {
        match decode_inbound(raw).unwrap() {
            Decoded::Message(msg) => msg,
            other => panic!("expected message, got {other:?}"),
        }
    }

    #[test]
    fn decodes_every_inbound_tag() {
        let add = expect_message(
            r#"{"type":"add_node","node":{"id":"node-123","data":{"label":"Live Node"},"position":{"x":100,"y":100}}}"#,
        );
        match add {
            InboundMessage::AddNode { node } => {
                assert_eq!(node.id, NodeId::from("node-123"));
                assert_eq!(node.status(), NodeStatus::Idle);
                assert_eq!(node.position, Position::new(100.0, 100.0));
            }
            other => panic!("unexpected {other:?}"),
        }

        let update = expect_message(r#"{"type":"update_node","node":{"id":"a","data":{"status":"error"}}}"#);
        assert_eq!(
            update,
            InboundMessage::UpdateNode {
                node: NodeUpdate {
                    id: "a".into(),
                    data: NodeDataUpdate { label: None, status: Some(NodeStatus::Error) },
                    position: None,
                }
            }
        );

        assert_eq!(
            expect_message(r#"{"type":"remove_node","nodeId":"a"}"#),
            InboundMessage::RemoveNode { node_id: "a".into() }
        );
        assert_eq!(
            expect_message(r#"{"type":"remove_edge","edgeId":"e"}"#),
            InboundMessage::RemoveEdge { edge_id: "e".into() }
        );
        assert_eq!(
            expect_message(r#"{"type":"set_status","id":"a","status":"running"}"#),
            InboundMessage::SetStatus { id: "a".into(), status: NodeStatus::Running }
        );
        assert_eq!(
            expect_message(r#"{"type":"add_edge","edge":{"source":"a","target":"b"}}"#).tag(),
            "add_edge"
        );
    }

    #[test]
    fn unknown_type_is_unrecognized_not_malformed() {
        assert_eq!(
            decode_inbound(r#"{"type":"heartbeat","seq":3}"#).unwrap(),
            Decoded::Unrecognized("heartbeat".into())
        );
    }

    #[test]
    fn broken_frames_are_malformed() {
        for raw in [
            "not json",
            r#"{"node":{}}"#,
            r#"{"type": 7}"#,
            r#"{"type":"remove_node"}"#,
            r#"{"type":"set_status","id":"a","status":"exploded"}"#,
            r#"{"type":"add_edge","edge":{"source":"a"}}"#,
        ] {
            assert!(
                matches!(decode_inbound(raw), Err(SyncError::Malformed { .. })),
                "{raw}"
            );
        }
    }

    #[test]
    fn node_action_wire_format() {
        let msg = OutboundMessage::node_action("web-1".into(), NodeAction::Start);
        insta::assert_json_snapshot!(msg, @r###"
        {
          "type": "node_action",
          "id": "web-1",
          "message": "start"
        }
        "###);
    }

    #[test]
    fn set_status_wire_format() {
        let msg = InboundMessage::SetStatus { id: "db-1".into(), status: NodeStatus::Warning };
        insta::assert_json_snapshot!(msg, @r###"
        {
          "type": "set_status",
          "id": "db-1",
          "status": "warning"
        }
        "###);
    }

    #[test]
    fn decodes_outbound_for_the_authority() {
        let raw = r#"{"id":"n1","type":"node_action","message":"reboot"}"#;
        assert_eq!(
            decode_outbound(raw).unwrap(),
            Decoded::Message(OutboundMessage::node_action("n1".into(), NodeAction::Reboot))
        );
        assert_eq!(
            decode_outbound(r#"{"type":"add_node"}"#).unwrap(),
            Decoded::Unrecognized("add_node".into())
        );
    }

    #[test]
    fn replay_lists_nodes_before_edges() {
        let msgs = InboundMessage::replay(&GraphStore::demo());
        let tags: Vec<&str> = msgs.iter().map(InboundMessage::tag).collect();
        assert_eq!(
            tags,
            ["add_node", "add_node", "add_node", "add_node", "add_edge", "add_edge"]
        );
    }
}
