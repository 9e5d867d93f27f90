//! Resource nodes: the vertices of the canvas graph.
//!
//! A [`Node`] serializes to the wire record
//! `{id, type, data: {label, status}, position: {x, y}}`, so the same struct
//! is used by the store, by snapshots handed to the Renderer, and by the sync
//! protocol.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::id::NodeId;
use crate::status::NodeStatus;

/// Renderer hint used when a node record carries no `type`.
pub const DEFAULT_NODE_KIND: &str = "custom";

/// Label given to nodes created by the "add node" gesture.
pub const NEW_NODE_LABEL: &str = "New Node";

fn default_kind() -> String {
    DEFAULT_NODE_KIND.to_string()
}

/// Canvas coordinate. Owned by the Renderer, persisted on the node record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// The mutable, user-facing payload of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub status: NodeStatus,
}

/// A managed resource (server, job) on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Empty means "not yet assigned"; the store mints one on insert.
    #[serde(default = "empty_node_id")]
    pub id: NodeId,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub data: NodeData,
    #[serde(default)]
    pub position: Position,
}

fn empty_node_id() -> NodeId {
    NodeId(String::new())
}

impl Node {
    /// Creates an idle node of the default kind at `position`.
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, position: Position) -> Self {
        Node {
            id: id.into(),
            kind: default_kind(),
            data: NodeData {
                label: label.into(),
                status: NodeStatus::Idle,
            },
            position,
        }
    }

    /// Builder-style status override.
    pub fn with_status(mut self, status: NodeStatus) -> Self {
        self.data.status = status;
        self
    }

    /// A node for the "add new node" gesture: fresh id, idle, placed at a
    /// random spot below the seeded row (x in [50, 550), y in [200, 400)).
    pub fn placed<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let position = Position::new(rng.gen_range(50.0..550.0), rng.gen_range(200.0..400.0));
        Node::new(NodeId::generate(), NEW_NODE_LABEL, position)
    }

    pub fn status(&self) -> NodeStatus {
        self.data.status
    }

    pub fn label(&self) -> &str {
        &self.data.label
    }
}

/// Partial update merged into an existing node by `GraphStore::update_node`.
///
/// Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl NodePatch {
    pub fn label(label: impl Into<String>) -> Self {
        NodePatch {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn status(status: NodeStatus) -> Self {
        NodePatch {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn position(position: Position) -> Self {
        NodePatch {
            position: Some(position),
            ..Default::default()
        }
    }

    /// Status change plus the conventional capitalized label, as used by
    /// `set_status` messages and the demo cycle.
    pub fn status_with_label(status: NodeStatus) -> Self {
        NodePatch {
            label: Some(status.label().to_string()),
            status: Some(status),
            position: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.status.is_none() && self.position.is_none()
    }

    /// Merges the present fields into `node`. Returns `true` if anything
    /// actually changed.
    pub(crate) fn apply_to(&self, node: &mut Node) -> bool {
        let mut changed = false;
        if let Some(label) = &self.label {
            if node.data.label != *label {
                node.data.label = label.clone();
                changed = true;
            }
        }
        if let Some(status) = self.status {
            if node.data.status != status {
                node.data.status = status;
                changed = true;
            }
        }
        if let Some(position) = self.position {
            if node.position != position {
                node.position = position;
                changed = true;
            }
        }
        changed
    }
}
