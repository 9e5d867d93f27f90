//! Graph state model for the resource canvas.
//!
//! Nodes are managed resources with a status; edges connect distinct nodes,
//! at most one per unordered pair. [`GraphStore`] owns both sets and is the
//! only way to mutate them. Edge activity and the combined edge indicator
//! are derived from endpoint statuses on demand.

pub mod action;
pub mod edge;
pub mod error;
pub mod focus;
pub mod graph;
pub mod id;
pub mod node;
pub mod snapshot;
pub mod status;
pub mod validator;

// Re-export commonly used types
pub use action::NodeAction;
pub use edge::{Connection, Edge};
pub use error::{CoreError, EntityKind};
pub use focus::{MenuAction, UiFocus};
pub use graph::GraphStore;
pub use id::{EdgeId, NodeId};
pub use node::{Node, NodeData, NodePatch, Position};
pub use snapshot::{EdgeView, GraphSnapshot};
pub use status::{EdgeIndicator, NodeStatus};
pub use validator::{ConnectionRejection, ConnectionValidator, HandlePolicy};
