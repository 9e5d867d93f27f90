//! Actions a user can request on a remote-managed resource.
//!
//! The set is open: the remote peer decides what an action means, and names
//! this side does not know are carried through verbatim as
//! [`NodeAction::Other`].

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeAction {
    Launch,
    Provision,
    Start,
    Stop,
    Reboot,
    Configure,
    Status,
    Other(String),
}

impl NodeAction {
    pub fn as_str(&self) -> &str {
        match self {
            NodeAction::Launch => "launch",
            NodeAction::Provision => "provision",
            NodeAction::Start => "start",
            NodeAction::Stop => "stop",
            NodeAction::Reboot => "reboot",
            NodeAction::Configure => "configure",
            NodeAction::Status => "status",
            NodeAction::Other(name) => name,
        }
    }
}

impl From<&str> for NodeAction {
    fn from(s: &str) -> Self {
        match s {
            "launch" => NodeAction::Launch,
            "provision" => NodeAction::Provision,
            "start" => NodeAction::Start,
            "stop" => NodeAction::Stop,
            "reboot" => NodeAction::Reboot,
            "configure" => NodeAction::Configure,
            "status" => NodeAction::Status,
            other => NodeAction::Other(other.to_string()),
        }
    }
}

impl From<String> for NodeAction {
    fn from(s: String) -> Self {
        NodeAction::from(s.as_str())
    }
}

impl From<NodeAction> for String {
    fn from(action: NodeAction) -> Self {
        match action {
            NodeAction::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for NodeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
