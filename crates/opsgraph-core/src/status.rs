//! Node status state machine and the edge state derived from it.
//!
//! Status only changes through explicit updates (user action or an inbound
//! protocol message). Nothing here runs on a timer: edge activity and the
//! combined edge indicator are pure functions of the two endpoint statuses,
//! recomputed whenever a reader asks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operational state of a resource node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Idle,
    Running,
    Warning,
    Error,
}

impl NodeStatus {
    /// Cycle order used by [`NodeStatus::next`].
    pub const ORDER: [NodeStatus; 4] = [
        NodeStatus::Idle,
        NodeStatus::Running,
        NodeStatus::Warning,
        NodeStatus::Error,
    ];

    fn index(self) -> usize {
        match self {
            NodeStatus::Idle => 0,
            NodeStatus::Running => 1,
            NodeStatus::Warning => 2,
            NodeStatus::Error => 3,
        }
    }

    /// Demo cycle: `idle -> running -> warning -> error -> idle`.
    pub fn next(self) -> NodeStatus {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeStatus::Idle => "idle",
            NodeStatus::Running => "running",
            NodeStatus::Warning => "warning",
            NodeStatus::Error => "error",
        }
    }

    /// Capitalized name, conventionally used as the node label after a
    /// status-driven relabel.
    pub fn label(self) -> &'static str {
        match self {
            NodeStatus::Idle => "Idle",
            NodeStatus::Running => "Running",
            NodeStatus::Warning => "Warning",
            NodeStatus::Error => "Error",
        }
    }

    pub fn is_running(self) -> bool {
        self == NodeStatus::Running
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(NodeStatus::Idle),
            "running" => Ok(NodeStatus::Running),
            "warning" => Ok(NodeStatus::Warning),
            "error" => Ok(NodeStatus::Error),
            _ => Err(format!("unknown node status: {}", s)),
        }
    }
}

/// An edge is active iff both of its endpoints are running.
pub fn is_active(source: NodeStatus, target: NodeStatus) -> bool {
    source.is_running() && target.is_running()
}

/// Single combined indicator for an edge, evaluated from its two endpoints.
///
/// Variants are declared in ascending priority, so `Ord` gives
/// `Error > Warning > Running > Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeIndicator {
    Idle,
    /// Both endpoints running (the edge is active).
    Running,
    Warning,
    Error,
}

impl EdgeIndicator {
    /// Error or warning on either side wins regardless of the partner node.
    pub fn from_endpoints(source: NodeStatus, target: NodeStatus) -> EdgeIndicator {
        if source == NodeStatus::Error || target == NodeStatus::Error {
            EdgeIndicator::Error
        } else if source == NodeStatus::Warning || target == NodeStatus::Warning {
            EdgeIndicator::Warning
        } else if is_active(source, target) {
            EdgeIndicator::Running
        } else {
            EdgeIndicator::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_status() -> impl Strategy<Value = NodeStatus> {
        prop::sample::select(NodeStatus::ORDER.to_vec())
    }

    #[test]
    fn next_follows_cycle_order() {
        assert_eq!(NodeStatus::Idle.next(), NodeStatus::Running);
        assert_eq!(NodeStatus::Running.next(), NodeStatus::Warning);
        assert_eq!(NodeStatus::Warning.next(), NodeStatus::Error);
        assert_eq!(NodeStatus::Error.next(), NodeStatus::Idle);
    }

    #[test]
    fn parse_and_display_agree() {
        for status in NodeStatus::ORDER {
            assert_eq!(status.to_string().parse::<NodeStatus>().unwrap(), status);
        }
        assert_eq!("RUNNING".parse::<NodeStatus>().unwrap(), NodeStatus::Running);
        assert!("paused".parse::<NodeStatus>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&NodeStatus::Warning).unwrap(), "\"warning\"");
        let back: NodeStatus = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(back, NodeStatus::Error);
        assert!(serde_json::from_str::<NodeStatus>("\"Error\"").is_err());
    }

    #[test]
    fn indicator_priority() {
        use EdgeIndicator as I;
        use NodeStatus as S;
        assert_eq!(I::from_endpoints(S::Error, S::Running), I::Error);
        assert_eq!(I::from_endpoints(S::Warning, S::Error), I::Error);
        assert_eq!(I::from_endpoints(S::Running, S::Warning), I::Warning);
        assert_eq!(I::from_endpoints(S::Running, S::Running), I::Running);
        assert_eq!(I::from_endpoints(S::Running, S::Idle), I::Idle);
        assert_eq!(I::from_endpoints(S::Idle, S::Idle), I::Idle);
        assert!(I::Error > I::Warning && I::Warning > I::Running && I::Running > I::Idle);
    }

    proptest! {
        #[test]
        fn four_steps_return_to_start(status in any_status()) {
            prop_assert_eq!(status.next().next().next().next(), status);
        }

        #[test]
        fn active_iff_both_running(a in any_status(), b in any_status()) {
            let both_running = a == NodeStatus::Running && b == NodeStatus::Running;
            prop_assert_eq!(is_active(a, b), both_running);
            prop_assert_eq!(is_active(a, b), is_active(b, a));
        }

        #[test]
        fn indicator_is_symmetric(a in any_status(), b in any_status()) {
            prop_assert_eq!(
                EdgeIndicator::from_endpoints(a, b),
                EdgeIndicator::from_endpoints(b, a)
            );
        }
    }
}
