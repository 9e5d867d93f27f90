//! Connection validity rules.
//!
//! Validation is a pure function of the proposed connection and the edge set
//! passed in; the validator holds no graph state of its own. Rules, in order:
//!
//! 1. no self-loops;
//! 2. at most one edge per unordered node pair.
//!
//! Under [`HandlePolicy::Aware`] rule 2 only rejects a pair when the handles
//! also match, checking the four equivalent orderings (direct, reversed, and
//! the two handle-swapped variants) since a handle is logically either end of
//! a single connector.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::edge::{Connection, Edge};

/// Why a proposed connection was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionRejection {
    SelfLoop,
    DuplicatePair,
    /// One of the endpoints is not a live node. Raised by the store, which
    /// owns the node set.
    MissingEndpoint,
}

impl ConnectionRejection {
    /// Stable snake_case code, matching the serde form.
    pub fn code(self) -> &'static str {
        match self {
            ConnectionRejection::SelfLoop => "self_loop",
            ConnectionRejection::DuplicatePair => "duplicate_pair",
            ConnectionRejection::MissingEndpoint => "missing_endpoint",
        }
    }
}

impl fmt::Display for ConnectionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionRejection::SelfLoop => f.write_str("a node cannot connect to itself"),
            ConnectionRejection::DuplicatePair => {
                f.write_str("these nodes are already connected")
            }
            ConnectionRejection::MissingEndpoint => f.write_str("endpoint node does not exist"),
        }
    }
}

/// How handles participate in duplicate detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlePolicy {
    /// One edge per unordered node pair, whatever the handles.
    #[default]
    Agnostic,
    /// One edge per unordered pair of (node, handle) attachment points.
    Aware,
}

/// Stateless connection checker parameterized by a [`HandlePolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionValidator {
    policy: HandlePolicy,
}

impl ConnectionValidator {
    pub fn new(policy: HandlePolicy) -> Self {
        ConnectionValidator { policy }
    }

    pub fn policy(&self) -> HandlePolicy {
        self.policy
    }

    /// Checks `proposed` against `edges`, reporting the first rule it breaks.
    pub fn check<'a, I>(&self, proposed: &Connection, edges: I) -> Result<(), ConnectionRejection>
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        if proposed.source == proposed.target {
            return Err(ConnectionRejection::SelfLoop);
        }
        if edges.into_iter().any(|edge| self.duplicates(edge, proposed)) {
            return Err(ConnectionRejection::DuplicatePair);
        }
        Ok(())
    }

    pub fn is_valid<'a, I>(&self, proposed: &Connection, edges: I) -> bool
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        self.check(proposed, edges).is_ok()
    }

    fn duplicates(&self, edge: &Edge, c: &Connection) -> bool {
        match self.policy {
            HandlePolicy::Agnostic => edge.joins(&c.source, &c.target),
            HandlePolicy::Aware => {
                let (sh, th) = (c.source_handle(), c.target_handle());
                let direct = edge.source == c.source && edge.target == c.target;
                let reversed = edge.source == c.target && edge.target == c.source;
                let same_handles = edge.source_handle == sh && edge.target_handle == th;
                let swapped_handles = edge.source_handle == th && edge.target_handle == sh;
                (direct && same_handles)
                    || (reversed && swapped_handles)
                    || (direct && swapped_handles)
                    || (reversed && same_handles)
            }
        }
    }
}

/// [`ConnectionValidator::is_valid`] under the default, handle-agnostic policy.
pub fn is_valid<'a, I>(proposed: &Connection, edges: I) -> bool
where
    I: IntoIterator<Item = &'a Edge>,
{
    ConnectionValidator::default().is_valid(proposed, edges)
}
