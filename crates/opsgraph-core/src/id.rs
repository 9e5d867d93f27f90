//! Stable ID newtypes for graph entities.
//!
//! Node and edge ids are opaque strings on the wire. They are wrapped in
//! distinct newtypes so that a `NodeId` cannot be accidentally used where an
//! `EdgeId` is expected. Generated ids combine the wall-clock time with a
//! process-wide counter, so two ids minted in the same millisecond still
//! differ.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Node identifier as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

/// Edge identifier as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

fn generate(prefix: &str) -> String {
    let seq = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", prefix, unix_millis(), seq)
}

impl NodeId {
    /// Mints a fresh `node-<millis>-<seq>` id.
    pub fn generate() -> Self {
        NodeId(generate("node"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty string, which callers use to mean
    /// "assign one for me".
    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }
}

impl EdgeId {
    /// Mints a fresh `e-<millis>-<seq>` id.
    pub fn generate() -> Self {
        EdgeId(generate("e"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }
}

// Display implementations -- just print the inner value.

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        EdgeId(s.to_string())
    }
}

impl From<String> for EdgeId {
    fn from(s: String) -> Self {
        EdgeId(s)
    }
}
