//! Registry of connected WebSocket peers.
//!
//! Each `/ws` connection registers on accept and deregisters on close. The
//! registry is informational (served by `GET /peers`); message fan-out goes
//! through the broadcast channel in [`GraphService`](crate::service::GraphService).

use std::time::Instant;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique peer identifier (UUID v4 newtype).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId(pub Uuid);

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct PeerSession {
    pub id: PeerId,
    pub connected_at: Instant,
    /// Text frames received from this peer.
    pub frames_received: u64,
    /// `node_action` requests that changed or re-announced a status.
    pub actions_applied: u64,
}

/// Backed by `DashMap` so socket tasks can update their own entry without a
/// shared lock.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    sessions: DashMap<PeerId, PeerSession>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        PeerRegistry {
            sessions: DashMap::new(),
        }
    }

    pub fn register(&self) -> PeerId {
        let id = PeerId(Uuid::new_v4());
        self.sessions.insert(
            id,
            PeerSession {
                id,
                connected_at: Instant::now(),
                frames_received: 0,
                actions_applied: 0,
            },
        );
        id
    }

    /// Removes a peer. Returns `true` if it was registered.
    pub fn deregister(&self, id: &PeerId) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn record_frame(&self, id: &PeerId) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.frames_received += 1;
        }
    }

    pub fn record_action(&self, id: &PeerId) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.actions_applied += 1;
        }
    }

    pub fn get(&self, id: &PeerId) -> Option<PeerSession> {
        self.sessions.get(id).map(|entry| entry.clone())
    }

    pub fn list(&self) -> Vec<PeerSession> {
        self.sessions.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
