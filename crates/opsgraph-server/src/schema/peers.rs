//! Schema types for the peer listing.

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct PeerView {
    pub peer_id: Uuid,
    pub connected_secs: u64,
    pub frames_received: u64,
    pub actions_applied: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListPeersResponse {
    pub peers: Vec<PeerView>,
}
