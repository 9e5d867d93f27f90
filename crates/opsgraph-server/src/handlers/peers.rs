//! Peer listing handler.

use axum::extract::State;
use axum::Json;

use crate::schema::peers::{ListPeersResponse, PeerView};
use crate::state::AppState;

/// `GET /peers`
pub async fn list_peers(State(state): State<AppState>) -> Json<ListPeersResponse> {
    let mut peers = state
        .peers
        .list()
        .into_iter()
        .map(|session| PeerView {
            peer_id: session.id.0,
            connected_secs: session.connected_at.elapsed().as_secs(),
            frames_received: session.frames_received,
            actions_applied: session.actions_applied,
        })
        .collect::<Vec<_>>();
    peers.sort_by_key(|p| p.peer_id);

    Json(ListPeersResponse { peers })
}
