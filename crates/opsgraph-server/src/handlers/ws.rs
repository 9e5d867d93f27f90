//! `GET /ws`: the remote-authority end of the sync protocol.
//!
//! A new peer first receives the whole graph (every `add_node`, then every
//! `add_edge`), then every broadcast mutation. Frames from the peer are
//! logged; `node_action` requests go to
//! [`GraphService::apply_action`](crate::service::GraphService::apply_action).

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use opsgraph_sync::{decode_outbound, Decoded, OutboundMessage};
use tokio::sync::broadcast::error::RecvError;

use crate::peers::PeerId;
use crate::state::AppState;

/// `GET /ws`
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| serve_peer(socket, state))
}

async fn serve_peer(socket: WebSocket, state: AppState) {
    let peer = state.peers.register();
    tracing::info!(%peer, "peer connected");

    let (greeting, mut events) = state.service.lock().await.join();
    let (mut sink, mut stream) = socket.split();

    let mut open = true;
    for frame in greeting {
        if sink.send(Message::Text(frame.into())).await.is_err() {
            open = false;
            break;
        }
    }

    while open {
        tokio::select! {
            event = events.recv() => match event {
                Ok(frame) => {
                    if sink.send(Message::Text(frame.into())).await.is_err() {
                        open = false;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // The peer's view is now incomplete; dropping it makes
                    // the client reconnect and receive a fresh greeting.
                    tracing::warn!(%peer, skipped, "peer lagged behind broadcasts");
                    open = false;
                }
                Err(RecvError::Closed) => open = false,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => handle_frame(&state, peer, text.as_str()).await,
                Some(Ok(Message::Close(_))) | None => open = false,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::warn!(%peer, error = %err, "websocket error");
                    open = false;
                }
            },
        }
    }

    state.peers.deregister(&peer);
    tracing::info!(%peer, "peer disconnected");
}

async fn handle_frame(state: &AppState, peer: PeerId, raw: &str) {
    state.peers.record_frame(&peer);
    tracing::info!(%peer, frame = raw, "received frame");

    match decode_outbound(raw) {
        Ok(Decoded::Message(OutboundMessage::NodeAction { id, message })) => {
            let result = state.service.lock().await.apply_action(&id, &message);
            match result {
                Ok(Some(_)) => state.peers.record_action(&peer),
                Ok(None) => {}
                Err(err) => tracing::warn!(%peer, error = %err, "node action failed"),
            }
        }
        Ok(Decoded::Unrecognized(tag)) => {
            tracing::warn!(%peer, %tag, "ignoring unrecognized message type");
        }
        Err(err) => tracing::warn!(%peer, error = %err, "dropping malformed message"),
    }
}
