//! Sync tests against a live server: a `SyncSession` fed by the WebSocket
//! client should converge on the authority's graph.

use std::time::Duration;

use opsgraph_core::{GraphStore, Node, NodeAction, NodeStatus};
use opsgraph_server::router::build_router;
use opsgraph_server::schema::nodes::CreateNodeRequest;
use opsgraph_server::state::AppState;
use opsgraph_sync::{
    connect, ChannelTransport, FrameOutcome, InboundEvent, ReconnectPolicy, SyncSession,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};

async fn spawn_server(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    format!("ws://{addr}/ws")
}

fn quick_retry() -> ReconnectPolicy {
    ReconnectPolicy {
        initial_delay: Duration::from_millis(20),
        max_delay: Duration::from_millis(100),
    }
}

async fn next_event(rx: &mut UnboundedReceiver<InboundEvent>) -> InboundEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for frame")
        .expect("inbound stream closed")
}

async fn next_frame(rx: &mut UnboundedReceiver<InboundEvent>) -> String {
    match next_event(rx).await {
        InboundEvent::Frame(frame) => frame,
        InboundEvent::Connected => panic!("unexpected reconnect"),
    }
}

/// Consumes the connection marker and the demo greeting (4 nodes, 2 edges).
async fn receive_demo_greeting(
    session: &mut SyncSession<ChannelTransport>,
    inbound: &mut UnboundedReceiver<InboundEvent>,
) {
    assert_eq!(next_event(inbound).await, InboundEvent::Connected);
    session.handle_event(InboundEvent::Connected);
    for _ in 0..6 {
        let frame = next_frame(inbound).await;
        assert_eq!(session.handle_frame(&frame), FrameOutcome::Applied);
    }
    assert_eq!(session.store().node_count(), 4);
    assert_eq!(session.store().edge_count(), 2);
}

#[tokio::test]
async fn client_receives_greeting_then_live_updates() {
    let state = AppState::demo();
    let url = spawn_server(state.clone()).await;

    let (client, transport, mut inbound) = connect(url, ReconnectPolicy::default());
    let mut session = SyncSession::new(GraphStore::new(), transport);
    receive_demo_greeting(&mut session, &mut inbound).await;

    // A local action round-trips through the authority as set_status.
    assert!(session
        .request_action(&"error-4".into(), NodeAction::Provision)
        .unwrap());
    let frame = next_frame(&mut inbound).await;
    assert_eq!(session.handle_frame(&frame), FrameOutcome::Applied);
    assert_eq!(
        session.store().node(&"error-4".into()).unwrap().status(),
        NodeStatus::Running
    );

    // Operator mutations are pushed too.
    state
        .service
        .lock()
        .await
        .create_node(CreateNodeRequest {
            id: Some("cache-9".into()),
            ..Default::default()
        })
        .unwrap();
    let frame = next_frame(&mut inbound).await;
    session.handle_frame(&frame);
    assert!(session.store().contains_node(&"cache-9".into()));

    let peers = state.peers.list();
    assert_eq!(peers.len(), 1);
    assert_eq!(peers[0].actions_applied, 1);

    client.close();
}

#[tokio::test]
async fn unknown_action_changes_nothing() {
    let state = AppState::demo();
    let url = spawn_server(state.clone()).await;

    let (client, transport, mut inbound) = connect(url, ReconnectPolicy::default());
    let mut session = SyncSession::new(GraphStore::new(), transport);
    receive_demo_greeting(&mut session, &mut inbound).await;

    session
        .request_action(&"idle-1".into(), NodeAction::from("defragment"))
        .unwrap();
    session
        .request_action(&"idle-1".into(), NodeAction::Status)
        .unwrap();

    // Only the status re-announcement comes back.
    let frame = next_frame(&mut inbound).await;
    let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(value["type"], "set_status");
    assert_eq!(value["status"], "idle");

    let service = state.service.lock().await;
    assert_eq!(
        service.store().node(&"idle-1".into()).unwrap().status(),
        NodeStatus::Idle
    );
    drop(service);
    client.close();
}

/// With a one-frame buffer, three mutations made under a single lock leave
/// the peer lagging. The server drops it; the client redials and rebuilds
/// its store from the new greeting instead of rejecting it as duplicates.
#[tokio::test]
async fn lagging_peer_reconnects_and_resyncs() {
    let state = AppState::with_event_capacity(GraphStore::demo(), 1);
    let url = spawn_server(state.clone()).await;

    let (client, transport, mut inbound) = connect(url, quick_retry());
    let mut session = SyncSession::new(GraphStore::new(), transport);
    receive_demo_greeting(&mut session, &mut inbound).await;

    let authority = {
        let mut service = state.service.lock().await;
        service.set_status(&"idle-1".into(), NodeStatus::Error).unwrap();
        service.delete_node(&"error-4".into()).unwrap();
        service
            .create_node(CreateNodeRequest {
                id: Some("cache-9".into()),
                ..Default::default()
            })
            .unwrap();
        service.snapshot()
    };

    // Anything delivered before the drop lands on the old store.
    loop {
        match next_event(&mut inbound).await {
            InboundEvent::Connected => break,
            event => {
                session.handle_event(event);
            }
        }
    }
    session.handle_event(InboundEvent::Connected);
    for _ in 0..authority.nodes.len() + authority.edges.len() {
        let frame = next_frame(&mut inbound).await;
        assert_eq!(session.handle_frame(&frame), FrameOutcome::Applied);
    }

    let store = session.store();
    assert_eq!(store.node(&"idle-1".into()).unwrap().status(), NodeStatus::Error);
    assert!(!store.contains_node(&"error-4".into()));
    assert!(store.contains_node(&"cache-9".into()));
    let ids = |nodes: &[Node]| nodes.iter().map(|n| n.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&store.snapshot().nodes), ids(&authority.nodes));
    assert_eq!(store.edge_count(), authority.edges.len());
    assert_eq!(session.stats().resyncs, 2);

    client.close();
}

#[tokio::test]
async fn closing_client_keeps_applied_state() {
    let state = AppState::demo();
    let url = spawn_server(state.clone()).await;

    let (client, transport, inbound) = connect(url, ReconnectPolicy::default());
    let session = SyncSession::new(GraphStore::new(), transport);
    let mut snapshots = session.subscribe();
    let (_commands_tx, commands_rx) = mpsc::unbounded_channel();
    let run = tokio::spawn(session.run(inbound, commands_rx));

    tokio::time::timeout(
        Duration::from_secs(5),
        snapshots.wait_for(|snap| snap.nodes.len() == 4 && snap.edges.len() == 2),
    )
    .await
    .expect("timed out waiting for greeting")
    .map(|_| ())
    .unwrap();

    client.close();
    let store = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("session kept running after close")
        .unwrap();
    assert_eq!(store.node_count(), 4);
    assert_eq!(store.edge_count(), 2);
}
