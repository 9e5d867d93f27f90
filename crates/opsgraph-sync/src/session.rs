//! SyncSession: the single writer of the local graph.
//!
//! The session owns the [`GraphStore`], the [`UiFocus`] coordinator and the
//! outbound [`Transport`]. Inbound frames and local gestures are both applied
//! here, one at a time, so the store never has a concurrent writer.
//!
//! Failure policy at this boundary:
//! - malformed or unrecognized frames are logged and dropped;
//! - remote mutations the store refuses (duplicates, invalid connections,
//!   unknown ids) are absorbed silently;
//! - local gestures on stale ids are no-ops;
//! - local duplicates and invalid connections are returned to the caller.
//!
//! A new connection to the authority is announced by
//! [`InboundEvent::Connected`]. The session then drops its store, since the
//! greeting that follows replays the authority's full graph.
//!
//! After every change the session publishes a fresh [`GraphSnapshot`] on a
//! `watch` channel, so a Renderer can redraw on its own schedule.

use opsgraph_core::{
    Connection, CoreError, EdgeId, GraphSnapshot, GraphStore, MenuAction, Node, NodeAction,
    NodeId, NodePatch, NodeStatus, Position, UiFocus,
};
use tokio::sync::{mpsc, watch};

use crate::error::SyncError;
use crate::protocol::{decode_inbound, Decoded, InboundMessage, OutboundMessage};
use crate::transport::{InboundEvent, Transport};

/// What happened to one inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The graph changed.
    Applied,
    /// Valid and accepted, but nothing changed (e.g. removing an absent id).
    Unchanged,
    /// The store refused the mutation; dropped.
    Rejected,
    /// Unknown `type`; ignored.
    Unrecognized,
    /// Unparsable or missing fields; dropped.
    Malformed,
}

/// Running counts of frame outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub applied: u64,
    pub unchanged: u64,
    pub rejected: u64,
    pub unrecognized: u64,
    pub malformed: u64,
    /// Store resets on reconnect. Not a frame, so not in [`total`](Self::total).
    pub resyncs: u64,
}

impl SessionStats {
    fn record(&mut self, outcome: FrameOutcome) {
        let slot = match outcome {
            FrameOutcome::Applied => &mut self.applied,
            FrameOutcome::Unchanged => &mut self.unchanged,
            FrameOutcome::Rejected => &mut self.rejected,
            FrameOutcome::Unrecognized => &mut self.unrecognized,
            FrameOutcome::Malformed => &mut self.malformed,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u64 {
        self.applied + self.unchanged + self.rejected + self.unrecognized + self.malformed
    }
}

/// A local user gesture, queued from the UI thread to the session loop.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalCommand {
    AddNewNode,
    Connect(Connection),
    Rename { id: NodeId, label: String },
    Move { id: NodeId, position: Position },
    CycleStatus(NodeId),
    DeleteNode(NodeId),
    DeleteEdge(EdgeId),
    RequestAction { id: NodeId, action: NodeAction },
    OpenContextMenu(NodeId),
    CloseContextMenu,
    ChooseMenuAction(MenuAction),
}

pub struct SyncSession<T: Transport> {
    store: GraphStore,
    focus: UiFocus,
    transport: T,
    snapshots: watch::Sender<GraphSnapshot>,
    stats: SessionStats,
}

impl<T: Transport> SyncSession<T> {
    pub fn new(store: GraphStore, transport: T) -> Self {
        let (snapshots, _) = watch::channel(store.snapshot());
        SyncSession {
            store,
            focus: UiFocus::new(),
            transport,
            snapshots,
            stats: SessionStats::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn focus(&self) -> &UiFocus {
        &self.focus
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Receiver that always holds the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<GraphSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn into_store(self) -> GraphStore {
        self.store
    }

    // -----------------------------------------------------------------------
    // Inbound
    // -----------------------------------------------------------------------

    /// Decodes and applies one raw frame. Never fails: every problem is
    /// logged and reported through the returned outcome.
    pub fn handle_frame(&mut self, raw: &str) -> FrameOutcome {
        let outcome = match decode_inbound(raw) {
            Ok(Decoded::Message(msg)) => self.apply(msg),
            Ok(Decoded::Unrecognized(tag)) => {
                tracing::warn!(%tag, "ignoring unrecognized message type");
                FrameOutcome::Unrecognized
            }
            Err(err) => {
                tracing::warn!(error = %err, "dropping malformed message");
                FrameOutcome::Malformed
            }
        };
        self.stats.record(outcome);
        outcome
    }

    /// Applies one decoded remote message to the store.
    pub fn apply(&mut self, msg: InboundMessage) -> FrameOutcome {
        let tag = msg.tag();
        let result = match msg {
            InboundMessage::AddNode { node } => self.store.add_node(node).map(|_| true),
            InboundMessage::UpdateNode { node } => self.store.update_node(&node.id, &node.patch()),
            InboundMessage::AddEdge { edge } => self.store.add_edge(edge).map(|_| true),
            InboundMessage::RemoveNode { node_id } => Ok(self.remove_node(&node_id).is_some()),
            InboundMessage::RemoveEdge { edge_id } => {
                Ok(self.store.remove_edge(&edge_id).is_some())
            }
            InboundMessage::SetStatus { id, status } => self
                .store
                .update_node(&id, &NodePatch::status_with_label(status)),
        };
        match result {
            Ok(true) => {
                tracing::debug!(%tag, revision = self.store.revision(), "applied remote message");
                self.publish();
                FrameOutcome::Applied
            }
            Ok(false) => FrameOutcome::Unchanged,
            Err(err) => {
                tracing::debug!(%tag, error = %err, "remote mutation absorbed");
                FrameOutcome::Rejected
            }
        }
    }

    /// Forgets the local graph ahead of a fresh greeting. Local-only nodes
    /// and edges go too: the authority's replay is the new baseline.
    pub fn resync(&mut self) {
        let dropped = self.store.node_count();
        self.store.clear();
        self.focus.close_context_menu();
        self.stats.resyncs += 1;
        tracing::info!(dropped, revision = self.store.revision(), "resyncing with authority");
        self.publish();
    }

    /// Handles one item of the inbound stream. Frames report their outcome;
    /// a connection marker resyncs and returns `None`.
    pub fn handle_event(&mut self, event: InboundEvent) -> Option<FrameOutcome> {
        match event {
            InboundEvent::Connected => {
                self.resync();
                None
            }
            InboundEvent::Frame(frame) => Some(self.handle_frame(&frame)),
        }
    }

    /// Applies inbound events and local commands until the inbound stream
    /// ends, then hands back the store.
    ///
    /// Frames are applied strictly in the order received. Ending the inbound
    /// stream stops delivery but leaves applied mutations in place. If the
    /// command channel closes first, the loop keeps serving inbound frames.
    pub async fn run(
        mut self,
        mut inbound: mpsc::UnboundedReceiver<InboundEvent>,
        mut commands: mpsc::UnboundedReceiver<LocalCommand>,
    ) -> GraphStore {
        let mut commands_open = true;
        loop {
            tokio::select! {
                event = inbound.recv() => match event {
                    Some(event) => {
                        self.handle_event(event);
                    }
                    None => break,
                },
                command = commands.recv(), if commands_open => match command {
                    Some(command) => self.execute(command),
                    None => commands_open = false,
                },
            }
        }
        tracing::info!(
            frames = self.stats.total(),
            resyncs = self.stats.resyncs,
            malformed = self.stats.malformed,
            revision = self.store.revision(),
            "inbound stream closed"
        );
        self.store
    }

    // -----------------------------------------------------------------------
    // Local gestures
    // -----------------------------------------------------------------------

    /// Inserts a node created locally. A duplicate id is a caller bug and is
    /// returned as an error.
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, CoreError> {
        let id = self.store.add_node(node)?;
        self.publish();
        Ok(id)
    }

    /// The "add new node" button: a fresh idle node at a random spot.
    pub fn add_new_node(&mut self) -> Result<NodeId, CoreError> {
        let node = Node::placed(&mut rand::thread_rng());
        self.add_node(node)
    }

    /// Completes a connect gesture. `InvalidConnection` means "do not draw
    /// the edge"; it is recoverable.
    pub fn connect(&mut self, proposed: Connection) -> Result<EdgeId, CoreError> {
        let id = self.store.connect(proposed)?;
        self.publish();
        Ok(id)
    }

    /// Free-form rename; local only. Returns `false` for stale ids.
    pub fn rename(&mut self, id: &NodeId, label: impl Into<String>) -> bool {
        self.update_local(id, NodePatch::label(label))
    }

    /// Drag write-back from the Renderer; local only.
    pub fn move_node(&mut self, id: &NodeId, position: Position) -> bool {
        self.update_local(id, NodePatch::position(position))
    }

    /// Demo status cycle; local only. `None` for stale ids.
    pub fn cycle_status(&mut self, id: &NodeId) -> Option<NodeStatus> {
        match self.store.cycle_status(id) {
            Ok(status) => {
                self.publish();
                Some(status)
            }
            Err(err) => {
                tracing::debug!(error = %err, "ignoring status cycle on stale node");
                None
            }
        }
    }

    /// Deletes a node and its edges. No-op for stale ids.
    pub fn delete_node(&mut self, id: &NodeId) -> Option<Node> {
        let removed = self.remove_node(id);
        if removed.is_some() {
            self.publish();
        }
        removed
    }

    pub fn delete_edge(&mut self, id: &EdgeId) -> bool {
        let removed = self.store.remove_edge(id).is_some();
        if removed {
            self.publish();
        }
        removed
    }

    /// Asks the remote to run `action` on a node. Nothing is sent for a
    /// stale id (`Ok(false)`); a closed transport is an error.
    pub fn request_action(&mut self, id: &NodeId, action: NodeAction) -> Result<bool, SyncError> {
        if !self.store.contains_node(id) {
            tracing::debug!(node = %id, %action, "not sending action for stale node");
            return Ok(false);
        }
        self.transport
            .send(&OutboundMessage::node_action(id.clone(), action))?;
        tracing::info!(node = %id, "node action sent");
        Ok(true)
    }

    /// Opens the context menu for a live node, closing any other.
    pub fn open_context_menu(&mut self, id: &NodeId) -> bool {
        if !self.store.contains_node(id) {
            return false;
        }
        self.focus.open_context_menu(id.clone());
        true
    }

    pub fn close_context_menu(&mut self) {
        self.focus.close_context_menu();
    }

    /// Picks an entry in the open context menu: the menu closes and the
    /// matching action is requested. Returns the target node, if a menu was
    /// open.
    pub fn choose_menu_action(&mut self, entry: MenuAction) -> Result<Option<NodeId>, SyncError> {
        let Some((node, action)) = self.focus.choose(entry) else {
            return Ok(None);
        };
        self.request_action(&node, action)?;
        Ok(Some(node))
    }

    /// Runs one queued gesture, logging instead of returning errors.
    pub fn execute(&mut self, command: LocalCommand) {
        match command {
            LocalCommand::AddNewNode => {
                if let Err(err) = self.add_new_node() {
                    tracing::error!(error = %err, "failed to add node");
                }
            }
            LocalCommand::Connect(proposed) => {
                if let Err(err) = self.connect(proposed) {
                    tracing::debug!(error = %err, "connection refused");
                }
            }
            LocalCommand::Rename { id, label } => {
                self.rename(&id, label);
            }
            LocalCommand::Move { id, position } => {
                self.move_node(&id, position);
            }
            LocalCommand::CycleStatus(id) => {
                self.cycle_status(&id);
            }
            LocalCommand::DeleteNode(id) => {
                self.delete_node(&id);
            }
            LocalCommand::DeleteEdge(id) => {
                self.delete_edge(&id);
            }
            LocalCommand::RequestAction { id, action } => {
                if let Err(err) = self.request_action(&id, action) {
                    tracing::warn!(node = %id, error = %err, "failed to send node action");
                }
            }
            LocalCommand::OpenContextMenu(id) => {
                self.open_context_menu(&id);
            }
            LocalCommand::CloseContextMenu => self.close_context_menu(),
            LocalCommand::ChooseMenuAction(entry) => {
                if let Err(err) = self.choose_menu_action(entry) {
                    tracing::warn!(error = %err, "failed to send menu action");
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn update_local(&mut self, id: &NodeId, patch: NodePatch) -> bool {
        match self.store.update_node(id, &patch) {
            Ok(changed) => {
                if changed {
                    self.publish();
                }
                true
            }
            Err(err) => {
                tracing::debug!(error = %err, "ignoring update on stale node");
                false
            }
        }
    }

    fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let removed = self.store.remove_node(id);
        if removed.is_some() {
            self.focus.forget_node(id);
        }
        removed
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.store.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{channel, ChannelTransport, Disconnected};
    use opsgraph_core::{EdgeIndicator, Position};

    fn session() -> (SyncSession<ChannelTransport>, mpsc::UnboundedReceiver<String>) {
        let (transport, rx) = channel();
        (SyncSession::new(GraphStore::new(), transport), rx)
    }

    fn add_node_frame(id: &str) -> String {
        format!(
            r#"{{"type":"add_node","node":{{"id":"{id}","type":"custom","data":{{"label":"{id}","status":"idle"}},"position":{{"x":0,"y":0}}}}}}"#
        )
    }

    #[test]
    fn every_inbound_tag_mutates_the_store() {
        let (mut s, _rx) = session();
        assert_eq!(s.handle_frame(&add_node_frame("X")), FrameOutcome::Applied);
        assert_eq!(s.handle_frame(&add_node_frame("Y")), FrameOutcome::Applied);
        assert_eq!(
            s.handle_frame(r#"{"type":"add_edge","edge":{"id":"xy","source":"X","target":"Y"}}"#),
            FrameOutcome::Applied
        );
        assert_eq!(
            s.handle_frame(r#"{"type":"update_node","node":{"id":"X","data":{"label":"web"}}}"#),
            FrameOutcome::Applied
        );
        assert_eq!(s.store().node(&"X".into()).unwrap().label(), "web");

        assert_eq!(
            s.handle_frame(r#"{"type":"set_status","id":"Y","status":"running"}"#),
            FrameOutcome::Applied
        );
        let y = s.store().node(&"Y".into()).unwrap();
        assert_eq!(y.status(), NodeStatus::Running);
        assert_eq!(y.label(), "Running");

        assert_eq!(
            s.handle_frame(r#"{"type":"remove_edge","edgeId":"xy"}"#),
            FrameOutcome::Applied
        );
        assert_eq!(
            s.handle_frame(r#"{"type":"remove_node","nodeId":"X"}"#),
            FrameOutcome::Applied
        );
        assert_eq!(s.store().node_count(), 1);
        assert_eq!(s.stats().applied, 7);
    }

    /// `[add_node(X), add_edge(X, Y)]` with Y unknown: the edge is never
    /// stored and later frames still apply.
    #[test]
    fn edge_to_missing_node_is_dropped() {
        let (mut s, _rx) = session();
        s.handle_frame(&add_node_frame("X"));
        assert_eq!(
            s.handle_frame(r#"{"type":"add_edge","edge":{"source":"X","target":"Y"}}"#),
            FrameOutcome::Rejected
        );
        assert_eq!(s.store().edge_count(), 0);

        assert_eq!(s.handle_frame(&add_node_frame("Y")), FrameOutcome::Applied);
        assert_eq!(
            s.handle_frame(r#"{"type":"add_edge","edge":{"source":"Y","target":"X"}}"#),
            FrameOutcome::Applied
        );
        assert_eq!(s.store().edge_count(), 1);
    }

    /// A malformed frame followed by a valid `set_status`: the second still
    /// applies.
    #[test]
    fn malformed_frame_does_not_stop_processing() {
        let mut store = GraphStore::new();
        store.add_node(Node::new("A", "A", Position::default())).unwrap();
        let mut s = SyncSession::new(store, Disconnected);

        assert_eq!(s.handle_frame("{\"type\": \"set_status\", \"id\": "), FrameOutcome::Malformed);
        assert_eq!(
            s.handle_frame(r#"{"type":"set_status","id":"A","status":"error"}"#),
            FrameOutcome::Applied
        );
        assert_eq!(s.store().node(&"A".into()).unwrap().status(), NodeStatus::Error);
        assert_eq!(s.stats().malformed, 1);
    }

    #[test]
    fn remote_duplicates_and_unknowns_are_absorbed() {
        let (mut s, _rx) = session();
        s.handle_frame(&add_node_frame("A"));
        assert_eq!(s.handle_frame(&add_node_frame("A")), FrameOutcome::Rejected);
        assert_eq!(
            s.handle_frame(r#"{"type":"update_node","node":{"id":"ghost","data":{"label":"x"}}}"#),
            FrameOutcome::Rejected
        );
        assert_eq!(
            s.handle_frame(r#"{"type":"remove_node","nodeId":"ghost"}"#),
            FrameOutcome::Unchanged
        );
        assert_eq!(s.handle_frame(r#"{"type":"ping"}"#), FrameOutcome::Unrecognized);
        assert_eq!(s.store().node_count(), 1);
    }

    #[test]
    fn request_action_sends_node_action() {
        let (mut s, mut rx) = session();
        s.add_node(Node::new("web-1", "web", Position::default())).unwrap();
        assert!(s.request_action(&"web-1".into(), NodeAction::Provision).unwrap());

        let frame: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(
            frame,
            serde_json::json!({"id": "web-1", "type": "node_action", "message": "provision"})
        );

        assert!(!s.request_action(&"gone".into(), NodeAction::Stop).unwrap());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn local_presentation_changes_stay_local() {
        let (mut s, mut rx) = session();
        let id = s.add_node(Node::new("n", "n", Position::default())).unwrap();
        assert!(s.rename(&id, "renamed"));
        assert_eq!(s.cycle_status(&id), Some(NodeStatus::Running));
        assert!(s.move_node(&id, Position::new(10.0, 20.0)));
        assert!(rx.try_recv().is_err());

        assert!(!s.rename(&"stale".into(), "x"));
        assert_eq!(s.cycle_status(&"stale".into()), None);
    }

    #[test]
    fn local_duplicate_is_an_error() {
        let (mut s, _rx) = session();
        s.add_node(Node::new("n", "n", Position::default())).unwrap();
        let err = s.add_node(Node::new("n", "n", Position::default())).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateId { .. }));
    }

    #[test]
    fn context_menu_choice_sends_action_and_closes() {
        let (mut s, mut rx) = session();
        s.add_node(Node::new("job-7", "job", Position::default())).unwrap();
        assert!(!s.open_context_menu(&"nope".into()));
        assert!(s.open_context_menu(&"job-7".into()));

        let target = s.choose_menu_action(MenuAction::Run).unwrap();
        assert_eq!(target, Some(NodeId::from("job-7")));
        assert_eq!(s.focus().context_menu(), None);
        let frame: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(frame["message"], "start");

        assert_eq!(s.choose_menu_action(MenuAction::Stop).unwrap(), None);
    }

    #[test]
    fn removing_node_closes_its_menu() {
        let (mut s, _rx) = session();
        s.handle_frame(&add_node_frame("A"));
        s.open_context_menu(&"A".into());
        s.handle_frame(r#"{"type":"remove_node","nodeId":"A"}"#);
        assert_eq!(s.focus().context_menu(), None);
    }

    #[test]
    fn subscribers_see_latest_snapshot() {
        let mut s = SyncSession::new(GraphStore::demo(), Disconnected);
        let rx = s.subscribe();
        s.handle_frame(r#"{"type":"set_status","id":"idle-1","status":"running"}"#);
        let snap = rx.borrow().clone();
        assert_eq!(snap.revision, s.store().revision());
        let e12 = snap.edge(&"e1-2".into()).unwrap();
        assert!(e12.active);
        assert_eq!(e12.indicator, EdgeIndicator::Running);
    }

    #[test]
    fn add_new_node_is_idle() {
        let (mut s, _rx) = session();
        let id = s.add_new_node().unwrap();
        let node = s.store().node(&id).unwrap();
        assert_eq!(node.status(), NodeStatus::Idle);
        assert_eq!(node.label(), "New Node");
    }

    /// The authority changed while the client was away. Replaying its
    /// greeting onto the old store would be refused frame by frame; after a
    /// `Connected` marker it rebuilds the authority's graph.
    #[test]
    fn reconnect_greeting_replaces_stale_store() {
        let mut authority = GraphStore::demo();
        authority
            .update_node(&"idle-1".into(), &NodePatch::status_with_label(NodeStatus::Error))
            .unwrap();
        authority.remove_node(&"error-4".into()).unwrap();

        let mut s = SyncSession::new(GraphStore::demo(), Disconnected);
        s.open_context_menu(&"error-4".into());
        assert_eq!(s.handle_event(InboundEvent::Connected), None);
        assert_eq!(s.store().node_count(), 0);
        assert_eq!(s.focus().context_menu(), None);

        for msg in InboundMessage::replay(&authority) {
            let frame = msg.to_json().unwrap();
            assert_eq!(s.handle_event(frame.into()), Some(FrameOutcome::Applied));
        }
        assert_eq!(s.store().node(&"idle-1".into()).unwrap().status(), NodeStatus::Error);
        assert!(!s.store().contains_node(&"error-4".into()));
        assert_eq!(s.store().snapshot().nodes, authority.snapshot().nodes);
        assert_eq!(s.store().edge_count(), authority.edge_count());
        assert_eq!(s.stats().resyncs, 1);
        assert_eq!(s.stats().rejected, 0);
    }

    #[test]
    fn resync_publishes_empty_snapshot() {
        let mut s = SyncSession::new(GraphStore::demo(), Disconnected);
        let rx = s.subscribe();
        let before = s.store().revision();
        s.resync();
        let snap = rx.borrow().clone();
        assert!(snap.nodes.is_empty());
        assert!(snap.revision > before);
    }

    #[tokio::test]
    async fn run_applies_frames_in_order_and_keeps_state_on_close() {
        let (transport, _out) = channel();
        let s = SyncSession::new(GraphStore::new(), transport);
        let (in_tx, in_rx) = mpsc::unbounded_channel::<InboundEvent>();
        let (_cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        in_tx.send(add_node_frame("A").into()).unwrap();
        in_tx.send(add_node_frame("B").into()).unwrap();
        in_tx
            .send(r#"{"type":"add_edge","edge":{"id":"ab","source":"A","target":"B"}}"#.into())
            .unwrap();
        in_tx.send("garbage".into()).unwrap();
        in_tx
            .send(r#"{"type":"set_status","id":"A","status":"running"}"#.into())
            .unwrap();
        drop(in_tx);

        let store = s.run(in_rx, cmd_rx).await;
        assert_eq!(store.node_count(), 2);
        assert_eq!(store.edge_count(), 1);
        assert_eq!(store.node(&"A".into()).unwrap().status(), NodeStatus::Running);
    }

    #[tokio::test]
    async fn run_interleaves_local_commands() {
        let (transport, mut out) = channel();
        let s = SyncSession::new(GraphStore::demo(), transport);
        let (in_tx, in_rx) = mpsc::unbounded_channel::<InboundEvent>();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(s.run(in_rx, cmd_rx));
        cmd_tx.send(LocalCommand::CycleStatus("idle-1".into())).unwrap();
        cmd_tx
            .send(LocalCommand::RequestAction { id: "error-4".into(), action: NodeAction::Reboot })
            .unwrap();

        let frame = out.recv().await.unwrap();
        assert!(frame.contains("reboot"));

        drop(cmd_tx);
        drop(in_tx);
        let store = handle.await.unwrap();
        assert_eq!(store.node(&"idle-1".into()).unwrap().status(), NodeStatus::Running);
    }
}
