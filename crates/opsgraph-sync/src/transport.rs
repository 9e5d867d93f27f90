//! The outbound half of the message channel.
//!
//! A [`Transport`] accepts an [`OutboundMessage`] and hands it off without
//! waiting for the peer: sending is fire-and-forget. Inbound traffic arrives
//! separately as an ordered stream of [`InboundEvent`]s (see
//! [`SyncSession::run`](crate::session::SyncSession::run)).

use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::protocol::OutboundMessage;

/// One item of the ordered inbound stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A new connection to the authority is up. The frames that follow begin
    /// with its full greeting, so the receiver should drop what it holds.
    Connected,
    /// One raw text frame.
    Frame(String),
}

impl From<String> for InboundEvent {
    fn from(frame: String) -> Self {
        InboundEvent::Frame(frame)
    }
}

impl From<&str> for InboundEvent {
    fn from(frame: &str) -> Self {
        InboundEvent::Frame(frame.to_string())
    }
}

pub trait Transport: Send {
    /// Queues `message` for delivery. Never blocks on the peer.
    fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}

/// Transport backed by an unbounded channel of encoded frames.
///
/// The receiving end is typically a connection task (see
/// [`ws::connect`](crate::ws::connect)) or a test.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelTransport {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        ChannelTransport { tx }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Transport for ChannelTransport {
    fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        let frame = message.to_json()?;
        self.tx.send(frame).map_err(|_| TransportError::Closed)
    }
}

/// Creates a transport plus the receiver its frames land on.
pub fn channel() -> (ChannelTransport, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelTransport::new(tx), rx)
}

/// Transport with no peer. Every send fails with [`TransportError::Closed`].
///
/// Used for offline sessions such as log replay.
#[derive(Debug, Clone, Copy, Default)]
pub struct Disconnected;

impl Transport for Disconnected {
    fn send(&self, _message: &OutboundMessage) -> Result<(), TransportError> {
        Err(TransportError::Closed)
    }
}
