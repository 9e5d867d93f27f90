//! Keeps a local [`GraphStore`](opsgraph_core::GraphStore) in step with a
//! remote authority over a bidirectional message channel.
//!
//! - [`protocol`]: the tagged JSON messages and their decoder.
//! - [`transport`]: the outbound half ([`Transport`]), plus in-process and
//!   offline implementations.
//! - [`ws`]: a reconnecting WebSocket client.
//! - [`session`]: [`SyncSession`], the single writer that applies inbound
//!   frames and local gestures in order.

pub mod error;
pub mod protocol;
pub mod session;
pub mod transport;
pub mod ws;

pub use error::{SyncError, TransportError};
pub use protocol::{
    decode_inbound, decode_outbound, Decoded, InboundMessage, NodeDataUpdate, NodeUpdate,
    OutboundMessage,
};
pub use session::{FrameOutcome, LocalCommand, SessionStats, SyncSession};
pub use transport::{channel, ChannelTransport, Disconnected, InboundEvent, Transport};
pub use ws::{connect, ReconnectPolicy, WsClient};
