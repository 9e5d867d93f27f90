//! WebSocket client transport with automatic reconnection.
//!
//! [`connect`] spawns one connection task that owns the socket. Outbound
//! frames queue on a [`ChannelTransport`]; inbound traffic is forwarded, in
//! arrival order, to the receiver returned alongside it. Every successful
//! dial is announced with [`InboundEvent::Connected`] before its first
//! frame, so the consumer can resynchronize from the greeting. When the
//! socket drops the task waits according to its [`ReconnectPolicy`] and dials
//! again. Retry lives here, never in the session.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::transport::{ChannelTransport, InboundEvent};

/// Exponential backoff between connection attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before attempt number `attempt` (0-based), capped at
    /// `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.min(16)).unwrap_or(u32::MAX);
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

/// Handle on the background connection task.
#[derive(Debug)]
pub struct WsClient {
    task: JoinHandle<()>,
}

impl WsClient {
    /// Stops the connection task. Inbound delivery ends; whatever was already
    /// applied by the consumer stays applied.
    pub fn close(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for WsClient {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Why one connection ended.
enum Disconnect {
    /// The socket closed or errored; dial again.
    Lost,
    /// The local side hung up (transport or inbound receiver dropped).
    Shutdown,
}

/// Connects to `url` in the background.
///
/// Returns the client handle, the transport for outbound messages and the
/// ordered inbound stream. Must be called inside a tokio runtime.
pub fn connect(
    url: impl Into<String>,
    policy: ReconnectPolicy,
) -> (WsClient, ChannelTransport, mpsc::UnboundedReceiver<InboundEvent>) {
    let url = url.into();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    let (in_tx, in_rx) = mpsc::unbounded_channel::<InboundEvent>();

    let task = tokio::spawn(async move {
        // Frames queued while no socket is up; sent after the next dial.
        let mut backlog: Vec<String> = Vec::new();
        let mut attempt = 0u32;
        loop {
            match connect_async(url.as_str()).await {
                Ok((stream, _)) => {
                    tracing::info!(%url, "websocket connected");
                    attempt = 0;
                    if in_tx.send(InboundEvent::Connected).is_err() {
                        return;
                    }
                    match pump(stream, &mut backlog, &mut out_rx, &in_tx).await {
                        Disconnect::Shutdown => {
                            tracing::info!(%url, "websocket closed locally");
                            return;
                        }
                        Disconnect::Lost => tracing::warn!(%url, "websocket closed"),
                    }
                }
                Err(err) => tracing::warn!(%url, error = %err, "websocket connect failed"),
            }

            let delay = policy.delay_for(attempt);
            attempt = attempt.saturating_add(1);
            tracing::debug!(?delay, attempt, "reconnecting");
            if let Disconnect::Shutdown = backoff(delay, &mut backlog, &mut out_rx, &in_tx).await {
                tracing::info!(%url, "client dropped while disconnected");
                return;
            }
        }
    });

    (WsClient { task }, ChannelTransport::new(out_tx), in_rx)
}

/// Sleeps for `delay` unless the local side hangs up first. Outbound frames
/// sent meanwhile are kept in `backlog`.
async fn backoff(
    delay: Duration,
    backlog: &mut Vec<String>,
    out_rx: &mut mpsc::UnboundedReceiver<String>,
    in_tx: &mpsc::UnboundedSender<InboundEvent>,
) -> Disconnect {
    let sleep = tokio::time::sleep(delay);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            _ = &mut sleep => return Disconnect::Lost,
            _ = in_tx.closed() => return Disconnect::Shutdown,
            outbound = out_rx.recv() => match outbound {
                Some(frame) => backlog.push(frame),
                None => return Disconnect::Shutdown,
            },
        }
    }
}

async fn pump<S>(
    stream: S,
    backlog: &mut Vec<String>,
    out_rx: &mut mpsc::UnboundedReceiver<String>,
    in_tx: &mpsc::UnboundedSender<InboundEvent>,
) -> Disconnect
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
        + futures_util::Sink<Message, Error = tokio_tungstenite::tungstenite::Error>
        + Unpin,
{
    let (mut write, mut read) = stream.split();
    for frame in backlog.drain(..) {
        if let Err(err) = write.send(Message::Text(frame.into())).await {
            tracing::warn!(error = %err, "websocket send failed");
            return Disconnect::Lost;
        }
    }
    loop {
        tokio::select! {
            outbound = out_rx.recv() => match outbound {
                Some(frame) => {
                    if let Err(err) = write.send(Message::Text(frame.into())).await {
                        tracing::warn!(error = %err, "websocket send failed");
                        return Disconnect::Lost;
                    }
                }
                None => {
                    let _ = write.send(Message::Close(None)).await;
                    return Disconnect::Shutdown;
                }
            },
            inbound = read.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    if in_tx.send(InboundEvent::Frame(text.as_str().to_owned())).is_err() {
                        return Disconnect::Shutdown;
                    }
                }
                Some(Ok(Message::Close(_))) | None => return Disconnect::Lost,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::warn!(error = %err, "websocket read failed");
                    return Disconnect::Lost;
                }
            },
        }
    }
}
