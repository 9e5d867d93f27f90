//! Error types for the synchronization layer.
//!
//! [`SyncError`] covers everything that can go wrong between a raw frame and
//! a graph mutation. The session absorbs these at its boundary; they are
//! returned only from local-action methods whose caller asked for a result.

use opsgraph_core::CoreError;
use thiserror::Error;

/// Failures of the outbound half of a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer side of the channel is gone.
    #[error("transport closed")]
    Closed,

    /// The message could not be encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors produced while translating between frames and graph mutations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The frame is not JSON, lacks a `type` tag, or is missing a required
    /// field for its type.
    #[error("malformed message: {reason}")]
    Malformed { reason: String },

    /// A graph mutation was refused.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An outbound message could not be handed to the transport.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SyncError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        SyncError::Malformed {
            reason: reason.into(),
        }
    }
}
