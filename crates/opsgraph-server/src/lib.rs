//! Remote authority for opsgraph canvases.
//!
//! Holds the authoritative graph, serves it to canvas clients over the
//! `/ws` sync channel, turns their `node_action` requests into status
//! changes, and exposes a small operator HTTP API whose mutations are
//! broadcast to every connected peer.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod peers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
