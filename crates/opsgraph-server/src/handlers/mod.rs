//! HTTP and WebSocket handler modules.
//!
//! Each sub-module implements thin handlers that parse requests, acquire the
//! service lock, delegate to [`GraphService`](crate::service::GraphService),
//! and return JSON responses. No business logic lives in handlers.

pub mod edges;
pub mod graph;
pub mod nodes;
pub mod peers;
pub mod ws;
