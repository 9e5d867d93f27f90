//! API schema types for request/response definitions.
//!
//! Graph payloads reuse the core types directly (`Node`, `Edge`,
//! `GraphSnapshot`) so the HTTP view and the WebSocket view of the graph
//! share one JSON shape.

pub mod edges;
pub mod nodes;
pub mod peers;
