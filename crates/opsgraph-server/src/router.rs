//! Router assembly for the opsgraph authority server.
//!
//! [`build_router`] wires all handler functions to their routes with CORS
//! and tracing middleware layers.

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router.
///
/// Routes use axum 0.8 `/{param}` path syntax. CORS is permissive since
/// canvas clients may be served from any origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Sync channel
        .route("/ws", get(handlers::ws::ws_upgrade))
        // Graph
        .route("/graph", get(handlers::graph::get_graph))
        .route("/nodes", post(handlers::nodes::create_node))
        .route("/nodes/{id}", delete(handlers::nodes::delete_node))
        .route("/nodes/{id}/status", put(handlers::nodes::set_status))
        .route("/edges", post(handlers::edges::create_edge))
        .route("/edges/{id}", delete(handlers::edges::delete_edge))
        // Peers
        .route("/peers", get(handlers::peers::list_peers))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
