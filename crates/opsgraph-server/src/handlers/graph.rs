//! Whole-graph query handler.

use axum::extract::State;
use axum::Json;
use opsgraph_core::GraphSnapshot;

use crate::state::AppState;

/// `GET /graph`
pub async fn get_graph(State(state): State<AppState>) -> Json<GraphSnapshot> {
    let service = state.service.lock().await;
    Json(service.snapshot())
}
