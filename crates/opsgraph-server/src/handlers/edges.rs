//! Edge mutation handlers.

use axum::extract::{Path, State};
use axum::Json;
use opsgraph_core::EdgeId;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::schema::edges::{CreateEdgeRequest, DeleteEdgeResponse, EdgeResponse};
use crate::state::AppState;

/// `POST /edges`
pub async fn create_edge(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateEdgeRequest>,
) -> Result<Json<EdgeResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let result = service.create_edge(req)?;
    Ok(Json(result))
}

/// `DELETE /edges/{id}`
pub async fn delete_edge(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteEdgeResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let result = service.delete_edge(&EdgeId(id))?;
    Ok(Json(result))
}
