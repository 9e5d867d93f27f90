//! Node mutation handlers.

use axum::extract::{Path, State};
use axum::Json;
use opsgraph_core::NodeId;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::schema::nodes::{CreateNodeRequest, DeleteNodeResponse, NodeResponse, SetStatusRequest};
use crate::state::AppState;

/// `POST /nodes`
pub async fn create_node(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateNodeRequest>,
) -> Result<Json<NodeResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let result = service.create_node(req)?;
    Ok(Json(result))
}

/// `DELETE /nodes/{id}`
pub async fn delete_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteNodeResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let result = service.delete_node(&NodeId(id))?;
    Ok(Json(result))
}

/// `PUT /nodes/{id}/status`
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<SetStatusRequest>,
) -> Result<Json<NodeResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let result = service.set_status(&NodeId(id), req.status)?;
    Ok(Json(result))
}
