use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;
use amrflow_core::instance::InstanceRecord;
use amrflow_core::types::InstanceStatus;

#[derive(Deserialize)]
pub struct CreateInstanceBody {
    pub task_id: String,
}

#[derive(Deserialize)]
pub struct SetStatusBody {
    pub status: InstanceStatus,
}

/// GET /api/instances: list all instances, oldest first.
pub async fn list_instances(State(app): State<AppState>) -> Json<Vec<InstanceRecord>> {
    Json(app.store.list_instances().await)
}

/// POST /api/instances: queue a new instance of a stored task.
pub async fn create_instance(
    State(app): State<AppState>,
    Json(body): Json<CreateInstanceBody>,
) -> Result<(StatusCode, Json<InstanceRecord>), AppError> {
    let instance = app.store.create_instance(&body.task_id).await?;
    Ok((StatusCode::CREATED, Json(instance)))
}

/// GET /api/instances/{id}: full instance record.
pub async fn get_instance(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InstanceRecord>, AppError> {
    Ok(Json(app.store.get_instance(&id).await?))
}

/// PUT /api/instances/{id}/status: caller-initiated status transition
/// (Start and Pause use this).
pub async fn set_status(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SetStatusBody>,
) -> Result<Json<InstanceRecord>, AppError> {
    let instance = app.store.set_status(&id, body.status).await?;
    Ok(Json(instance))
}

/// POST /api/instances/{id}/cancel: cancel after the current action.
pub async fn cancel_instance(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InstanceRecord>, AppError> {
    let instance = app.store.cancel(&id).await?;
    Ok(Json(instance))
}

/// GET /api/instances/{id}/status: coarse status only.
pub async fn get_status(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status = app.store.refresh_status(&id).await?;
    Ok(Json(serde_json::json!({ "status": status })))
}
