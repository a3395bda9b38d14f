use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use amrflow_core::task::{TaskDraft, TaskRecord};

/// GET /api/tasks: list all stored tasks.
pub async fn list_tasks(State(app): State<AppState>) -> Json<Vec<TaskRecord>> {
    Json(app.store.list_tasks().await)
}

/// POST /api/tasks: store a submitted task. The action sequence is
/// re-validated; an unsubmittable draft is rejected with 422.
pub async fn create_task(
    State(app): State<AppState>,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<TaskRecord>), AppError> {
    let task = app.store.create_task(draft).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// DELETE /api/tasks/{id}: delete a stored task.
pub async fn delete_task(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.store.delete_task(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
