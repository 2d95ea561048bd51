//! Task status handler.

use crate::api::AppState;
use crate::error::{ApiError, Error};
use crate::types::TaskInfo;
use axum::{
    Json,
    extract::{Path, State},
};

/// GET /status/:task_id - Poll a task
#[utoipa::path(
    get,
    path = "/api/status/{task_id}",
    tag = "tasks",
    params(
        ("task_id" = String, Path, description = "Task ID returned by POST /download")
    ),
    responses(
        (status = 200, description = "Current task state", body = TaskInfo),
        (status = 404, description = "Unknown task ID", body = ApiError)
    )
)]
pub async fn task_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskInfo>, Error> {
    state
        .downloader
        .status_str(&task_id)
        .await
        .map(Json)
        .ok_or_else(|| Error::NotFound("Not found".to_string()))
}
