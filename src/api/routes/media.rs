//! Media handlers: analyze URLs, submit downloads.

use super::{AnalyzeRequest, DownloadBody, TaskCreatedResponse};
use crate::api::AppState;
use crate::error::{ApiError, Error};
use crate::types::{DownloadRequest, MediaInfo};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};

/// POST /analyze - Fetch metadata for a URL without downloading
#[utoipa::path(
    post,
    path = "/api/analyze",
    tag = "media",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Media metadata", body = MediaInfo),
        (status = 400, description = "No URL provided or malformed body", body = ApiError),
        (status = 422, description = "Engine could not extract the URL", body = ApiError),
        (status = 501, description = "No extraction engine available", body = ApiError)
    )
)]
pub async fn analyze(
    State(state): State<AppState>,
    request: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<MediaInfo>, Error> {
    let Json(request) = request?;
    let url = request.url.unwrap_or_default();
    let info = state.downloader.analyze(&url).await?;
    Ok(Json(info))
}

/// POST /download - Submit a download task
#[utoipa::path(
    post,
    path = "/api/download",
    tag = "media",
    request_body = DownloadBody,
    responses(
        (status = 200, description = "Task accepted", body = TaskCreatedResponse),
        (status = 400, description = "No URL provided or malformed body", body = ApiError),
        (status = 503, description = "Shutting down", body = ApiError)
    )
)]
pub async fn download(
    State(state): State<AppState>,
    body: Result<Json<DownloadBody>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(body) = body?;
    let request = DownloadRequest::new(body.url.unwrap_or_default())
        .with_format(body.format)
        .with_quality(body.quality);

    let task_id = state.downloader.submit(request).await?;
    Ok(Json(TaskCreatedResponse { task_id }))
}
