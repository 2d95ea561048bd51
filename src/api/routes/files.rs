//! File handlers: save a finished download, report the download folder.

use super::{PathResponse, SaveFileRequest};
use crate::api::AppState;
use crate::error::{ApiError, Error};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

/// POST /save - Copy a finished file out of the download directory
#[utoipa::path(
    post,
    path = "/api/save",
    tag = "files",
    request_body = SaveFileRequest,
    responses(
        (status = 200, description = "File copied", body = PathResponse),
        (status = 400, description = "Invalid filename or malformed body", body = ApiError),
        (status = 404, description = "File not found", body = ApiError)
    )
)]
pub async fn save_file(
    State(state): State<AppState>,
    request: Result<Json<SaveFileRequest>, JsonRejection>,
) -> Result<Json<PathResponse>, Error> {
    let Json(request) = request?;
    let saved = state
        .downloader
        .save_file(&request.filename, &request.destination)
        .await?;

    Ok(Json(PathResponse {
        success: true,
        path: saved.display().to_string(),
    }))
}

/// GET /open-folder - Location of the download folder
///
/// Opening a file manager is left to the client.
#[utoipa::path(
    get,
    path = "/api/open-folder",
    tag = "files",
    responses(
        (status = 200, description = "Download folder path", body = PathResponse)
    )
)]
pub async fn open_folder(State(state): State<AppState>) -> Json<PathResponse> {
    Json(PathResponse {
        success: true,
        path: state.downloader.download_dir().display().to_string(),
    })
}
