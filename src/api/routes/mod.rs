//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`media`] - Analyze URLs and submit downloads
//! - [`tasks`] - Task status polling
//! - [`files`] - Saving finished files, download folder
//! - [`system`] - Health, capabilities, events, OpenAPI

use crate::types::{MediaFormat, Quality, TaskId};
use serde::{Deserialize, Serialize};

mod files;
mod media;
mod system;
mod tasks;

// Re-export all handlers so `routes::function_name` works
pub use files::*;
pub use media::*;
pub use system::*;
pub use tasks::*;

// ============================================================================
// Request/Response Types (shared across handlers)
// ============================================================================

/// Request body for POST /analyze
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AnalyzeRequest {
    /// Media page URL
    #[serde(default)]
    pub url: Option<String>,
}

/// Request body for POST /download
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct DownloadBody {
    /// Media page URL
    #[serde(default)]
    pub url: Option<String>,

    /// "video" (default) or "audio"
    #[serde(default)]
    pub format: MediaFormat,

    /// "best" (default), "1080p" or "720p"; unknown values mean "best"
    #[serde(default)]
    pub quality: Quality,
}

/// Response body for POST /download
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TaskCreatedResponse {
    /// ID to poll via GET /status/:task_id
    pub task_id: TaskId,
}

/// Request body for POST /save
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SaveFileRequest {
    /// File name inside the download directory
    pub filename: String,

    /// Target file path, or an existing directory to copy into
    #[schema(value_type = String)]
    pub destination: std::path::PathBuf,
}

/// Response body for POST /save and GET /open-folder
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PathResponse {
    /// Always true on success
    pub success: bool,

    /// Resulting path
    pub path: String,
}
