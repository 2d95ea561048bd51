//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the orbit-dl REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the orbit-dl REST API
///
/// The spec can be accessed via:
/// - `/api/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation (when enabled)
#[derive(OpenApi)]
#[openapi(
    info(
        title = "orbit-dl REST API",
        version = "0.1.0",
        description = "Analyze media URLs, submit downloads and poll their progress",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://127.0.0.1:54322", description = "Local server")
    ),
    paths(
        // Media
        crate::api::routes::analyze,
        crate::api::routes::download,

        // Tasks
        crate::api::routes::task_status,

        // Files
        crate::api::routes::save_file,
        crate::api::routes::open_folder,

        // System
        crate::api::routes::health_check,
        crate::api::routes::get_capabilities,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::Status,
        crate::types::TaskInfo,
        crate::types::MediaFormat,
        crate::types::Quality,
        crate::types::DownloadRequest,
        crate::types::MediaInfo,
        crate::types::Event,
        crate::types::Capabilities,

        // Config types from config.rs
        crate::config::Config,
        crate::config::DownloadConfig,
        crate::config::ToolsConfig,
        crate::config::ServerIntegrationConfig,
        crate::config::ApiConfig,

        // API request/response types
        crate::api::routes::AnalyzeRequest,
        crate::api::routes::DownloadBody,
        crate::api::routes::TaskCreatedResponse,
        crate::api::routes::SaveFileRequest,
        crate::api::routes::PathResponse,

        // Error types
        crate::error::ApiError,
    )),
    tags(
        (name = "media", description = "Analyze URLs and submit downloads"),
        (name = "tasks", description = "Task status polling"),
        (name = "files", description = "Finished file handling"),
        (name = "system", description = "Health, capabilities, events and documentation")
    )
)]
pub struct ApiDoc;
