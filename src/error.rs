//! Error types for orbit-dl
//!
//! This module provides error handling for the library, including:
//! - The main [`Error`] enum returned by every fallible operation
//! - [`ProgressParseError`], the ignorable failure raised while normalizing engine progress
//! - HTTP status code mapping for API integration
//! - The JSON error body returned by the REST API

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for orbit-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message returned when a request arrives without a URL
pub const NO_URL_PROVIDED: &str = "No URL provided";

/// Main error type for orbit-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "max_concurrent_downloads")
        key: Option<String>,
    },

    /// Request rejected before any work was scheduled (e.g. missing URL)
    #[error("{0}")]
    Validation(String),

    /// The extraction engine reported a failure (unsupported URL, geo-block, ...)
    #[error("{0}")]
    Extraction(String),

    /// Requested resource does not exist
    #[error("{0}")]
    NotFound(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// External tool execution failed (yt-dlp could not be started, ...)
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Operation not supported (missing binary, ...)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Shutdown in progress - not accepting new downloads
    #[error("shutdown in progress: not accepting new downloads")]
    ShuttingDown,

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

impl Error {
    /// Shorthand for the missing-URL validation error
    pub fn no_url() -> Self {
        Error::Validation(NO_URL_PROVIDED.to_string())
    }
}

/// Failure to turn a raw engine progress report into a percentage.
///
/// Progress reporting is advisory: the adapter logs and drops these instead of
/// failing the download.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgressParseError {
    /// The percentage string did not parse as a number
    #[error("invalid percentage string {0:?}")]
    InvalidPercent(String),

    /// The computed value was NaN or infinite
    #[error("non-finite progress value")]
    NonFinite,
}

/// API error response body
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": "Not found",
///   "code": "not_found"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable error message, suitable for display
    pub error: String,

    /// Machine-readable error code (e.g., "not_found", "validation_error")
    pub code: String,
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Config { .. } => 400,
            Error::Validation(_) => 400,

            Error::NotFound(_) => 404,

            // 422 Unprocessable Entity - the engine understood the request but refused it
            Error::Extraction(_) => 422,

            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,

            Error::NotSupported(_) => 501,

            Error::ExternalTool(_) => 503,
            Error::ShuttingDown => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Validation(_) => "validation_error",
            Error::Extraction(_) => "extraction_failed",
            Error::NotFound(_) => "not_found",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ExternalTool(_) => "external_tool_error",
            Error::NotSupported(_) => "not_supported",
            Error::ShuttingDown => "shutting_down",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError {
            code: error.error_code().to_string(),
            error: error.to_string(),
        }
    }
}
