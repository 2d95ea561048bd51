//! # orbit-dl
//!
//! Task-tracked media downloads on top of an external extraction engine
//! (`yt-dlp`).
//!
//! ## Design
//!
//! - **Fire and poll** - `submit` hands back a task ID at once; the download
//!   runs on a background worker and its state is read with `status`
//! - **Bounded** - at most `max_concurrent_downloads` engine runs at a time,
//!   extra tasks wait as `pending`
//! - **Contained failures** - engine errors and worker panics end up in the
//!   task's `error` field, never in the caller
//! - **Library-first** - the REST API in [`api`] is a thin layer over
//!   [`MediaDownloader`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use orbit_dl::{Config, DownloadRequest, MediaDownloader, Quality};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = MediaDownloader::new(Config::default()).await?;
//!
//!     let id = downloader
//!         .submit(DownloadRequest::new("https://example.com/watch?v=1").with_quality(Quality::P720))
//!         .await?;
//!
//!     loop {
//!         let Some(task) = downloader.status(id).await else { break };
//!         println!("{} {:.1}%", task.status, task.progress);
//!         if task.status.is_terminal() {
//!             break;
//!         }
//!         tokio::time::sleep(std::time::Duration::from_millis(500)).await;
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Download orchestration (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// Extraction engines
pub mod extractor;
/// Progress normalization
pub mod progress;
/// In-memory task registry
pub mod registry;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use downloader::MediaDownloader;
pub use error::{ApiError, Error, ProgressParseError, Result, ToHttpStatus};
pub use extractor::{
    ExtractorCapabilities, MediaExtractor, NoOpExtractor, YtDlpExtractor,
};
pub use registry::TaskRegistry;
pub use types::{
    Capabilities, DownloadOutcome, DownloadRequest, Event, MediaFormat, MediaInfo, Quality,
    Status, TaskId, TaskInfo, TaskUpdate,
};

/// Helper function to run the downloader with graceful signal handling.
///
/// Waits for a termination signal and then calls the downloader's `shutdown()` method.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use orbit_dl::{Config, MediaDownloader, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let downloader = MediaDownloader::new(Config::default()).await?;
///
///     // Run with automatic signal handling
///     run_with_shutdown(downloader).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(downloader: MediaDownloader) -> Result<()> {
    wait_for_signal().await;
    downloader.shutdown().await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), Ok(mut sigint)) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            sigint.recv().await;
            tracing::info!("Received SIGINT signal (Ctrl+C)");
        }
        (Ok(mut sigterm), Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            sigterm.recv().await;
            tracing::info!("Received SIGTERM signal");
        }
        (Err(e), Err(_)) => {
            tracing::error!(error = %e, "Could not register any signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
