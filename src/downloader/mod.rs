//! Core downloader implementation split into focused submodules.
//!
//! The `MediaDownloader` struct and its methods are organized by domain:
//! - [`submit`] - Task submission and the per-task worker
//! - [`query`] - Status lookups
//! - [`analyze`] - Metadata lookups without downloading
//! - [`export`] - Copying finished files out of the download directory
//! - [`lifecycle`] - Shutdown coordination

mod analyze;
mod export;
mod lifecycle;
mod query;
mod submit;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::extractor::{MediaExtractor, NoOpExtractor, YtDlpExtractor};
use crate::registry::TaskRegistry;
use std::sync::Arc;

/// Main downloader instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct MediaDownloader {
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<crate::types::Event>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Task state shared by workers and status queries
    pub(crate) registry: Arc<TaskRegistry>,
    /// Extraction engine (trait object for pluggable implementations)
    pub(crate) extractor: Arc<dyn MediaExtractor>,
    /// Semaphore to limit concurrent downloads (respects max_concurrent_downloads config)
    pub(crate) concurrent_limit: Arc<tokio::sync::Semaphore>,
    /// Tracks spawned workers so shutdown can wait for them
    pub(crate) workers: tokio_util::task::TaskTracker,
    /// Flag to indicate whether new downloads are accepted (set to false during shutdown)
    pub(crate) accepting_new: Arc<std::sync::atomic::AtomicBool>,
}

impl MediaDownloader {
    /// Create a new MediaDownloader instance
    ///
    /// This initializes all core components:
    /// - Creates the download directory if absent
    /// - Selects the extraction engine (yt-dlp if found, no-op otherwise)
    /// - Sets up the task registry, worker pool and event channel
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for invalid settings and `Error::Io` when the
    /// download directory cannot be created.
    pub async fn new(config: Config) -> Result<Self> {
        // Initialize extractor based on config
        let extractor: Arc<dyn MediaExtractor> = match YtDlpExtractor::from_config(&config.tools)
        {
            Some(extractor) => Arc::new(extractor),
            None => {
                tracing::warn!("yt-dlp not found, downloads and analysis will fail");
                Arc::new(NoOpExtractor)
            }
        };

        Self::with_extractor(config, extractor).await
    }

    /// Create a MediaDownloader around an explicit extraction engine
    ///
    /// # Errors
    ///
    /// Same as [`MediaDownloader::new`].
    pub async fn with_extractor(config: Config, extractor: Arc<dyn MediaExtractor>) -> Result<Self> {
        config.validate()?;

        tokio::fs::create_dir_all(config.download_dir())
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create download directory '{}': {}",
                        config.download_dir().display(),
                        e
                    ),
                ))
            })?;

        // Create broadcast channel with buffer size of 1000 events
        let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);

        let caps = extractor.capabilities();
        tracing::info!(
            extractor = extractor.name(),
            can_analyze = caps.can_analyze,
            can_download = caps.can_download,
            can_transcode = caps.can_transcode,
            download_dir = %config.download_dir().display(),
            max_concurrent = config.download.max_concurrent_downloads,
            "Media extractor initialized"
        );

        Ok(Self {
            event_tx,
            concurrent_limit: Arc::new(tokio::sync::Semaphore::new(
                config.download.max_concurrent_downloads,
            )),
            config: Arc::new(config),
            registry: Arc::new(TaskRegistry::new()),
            extractor,
            workers: tokio_util::task::TaskTracker::new(),
            accepting_new: Arc::new(std::sync::atomic::AtomicBool::new(true)),
        })
    }

    /// Subscribe to task events
    ///
    /// Multiple subscribers are supported. Each subscriber receives all events independently.
    /// Events are buffered, but if a subscriber falls behind by more than 1000 events,
    /// it will receive a `RecvError::Lagged` error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use orbit_dl::{Config, MediaDownloader};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let downloader = MediaDownloader::new(Config::default()).await?;
    ///
    ///     let mut events = downloader.subscribe();
    ///     tokio::spawn(async move {
    ///         while let Ok(event) = events.recv().await {
    ///             println!("{:?}", event);
    ///         }
    ///     });
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<crate::types::Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Query what the configured extraction engine can do
    pub fn capabilities(&self) -> crate::types::Capabilities {
        let caps = self.extractor.capabilities();
        crate::types::Capabilities {
            extractor: self.extractor.name().to_string(),
            can_analyze: caps.can_analyze,
            can_download: caps.can_download,
            can_transcode: caps.can_transcode,
        }
    }

    /// Whether new submissions are still accepted
    pub fn is_accepting(&self) -> bool {
        self.accepting_new
            .load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Emit an event to all subscribers
    ///
    /// If there are no active subscribers, the event is silently dropped.
    pub(crate) fn emit_event(&self, event: crate::types::Event) {
        self.event_tx.send(event).ok();
    }

    /// Spawn the REST API server in a background task
    ///
    /// The server listens on the configured bind address (default: 127.0.0.1:54322).
    pub fn spawn_api_server(self: &Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let downloader = self.clone();
        let config = self.config.clone();

        tokio::spawn(async move { crate::api::start_api_server(downloader, config).await })
    }
}
