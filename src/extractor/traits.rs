//! Traits and types for media extraction engines

use crate::progress::ProgressSender;
use crate::types::{DownloadOutcome, DownloadRequest, MediaInfo};
use async_trait::async_trait;
use std::path::Path;

/// Capabilities of an extractor implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorCapabilities {
    /// Can look up metadata without downloading
    pub can_analyze: bool,
    /// Can download media
    pub can_download: bool,
    /// Can transcode (audio extraction, format merging)
    pub can_transcode: bool,
}

/// Trait for media extraction engines
///
/// An engine resolves a page URL to media, downloads it into a directory and
/// reports transfer progress through a channel while doing so.
///
/// # Examples
///
/// ```no_run
/// use orbit_dl::extractor::{MediaExtractor, YtDlpExtractor};
/// use orbit_dl::progress::progress_channel;
/// use orbit_dl::DownloadRequest;
/// use std::path::Path;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let extractor = YtDlpExtractor::from_path().expect("yt-dlp not found in PATH");
///
/// let info = extractor.fetch_metadata("https://example.com/watch?v=1").await?;
/// println!("{} ({})", info.title, info.duration);
///
/// let (tx, mut rx) = progress_channel();
/// tokio::spawn(async move {
///     while let Some(report) = rx.recv().await {
///         println!("{report:?}");
///     }
/// });
/// let outcome = extractor
///     .download(&DownloadRequest::new(info.url), Path::new("downloads"), tx)
///     .await?;
/// println!("{outcome:?}");
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Fetch metadata for a URL without downloading it
    ///
    /// # Errors
    ///
    /// Returns `Error::Extraction` when the engine rejects the URL, or an
    /// error describing why the engine could not be run.
    async fn fetch_metadata(&self, url: &str) -> crate::Result<MediaInfo>;

    /// Download the requested media into `dest_dir`
    ///
    /// Progress reports are pushed into `progress`; the sender is dropped when
    /// the download returns.
    ///
    /// # Returns
    ///
    /// `Ok(DownloadOutcome::Failed(message))` when the engine ran and reported
    /// a failure, `Ok(DownloadOutcome::Completed)` on success.
    ///
    /// # Errors
    ///
    /// Returns an error only if the engine could not be invoked at all
    /// (missing binary, spawn failure, broken pipes).
    async fn download(
        &self,
        request: &DownloadRequest,
        dest_dir: &Path,
        progress: ProgressSender,
    ) -> crate::Result<DownloadOutcome>;

    /// Query capabilities of this extractor
    fn capabilities(&self) -> ExtractorCapabilities;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
