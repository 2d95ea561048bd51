//! No-op extractor for graceful degradation

use super::traits::{ExtractorCapabilities, MediaExtractor};
use crate::progress::ProgressSender;
use crate::types::{DownloadOutcome, DownloadRequest, MediaInfo};
use async_trait::async_trait;
use std::path::Path;

/// No-op extractor used when no yt-dlp binary is available
///
/// The service still starts, accepts submissions and answers status queries;
/// every analyze call fails and every download ends in the `error` state.
///
/// # Examples
///
/// ```
/// use orbit_dl::extractor::{MediaExtractor, NoOpExtractor};
///
/// # #[tokio::main]
/// # async fn main() {
/// let extractor = NoOpExtractor;
/// assert!(extractor.fetch_metadata("https://example.com").await.is_err());
/// assert!(!extractor.capabilities().can_download);
/// # }
/// ```
pub struct NoOpExtractor;

const MISSING_BINARY: &str = "Media extraction requires the external yt-dlp binary. \
     Configure ytdlp_path in config or ensure yt-dlp is in PATH.";

#[async_trait]
impl MediaExtractor for NoOpExtractor {
    async fn fetch_metadata(&self, _url: &str) -> crate::Result<MediaInfo> {
        Err(crate::Error::NotSupported(MISSING_BINARY.into()))
    }

    async fn download(
        &self,
        _request: &DownloadRequest,
        _dest_dir: &Path,
        _progress: ProgressSender,
    ) -> crate::Result<DownloadOutcome> {
        Err(crate::Error::NotSupported(MISSING_BINARY.into()))
    }

    fn capabilities(&self) -> ExtractorCapabilities {
        ExtractorCapabilities {
            can_analyze: false,
            can_download: false,
            can_transcode: false,
        }
    }

    fn name(&self) -> &'static str {
        "no-op"
    }
}
