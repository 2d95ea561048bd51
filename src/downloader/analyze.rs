//! Metadata lookups without downloading.

use crate::error::{Error, Result};
use crate::types::MediaInfo;

use super::MediaDownloader;

impl MediaDownloader {
    /// Look up title, thumbnail, duration and platform for a URL
    ///
    /// # Errors
    ///
    /// - `Error::Validation("No URL provided")` for an empty URL
    /// - `Error::Extraction` when the engine rejects the URL
    /// - `Error::NotSupported` when no engine binary is available
    pub async fn analyze(&self, url: &str) -> Result<MediaInfo> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::no_url());
        }

        match self.extractor.fetch_metadata(url).await {
            Ok(info) => {
                tracing::debug!(url, title = %info.title, platform = %info.platform, "Analyzed URL");
                Ok(info)
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "Failed to analyze URL");
                Err(e)
            }
        }
    }
}
