//! Test fixtures: a scripted extraction engine and downloader builders

use async_trait::async_trait;
use orbit_dl::progress::{ProgressSender, RawProgress};
use orbit_dl::{
    Config, DownloadOutcome, DownloadRequest, ExtractorCapabilities, MediaDownloader,
    MediaExtractor, MediaInfo,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Engine that replays a fixed list of progress reports, then ends
pub struct MockExtractor {
    /// Reports sent in order, each followed by `delay`
    pub reports: Vec<RawProgress>,
    /// Pause after each report
    pub delay: Duration,
    /// What the run returns
    pub outcome: std::result::Result<DownloadOutcome, String>,
    /// Write a file named after the URL's last segment into the download dir
    pub write_file: Option<String>,
}

impl MockExtractor {
    /// Engine that completes after the given reports
    pub fn completing(reports: Vec<RawProgress>) -> Self {
        Self {
            reports,
            delay: Duration::from_millis(2),
            outcome: Ok(DownloadOutcome::Completed),
            write_file: None,
        }
    }

    /// Engine that reports a failure message after the given reports
    pub fn failing(reports: Vec<RawProgress>, message: &str) -> Self {
        Self {
            outcome: Ok(DownloadOutcome::Failed(message.to_string())),
            ..Self::completing(reports)
        }
    }
}

#[async_trait]
impl MediaExtractor for MockExtractor {
    async fn fetch_metadata(&self, url: &str) -> orbit_dl::Result<MediaInfo> {
        if url.contains("unsupported") {
            return Err(orbit_dl::Error::Extraction(format!(
                "Unsupported URL: {url}"
            )));
        }
        Ok(MediaInfo {
            title: "Mock Title".to_string(),
            thumbnail: String::new(),
            duration: "1:00".to_string(),
            platform: "Mock".to_string(),
            url: url.to_string(),
        })
    }

    async fn download(
        &self,
        _request: &DownloadRequest,
        dest_dir: &Path,
        progress: ProgressSender,
    ) -> orbit_dl::Result<DownloadOutcome> {
        for report in &self.reports {
            progress.send(report.clone()).ok();
            tokio::time::sleep(self.delay).await;
        }
        if let Some(name) = &self.write_file {
            tokio::fs::write(dest_dir.join(name), b"media").await?;
        }
        match &self.outcome {
            Ok(outcome) => Ok(outcome.clone()),
            Err(message) => Err(orbit_dl::Error::ExternalTool(message.clone())),
        }
    }

    fn capabilities(&self) -> ExtractorCapabilities {
        ExtractorCapabilities {
            can_analyze: true,
            can_download: true,
            can_transcode: true,
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Byte-counted reports from 0 to `total` in `steps` increments
pub fn byte_reports(total: u64, steps: u64) -> Vec<RawProgress> {
    (1..=steps)
        .map(|n| RawProgress::bytes(total * n / steps, total))
        .collect()
}

/// Create a downloader in a temp dir around the given engine
pub async fn create_downloader(
    extractor: MockExtractor,
    max_concurrent: usize,
) -> (Arc<MediaDownloader>, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.download.download_dir = temp_dir.path().join("downloads");
    config.download.max_concurrent_downloads = max_concurrent;
    config.tools.search_path = false;

    let downloader = MediaDownloader::with_extractor(config, Arc::new(extractor))
        .await
        .expect("Failed to create downloader");
    (Arc::new(downloader), temp_dir)
}
