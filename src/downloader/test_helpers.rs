//! Shared test helpers for creating MediaDownloader instances in tests.

use crate::config::Config;
use crate::downloader::MediaDownloader;
use crate::extractor::{ExtractorCapabilities, MediaExtractor};
use crate::progress::{ProgressSender, RawProgress};
use crate::types::{DownloadOutcome, DownloadRequest, MediaInfo, TaskId, TaskInfo};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::tempdir;
use tokio::sync::{Mutex, watch};

/// How a scripted download ends
#[derive(Clone, Debug)]
pub(crate) enum Ending {
    Outcome(DownloadOutcome),
    Error(String),
    Panic(String),
}

/// One step a scripted download performs before ending
#[derive(Clone, Debug)]
pub(crate) enum Step {
    Report(RawProgress),
    Sleep(Duration),
    /// Block until the test flips the gate to `true`
    WaitForGate,
}

/// Extraction engine that replays a fixed script instead of running yt-dlp
pub(crate) struct ScriptedExtractor {
    steps: Vec<Step>,
    ending: Ending,
    metadata: std::result::Result<MediaInfo, String>,
    gate: watch::Receiver<bool>,
    gate_tx: Arc<watch::Sender<bool>>,
    pub(crate) started: Arc<AtomicUsize>,
    pub(crate) running: Arc<AtomicUsize>,
    pub(crate) peak_running: Arc<AtomicUsize>,
    pub(crate) requests: Arc<Mutex<Vec<(DownloadRequest, PathBuf)>>>,
}

impl ScriptedExtractor {
    /// Completes immediately without progress reports
    pub(crate) fn new() -> Self {
        let (gate_tx, gate) = watch::channel(false);
        Self {
            steps: Vec::new(),
            ending: Ending::Outcome(DownloadOutcome::Completed),
            metadata: Ok(sample_info("https://example.com/watch?v=1")),
            gate,
            gate_tx: Arc::new(gate_tx),
            started: Arc::new(AtomicUsize::new(0)),
            running: Arc::new(AtomicUsize::new(0)),
            peak_running: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn report(mut self, raw: RawProgress) -> Self {
        self.steps.push(Step::Report(raw));
        self
    }

    pub(crate) fn sleep(mut self, duration: Duration) -> Self {
        self.steps.push(Step::Sleep(duration));
        self
    }

    pub(crate) fn wait_for_gate(mut self) -> Self {
        self.steps.push(Step::WaitForGate);
        self
    }

    pub(crate) fn ending(mut self, ending: Ending) -> Self {
        self.ending = ending;
        self
    }

    pub(crate) fn metadata_error(mut self, message: &str) -> Self {
        self.metadata = Err(message.to_string());
        self
    }

    /// Sender that releases every download blocked on [`Step::WaitForGate`]
    pub(crate) fn gate(&self) -> Arc<watch::Sender<bool>> {
        self.gate_tx.clone()
    }
}

#[async_trait]
impl MediaExtractor for ScriptedExtractor {
    async fn fetch_metadata(&self, url: &str) -> crate::Result<MediaInfo> {
        match &self.metadata {
            Ok(info) => Ok(MediaInfo {
                url: url.to_string(),
                ..info.clone()
            }),
            Err(message) => Err(crate::Error::Extraction(message.clone())),
        }
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        dest_dir: &Path,
        progress: ProgressSender,
    ) -> crate::Result<DownloadOutcome> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_running.fetch_max(now, Ordering::SeqCst);
        self.requests
            .lock()
            .await
            .push((request.clone(), dest_dir.to_path_buf()));

        let _running = RunningGuard(self.running.clone());

        for step in &self.steps {
            match step {
                Step::Report(raw) => {
                    progress.send(raw.clone()).ok();
                }
                Step::Sleep(duration) => tokio::time::sleep(*duration).await,
                Step::WaitForGate => {
                    let mut gate = self.gate.clone();
                    gate.wait_for(|open| *open).await.ok();
                }
            }
        }

        match &self.ending {
            Ending::Outcome(outcome) => Ok(outcome.clone()),
            Ending::Error(message) => Err(crate::Error::ExternalTool(message.clone())),
            Ending::Panic(message) => panic!("{}", message),
        }
    }

    fn capabilities(&self) -> ExtractorCapabilities {
        ExtractorCapabilities {
            can_analyze: true,
            can_download: true,
            can_transcode: false,
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Decrements the running counter even when the script panics
struct RunningGuard(Arc<AtomicUsize>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub(crate) fn sample_info(url: &str) -> MediaInfo {
    MediaInfo {
        title: "Sample Clip".to_string(),
        thumbnail: "https://example.com/thumb.jpg".to_string(),
        duration: "3:45".to_string(),
        platform: "Youtube".to_string(),
        url: url.to_string(),
    }
}

/// Config rooted in a fresh temp directory
pub(crate) fn test_config(max_concurrent: usize) -> (Config, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let mut config = Config::default();
    config.download.download_dir = temp_dir.path().join("downloads");
    config.download.max_concurrent_downloads = max_concurrent;
    config.tools.search_path = false;
    (config, temp_dir)
}

/// Helper to create a test MediaDownloader around a scripted engine.
/// Returns the downloader and the tempdir (which must be kept alive).
pub(crate) async fn create_test_downloader(
    extractor: ScriptedExtractor,
    max_concurrent: usize,
) -> (MediaDownloader, tempfile::TempDir) {
    let (config, temp_dir) = test_config(max_concurrent);
    let downloader = MediaDownloader::with_extractor(config, Arc::new(extractor))
        .await
        .unwrap();
    (downloader, temp_dir)
}

/// Poll until the task reaches `completed` or `error`
pub(crate) async fn wait_for_terminal(downloader: &MediaDownloader, id: TaskId) -> TaskInfo {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            if let Some(task) = downloader.status(id).await
                && task.status.is_terminal()
            {
                return task;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("task did not finish in time")
}
