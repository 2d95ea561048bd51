//! yt-dlp based extractor using the external yt-dlp binary

use super::parser::{
    ExitStatus, build_download_args, build_metadata_args, failure_message, parse_metadata,
    parse_progress_line,
};
use super::traits::{ExtractorCapabilities, MediaExtractor};
use crate::config::ToolsConfig;
use crate::progress::ProgressSender;
use crate::types::{DownloadOutcome, DownloadRequest, MediaInfo};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

#[cfg(windows)]
const LOCAL_FFMPEG: &str = "bin/ffmpeg.exe";
#[cfg(not(windows))]
const LOCAL_FFMPEG: &str = "bin/ffmpeg";

/// Extractor that runs the external `yt-dlp` binary
///
/// Downloads stream yt-dlp's stdout line by line; each recognized progress
/// line is forwarded to the caller's progress channel as it arrives.
///
/// # Examples
///
/// ```no_run
/// use orbit_dl::extractor::{MediaExtractor, YtDlpExtractor};
/// use std::path::PathBuf;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Explicit binary, no ffmpeg
/// let extractor = YtDlpExtractor::new(PathBuf::from("/usr/local/bin/yt-dlp"), None);
///
/// // Or auto-discover from PATH
/// let extractor = YtDlpExtractor::from_path().expect("yt-dlp not found in PATH");
///
/// let info = extractor.fetch_metadata("https://example.com/watch?v=1").await?;
/// # Ok(())
/// # }
/// ```
pub struct YtDlpExtractor {
    binary_path: PathBuf,
    ffmpeg_path: Option<PathBuf>,
}

impl YtDlpExtractor {
    /// Create an extractor with an explicit binary path
    ///
    /// # Arguments
    ///
    /// * `binary_path` - Path to the yt-dlp binary
    /// * `ffmpeg_path` - ffmpeg handed to yt-dlp via `--ffmpeg-location`, if any
    pub fn new(binary_path: PathBuf, ffmpeg_path: Option<PathBuf>) -> Self {
        Self {
            binary_path,
            ffmpeg_path,
        }
    }

    /// Attempt to find yt-dlp in PATH
    ///
    /// # Returns
    ///
    /// `Some(YtDlpExtractor)` if the binary is found, `None` otherwise.
    pub fn from_path() -> Option<Self> {
        which::which("yt-dlp")
            .ok()
            .map(|path| Self::new(path, local_ffmpeg()))
    }

    /// Build an extractor from tool settings
    ///
    /// An explicit `ytdlp_path` always wins; otherwise PATH is searched when
    /// `search_path` is set. Returns `None` when no binary could be located.
    pub fn from_config(tools: &ToolsConfig) -> Option<Self> {
        let binary = match &tools.ytdlp_path {
            Some(path) => Some(path.clone()),
            None if tools.search_path => which::which("yt-dlp").ok(),
            None => None,
        }?;

        let ffmpeg = tools.ffmpeg_path.clone().or_else(local_ffmpeg);
        Some(Self::new(binary, ffmpeg))
    }

    /// Path of the yt-dlp binary
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// ffmpeg passed to yt-dlp, if any
    pub fn ffmpeg_path(&self) -> Option<&Path> {
        self.ffmpeg_path.as_deref()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary_path);
        cmd.stdin(Stdio::null()).kill_on_drop(true);
        cmd
    }
}

/// `./bin/ffmpeg` next to the working directory, if present
fn local_ffmpeg() -> Option<PathBuf> {
    let candidate = std::env::current_dir().ok()?.join(LOCAL_FFMPEG);
    candidate.is_file().then_some(candidate)
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn fetch_metadata(&self, url: &str) -> crate::Result<MediaInfo> {
        let output = self
            .command()
            .args(build_metadata_args(url))
            .output()
            .await
            .map_err(|e| crate::Error::ExternalTool(format!("Failed to execute yt-dlp: {}", e)))?;

        match ExitStatus::from(output.status.success()) {
            ExitStatus::Success => parse_metadata(&output.stdout, url),
            ExitStatus::Failure => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(crate::Error::Extraction(failure_message(
                    &stderr,
                    output.status,
                )))
            }
        }
    }

    async fn download(
        &self,
        request: &DownloadRequest,
        dest_dir: &Path,
        progress: ProgressSender,
    ) -> crate::Result<DownloadOutcome> {
        let mut child = self
            .command()
            .args(build_download_args(
                request,
                dest_dir,
                self.ffmpeg_path.as_deref(),
            ))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| crate::Error::ExternalTool(format!("Failed to execute yt-dlp: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| crate::Error::ExternalTool("yt-dlp stdout not captured".into()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| crate::Error::ExternalTool("yt-dlp stderr not captured".into()))?;

        // stderr is drained concurrently so a chatty engine never blocks on a full pipe
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf).await.map(|_| buf)
        });

        let mut reader = BufReader::new(stdout);
        let mut line = Vec::new();
        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }
            let text = String::from_utf8_lossy(&line);
            if let Some(raw) = parse_progress_line(&text) {
                // receiver gone means nobody is tracking this task anymore
                if progress.send(raw).is_err() {
                    tracing::debug!(url = %request.url, "Progress receiver dropped");
                }
            }
        }

        let status = child.wait().await?;
        let stderr = match stderr_task.await {
            Ok(Ok(buf)) => String::from_utf8_lossy(&buf).into_owned(),
            Ok(Err(e)) => return Err(e.into()),
            Err(e) => {
                return Err(crate::Error::ExternalTool(format!(
                    "Failed to read yt-dlp stderr: {}",
                    e
                )));
            }
        };

        match ExitStatus::from(status.success()) {
            ExitStatus::Success => Ok(DownloadOutcome::Completed),
            ExitStatus::Failure => Ok(DownloadOutcome::Failed(failure_message(&stderr, status))),
        }
    }

    fn capabilities(&self) -> ExtractorCapabilities {
        ExtractorCapabilities {
            can_analyze: true,
            can_download: true,
            can_transcode: self.ffmpeg_path.is_some() || which::which("ffmpeg").is_ok(),
        }
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}
