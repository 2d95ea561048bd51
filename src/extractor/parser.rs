//! yt-dlp command-line construction and output parsing

use crate::error::{Error, Result};
use crate::progress::{RawProgress, TransferReport};
use crate::types::{DownloadRequest, MediaFormat, MediaInfo, Quality};
use regex::Regex;
use serde_json::Value;
use std::ffi::OsString;
use std::path::Path;
use std::sync::LazyLock;

/// Marker prefixed to every templated progress line
pub(crate) const PROGRESS_MARKER: &str = "[orbit]";

/// Progress template handed to yt-dlp via `--progress-template`
///
/// Fields are separated by `|`; yt-dlp prints `NA` for unknown values.
pub(crate) const PROGRESS_TEMPLATE: &str = "download:[orbit] %(progress.status)s|%(progress.downloaded_bytes)s|%(progress.total_bytes)s|%(progress.total_bytes_estimate)s|%(progress._percent_str)s";

/// Output file name template, relative to the download directory
pub(crate) const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

const AUDIO_FORMAT: &str = "bestaudio[ext=m4a]/bestaudio/best";
const VIDEO_1080P_FORMAT: &str =
    "bestvideo[height<=1080][ext=mp4]+bestaudio[ext=m4a]/best[height<=1080][ext=mp4]/best";
const VIDEO_720P_FORMAT: &str = "best[height<=720][ext=mp4]/best[height<=720]/best";
const VIDEO_BEST_FORMAT: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// Post-processor prefixes that mean the transfer itself is over
const POSTPROCESS_MARKERS: &[&str] = &["[ExtractAudio]", "[Merger]", "[ffmpeg]", "[VideoConvertor]"];

#[allow(clippy::expect_used)]
static DOWNLOAD_PERCENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[download\]\s+(\d+(?:\.\d+)?)%").expect("DOWNLOAD_PERCENT is a valid regex")
});

/// Process exit classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitStatus {
    Success,
    Failure,
}

impl From<bool> for ExitStatus {
    fn from(success: bool) -> Self {
        if success {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }
}

/// yt-dlp format selector for a request
pub(crate) fn format_selector(request: &DownloadRequest) -> &'static str {
    match (request.format, request.quality) {
        (MediaFormat::Audio, _) => AUDIO_FORMAT,
        (MediaFormat::Video, Quality::P1080) => VIDEO_1080P_FORMAT,
        (MediaFormat::Video, Quality::P720) => VIDEO_720P_FORMAT,
        (MediaFormat::Video, Quality::Best) => VIDEO_BEST_FORMAT,
    }
}

/// Arguments for a download run
pub(crate) fn build_download_args(
    request: &DownloadRequest,
    dest_dir: &Path,
    ffmpeg: Option<&Path>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--newline".into(),
        "--no-warnings".into(),
        "--progress-template".into(),
        PROGRESS_TEMPLATE.into(),
        "-o".into(),
        dest_dir.join(OUTPUT_TEMPLATE).into_os_string(),
        "-f".into(),
        format_selector(request).into(),
    ];

    if let Some(ffmpeg) = ffmpeg {
        args.push("--ffmpeg-location".into());
        args.push(ffmpeg.as_os_str().to_owned());
    }

    if request.format == MediaFormat::Audio {
        args.extend(
            ["-x", "--audio-format", "mp3", "--audio-quality", "192K"]
                .into_iter()
                .map(OsString::from),
        );
    }

    // "--" so a URL starting with '-' is never taken as an option
    args.push("--".into());
    args.push(request.url.clone().into());
    args
}

/// Arguments for a metadata lookup
pub(crate) fn build_metadata_args(url: &str) -> Vec<OsString> {
    [
        "--dump-single-json",
        "--flat-playlist",
        "--skip-download",
        "--no-warnings",
        "--",
        url,
    ]
    .into_iter()
    .map(OsString::from)
    .collect()
}

/// Parse one stdout line of a download run
///
/// Returns `None` for lines that carry no progress information.
pub(crate) fn parse_progress_line(line: &str) -> Option<RawProgress> {
    let line = line.trim();

    if let Some(rest) = line.strip_prefix(PROGRESS_MARKER) {
        return parse_template_fields(rest.trim());
    }

    if let Some(percent) = DOWNLOAD_PERCENT
        .captures(line)
        .and_then(|caps| caps.get(1))
    {
        let value = percent.as_str();
        if value.parse::<f64>().is_ok_and(|v| v >= 100.0) {
            return Some(RawProgress::Finished);
        }
        return Some(RawProgress::percent(format!("{value}%")));
    }

    if line.starts_with("[download]") && line.contains("has already been downloaded") {
        return Some(RawProgress::Finished);
    }

    if POSTPROCESS_MARKERS.iter().any(|m| line.starts_with(m)) {
        return Some(RawProgress::Finished);
    }

    None
}

fn parse_template_fields(fields: &str) -> Option<RawProgress> {
    let mut parts = fields.splitn(5, '|');
    let status = parts.next()?.trim();

    match status {
        "finished" => Some(RawProgress::Finished),
        "downloading" => Some(RawProgress::Downloading(TransferReport {
            downloaded_bytes: parts.next().and_then(parse_count),
            total_bytes: parts.next().and_then(parse_count),
            total_bytes_estimate: parts.next().and_then(parse_count),
            percent_str: parts
                .next()
                .map(str::trim)
                .filter(|s| !s.is_empty() && *s != "NA")
                .map(str::to_string),
        })),
        // "error" and anything unknown are reported on stderr instead
        _ => None,
    }
}

/// Byte counts arrive as integers or, for estimates, as floats
fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "NA" || raw == "None" {
        return None;
    }
    if let Ok(n) = raw.parse::<u64>() {
        return Some(n);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map(|f| f as u64)
}

/// Last `ERROR:` line from stderr, prefix stripped
pub(crate) fn last_error_message(stderr: &str) -> Option<String> {
    stderr
        .lines()
        .rev()
        .filter_map(|line| line.trim().strip_prefix("ERROR:"))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

/// Failure message for a run that exited unsuccessfully
pub(crate) fn failure_message(stderr: &str, exit: std::process::ExitStatus) -> String {
    last_error_message(stderr).unwrap_or_else(|| format!("yt-dlp exited with {exit}"))
}

/// Build [`MediaInfo`] from `--dump-single-json` output
pub(crate) fn parse_metadata(stdout: &[u8], url: &str) -> Result<MediaInfo> {
    let json: Value = serde_json::from_slice(stdout)?;
    if !json.is_object() {
        return Err(Error::Extraction(
            "yt-dlp returned unexpected metadata".to_string(),
        ));
    }

    let text = |key: &str| json.get(key).and_then(Value::as_str).map(str::to_string);

    let duration = text("duration_string")
        .or_else(|| json.get("duration").and_then(Value::as_f64).map(format_duration))
        .unwrap_or_else(|| "N/A".to_string());

    Ok(MediaInfo {
        title: text("title").unwrap_or_else(|| "Unknown Title".to_string()),
        thumbnail: text("thumbnail").unwrap_or_default(),
        duration,
        platform: text("extractor_key").unwrap_or_else(|| "Unknown".to_string()),
        url: url.to_string(),
    })
}

/// Seconds to `H:MM:SS` / `M:SS`, the way yt-dlp formats `duration_string`
fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}
