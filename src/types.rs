//! Core types for orbit-dl

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique identifier for a download task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID
    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TaskId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl std::str::FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Task status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Accepted, waiting for a worker slot
    #[default]
    Pending,
    /// Engine is transferring media
    Downloading,
    /// Transfer finished, engine is post-processing (transcode/merge)
    Converting,
    /// Successfully completed
    Completed,
    /// Failed with error
    Error,
}

impl Status {
    /// `completed` and `error` are terminal: no further transitions happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Completed | Status::Error)
    }

    /// Lowercase name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Downloading => "downloading",
            Status::Converting => "converting",
            Status::Completed => "completed",
            Status::Error => "error",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one task as returned by status queries
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaskInfo {
    /// Current status
    pub status: Status,

    /// Progress percentage (0.0 to 100.0)
    pub progress: f64,

    /// Error message, present only when `status` is `error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskInfo {
    /// State of a freshly created task
    pub fn pending() -> Self {
        Self {
            status: Status::Pending,
            progress: 0.0,
            error: None,
        }
    }
}

/// Partial task state merged into a registry entry
///
/// Fields left as `None` keep their current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskUpdate {
    /// New status
    pub status: Option<Status>,
    /// New progress percentage
    pub progress: Option<f64>,
    /// New error message
    pub error: Option<String>,
}

impl TaskUpdate {
    /// Progress report while the engine is transferring
    pub fn downloading(progress: f64) -> Self {
        Self {
            status: Some(Status::Downloading),
            progress: Some(progress),
            error: None,
        }
    }

    /// Transfer finished, post-processing started
    pub fn converting() -> Self {
        Self {
            status: Some(Status::Converting),
            progress: Some(100.0),
            error: None,
        }
    }

    /// Terminal success
    pub fn completed() -> Self {
        Self {
            status: Some(Status::Completed),
            progress: Some(100.0),
            error: None,
        }
    }

    /// Terminal failure with a message
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: Some(Status::Error),
            progress: None,
            error: Some(error.into()),
        }
    }
}

/// Requested output container
///
/// Anything other than `"audio"` (including non-strings) deserializes to
/// [`MediaFormat::Video`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    /// Video (MP4 preferred)
    #[default]
    Video,
    /// Audio only, transcoded to MP3
    Audio,
}

impl MediaFormat {
    /// Parse a format label, falling back to `Video` for anything unknown
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("audio") {
            MediaFormat::Audio
        } else {
            MediaFormat::Video
        }
    }
}

impl<'de> Deserialize<'de> for MediaFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map(MediaFormat::from_label).unwrap_or_default())
    }
}

/// Requested video quality
///
/// Unrecognized values, including non-strings, deserialize to [`Quality::Best`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub enum Quality {
    /// Highest available quality
    #[default]
    #[serde(rename = "best")]
    Best,
    /// Capped at 1080 lines
    #[serde(rename = "1080p")]
    P1080,
    /// Capped at 720 lines
    #[serde(rename = "720p")]
    P720,
}

impl Quality {
    /// Parse a quality label, falling back to `Best` for anything unknown
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "1080p" => Quality::P1080,
            "720p" => Quality::P720,
            _ => Quality::Best,
        }
    }
}

impl<'de> Deserialize<'de> for Quality {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Quality::from_label).unwrap_or_default())
    }
}

/// Everything the engine needs to run one download
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DownloadRequest {
    /// Media page URL
    pub url: String,
    /// Output container
    #[serde(default)]
    pub format: MediaFormat,
    /// Video quality cap (ignored for audio)
    #[serde(default)]
    pub quality: Quality,
}

impl DownloadRequest {
    /// Create a request with the given URL and default format/quality
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: MediaFormat::default(),
            quality: Quality::default(),
        }
    }

    /// Set the output container
    pub fn with_format(mut self, format: MediaFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the quality cap
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }
}

/// Metadata shown to the user before downloading
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MediaInfo {
    /// Media title ("Unknown Title" when the engine has none)
    pub title: String,
    /// Thumbnail URL (empty when unavailable)
    pub thumbnail: String,
    /// Human-readable duration such as "3:45" ("N/A" when unknown)
    pub duration: String,
    /// Extractor that recognized the URL, e.g. "Youtube" ("Unknown" when unavailable)
    pub platform: String,
    /// The URL that was analyzed
    pub url: String,
}

/// Result of one engine download run
///
/// `Failed` is an engine-reported failure (the engine ran and refused or
/// could not fetch the media). Failures to run the engine at all are
/// returned as `Err` instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Media was fetched and post-processed
    Completed,
    /// Engine reported an error message
    Failed(String),
}

/// Event emitted during the task lifecycle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Task accepted and registered as pending
    TaskCreated {
        /// Task ID
        id: TaskId,
        /// Requested URL
        url: String,
    },

    /// Transfer progress update
    Downloading {
        /// Task ID
        id: TaskId,
        /// Progress percentage (0.0 to 100.0)
        percent: f64,
    },

    /// Transfer finished, engine post-processing
    Converting {
        /// Task ID
        id: TaskId,
    },

    /// Task finished successfully
    Completed {
        /// Task ID
        id: TaskId,
    },

    /// Task failed
    Failed {
        /// Task ID
        id: TaskId,
        /// Error message
        error: String,
    },

    /// Downloader shutting down
    Shutdown,
}

impl Event {
    /// Name used as the SSE event type
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TaskCreated { .. } => "task_created",
            Event::Downloading { .. } => "downloading",
            Event::Converting { .. } => "converting",
            Event::Completed { .. } => "completed",
            Event::Failed { .. } => "failed",
            Event::Shutdown => "shutdown",
        }
    }
}

/// What the configured extraction engine can do
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Capabilities {
    /// Engine implementation name
    pub extractor: String,
    /// Whether metadata lookups are available
    pub can_analyze: bool,
    /// Whether downloads are available
    pub can_download: bool,
    /// Whether audio transcoding is available (ffmpeg found)
    pub can_transcode: bool,
}
