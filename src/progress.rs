//! Progress normalization
//!
//! The extraction engine reports transfer state in whatever units it has at
//! hand: byte counts when the size is known, a formatted percentage string
//! otherwise, and a flag once the transfer is done. [`normalize`] turns each
//! of those into a [`TaskUpdate`]; [`ProgressAdapter`] applies the result to
//! one task's registry entry.

use crate::error::ProgressParseError;
use crate::registry::TaskRegistry;
use crate::types::{Event, Status, TaskId, TaskUpdate};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Channel the engine pushes raw progress reports into
pub type ProgressSender = mpsc::UnboundedSender<RawProgress>;

/// Receiving half of [`ProgressSender`]
pub type ProgressReceiver = mpsc::UnboundedReceiver<RawProgress>;

/// Create a per-task progress channel
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}

/// Transfer counters as reported by the engine
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Bytes received so far
    pub downloaded_bytes: Option<u64>,
    /// Exact total size, when the server announced one
    pub total_bytes: Option<u64>,
    /// Engine's size estimate, used when the exact total is unknown
    pub total_bytes_estimate: Option<u64>,
    /// Pre-formatted percentage such as `" 42.5%"`
    pub percent_str: Option<String>,
}

/// One raw progress report from the engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawProgress {
    /// Transfer in progress
    Downloading(TransferReport),
    /// Transfer done; the engine moves on to post-processing without further reports
    Finished,
}

impl RawProgress {
    /// Report with known byte counts
    pub fn bytes(downloaded: u64, total: u64) -> Self {
        RawProgress::Downloading(TransferReport {
            downloaded_bytes: Some(downloaded),
            total_bytes: Some(total),
            ..Default::default()
        })
    }

    /// Report carrying only a formatted percentage
    pub fn percent(percent_str: impl Into<String>) -> Self {
        RawProgress::Downloading(TransferReport {
            percent_str: Some(percent_str.into()),
            ..Default::default()
        })
    }
}

/// Turn a raw report into a registry update.
///
/// Byte counts win when both are present and non-zero; otherwise the
/// percentage string is parsed (a missing string counts as `"0%"`).
pub fn normalize(raw: &RawProgress) -> Result<TaskUpdate, ProgressParseError> {
    match raw {
        RawProgress::Finished => Ok(TaskUpdate::converting()),
        RawProgress::Downloading(report) => {
            let total = report
                .total_bytes
                .filter(|t| *t > 0)
                .or(report.total_bytes_estimate.filter(|t| *t > 0));

            let percent = match (report.downloaded_bytes.filter(|d| *d > 0), total) {
                (Some(downloaded), Some(total)) => downloaded as f64 / total as f64 * 100.0,
                _ => parse_percent(report.percent_str.as_deref().unwrap_or("0%"))?,
            };

            if !percent.is_finite() {
                return Err(ProgressParseError::NonFinite);
            }
            Ok(TaskUpdate::downloading(percent))
        }
    }
}

/// Parse an engine percentage string such as `" 42.5%"`.
///
/// Terminal escape sequences and surrounding whitespace are ignored.
pub fn parse_percent(raw: &str) -> Result<f64, ProgressParseError> {
    let cleaned = strip_ansi_escapes::strip_str(raw);
    let trimmed = cleaned.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

    let value: f64 = number
        .parse()
        .map_err(|_| ProgressParseError::InvalidPercent(raw.to_string()))?;
    if !value.is_finite() {
        return Err(ProgressParseError::NonFinite);
    }
    Ok(value)
}

/// Applies one task's raw progress reports to the registry
#[derive(Clone)]
pub struct ProgressAdapter {
    id: TaskId,
    registry: Arc<TaskRegistry>,
    event_tx: broadcast::Sender<Event>,
}

impl ProgressAdapter {
    /// Bind an adapter to a task
    pub fn new(id: TaskId, registry: Arc<TaskRegistry>, event_tx: broadcast::Sender<Event>) -> Self {
        Self {
            id,
            registry,
            event_tx,
        }
    }

    /// Task this adapter writes to
    pub fn task_id(&self) -> TaskId {
        self.id
    }

    /// Apply a report. Never fails: unparseable reports are logged and dropped.
    pub async fn apply(&self, raw: RawProgress) {
        let update = match normalize(&raw) {
            Ok(update) => update,
            Err(e) => {
                tracing::debug!(task_id = %self.id, error = %e, "Ignoring unparseable progress report");
                return;
            }
        };

        let Some(task) = self.registry.update(&self.id, update).await else {
            return;
        };

        let event = match task.status {
            Status::Downloading => Event::Downloading {
                id: self.id,
                percent: task.progress,
            },
            Status::Converting => Event::Converting { id: self.id },
            _ => return,
        };
        // no subscribers is fine
        self.event_tx.send(event).ok();
    }

    /// Drain a progress channel until every sender is dropped
    pub async fn run(&self, mut rx: ProgressReceiver) {
        while let Some(raw) = rx.recv().await {
            self.apply(raw).await;
        }
    }
}
