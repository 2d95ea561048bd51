//! Custom test assertions for integration tests

use std::time::Duration;
use orbit_dl::{MediaDownloader, Status, TaskId, TaskInfo};

/// Result of waiting for a task to finish
#[derive(Debug, PartialEq)]
pub enum WaitResult {
    /// Task completed successfully
    Completed,
    /// Task failed with error
    Failed(String),
    /// Timeout waiting for completion
    Timeout,
    /// The task ID is unknown to the downloader
    Unknown,
}

/// Poll a task until it reaches a terminal state
///
/// # Arguments
/// * `downloader` - The downloader instance
/// * `id` - Task ID to wait for
/// * `timeout` - Maximum time to wait
pub async fn wait_for_completion(
    downloader: &MediaDownloader,
    id: TaskId,
    timeout: Duration,
) -> WaitResult {
    let result = tokio::time::timeout(timeout, async {
        loop {
            match downloader.status(id).await {
                None => return WaitResult::Unknown,
                Some(TaskInfo {
                    status: Status::Completed,
                    ..
                }) => return WaitResult::Completed,
                Some(TaskInfo {
                    status: Status::Error,
                    error,
                    ..
                }) => return WaitResult::Failed(error.unwrap_or_default()),
                Some(_) => tokio::time::sleep(Duration::from_millis(10)).await,
            }
        }
    })
    .await;

    result.unwrap_or(WaitResult::Timeout)
}

/// Poll a task and record every distinct snapshot until it finishes
pub async fn collect_snapshots(
    downloader: &MediaDownloader,
    id: TaskId,
    timeout: Duration,
) -> Vec<TaskInfo> {
    let mut seen: Vec<TaskInfo> = Vec::new();
    tokio::time::timeout(timeout, async {
        loop {
            let Some(task) = downloader.status(id).await else {
                return;
            };
            if seen.last() != Some(&task) {
                seen.push(task.clone());
            }
            if task.status.is_terminal() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .ok();
    seen
}

/// Assert the invariants every observed snapshot must satisfy
pub fn assert_snapshot_invariants(snapshots: &[TaskInfo]) {
    let mut last_progress = 0.0;
    for task in snapshots {
        assert!(
            (0.0..=100.0).contains(&task.progress),
            "progress out of range: {task:?}"
        );
        match task.status {
            Status::Completed => {
                assert_eq!(task.progress, 100.0, "{task:?}");
                assert!(task.error.is_none(), "{task:?}");
            }
            Status::Error => {
                assert!(
                    task.error.as_deref().is_some_and(|e| !e.is_empty()),
                    "{task:?}"
                );
            }
            Status::Downloading | Status::Converting => {
                assert!(
                    task.progress >= last_progress,
                    "progress decreased to {} after {}",
                    task.progress,
                    last_progress
                );
                assert!(task.error.is_none(), "{task:?}");
            }
            Status::Pending => assert!(task.error.is_none(), "{task:?}"),
        }
        last_progress = task.progress;
    }
}
