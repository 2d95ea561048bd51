//! Status lookups.

use crate::types::{Status, TaskId, TaskInfo};
use std::collections::HashMap;

use super::MediaDownloader;

impl MediaDownloader {
    /// Latest known state of a task
    ///
    /// Returns `None` for IDs that were never issued. Never waits on a
    /// running download.
    pub async fn status(&self, id: TaskId) -> Option<TaskInfo> {
        self.registry.get(&id).await
    }

    /// Same as [`status`](Self::status) for an ID in string form
    ///
    /// Strings that are not valid task IDs are simply unknown.
    pub async fn status_str(&self, id: &str) -> Option<TaskInfo> {
        let id = id.trim().parse::<TaskId>().ok()?;
        self.status(id).await
    }

    /// Number of tasks per status
    pub async fn task_counts(&self) -> HashMap<Status, usize> {
        self.registry.counts().await
    }
}
