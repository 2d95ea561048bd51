//! In-memory task registry
//!
//! Maps [`TaskId`] to the latest [`TaskInfo`]. Every merge happens inside a
//! single write-lock critical section, so readers only ever see whole updates.
//! Entries are never removed while the process runs.

use crate::types::{Status, TaskId, TaskInfo, TaskUpdate};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Fallback message so an errored task never carries an empty error
const UNKNOWN_ERROR: &str = "Unknown error";

/// Concurrency-safe store of task state
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: RwLock<HashMap<TaskId, TaskInfo>>,
}

impl TaskRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new task in the `pending` state and return its ID
    pub async fn create(&self) -> TaskId {
        let mut tasks = self.tasks.write().await;
        let mut id = TaskId::new();
        // never reset an existing entry
        while tasks.contains_key(&id) {
            id = TaskId::new();
        }
        tasks.insert(id, TaskInfo::pending());
        id
    }

    /// Snapshot of a task, or `None` if the ID was never issued
    pub async fn get(&self, id: &TaskId) -> Option<TaskInfo> {
        self.tasks.read().await.get(id).cloned()
    }

    /// Merge `update` into the task's entry.
    ///
    /// Returns the resulting state, or `None` when the task does not exist or
    /// is already terminal (terminal tasks accept no further transitions).
    ///
    /// Merge rules:
    /// - progress is clamped to `0..=100`
    /// - while in flight (`downloading`/`converting`) progress never decreases
    /// - once `converting`, transfer reports no longer change the entry
    /// - `completed` forces progress to 100 and clears the error
    /// - `error` always carries a non-empty message
    pub async fn update(&self, id: &TaskId, update: TaskUpdate) -> Option<TaskInfo> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(id)?;

        if task.status.is_terminal() {
            tracing::debug!(task_id = %id, status = %task.status, "Ignoring update for finished task");
            return None;
        }

        let next_status = update.status.unwrap_or(task.status);

        if task.status == Status::Converting && next_status == Status::Downloading {
            return Some(task.clone());
        }

        if let Some(progress) = update.progress {
            let progress = progress.clamp(0.0, 100.0);
            let in_flight = |s: Status| matches!(s, Status::Downloading | Status::Converting);
            task.progress = if in_flight(task.status) && in_flight(next_status) {
                task.progress.max(progress)
            } else {
                progress
            };
        }

        task.status = next_status;

        match task.status {
            Status::Completed => {
                task.progress = 100.0;
                task.error = None;
            }
            Status::Error => {
                let message = update
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .or_else(|| task.error.take())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                task.error = Some(message);
            }
            _ => task.error = None,
        }

        Some(task.clone())
    }

    /// Number of registered tasks
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Whether no task was ever created
    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }

    /// Number of tasks per status
    pub async fn counts(&self) -> HashMap<Status, usize> {
        let tasks = self.tasks.read().await;
        let mut counts = HashMap::new();
        for task in tasks.values() {
            *counts.entry(task.status).or_insert(0) += 1;
        }
        counts
    }
}
