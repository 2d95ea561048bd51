//! Task submission and the per-task download worker.

use crate::error::{Error, Result};
use crate::progress::{ProgressAdapter, progress_channel};
use crate::types::{DownloadOutcome, DownloadRequest, Event, Status, TaskId, TaskUpdate};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;

use super::MediaDownloader;

impl MediaDownloader {
    /// Submit a download and return its task ID immediately
    ///
    /// The task is registered as `pending` before this returns; the download
    /// itself runs on a spawned worker once a concurrency slot is free.
    ///
    /// # Errors
    ///
    /// - `Error::Validation("No URL provided")` when the URL is empty or
    ///   whitespace (no task is created)
    /// - `Error::ShuttingDown` after [`shutdown`](Self::shutdown) was called
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use orbit_dl::{Config, DownloadRequest, MediaDownloader, MediaFormat};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let downloader = MediaDownloader::new(Config::default()).await?;
    /// let id = downloader
    ///     .submit(DownloadRequest::new("https://example.com/watch?v=1").with_format(MediaFormat::Audio))
    ///     .await?;
    /// println!("queued {id}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit(&self, mut request: DownloadRequest) -> Result<TaskId> {
        let url = request.url.trim();
        if url.is_empty() {
            return Err(Error::no_url());
        }
        if url.len() != request.url.len() {
            request.url = url.to_string();
        }

        if !self.is_accepting() {
            return Err(Error::ShuttingDown);
        }

        let id = self.registry.create().await;
        tracing::info!(
            task_id = %id,
            url = %request.url,
            format = ?request.format,
            quality = ?request.quality,
            "Download task submitted"
        );
        self.emit_event(Event::TaskCreated {
            id,
            url: request.url.clone(),
        });

        let downloader = self.clone();
        self.workers
            .spawn(async move { downloader.run_task(id, request).await });

        Ok(id)
    }

    /// Worker body: wait for a slot, run the engine, record the terminal state
    async fn run_task(&self, id: TaskId, request: DownloadRequest) {
        let _permit = match self.concurrent_limit.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                self.finish(id, TaskUpdate::failed(format!("Worker pool closed: {}", e)))
                    .await;
                return;
            }
        };

        tracing::info!(task_id = %id, url = %request.url, "Download worker started");

        let (progress_tx, progress_rx) = progress_channel();
        let adapter = ProgressAdapter::new(id, self.registry.clone(), self.event_tx.clone());

        let extractor = self.extractor.clone();
        let dest_dir = self.config.download_dir().clone();
        // The sender moves into the engine future, so the channel closes as
        // soon as the engine returns or unwinds.
        let engine = async move { extractor.download(&request, &dest_dir, progress_tx).await };

        let (result, ()) = tokio::join!(
            AssertUnwindSafe(engine).catch_unwind(),
            adapter.run(progress_rx)
        );

        let update = match result {
            Ok(Ok(DownloadOutcome::Completed)) => TaskUpdate::completed(),
            Ok(Ok(DownloadOutcome::Failed(message))) => {
                tracing::warn!(task_id = %id, error = %message, "Engine reported download failure");
                TaskUpdate::failed(message)
            }
            Ok(Err(e)) => {
                tracing::error!(task_id = %id, error = %e, "Download engine failed");
                TaskUpdate::failed(e.to_string())
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!(task_id = %id, error = %message, "Download worker panicked");
                TaskUpdate::failed(message)
            }
        };

        self.finish(id, update).await;
    }

    /// Apply a terminal update and announce it
    async fn finish(&self, id: TaskId, update: TaskUpdate) {
        let Some(task) = self.registry.update(&id, update).await else {
            tracing::debug!(task_id = %id, "Task already finished");
            return;
        };

        match task.status {
            Status::Completed => {
                tracing::info!(task_id = %id, "Download completed");
                self.emit_event(Event::Completed { id });
            }
            Status::Error => {
                self.emit_event(Event::Failed {
                    id,
                    error: task.error.unwrap_or_default(),
                });
            }
            _ => {}
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned());

    match detail {
        Some(detail) => format!("Download worker panicked: {}", detail),
        None => "Download worker panicked".to_string(),
    }
}
