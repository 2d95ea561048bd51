//! Shutdown coordination.

use crate::error::Result;
use crate::types::Event;

use super::MediaDownloader;

/// How long shutdown waits for running workers
const SHUTDOWN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

impl MediaDownloader {
    /// Gracefully shut down the downloader
    ///
    /// This method performs a graceful shutdown sequence:
    /// 1. Stops accepting new submissions
    /// 2. Waits for running and pending workers to finish (30 second timeout)
    /// 3. Emits [`Event::Shutdown`]
    ///
    /// Downloads are never cancelled; workers still running after the timeout
    /// keep going in the background.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!("Initiating graceful shutdown");

        self.accepting_new
            .store(false, std::sync::atomic::Ordering::SeqCst);
        tracing::info!("Stopped accepting new downloads");

        self.workers.close();
        match tokio::time::timeout(SHUTDOWN_TIMEOUT, self.workers.wait()).await {
            Ok(()) => tracing::info!("All download workers finished"),
            Err(_) => tracing::warn!(
                remaining = self.workers.len(),
                "Timeout waiting for downloads to complete, proceeding with shutdown"
            ),
        }

        self.emit_event(Event::Shutdown);

        tracing::info!("Graceful shutdown complete");
        Ok(())
    }
}
