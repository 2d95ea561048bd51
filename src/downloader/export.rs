//! Copying finished files out of the download directory.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

use super::MediaDownloader;

const FILE_NOT_FOUND: &str = "File not found";

impl MediaDownloader {
    /// Base directory downloads are written to
    pub fn download_dir(&self) -> &Path {
        self.config.download_dir()
    }

    /// Copy a downloaded file to a caller-chosen destination
    ///
    /// `filename` is looked up inside the download directory. When no file has
    /// that exact name, the first file (in name order) starting with the
    /// filename's stem is used instead, since the engine may change the
    /// extension while post-processing. If `destination` is an existing
    /// directory the file keeps its name inside it.
    ///
    /// # Returns
    ///
    /// The path the file was copied to.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` for names containing path separators or `..`
    /// - `Error::NotFound("File not found")` when no matching file exists
    /// - `Error::Io` when the copy fails
    pub async fn save_file(&self, filename: &str, destination: &Path) -> Result<PathBuf> {
        validate_filename(filename)?;

        let source = self
            .resolve_download(filename)
            .await?
            .ok_or_else(|| Error::NotFound(FILE_NOT_FOUND.to_string()))?;

        let target = if tokio::fs::metadata(destination)
            .await
            .is_ok_and(|m| m.is_dir())
        {
            match source.file_name() {
                Some(name) => destination.join(name),
                None => return Err(Error::NotFound(FILE_NOT_FOUND.to_string())),
            }
        } else {
            destination.to_path_buf()
        };

        tokio::fs::copy(&source, &target).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to copy '{}' to '{}': {}",
                    source.display(),
                    target.display(),
                    e
                ),
            ))
        })?;

        tracing::info!(source = %source.display(), target = %target.display(), "Saved downloaded file");
        Ok(target)
    }

    /// Exact match first, then the first file sharing the stem
    async fn resolve_download(&self, filename: &str) -> Result<Option<PathBuf>> {
        let dir = self.download_dir();
        let exact = dir.join(filename);
        if tokio::fs::metadata(&exact).await.is_ok_and(|m| m.is_file()) {
            return Ok(Some(exact));
        }

        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename);
        if stem.is_empty() {
            return Ok(None);
        }

        let mut candidates = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
            if is_file && name.to_str().is_some_and(|n| n.starts_with(stem)) {
                candidates.push(entry.path());
            }
        }
        candidates.sort();

        Ok(candidates.into_iter().next())
    }
}

fn validate_filename(filename: &str) -> Result<()> {
    let trimmed = filename.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("No filename provided".to_string()));
    }
    if trimmed.contains('/') || trimmed.contains('\\') || trimmed.contains("..") {
        return Err(Error::Validation(format!(
            "Invalid filename '{}': must not contain path separators or '..'",
            filename
        )));
    }
    Ok(())
}
