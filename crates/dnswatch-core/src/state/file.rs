// # File Alert Store
//
// File-based implementation of AlertStore.
//
// ## Purpose
//
// Keeps the last-alert timestamp across runs so that the cooldown survives
// between scheduled invocations.
//
// ## File Format
//
// A single line holding a decimal Unix timestamp in seconds:
//
// ```text
// 1729170000.123456
// ```
//
// ## Write Strategy
//
// - Atomic writes: new content goes to a `.tmp` sibling, then is renamed
// - Missing parent directories are created on write
//
// Corrupt content is reported as an error; the caller decides what it means.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::AlertStore;

/// File-based alert store
///
/// # Example
///
/// ```rust,no_run
/// use dnswatch_core::state::FileAlertStore;
/// use dnswatch_core::traits::AlertStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileAlertStore::new("last_mail_time.txt");
///
///     store.store_last_sent(1_729_170_000.5).await?;
///     assert_eq!(store.load_last_sent().await?, Some(1_729_170_000.5));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileAlertStore {
    path: PathBuf,
}

impl FileAlertStore {
    /// Create a store backed by `path`
    ///
    /// Nothing is touched on disk until the first read or write.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the file content
    fn parse_timestamp(content: &str) -> Result<f64, Error> {
        let trimmed = content.trim();
        let timestamp: f64 = trimmed.parse().map_err(|e| {
            Error::state_store(format!("Invalid timestamp '{}': {}", trimmed, e))
        })?;

        if !timestamp.is_finite() {
            return Err(Error::state_store(format!(
                "Invalid timestamp '{}': not a finite number",
                trimmed
            )));
        }

        Ok(timestamp)
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

#[async_trait]
impl AlertStore for FileAlertStore {
    async fn load_last_sent(&self) -> Result<Option<f64>, Error> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Alert state file does not exist: {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::state_store(format!(
                    "Failed to read alert state file {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        Self::parse_timestamp(&content).map(Some)
    }

    async fn store_last_sent(&self, timestamp: f64) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(timestamp.to_string().as_bytes())
                .await
                .map_err(|e| {
                    Error::state_store(format!(
                        "Failed to write to temp file {}: {}",
                        temp_path.display(),
                        e
                    ))
                })?;

            file.flush().await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Alert state written to file: {}", self.path.display());
        Ok(())
    }
}
