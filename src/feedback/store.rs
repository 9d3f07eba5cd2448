use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::AppError;

/// Trait for feedback persistence.
///
/// Abstracted as a trait so handler tests can capture entries in memory.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Append one entry to the log.
    async fn append(&self, entry: Value) -> Result<(), AppError>;
}

/// Keeps all submissions in a single pretty-printed JSON array file.
///
/// Appends rewrite the whole array; the mutex keeps concurrent submissions
/// from overwriting each other.
pub struct JsonFileFeedbackStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileFeedbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_entries(&self) -> Result<Vec<Value>, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) => serde_json::from_slice(&raw).map_err(|e| {
                AppError::Internal(format!(
                    "Feedback log '{}' is corrupt: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to read feedback log '{}': {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[async_trait]
impl FeedbackStore for JsonFileFeedbackStore {
    async fn append(&self, entry: Value) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Internal(format!("Failed to create '{}': {}", parent.display(), e))
            })?;
        }

        let mut entries = self.read_entries().await?;
        entries.push(entry);

        let serialized = serde_json::to_vec_pretty(&entries)
            .map_err(|e| AppError::Internal(format!("Failed to serialize feedback: {e}")))?;

        tokio::fs::write(&self.path, serialized).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to write feedback log '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!("Feedback log now holds {} entries", entries.len());
        Ok(())
    }
}
