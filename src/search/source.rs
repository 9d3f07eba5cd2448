use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::document::Document;

/// Trait for the backing store of the document collection.
///
/// Abstracted as a trait so tests can feed documents without touching disk.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Read and deserialize the full document collection.
    async fn fetch(&self) -> Result<Vec<Document>, AppError>;

    /// Short human-readable name used in log lines.
    fn describe(&self) -> String;
}

/// Reads the collection from a JSON array on disk (`data/docs.json`).
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<Document>, AppError> {
        let raw = tokio::fs::read(&self.path).await.map_err(|e| {
            AppError::IndexLoad(format!("Failed to read '{}': {}", self.path.display(), e))
        })?;

        serde_json::from_slice(&raw).map_err(|e| {
            AppError::IndexLoad(format!("Failed to parse '{}': {}", self.path.display(), e))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentId;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_reads_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "title": "Intro", "body": "Getting started guide", "path": "/intro"}]"#,
        )
        .unwrap();

        let docs = JsonFileSource::new(&path).fetch().await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, DocumentId::from(json!(1)));
        assert_eq!(docs[0].path, "/intro");
    }

    #[tokio::test]
    async fn test_fetch_keeps_every_id_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(
            &path,
            r#"[
                {"id": 1, "title": "Intro", "body": "Getting started"},
                {"id": 2.5, "title": "Half", "body": "Fractional id"},
                {"id": 18446744073709551615, "title": "Big", "body": "Wide id"},
                {"id": "faq", "title": "FAQ", "body": "Questions"},
                {"id": false, "title": "Flag", "body": "Boolean id"}
            ]"#,
        )
        .unwrap();

        let docs = JsonFileSource::new(&path).fetch().await.unwrap();
        let ids: Vec<&serde_json::Value> = docs.iter().map(|d| d.id.as_value()).collect();
        assert_eq!(
            ids,
            vec![
                &json!(1),
                &json!(2.5),
                &json!(18446744073709551615_u64),
                &json!("faq"),
                &json!(false)
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonFileSource::new(dir.path().join("absent.json"));

        match source.fetch().await.unwrap_err() {
            AppError::IndexLoad(msg) => assert!(msg.contains("Failed to read")),
            other => panic!("Expected IndexLoad error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(&path, "{ not json").unwrap();

        match JsonFileSource::new(&path).fetch().await.unwrap_err() {
            AppError::IndexLoad(msg) => assert!(msg.contains("Failed to parse")),
            other => panic!("Expected IndexLoad error, got: {:?}", other),
        }
    }
}
