use std::path::PathBuf;

use async_trait::async_trait;
use gn_core::{Article, FetchError, NewsSource};

use super::newsdata::parse_response;

/// Reads a saved listing body from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl NewsSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_articles(&self) -> Result<Vec<Article>, FetchError> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FetchError::Unknown(format!("{}: {}", self.path.display(), e)))?;
        tracing::debug!("Read {} bytes from {}", body.len(), self.path.display());
        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("gn_fetch_{}_{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_reads_listing() {
        let path = temp_file(
            "listing.json",
            r#"{"results": [{"title": "From disk", "category": ["top"]}]}"#,
        );
        let articles = FileSource::new(&path).fetch_articles().await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].section, "top");
        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = FileSource::new("/definitely/not/here.json");
        assert!(matches!(source.fetch_articles().await, Err(FetchError::Unknown(_))));
    }

    #[tokio::test]
    async fn test_wrong_shape() {
        let path = temp_file("shape.json", r#"{"items": []}"#);
        let result = FileSource::new(&path).fetch_articles().await;
        assert!(matches!(result, Err(FetchError::InvalidResponseShape(_))));
        std::fs::remove_file(path).unwrap();
    }
}
