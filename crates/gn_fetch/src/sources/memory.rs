use std::time::Duration;

use async_trait::async_trait;
use gn_core::{Article, FetchError, NewsSource};

/// Answers every fetch with the same canned result, optionally after a delay.
#[derive(Debug, Clone)]
pub struct MemorySource {
    result: Result<Vec<Article>, FetchError>,
    delay: Option<Duration>,
}

impl MemorySource {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            result: Ok(articles),
            delay: None,
        }
    }

    pub fn failing(error: FetchError) -> Self {
        Self {
            result: Err(error),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl NewsSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_articles(&self) -> Result<Vec<Article>, FetchError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.clone()
    }
}
