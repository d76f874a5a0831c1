use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::Article;

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Fetch the full article list. No retries.
    async fn fetch_articles(&self) -> Result<Vec<Article>, FetchError>;
}
