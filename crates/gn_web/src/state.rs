use std::sync::Arc;

use gn_core::{Config, NarrationError, NewsSource, Session};
use gn_fetch::fetch_once;
use tokio::sync::RwLock;
use tracing::info;

pub struct AppState {
    pub source: Arc<dyn NewsSource>,
    pub session: RwLock<Session>,
}

/// What a refresh ended with.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RefreshSummary {
    pub applied: bool,
    pub articles: usize,
    pub error: Option<&'static str>,
}

impl AppState {
    pub fn new(source: Arc<dyn NewsSource>, config: &Config) -> Self {
        let narration = Err(NarrationError::CapabilityUnavailable(
            "no speech output over HTTP".to_string(),
        ));
        Self {
            source,
            session: RwLock::new(Session::new(config, narration)),
        }
    }

    /// Full reload: clears the session, fetches again and applies the result.
    /// The lock is not held while the request is in flight.
    pub async fn refresh(&self) -> RefreshSummary {
        let ticket = self.session.write().await.reload();
        info!("🔄 Refreshing articles from {}", self.source.name());
        let outcome = fetch_once(self.source.as_ref(), ticket).await;

        let mut session = self.session.write().await;
        let applied = session.apply_fetch(outcome.ticket, outcome.result);
        RefreshSummary {
            applied,
            articles: session.articles().len(),
            error: session.error_message(),
        }
    }
}
