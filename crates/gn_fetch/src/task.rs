use std::sync::Arc;

use gn_core::{Article, FetchError, FetchTicket, NewsSource};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Result of one fetch, tagged with the ticket it was started for.
#[derive(Debug)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<Vec<Article>, FetchError>,
}

/// A fetch running in the background.
///
/// Dropping the task aborts the request, so a fetch never outlives the
/// session that started it.
#[derive(Debug)]
pub struct FetchTask {
    ticket: FetchTicket,
    handle: JoinHandle<()>,
}

impl FetchTask {
    pub fn spawn(
        source: Arc<dyn NewsSource>,
        ticket: FetchTicket,
        outcomes: mpsc::UnboundedSender<FetchOutcome>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            debug!("Fetch {} from {}", ticket, source.name());
            let result = source.fetch_articles().await;
            if outcomes.send(FetchOutcome { ticket, result }).is_err() {
                debug!("Fetch {} finished after its receiver went away", ticket);
            }
        });
        Self { ticket, handle }
    }

    pub fn ticket(&self) -> FetchTicket {
        self.ticket
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Drop for FetchTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Run one fetch to completion on the current task.
pub async fn fetch_once(source: &dyn NewsSource, ticket: FetchTicket) -> FetchOutcome {
    FetchOutcome {
        ticket,
        result: source.fetch_articles().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MemorySource;
    use std::time::Duration;

    #[tokio::test]
    async fn test_outcome_carries_ticket() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let source = Arc::new(MemorySource::new(vec![]));
        let task = FetchTask::spawn(source, 7, tx);
        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.ticket, 7);
        assert_eq!(task.ticket(), 7);
        assert!(outcome.result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_task_never_reports() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let source = Arc::new(MemorySource::new(vec![]).with_delay(Duration::from_millis(200)));
        let task = FetchTask::spawn(source, 1, tx);
        drop(task);
        // The aborted task dropped its sender, so the channel closes empty.
        let received = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        assert!(received.is_none());
    }

    #[tokio::test]
    async fn test_fetch_once_reports_errors() {
        let source = MemorySource::failing(FetchError::NetworkFailure("down".into()));
        let outcome = fetch_once(&source, 3).await;
        assert_eq!(outcome.ticket, 3);
        assert!(matches!(outcome.result, Err(FetchError::NetworkFailure(_))));
    }
}
