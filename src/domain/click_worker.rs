//! Background worker recording clicks for redirects served from the cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

const MAX_RETRIES: usize = 3;

/// Consumes click events until every sender is dropped.
///
/// Each event increments the record's click count with a short exponential
/// backoff on failure. `NotFound` is not retried: the record was deleted after
/// the redirect was served.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<dyn UrlRepository>,
) {
    while let Some(event) = rx.recv().await {
        record_click(repository.as_ref(), &event).await;
    }

    debug!("Click channel closed, worker exiting");
}

async fn record_click(repository: &dyn UrlRepository, event: &ClickEvent) {
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_millis(500))
        .map(jitter)
        .take(MAX_RETRIES);

    let result = Retry::spawn(strategy, || async {
        match repository.increment_clicks(&event.key).await {
            Err(AppError::NotFound { .. }) => Ok(None),
            other => other.map(Some),
        }
    })
    .await;

    match result {
        Ok(Some(count)) => debug!(key = %event.key, count, "Click recorded"),
        Ok(None) => debug!(key = %event.key, "Click dropped, record no longer exists"),
        Err(e) => warn!(key = %event.key, error = %e, "Failed to record click"),
    }
}
