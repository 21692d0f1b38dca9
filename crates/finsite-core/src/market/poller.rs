//! Background market refresh.
//!
//! Fetches immediately and then on a fixed interval, reporting each result
//! over an mpsc channel. The task stops when the receiver is dropped or the
//! poller is shut down.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::error::ApiError;

use super::client::MarketClient;
use super::models::MarketSummary;

/// Refresh every 5 minutes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Buffer size for update channel
const CHANNEL_BUFFER_SIZE: usize = 8;

#[async_trait]
pub trait SummarySource: Send + Sync {
    async fn fetch_summary(&self) -> Result<MarketSummary, ApiError>;
}

#[async_trait]
impl SummarySource for MarketClient {
    async fn fetch_summary(&self) -> Result<MarketSummary, ApiError> {
        MarketClient::fetch_summary(self).await
    }
}

#[derive(Debug, Clone)]
pub enum MarketUpdate {
    Loaded {
        summary: MarketSummary,
        fetched_at: DateTime<Utc>,
    },
    /// Fetch failed; the previous summary (if any) is still the latest.
    Failed(String),
}

pub struct MarketPoller {
    handle: JoinHandle<()>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MarketPoller {
    pub fn spawn(
        source: Arc<dyn SummarySource>,
        interval: Duration,
    ) -> (Self, mpsc::Receiver<MarketUpdate>) {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            Self::run(source, interval, tx, shutdown_rx).await;
        });

        (
            Self {
                handle,
                shutdown: Some(shutdown_tx),
            },
            rx,
        )
    }

    async fn run(
        source: Arc<dyn SummarySource>,
        interval: Duration,
        tx: mpsc::Sender<MarketUpdate>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        info!(interval_secs = interval.as_secs(), "Market poller started");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    debug!("Market poller shut down");
                    break;
                }
                _ = ticker.tick() => {
                    let update = match source.fetch_summary().await {
                        Ok(summary) => MarketUpdate::Loaded {
                            summary,
                            fetched_at: Utc::now(),
                        },
                        Err(e) => {
                            warn!(error = %e, "Market summary refresh failed");
                            MarketUpdate::Failed(e.to_string())
                        }
                    };
                    if let Err(e) = tx.send(update).await {
                        error!(error = %e, "Failed to send market update - channel closed");
                        break;
                    }
                }
            }
        }
    }

    /// Stop polling and wait for the task to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.handle).await {
            error!(error = %e, "Market poller task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct FlakySource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SummarySource for FlakySource {
        async fn fetch_summary(&self) -> Result<MarketSummary, ApiError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call % 2 == 1 {
                return Err(ApiError::ServerError("busy".to_string()));
            }
            Ok(serde_json::from_str("{}").unwrap())
        }
    }

    #[tokio::test]
    async fn test_poller_reports_success_and_failure() {
        let source = Arc::new(FlakySource {
            calls: AtomicUsize::new(0),
        });
        let (poller, mut rx) = MarketPoller::spawn(source.clone(), Duration::from_millis(10));

        assert!(matches!(rx.recv().await, Some(MarketUpdate::Loaded { .. })));
        assert!(matches!(rx.recv().await, Some(MarketUpdate::Failed(_))));
        assert!(matches!(rx.recv().await, Some(MarketUpdate::Loaded { .. })));

        poller.shutdown().await;
        assert!(source.calls.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn test_poller_stops_when_receiver_dropped() {
        let source = Arc::new(FlakySource {
            calls: AtomicUsize::new(0),
        });
        let (poller, rx) = MarketPoller::spawn(source, Duration::from_millis(5));
        drop(rx);
        // The task exits on its first failed send.
        poller.handle.await.unwrap();
    }
}
