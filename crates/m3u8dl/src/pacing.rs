use std::{future::Future, time::Duration};

/// Throttles requests against the origin server.
///
/// The downloader calls [Pacer::pace] after every segment and between jobs.
pub trait Pacer: Send + Sync {
    fn pace(&self) -> impl Future<Output = ()> + Send;
}

/// Suspends for a fixed interval on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedIntervalPacer {
    interval: Duration,
}

impl FixedIntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Pacer for FixedIntervalPacer {
    async fn pace(&self) {
        if self.interval.is_zero() {
            return;
        }
        tokio::time::sleep(self.interval).await;
    }
}
