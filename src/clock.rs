//! Clock and timer seam used for cache ages, probe timeouts and retry backoff.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// Source of time for the resolver and cache
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer (respects paused time in tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
