//! Time source used for rate limit waits.

use futures::future::BoxFuture;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wall clock and sleep primitive.
///
/// The rate limit wait is the only place the pipeline suspends, so this is
/// the seam tests replace to run without real waiting.
pub trait Clock: Send + Sync {
    /// Current POSIX time in seconds.
    fn now(&self) -> u64;

    /// Suspends the caller for `duration`.
    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()>;
}

/// [`Clock`] backed by the system time and tokio's timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn sleep(&self, duration: Duration) -> BoxFuture<'_, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}
