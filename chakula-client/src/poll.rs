use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;

/// Default dashboard/history refresh period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Fixed-interval re-fetch loop. Each tick runs the refresh as its own
/// task, so a slow response never delays the next tick; overlapping polls
/// are neither coalesced nor cancelled.
pub fn spawn_poller<F, Fut>(period: Duration, mut refresh: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = time::interval(period);
        loop {
            ticker.tick().await;
            tokio::spawn(refresh());
        }
    })
}
